use std::io::Read;
use std::path::Path;

use crate::{HASH_BUFFER_SIZE, TransferError};

/// Computes MD5 of `data` and returns the lowercase hex digest.
pub fn md5_bytes(data: &[u8]) -> String {
    hex::encode(md5::compute(data).0)
}

/// Computes MD5 of an entire file and returns the lowercase hex digest.
///
/// This is the digest the admin server records in its file manifest.
pub fn md5_file(path: &Path) -> Result<String, TransferError> {
    let mut file = std::fs::File::open(path)?;
    let mut ctx = md5::Context::new();
    let mut buf = vec![0u8; HASH_BUFFER_SIZE];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        ctx.consume(&buf[..n]);
    }
    Ok(hex::encode(ctx.compute().0))
}
