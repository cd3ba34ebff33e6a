//! Remote store trait.
//!
//! The deploy flow only talks to the server through [`RemoteStore`]. The
//! admin HTTP client implements it; tests implement it with in-memory mocks.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use spa_deploy_admin_client::Client;
use spa_deploy_protocol::{FileMetadata, UploadPosition, UploadingStatus};

use crate::error::DeployError;

/// Boxed future returned by [`RemoteStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, DeployError>> + Send + 'a>>;

/// Abstract connection to the admin server.
pub trait RemoteStore: Send + Sync {
    /// Asks where the next upload of `domain` should go.
    fn upload_position<'a>(&'a self, domain: &'a str) -> StoreFuture<'a, UploadPosition>;

    /// Lists the files already stored for a domain version.
    fn file_metadata<'a>(
        &'a self,
        domain: &'a str,
        version: u32,
    ) -> StoreFuture<'a, Vec<FileMetadata>>;

    /// Moves a domain version to `status`.
    fn set_uploading_status<'a>(
        &'a self,
        domain: &'a str,
        version: u32,
        status: UploadingStatus,
    ) -> StoreFuture<'a, ()>;

    /// Sends one file. A single call is a single attempt.
    fn upload_file<'a>(
        &'a self,
        domain: &'a str,
        version: u32,
        key: &'a str,
        path: &'a Path,
    ) -> StoreFuture<'a, ()>;
}

impl RemoteStore for Client {
    fn upload_position<'a>(&'a self, domain: &'a str) -> StoreFuture<'a, UploadPosition> {
        Box::pin(async move { Ok(self.get_upload_position(domain).await?) })
    }

    fn file_metadata<'a>(
        &'a self,
        domain: &'a str,
        version: u32,
    ) -> StoreFuture<'a, Vec<FileMetadata>> {
        Box::pin(async move { Ok(self.get_file_metadata(domain, version).await?) })
    }

    fn set_uploading_status<'a>(
        &'a self,
        domain: &'a str,
        version: u32,
        status: UploadingStatus,
    ) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            Ok(self
                .change_uploading_status(domain, version, status)
                .await?)
        })
    }

    fn upload_file<'a>(
        &'a self,
        domain: &'a str,
        version: u32,
        key: &'a str,
        path: &'a Path,
    ) -> StoreFuture<'a, ()> {
        Box::pin(async move { Ok(Client::upload_file(self, domain, version, key, path).await?) })
    }
}
