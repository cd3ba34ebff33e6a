//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "spa-client", version, about = "Deploy SPA bundles to the admin server")]
pub struct CliCommand {
    #[command(subcommand)]
    pub commands: Commands,

    /// Config file; falls back to SPA_CLIENT_CONFIG, then the platform default.
    #[arg(long, short, value_name = "SPA_CLIENT_CONFIG", global = true)]
    pub config_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show domains and their versions.
    Info { domain: Option<String> },
    /// Upload a built bundle into a domain version.
    Upload(UploadArg),
    /// Serve a version (the latest finished one if omitted).
    Release {
        domain: String,
        version: Option<u32>,
    },
    /// Stop serving a version.
    Revoke { domain: String, version: u32 },
}

#[derive(Args, Debug)]
pub struct UploadArg {
    /// Bundle root directory.
    pub path: PathBuf,
    pub domain: String,
    /// Target version; resolved by the server when omitted.
    pub version: Option<u32>,
    /// Concurrent uploads.
    #[arg(short, long)]
    pub parallel: Option<usize>,
    /// Attempts per file.
    #[arg(short, long)]
    pub retry: Option<u32>,
}
