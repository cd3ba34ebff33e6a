//! Async client for the SPA admin server.
//!
//! Wraps the server's HTTP contract (upload position, file manifest,
//! upload status, file upload, release and revoke) behind typed methods.

pub mod client;

pub use client::{Client, Error};
