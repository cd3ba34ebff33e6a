//! Admin server API client.
//!
//! Async HTTP client using `reqwest` with Bearer token authentication.

use std::path::Path;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Body, StatusCode, multipart};
use serde::de::DeserializeOwned;
use tokio_util::io::ReaderStream;
use tracing::debug;

use spa_deploy_protocol::{
    DomainInfo, DomainVersionQuery, FileMetadata, GetDomainQuery, ReleaseVersionRequest,
    RevokeVersionRequest, UpdateUploadingStatusRequest, UploadFileQuery, UploadPosition,
    UploadingStatus,
};

/// Errors from the admin client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("authentication rejected ({status}): {body}")]
    Unauthorized { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no auth token configured")]
    MissingToken,

    #[error("invalid auth token")]
    InvalidToken,
}

impl Error {
    /// Returns `true` when the server refused the token, or no token was set.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Error::Unauthorized { .. } | Error::MissingToken | Error::InvalidToken
        )
    }
}

/// Admin server API client.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Creates a new client for the admin server at `address`.
    ///
    /// `timeout` applies to every request; `None` leaves requests unbounded.
    pub fn new(address: &str, auth_token: &str, timeout: Option<Duration>) -> Result<Self, Error> {
        if auth_token.is_empty() {
            return Err(Error::MissingToken);
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {auth_token}"))
                .map_err(|_| Error::InvalidToken)?,
        );

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: address.trim_end_matches('/').to_string(),
        })
    }

    /// The admin server address this client talks to.
    pub fn address(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// Lists domains with their current and stored versions.
    pub async fn get_domain_info(&self, domain: Option<String>) -> Result<Vec<DomainInfo>, Error> {
        let resp = self
            .http
            .get(self.url("status"))
            .query(&GetDomainQuery { domain })
            .send()
            .await?;
        json_response(resp).await
    }

    /// Asks the server where the next upload of `domain` should go.
    pub async fn get_upload_position(&self, domain: &str) -> Result<UploadPosition, Error> {
        let resp = self
            .http
            .get(self.url("upload/position"))
            .query(&[("domain", domain), ("format", "Json")])
            .send()
            .await?;
        json_response(resp).await
    }

    /// Fetches the stored file manifest of a domain version.
    pub async fn get_file_metadata(
        &self,
        domain: &str,
        version: u32,
    ) -> Result<Vec<FileMetadata>, Error> {
        let resp = self
            .http
            .get(self.url("files/metadata"))
            .query(&DomainVersionQuery {
                domain: domain.to_string(),
                version,
            })
            .send()
            .await?;
        json_response(resp).await
    }

    /// Moves a domain version to `status`.
    pub async fn change_uploading_status(
        &self,
        domain: &str,
        version: u32,
        status: UploadingStatus,
    ) -> Result<(), Error> {
        let resp = self
            .http
            .post(self.url("files/upload_status"))
            .json(&UpdateUploadingStatusRequest {
                domain: domain.to_string(),
                version,
                status,
            })
            .send()
            .await?;
        empty_response(resp).await
    }

    /// Uploads one file as a multipart `file` part stored under `key`.
    ///
    /// The file is opened and streamed on every call.
    pub async fn upload_file(
        &self,
        domain: &str,
        version: u32,
        key: &str,
        path: &Path,
    ) -> Result<(), Error> {
        let file = tokio::fs::File::open(path).await?;
        let len = file.metadata().await?.len();
        let file_name = key.rsplit('/').next().unwrap_or(key).to_string();
        let part = multipart::Part::stream_with_length(Body::wrap_stream(ReaderStream::new(file)), len)
            .file_name(file_name);
        let form = multipart::Form::new().part("file", part);

        let resp = self
            .http
            .post(self.url("file/upload"))
            .query(&UploadFileQuery {
                domain: domain.to_string(),
                version,
                path: key.to_string(),
            })
            .multipart(form)
            .send()
            .await?;
        empty_response(resp).await
    }

    /// Makes `version` (or the latest version) the one being served.
    ///
    /// Returns the server's textual answer.
    pub async fn release_version(
        &self,
        domain: &str,
        version: Option<u32>,
    ) -> Result<String, Error> {
        let resp = self
            .http
            .post(self.url("update_version"))
            .json(&ReleaseVersionRequest {
                domain: domain.to_string(),
                version,
            })
            .send()
            .await?;
        let resp = check_status(resp).await?;
        Ok(resp.text().await?)
    }

    /// Withdraws a version from being served.
    pub async fn revoke_version(&self, domain: &str, version: u32) -> Result<(), Error> {
        let resp = self
            .http
            .post(self.url("files/revoke_version"))
            .json(&RevokeVersionRequest {
                domain: domain.to_string(),
                version,
            })
            .send()
            .await?;
        empty_response(resp).await
    }
}

/// Maps a non-success status to an error carrying the response body.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(Error::Unauthorized {
            status: status.as_u16(),
            body,
        });
    }
    Err(Error::Api {
        status: status.as_u16(),
        body,
    })
}

async fn empty_response(resp: reqwest::Response) -> Result<(), Error> {
    check_status(resp).await?;
    Ok(())
}

async fn json_response<T: DeserializeOwned + std::fmt::Debug>(
    resp: reqwest::Response,
) -> Result<T, Error> {
    let resp = check_status(resp).await?;
    let body = resp.bytes().await?;
    let parsed: T = serde_json::from_slice(&body)?;
    debug!(response = ?parsed, "admin server response");
    Ok(parsed)
}
