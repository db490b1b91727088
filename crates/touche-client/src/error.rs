//! Tournament client and credential store error types.

use std::path::PathBuf;

/// Errors from tournament API calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The endpoint URL from the match descriptor is unusable.
    #[error("invalid tournament URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    /// Registration was attempted with a blank device name.
    #[error("device name must not be empty")]
    EmptyDeviceName,
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The tournament system returned a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Build(reqwest::Error),
}

/// Errors from the local credential store.
#[derive(Debug, thiserror::Error)]
pub enum CredentialStoreError {
    /// Reading or writing the backing file failed.
    #[error("credential store I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The backing file is not a JSON object of strings.
    #[error("credential store at {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}
