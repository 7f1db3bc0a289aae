use std::path::PathBuf;

use thiserror::Error;

/// Failures while preparing the HTTP client or the request template.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Failed to read cacert '{path}': {source}")]
    ReadCacert {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid cacert '{path}': {source}")]
    InvalidCacert {
        path: PathBuf,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to read cert '{path}': {source}")]
    ReadCert {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read key '{path}': {source}")]
    ReadKey {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid cert/key: {source}")]
    InvalidIdentity {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
}

/// Failure of a single request attempt.
///
/// Workers never propagate these; they turn them into outcomes or a
/// fail-fast signal.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Failed to build request: {message}")]
    Construction { message: String },
    #[error("Request failed: {message}")]
    Transport { message: String },
}

impl RequestError {
    #[must_use]
    pub const fn is_construction(&self) -> bool {
        matches!(self, RequestError::Construction { .. })
    }
}
