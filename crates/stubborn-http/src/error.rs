//! Error types shared across stores, codec and sessions.

use std::path::PathBuf;

/// Errors raised while decoding, storing or delivering stubs.
#[derive(Debug, thiserror::Error)]
pub enum StubError {
    #[error("Stub is missing the request URL")]
    MissingRequestUrl,
    #[error("Invalid request URL '{0}'")]
    InvalidRequestUrl(String),
    #[error("Invalid response URL '{0}'")]
    InvalidResponseUrl(String),
    #[error("Header field '{0}' has no '[:::]' separator")]
    MalformedHeader(String),
    #[error("Invalid base64 in {field}: {source}")]
    InvalidBase64 {
        field: &'static str,
        #[source]
        source: base64::DecodeError,
    },
    #[error("Invalid stub JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Failed to decode stubs from {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: Box<StubError>,
    },
    #[error("No stub found for {method} {url}")]
    NoStubFound { method: String, url: String },
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Transport error: {0}")]
    Transport(String),
}

impl StubError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StubError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for content errors produced by the codec.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            StubError::MissingRequestUrl
                | StubError::InvalidRequestUrl(_)
                | StubError::InvalidResponseUrl(_)
                | StubError::MalformedHeader(_)
                | StubError::InvalidBase64 { .. }
                | StubError::InvalidJson(_)
                | StubError::Decode { .. }
        )
    }
}

/// Failure reported by an [`HttpClient`](crate::client::HttpClient) while
/// performing a real request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<TransportError> for StubError {
    fn from(err: TransportError) -> Self {
        StubError::Transport(err.message)
    }
}
