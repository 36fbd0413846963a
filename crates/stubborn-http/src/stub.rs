//! The stub record: one request paired with its recorded outcome.

use crate::error::TransportError;
use crate::matcher::{matches, MatchOptions};
use crate::request::{StubRequest, StubResponse};
use bytes::Bytes;

/// Immutable snapshot of a request and what came back for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubRecord {
    pub request: StubRequest,
    pub response: Option<StubResponse>,
    /// Response body bytes
    pub body: Option<Bytes>,
    /// Recorded transport failure; takes precedence over response and body on delivery
    pub error: Option<TransportError>,
}

impl StubRecord {
    pub fn new(request: StubRequest) -> Self {
        Self {
            request,
            response: None,
            body: None,
            error: None,
        }
    }

    pub fn with_response(mut self, response: StubResponse) -> Self {
        self.response = Some(response);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_error(mut self, error: TransportError) -> Self {
        self.error = Some(error);
        self
    }

    /// Whether this record answers `request` under `options`.
    pub fn answers(&self, request: &StubRequest, options: &MatchOptions) -> bool {
        matches(request, &self.request, options)
    }

    /// The deliverable outcome, with a recorded error winning over any data.
    pub fn outcome(&self) -> Result<(Option<&StubResponse>, Option<&Bytes>), &TransportError> {
        match &self.error {
            Some(error) => Err(error),
            None => Ok((self.response.as_ref(), self.body.as_ref())),
        }
    }
}
