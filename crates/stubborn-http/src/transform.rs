//! Body transform hooks applied before storing and before delivering stubs.
//!
//! Transforms are how sensitive data (tokens, personal data) is kept out of
//! stub files: request and response bodies pass through the storage hooks
//! before a record is written, and stored response bodies pass through the
//! delivery hook before they reach the caller.

use crate::request::StubRequest;
use bytes::Bytes;
use regex::bytes::Regex;
use serde::{Deserialize, Serialize};

/// Rewrites stubbed body data.
///
/// Every hook defaults to returning the body unchanged.
pub trait BodyTransform: Send + Sync {
    /// Called with the request body before a stub for `request` is stored.
    fn prepare_request_body_for_storage(
        &self,
        body: Option<Bytes>,
        _request: &StubRequest,
    ) -> Option<Bytes> {
        body
    }

    /// Called with the response body before it is stored for `request`.
    fn prepare_response_body_for_storage(
        &self,
        body: Option<Bytes>,
        _request: &StubRequest,
    ) -> Option<Bytes> {
        body
    }

    /// Called with the stored response body just before it is delivered.
    fn process_response_body_for_delivery(
        &self,
        body: Option<Bytes>,
        _request: &StubRequest,
    ) -> Option<Bytes> {
        body
    }
}

/// Transform that leaves every body unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl BodyTransform for PassThrough {}

/// A single redaction: every match of `pattern` is replaced by `replacement`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RedactionRule {
    pub pattern: String,
    #[serde(default = "default_replacement")]
    pub replacement: String,
}

fn default_replacement() -> String {
    "[REDACTED]".to_string()
}

/// Redacts stored request and response bodies. Delivery is left untouched.
#[derive(Debug, Clone)]
pub struct Redactor {
    rules: Vec<(Regex, String)>,
}

impl Redactor {
    pub fn new(rules: &[RedactionRule]) -> Result<Self, regex::Error> {
        let rules = rules
            .iter()
            .map(|rule| Ok((Regex::new(&rule.pattern)?, rule.replacement.clone())))
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { rules })
    }

    fn redact(&self, body: Option<Bytes>) -> Option<Bytes> {
        let body = body?;
        if self.rules.is_empty() {
            return Some(body);
        }

        let mut data = body.to_vec();
        for (pattern, replacement) in &self.rules {
            data = pattern
                .replace_all(&data, replacement.as_bytes())
                .into_owned();
        }
        Some(Bytes::from(data))
    }
}

impl BodyTransform for Redactor {
    fn prepare_request_body_for_storage(
        &self,
        body: Option<Bytes>,
        _request: &StubRequest,
    ) -> Option<Bytes> {
        self.redact(body)
    }

    fn prepare_response_body_for_storage(
        &self,
        body: Option<Bytes>,
        _request: &StubRequest,
    ) -> Option<Bytes> {
        self.redact(body)
    }
}
