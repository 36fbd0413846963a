//! Request and response descriptions captured in stubs.

use crate::error::StubError;
use bytes::Bytes;
use url::Url;

/// Ordered header list. Duplicate names are kept in insertion order.
pub type HeaderFields = Vec<(String, String)>;

/// Description of an outgoing HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubRequest {
    pub method: String,
    pub url: Url,
    pub headers: HeaderFields,
    pub body: Option<Bytes>,
}

impl StubRequest {
    /// Create a request with no headers and no body.
    pub fn new(method: &str, url: Url) -> Self {
        Self {
            method: method.to_string(),
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Parse `url` and create a request for it.
    pub fn parse(method: &str, url: &str) -> Result<Self, StubError> {
        let url = Url::parse(url).map_err(|_| StubError::InvalidRequestUrl(url.to_string()))?;
        Ok(Self::new(method, url))
    }

    pub fn get(url: &str) -> Result<Self, StubError> {
        Self::parse("GET", url)
    }

    pub fn post(url: &str) -> Result<Self, StubError> {
        Self::parse("POST", url)
    }

    /// Append a header, keeping any existing value for the same name.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_string(), value.to_string()));
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// First value of a header, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Response metadata of a recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubResponse {
    pub status: u16,
    /// URL the response claims to be for.
    pub url: Option<Url>,
    pub headers: HeaderFields,
}

impl StubResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            url: None,
            headers: Vec::new(),
        }
    }

    pub fn with_url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a HeaderFields, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
