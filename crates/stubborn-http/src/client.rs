//! The seam through which real requests are performed while recording.

use crate::error::TransportError;
use crate::request::{StubRequest, StubResponse};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use tracing::debug;

/// Response metadata and body returned by a real call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientResponse {
    pub response: StubResponse,
    pub body: Option<Bytes>,
}

/// Performs real HTTP requests.
///
/// # Implementations
///
/// - [`ReqwestClient`]: `reqwest` backed client
/// - Fakes in tests that count calls or return canned responses
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform `request` and collect the whole response.
    ///
    /// A non-2xx status is a response, not an error. Errors are reserved for
    /// transport failures (DNS, connection, body read).
    async fn perform(&self, request: &StubRequest) -> Result<ClientResponse, TransportError>;
}

/// [`HttpClient`] over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Client with a 30 second timeout.
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TransportError::new(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an already configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn perform(&self, request: &StubRequest) -> Result<ClientResponse, TransportError> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|_| TransportError::new(format!("Invalid method '{}'", request.method)))?;

        let mut builder = self.client.request(method, request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        debug!("Performing {} {}", request.method, request.url);
        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;

        let mut stub_response =
            StubResponse::new(response.status().as_u16()).with_url(response.url().clone());
        for (name, value) in response.headers() {
            stub_response = stub_response
                .with_header(name.as_str(), &String::from_utf8_lossy(value.as_bytes()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;

        Ok(ClientResponse {
            response: stub_response,
            body: (!body.is_empty()).then_some(body),
        })
    }
}
