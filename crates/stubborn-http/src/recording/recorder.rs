//! Perform a real request and keep a stub of the outcome.

use crate::client::{ClientResponse, HttpClient};
use crate::error::StubError;
use crate::request::StubRequest;
use crate::store::StubStore;
use crate::stub::StubRecord;
use crate::transform::BodyTransform;
use std::sync::Arc;
use tracing::{debug, info};

/// Records real calls into a store.
///
/// Bodies pass through the storage hooks of the transform before the record
/// is written. The caller gets the real, untransformed result.
#[derive(Clone)]
pub struct StubRecorder {
    store: Arc<dyn StubStore>,
    client: Arc<dyn HttpClient>,
    transform: Arc<dyn BodyTransform>,
}

impl StubRecorder {
    pub fn new(
        store: Arc<dyn StubStore>,
        client: Arc<dyn HttpClient>,
        transform: Arc<dyn BodyTransform>,
    ) -> Self {
        Self {
            store,
            client,
            transform,
        }
    }

    pub fn with_transform(mut self, transform: Arc<dyn BodyTransform>) -> Self {
        self.transform = transform;
        self
    }

    /// Perform `request`, store what came back and return it.
    ///
    /// A transport failure is recorded as well and then returned as
    /// [`StubError::Transport`]. Failing to store the record is an error even
    /// when the call itself succeeded.
    pub async fn record(&self, request: &StubRequest) -> Result<ClientResponse, StubError> {
        debug!("Recording {} {}", request.method, request.url);
        let result = self.client.perform(request).await;

        let mut stored_request = request.clone();
        stored_request.body = self
            .transform
            .prepare_request_body_for_storage(request.body.clone(), request);
        let mut record = StubRecord::new(stored_request);

        match &result {
            Ok(live) => {
                record.response = Some(live.response.clone());
                record.body = self
                    .transform
                    .prepare_response_body_for_storage(live.body.clone(), request);
            }
            Err(error) => record.error = Some(error.clone()),
        }

        self.store.store(record)?;
        info!("Recorded stub for {} {}", request.method, request.url);

        result.map_err(StubError::from)
    }
}
