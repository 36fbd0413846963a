//! The record-mode controller.

use super::mode::RecordMode;
use super::recorder::StubRecorder;
use crate::client::HttpClient;
use crate::error::StubError;
use crate::matcher::MatchOptions;
use crate::request::{StubRequest, StubResponse};
use crate::store::StubStore;
use crate::stub::StubRecord;
use crate::transform::{BodyTransform, PassThrough};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, info};

/// What a session hands back for a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StubbedResponse {
    pub response: Option<StubResponse>,
    pub body: Option<Bytes>,
}

/// Decides per request whether to play back or record.
pub struct StubSession {
    store: Arc<dyn StubStore>,
    recorder: StubRecorder,
    transform: Arc<dyn BodyTransform>,
    options: MatchOptions,
    mode: RecordMode,
}

impl StubSession {
    /// Session in [`RecordMode::Playback`] with strict matching and no transform.
    pub fn new(store: Arc<dyn StubStore>, client: Arc<dyn HttpClient>) -> Self {
        let transform: Arc<dyn BodyTransform> = Arc::new(PassThrough);
        Self {
            recorder: StubRecorder::new(store.clone(), client, transform.clone()),
            store,
            transform,
            options: MatchOptions::default(),
            mode: RecordMode::default(),
        }
    }

    pub fn with_options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_transform(mut self, transform: Arc<dyn BodyTransform>) -> Self {
        self.recorder = self.recorder.with_transform(transform.clone());
        self.transform = transform;
        self
    }

    /// Start in `mode` without clearing anything.
    pub fn with_record_mode(mut self, mode: RecordMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn record_mode(&self) -> RecordMode {
        self.mode
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    pub fn store(&self) -> &Arc<dyn StubStore> {
        &self.store
    }

    /// Switch modes. Entering [`RecordMode::Record`] from another mode
    /// clears the store.
    pub fn set_record_mode(&mut self, mode: RecordMode) -> Result<(), StubError> {
        if mode == self.mode {
            return Ok(());
        }

        info!("Record mode changed from {} to {}", self.mode, mode);
        if mode == RecordMode::Record {
            self.store.clear()?;
        }
        self.mode = mode;
        Ok(())
    }

    /// Satisfy `request` according to the current record mode.
    pub async fn handle(&self, request: &StubRequest) -> Result<StubbedResponse, StubError> {
        match self.mode {
            RecordMode::Playback => match self.store.lookup(request, &self.options) {
                Some(record) => self.deliver(&record, request),
                None => {
                    debug!("Unexpected request {} {}", request.method, request.url);
                    Err(StubError::NoStubFound {
                        method: request.method.clone(),
                        url: request.url.to_string(),
                    })
                }
            },
            RecordMode::Record => self.record(request).await,
            RecordMode::RecordNew => match self.store.lookup(request, &self.options) {
                Some(record) => self.deliver(&record, request),
                None => self.record(request).await,
            },
        }
    }

    async fn record(&self, request: &StubRequest) -> Result<StubbedResponse, StubError> {
        let live = self.recorder.record(request).await?;
        Ok(StubbedResponse {
            response: Some(live.response),
            body: live.body,
        })
    }

    fn deliver(
        &self,
        record: &StubRecord,
        request: &StubRequest,
    ) -> Result<StubbedResponse, StubError> {
        let (response, body) = record.outcome().map_err(|e| StubError::from(e.clone()))?;
        debug!("Playing back stub for {} {}", request.method, request.url);
        Ok(StubbedResponse {
            response: response.cloned(),
            body: self
                .transform
                .process_response_body_for_delivery(body.cloned(), request),
        })
    }
}
