//! Owner of the stores, transform and options a test works with.

use crate::client::HttpClient;
use crate::config::{StubConfig, StubSource};
use crate::error::{StubError, TransportError};
use crate::matcher::MatchOptions;
use crate::recording::{RecordMode, StubSession};
use crate::request::{StubRequest, StubResponse};
use crate::store::{CombinedStore, EphemeralStore, PersistentStore, StubStore};
use crate::stub::StubRecord;
use crate::transform::{BodyTransform, PassThrough};
use anyhow::Context;
use bytes::Bytes;
use std::sync::Arc;
use tracing::info;

/// A stubbed network.
///
/// Holds an ephemeral store for stubs added by hand and, optionally, a
/// persistent store for recorded stubs. Sessions read from both, ephemeral
/// first.
pub struct StubbornNetwork {
    ephemeral: Arc<EphemeralStore>,
    persistent: Option<Arc<PersistentStore>>,
    transform: Arc<dyn BodyTransform>,
    options: MatchOptions,
    record_mode: RecordMode,
}

impl StubbornNetwork {
    /// Network with only an ephemeral store, strict matching and playback mode.
    pub fn ephemeral() -> Self {
        Self {
            ephemeral: Arc::new(EphemeralStore::new()),
            persistent: None,
            transform: Arc::new(PassThrough),
            options: MatchOptions::default(),
            record_mode: RecordMode::default(),
        }
    }

    /// Build a network from configuration.
    ///
    /// A persistent stub file is opened right away, so a broken file fails
    /// here rather than on first use (unless `lenient` is set). A `record`
    /// mode starts from playback and switches, so the file is cleared once.
    pub fn from_config(config: &StubConfig) -> Result<Self, anyhow::Error> {
        config.validate()?;

        let options = config.match_options();
        let mut ephemeral = EphemeralStore::new();
        if let Some(dedup) = config.dedup_options() {
            ephemeral = ephemeral.with_dedup(dedup);
        }

        let mut network = Self::ephemeral().with_options(options);
        network.ephemeral = Arc::new(ephemeral);

        if let StubSource::Persistent(location) = &config.source {
            let opened = if config.lenient {
                PersistentStore::in_directory_lenient(&location.path, &location.name)
            } else {
                PersistentStore::in_directory(&location.path, &location.name)
            };
            let mut store = opened
                .with_context(|| format!("Failed to open stub source '{}'", location.name))?
                .with_playback_policy(config.playback);
            if let Some(dedup) = config.dedup_options() {
                store = store.with_dedup(dedup);
            }

            info!(
                "Using stub source '{}' with {} stubs",
                location.name,
                store.len()
            );
            network.persistent = Some(Arc::new(store));
        }

        if let Some(redactor) = config.redactor()? {
            network.transform = Arc::new(redactor);
        }

        network
            .set_record_mode(config.record_mode)
            .context("Failed to clear stub source for recording")?;
        Ok(network)
    }

    pub fn with_persistent(mut self, store: PersistentStore) -> Self {
        self.persistent = Some(Arc::new(store));
        self
    }

    pub fn with_transform(mut self, transform: Arc<dyn BodyTransform>) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the mode without touching stored stubs.
    pub fn with_record_mode(mut self, mode: RecordMode) -> Self {
        self.record_mode = mode;
        self
    }

    pub fn record_mode(&self) -> RecordMode {
        self.record_mode
    }

    /// Change the mode new sessions start in.
    ///
    /// Switching into [`RecordMode::Record`] from another mode clears every
    /// stub source.
    pub fn set_record_mode(&mut self, mode: RecordMode) -> Result<(), StubError> {
        if mode == self.record_mode {
            return Ok(());
        }
        info!("Network record mode changed from {} to {}", self.record_mode, mode);
        if mode == RecordMode::Record {
            self.stub_source().clear()?;
        }
        self.record_mode = mode;
        Ok(())
    }

    pub fn ephemeral_store(&self) -> &Arc<EphemeralStore> {
        &self.ephemeral
    }

    pub fn persistent_store(&self) -> Option<&Arc<PersistentStore>> {
        self.persistent.as_ref()
    }

    /// Stub `request` by hand.
    ///
    /// Bodies pass through the storage hooks; the record lands in the
    /// ephemeral store.
    pub fn stub(
        &self,
        request: StubRequest,
        body: Option<Bytes>,
        response: Option<StubResponse>,
        error: Option<TransportError>,
    ) -> Result<(), StubError> {
        let mut stored_request = request.clone();
        stored_request.body = self
            .transform
            .prepare_request_body_for_storage(request.body.clone(), &request);

        let record = StubRecord {
            body: self
                .transform
                .prepare_response_body_for_storage(body, &request),
            request: stored_request,
            response,
            error,
        };
        self.ephemeral.store(record)
    }

    /// All stub sources, ephemeral first.
    pub fn stub_source(&self) -> CombinedStore {
        let combined = CombinedStore::default().with_source(self.ephemeral.clone());
        match &self.persistent {
            Some(persistent) => combined.with_source(persistent.clone()),
            None => combined,
        }
    }

    /// Session over [`stub_source`](Self::stub_source) in the configured mode.
    ///
    /// Stores are not cleared here; see [`set_record_mode`](Self::set_record_mode).
    pub fn session(&self, client: Arc<dyn HttpClient>) -> StubSession {
        StubSession::new(Arc::new(self.stub_source()), client)
            .with_options(self.options.clone())
            .with_transform(self.transform.clone())
            .with_record_mode(self.record_mode)
    }
}
