//! Composition of several stub stores.

use super::StubStore;
use crate::error::StubError;
use crate::matcher::MatchOptions;
use crate::request::StubRequest;
use crate::stub::StubRecord;
use std::sync::Arc;

/// Combines multiple stores into one.
///
/// Writes go to every source. Reads return the answer of the first source
/// that has one.
#[derive(Clone, Default)]
pub struct CombinedStore {
    sources: Vec<Arc<dyn StubStore>>,
}

impl CombinedStore {
    pub fn new(sources: Vec<Arc<dyn StubStore>>) -> Self {
        Self { sources }
    }

    pub fn with_source(mut self, source: Arc<dyn StubStore>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn sources(&self) -> &[Arc<dyn StubStore>] {
        &self.sources
    }
}

impl StubStore for CombinedStore {
    fn store(&self, record: StubRecord) -> Result<(), StubError> {
        for source in &self.sources {
            source.store(record.clone())?;
        }
        Ok(())
    }

    fn has_stub(&self, request: &StubRequest, options: &MatchOptions) -> bool {
        self.sources.iter().any(|s| s.has_stub(request, options))
    }

    fn lookup(&self, request: &StubRequest, options: &MatchOptions) -> Option<StubRecord> {
        self.sources
            .iter()
            .find_map(|s| s.lookup(request, options))
    }

    fn clear(&self) -> Result<(), StubError> {
        for source in &self.sources {
            source.clear()?;
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.sources.iter().map(|s| s.len()).sum()
    }
}
