//! In-memory stub store.

use super::{is_duplicate, StubStore};
use crate::error::StubError;
use crate::matcher::MatchOptions;
use crate::request::StubRequest;
use crate::stub::StubRecord;
use parking_lot::RwLock;
use tracing::debug;

/// Stub store that only lives in memory.
///
/// Most useful for unit tests that stub a handful of requests by hand.
#[derive(Debug, Default)]
pub struct EphemeralStore {
    stubs: RwLock<Vec<StubRecord>>,
    /// Skip storing records whose request already has a match
    dedup: Option<MatchOptions>,
}

impl EphemeralStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip records whose request is already answered under `options`.
    pub fn with_dedup(mut self, options: MatchOptions) -> Self {
        self.dedup = Some(options);
        self
    }

    /// Snapshot of all records in insertion order.
    pub fn records(&self) -> Vec<StubRecord> {
        self.stubs.read().clone()
    }
}

impl StubStore for EphemeralStore {
    fn store(&self, record: StubRecord) -> Result<(), StubError> {
        let mut stubs = self.stubs.write();
        if is_duplicate(&stubs, &record, self.dedup.as_ref()) {
            debug!(
                "Skipping duplicate stub for {} {}",
                record.request.method, record.request.url
            );
            return Ok(());
        }
        stubs.push(record);
        Ok(())
    }

    fn has_stub(&self, request: &StubRequest, options: &MatchOptions) -> bool {
        self.stubs.read().iter().any(|s| s.answers(request, options))
    }

    fn lookup(&self, request: &StubRequest, options: &MatchOptions) -> Option<StubRecord> {
        self.stubs
            .read()
            .iter()
            .find(|s| s.answers(request, options))
            .cloned()
    }

    fn clear(&self) -> Result<(), StubError> {
        self.stubs.write().clear();
        Ok(())
    }

    fn len(&self) -> usize {
        self.stubs.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::StubResponse;

    fn request() -> StubRequest {
        StubRequest::get("https://api.example.com/x")
            .unwrap()
            .with_header("B", "BBB")
    }

    #[test]
    fn test_store_and_lookup() {
        let store = EphemeralStore::new();
        store
            .store(StubRecord::new(request()).with_response(StubResponse::new(200)))
            .unwrap();

        assert!(store.has_stub(&request(), &MatchOptions::strict()));
        let found = store.lookup(&request(), &MatchOptions::strict()).unwrap();
        assert_eq!(found.response.unwrap().status, 200);
    }

    #[test]
    fn test_url_only_matches_different_method() {
        let store = EphemeralStore::new();
        store.store(StubRecord::new(request())).unwrap();

        let mut post = request();
        post.method = "POST".to_string();
        assert!(!store.has_stub(&post, &MatchOptions::strict()));
        assert!(store.has_stub(&post, &MatchOptions::url_only()));
    }

    #[test]
    fn test_lookup_returns_first_match() {
        let store = EphemeralStore::new();
        store
            .store(StubRecord::new(request()).with_body("first"))
            .unwrap();
        store
            .store(StubRecord::new(request()).with_body("second"))
            .unwrap();

        assert_eq!(store.len(), 2);
        let found = store.lookup(&request(), &MatchOptions::strict()).unwrap();
        assert_eq!(found.body.as_deref(), Some(&b"first"[..]));
    }

    #[test]
    fn test_dedup_skips_matching_request() {
        let store = EphemeralStore::new().with_dedup(MatchOptions::strict());
        store
            .store(StubRecord::new(request()).with_body("first"))
            .unwrap();
        store
            .store(StubRecord::new(request()).with_body("second"))
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].body.as_deref(), Some(&b"first"[..]));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = EphemeralStore::new();
        store.store(StubRecord::new(request())).unwrap();

        store.clear().unwrap();
        assert!(store.is_empty());
        store.clear().unwrap();
        assert!(store.is_empty());
    }
}
