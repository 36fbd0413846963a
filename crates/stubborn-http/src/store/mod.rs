//! Stub stores: where stub records live.
//!
//! # Module Structure
//!
//! - `ephemeral` - In-memory store, lives as long as the test
//! - `persistent` - JSON file backed store, rewritten after every change
//! - `combined` - Composition of stores, first positive answer wins

mod combined;
mod ephemeral;
mod persistent;

pub use combined::CombinedStore;
pub use ephemeral::EphemeralStore;
pub use persistent::{sanitized_file_name, PersistentStore, STUB_FILE_EXTENSION};

use crate::error::StubError;
use crate::matcher::MatchOptions;
use crate::request::StubRequest;
use crate::stub::StubRecord;
use serde::{Deserialize, Serialize};

/// Backend-agnostic stub storage.
///
/// Methods take `&self` so stores can be shared through `Arc` between a
/// session and the code that seeds stubs. Implementations guard their list
/// internally.
pub trait StubStore: Send + Sync {
    /// Add a record to the store.
    fn store(&self, record: StubRecord) -> Result<(), StubError>;

    /// Whether a record answers `request`. Never consumes the record.
    fn has_stub(&self, request: &StubRequest, options: &MatchOptions) -> bool;

    /// First record answering `request`.
    fn lookup(&self, request: &StubRequest, options: &MatchOptions) -> Option<StubRecord>;

    /// Drop every record.
    fn clear(&self) -> Result<(), StubError>;

    /// Number of records held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What happens to a persisted record after it was played back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackPolicy {
    /// Records stay available for any number of lookups
    #[default]
    Repeat,
    /// A successful lookup removes the record from memory (the file is untouched)
    ConsumeOnce,
}

/// Shared store-time dedup check.
pub(crate) fn is_duplicate(
    stubs: &[StubRecord],
    record: &StubRecord,
    dedup: Option<&MatchOptions>,
) -> bool {
    dedup.is_some_and(|options| stubs.iter().any(|s| s.answers(&record.request, options)))
}
