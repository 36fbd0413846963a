//! Record and play back HTTP stubs so tests run without the network.
//!
//! A [`StubSession`] answers requests from a [`StubStore`]. In playback mode
//! a request without a matching stub is an error; in the recording modes the
//! request is performed through an [`HttpClient`] and the outcome stored.

// ===== Stub model =====
pub mod codec;
pub mod error;
pub mod matcher;
pub mod request;
pub mod stub;

// ===== Storage and recording =====
pub mod recording;
pub mod store;
pub mod transform;

// ===== Collaborators =====
pub mod client;
pub mod config;
pub mod interception;
pub mod network;

pub use client::{ClientResponse, HttpClient, ReqwestClient};
pub use config::{Environment, StubConfig, StubSource, StubSourceLocation};
pub use error::{StubError, TransportError};
pub use interception::{InterceptionClient, StubbedProtocol};
pub use matcher::{matches, MatchCriterion, MatchOptions, Matcher};
pub use network::StubbornNetwork;
pub use recording::{RecordMode, StubRecorder, StubSession, StubbedResponse};
pub use request::{HeaderFields, StubRequest, StubResponse};
pub use store::{CombinedStore, EphemeralStore, PersistentStore, PlaybackPolicy, StubStore};
pub use stub::StubRecord;
pub use transform::{BodyTransform, PassThrough, RedactionRule, Redactor};
