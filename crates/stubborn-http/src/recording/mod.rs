//! Record and playback of HTTP calls.
//!
//! Three modes:
//! - `playback`: answer only from stubs, a miss is an error
//! - `record`: always perform the real request and store it
//! - `recordNew`: play back matches, record misses
//!
//! # Module Structure
//!
//! - `mode` - Record mode enum
//! - `recorder` - Real call plus store, shared by both recording modes
//! - `session` - The per-request controller

mod mode;
mod recorder;
mod session;

pub use mode::RecordMode;
pub use recorder::StubRecorder;
pub use session::{StubSession, StubbedResponse};
