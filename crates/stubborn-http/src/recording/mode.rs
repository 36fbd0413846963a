//! Record mode definitions.

use serde::{Deserialize, Serialize};

/// How a session satisfies requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum RecordMode {
    /// Only answer from recorded stubs, fail on a miss
    #[default]
    Playback,
    /// Always perform the real request and record it
    Record,
    /// Play back when a stub matches, record otherwise
    RecordNew,
}

impl std::fmt::Display for RecordMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RecordMode::Playback => "playback",
            RecordMode::Record => "record",
            RecordMode::RecordNew => "recordNew",
        };
        f.write_str(name)
    }
}
