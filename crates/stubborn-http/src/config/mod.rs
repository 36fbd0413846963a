//! Configuration for a stubbed network.
//!
//! # Module Structure
//!
//! - `location` - Name and directory of a persistent stub file
//! - `environment` - Testing flag and stub location from key/value pairs

mod environment;
mod location;

pub use environment::{Environment, TESTING_KEY};
pub use location::{StubSourceLocation, STUB_NAME_KEY, STUB_PATH_KEY};

use crate::matcher::{MatchCriterion, MatchOptions};
use crate::recording::RecordMode;
use crate::store::PlaybackPolicy;
use crate::transform::{RedactionRule, Redactor};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where stubs are kept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StubSource {
    /// In memory only
    #[default]
    Ephemeral,
    /// JSON file at `<path>/<sanitized name>.json`
    Persistent(StubSourceLocation),
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StubConfig {
    #[serde(default)]
    pub source: StubSource,

    /// Mode new sessions start in
    #[serde(default)]
    pub record_mode: RecordMode,

    /// Request criteria used for lookups. Empty means strict matching.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub match_on: Vec<MatchCriterion>,

    /// Skip storing a record whose request already has a stub
    #[serde(default)]
    pub dedup_on_store: bool,

    /// Persistent stores only
    #[serde(default)]
    pub playback: PlaybackPolicy,

    /// Start empty instead of failing when the stub file does not decode
    #[serde(default)]
    pub lenient: bool,

    /// Applied to bodies before they are stored
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub redact: Vec<RedactionRule>,
}

impl StubConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: StubConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if let StubSource::Persistent(location) = &self.source {
            if location.name.trim().is_empty() {
                anyhow::bail!("Persistent stub source requires a non-empty 'name'");
            }
            if location.path.as_os_str().is_empty() {
                anyhow::bail!("Persistent stub source requires a 'path'");
            }
        }

        for rule in &self.redact {
            regex::Regex::new(&rule.pattern)
                .with_context(|| format!("Invalid redaction pattern '{}'", rule.pattern))?;
        }

        Ok(())
    }

    /// Match options derived from `matchOn`.
    pub fn match_options(&self) -> MatchOptions {
        MatchOptions::from_criteria(&self.match_on).unwrap_or_default()
    }

    /// Options used for store-time dedup, when enabled.
    pub fn dedup_options(&self) -> Option<MatchOptions> {
        self.dedup_on_store.then(|| self.match_options())
    }

    /// Redactor for the configured rules, `None` when there are none.
    pub fn redactor(&self) -> Result<Option<Redactor>, anyhow::Error> {
        if self.redact.is_empty() {
            return Ok(None);
        }
        let redactor = Redactor::new(&self.redact).context("Invalid redaction rules")?;
        Ok(Some(redactor))
    }
}
