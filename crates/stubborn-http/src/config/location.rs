//! Where a persistent stub source lives.

use crate::store::sanitized_file_name;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Variable naming the stub source.
pub const STUB_NAME_KEY: &str = "STUB_NAME";
/// Variable naming the directory holding stub files.
pub const STUB_PATH_KEY: &str = "STUB_PATH";

/// Name and directory of a stub file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StubSourceLocation {
    pub name: String,
    pub path: PathBuf,
}

impl StubSourceLocation {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Read `STUB_NAME` and `STUB_PATH` from caller supplied pairs.
    ///
    /// Returns `None` unless both are present. Callers pass
    /// `std::env::vars()` or a hand built list in tests.
    pub fn from_vars<I, K, V>(vars: I) -> Option<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut name = None;
        let mut path = None;
        for (key, value) in vars {
            match key.as_ref() {
                STUB_NAME_KEY => name = Some(value.as_ref().to_string()),
                STUB_PATH_KEY => path = Some(value.as_ref().to_string()),
                _ => {}
            }
        }
        Some(Self::new(name?, path?))
    }

    /// Full path of the stub file.
    pub fn file_path(&self) -> PathBuf {
        self.path.join(sanitized_file_name(&self.name))
    }
}
