//! File backed stub store.

use super::{is_duplicate, PlaybackPolicy, StubStore};
use crate::codec::{decode_stubs, encode_stubs};
use crate::error::StubError;
use crate::matcher::MatchOptions;
use crate::request::StubRequest;
use crate::stub::StubRecord;
use parking_lot::RwLock;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Extension appended to sanitized stub names.
pub const STUB_FILE_EXTENSION: &str = "json";

/// Derive a stub file name from a logical name.
///
/// Spaces become underscores; `[`, `]` and `-` are removed.
pub fn sanitized_file_name(name: &str) -> String {
    let sanitized: String = name
        .replace(' ', "_")
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | '-'))
        .collect();
    format!("{sanitized}.{STUB_FILE_EXTENSION}")
}

/// Stub store persisted as a JSON array in a single file.
///
/// Every `store` and `clear` rewrites the whole file.
#[derive(Debug)]
pub struct PersistentStore {
    path: PathBuf,
    stubs: RwLock<Vec<StubRecord>>,
    /// No stubs were loaded from disk
    is_new: bool,
    dedup: Option<MatchOptions>,
    playback: PlaybackPolicy,
}

impl PersistentStore {
    /// Open the stub file at `path`.
    ///
    /// A missing file yields an empty store. A file that exists but does not
    /// decode is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StubError> {
        let path = path.into();
        let stubs = match read_stub_file(&path)? {
            Some(json) => decode_stubs(&json).map_err(|e| StubError::Decode {
                path: path.clone(),
                source: Box::new(e),
            })?,
            None => {
                debug!("Stub file {:?} does not exist, starting fresh", path);
                return Ok(Self::empty(path));
            }
        };

        info!("Loaded {} stubs from {:?}", stubs.len(), path);
        Ok(Self {
            path,
            stubs: RwLock::new(stubs),
            is_new: false,
            dedup: None,
            playback: PlaybackPolicy::default(),
        })
    }

    /// Like [`open`](Self::open), but a file that fails to decode is treated
    /// as absent.
    pub fn open_lenient(path: impl Into<PathBuf>) -> Result<Self, StubError> {
        let path = path.into();
        match Self::open(&path) {
            Err(StubError::Decode { source, .. }) => {
                warn!("Ignoring undecodable stub file {:?}: {}", path, source);
                Ok(Self::empty(path))
            }
            other => other,
        }
    }

    /// Open `<dir>/<sanitized name>.json`, creating `dir` when missing.
    pub fn in_directory(dir: impl AsRef<Path>, name: &str) -> Result<Self, StubError> {
        Self::open(stub_file_in(dir.as_ref(), name)?)
    }

    /// [`in_directory`](Self::in_directory) with [`open_lenient`](Self::open_lenient)
    /// semantics for the file itself.
    pub fn in_directory_lenient(dir: impl AsRef<Path>, name: &str) -> Result<Self, StubError> {
        Self::open_lenient(stub_file_in(dir.as_ref(), name)?)
    }

    fn empty(path: PathBuf) -> Self {
        Self {
            path,
            stubs: RwLock::new(Vec::new()),
            is_new: true,
            dedup: None,
            playback: PlaybackPolicy::default(),
        }
    }

    pub fn with_dedup(mut self, options: MatchOptions) -> Self {
        self.dedup = Some(options);
        self
    }

    pub fn with_playback_policy(mut self, policy: PlaybackPolicy) -> Self {
        self.playback = policy;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when nothing was loaded from disk at construction.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn playback_policy(&self) -> PlaybackPolicy {
        self.playback
    }

    pub fn records(&self) -> Vec<StubRecord> {
        self.stubs.read().clone()
    }

    fn save(&self, stubs: &[StubRecord]) -> Result<(), StubError> {
        let json = encode_stubs(stubs)?;
        fs::write(&self.path, json).map_err(|e| StubError::io(&self.path, e))?;
        debug!("Saved {} stubs to {:?}", stubs.len(), self.path);
        Ok(())
    }
}

fn stub_file_in(dir: &Path, name: &str) -> Result<PathBuf, StubError> {
    if !dir.is_dir() {
        debug!("Creating stub directory {:?}", dir);
        fs::create_dir_all(dir).map_err(|e| StubError::io(dir, e))?;
    }
    Ok(dir.join(sanitized_file_name(name)))
}

fn read_stub_file(path: &Path) -> Result<Option<String>, StubError> {
    match fs::read_to_string(path) {
        Ok(json) => Ok(Some(json)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StubError::io(path, e)),
    }
}

impl StubStore for PersistentStore {
    fn store(&self, record: StubRecord) -> Result<(), StubError> {
        let mut stubs = self.stubs.write();
        if is_duplicate(&stubs, &record, self.dedup.as_ref()) {
            debug!(
                "Skipping duplicate stub for {} {}",
                record.request.method, record.request.url
            );
            return Ok(());
        }

        info!(
            "Storing stub {} {} at {:?}",
            record.request.method, record.request.url, self.path
        );
        stubs.push(record);
        self.save(&stubs)
    }

    fn has_stub(&self, request: &StubRequest, options: &MatchOptions) -> bool {
        self.stubs.read().iter().any(|s| s.answers(request, options))
    }

    fn lookup(&self, request: &StubRequest, options: &MatchOptions) -> Option<StubRecord> {
        let found = match self.playback {
            PlaybackPolicy::Repeat => self
                .stubs
                .read()
                .iter()
                .find(|s| s.answers(request, options))
                .cloned(),
            PlaybackPolicy::ConsumeOnce => {
                let mut stubs = self.stubs.write();
                let index = stubs.iter().position(|s| s.answers(request, options));
                index.map(|index| stubs.remove(index))
            }
        };

        match &found {
            Some(_) => debug!("Found stub for {} {}", request.method, request.url),
            None => debug!("Did not find stub for {} {}", request.method, request.url),
        }
        found
    }

    fn clear(&self) -> Result<(), StubError> {
        let mut stubs = self.stubs.write();
        stubs.clear();
        self.save(&stubs)
    }

    fn len(&self) -> usize {
        self.stubs.read().len()
    }
}
