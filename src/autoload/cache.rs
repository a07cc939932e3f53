//! Resolution cache: symbol → resolved file, seeded from the persisted map.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::storage::CacheFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Uninitialized,
    Loading,
    Ready,
}

/// How the persisted map was (or was not) used to seed the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheStatus {
    /// No cache file was configured.
    Unconfigured,
    /// The configured file does not exist.
    Missing,
    Loaded { entries: usize },
    /// The file exists but is not a class map; the cache starts empty.
    Corrupted { reason: String },
}

#[derive(Debug)]
pub struct ResolutionCache {
    state: CacheState,
    entries: HashMap<String, PathBuf>,
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self {
            state: CacheState::Uninitialized,
            entries: HashMap::new(),
        }
    }

    pub fn state(&self) -> CacheState {
        self.state
    }

    /// Seed from `source` and move to `Ready`. A corrupted file leaves the
    /// cache empty but still ready.
    pub fn initialize(&mut self, source: Option<&CacheFile>) -> CacheStatus {
        self.state = CacheState::Loading;

        let status = match source {
            None => CacheStatus::Unconfigured,
            Some(file) => match file.load() {
                Ok(None) => CacheStatus::Missing,
                Ok(Some(map)) => {
                    let entries = map.len();
                    self.entries.extend(map);
                    CacheStatus::Loaded { entries }
                }
                Err(e) => {
                    tracing::warn!("[cache] {e}; falling back to namespace lookup");
                    CacheStatus::Corrupted {
                        reason: e.to_string(),
                    }
                }
            },
        };

        self.state = CacheState::Ready;
        status
    }

    pub fn get(&self, symbol: &str) -> Option<&Path> {
        self.entries.get(symbol).map(PathBuf::as_path)
    }

    pub fn insert(&mut self, symbol: String, path: PathBuf) {
        self.entries.insert(symbol, path);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
