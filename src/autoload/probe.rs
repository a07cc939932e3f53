//! Filesystem seams of the autoloader: existence checks and source loading.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::autoload::AutoloadResult;

/// Answers whether a candidate file exists.
pub trait FileProbe: Send + Sync {
    fn is_file(&self, path: &Path) -> bool;
}

/// Probe backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsProbe;

impl FileProbe for FsProbe {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Loads a resolved source file into the host.
pub trait SourceLoader: Send + Sync {
    fn load(&self, symbol: &str, path: &Path) -> AutoloadResult<()>;
}

impl<F> SourceLoader for F
where
    F: Fn(&str, &Path) -> AutoloadResult<()> + Send + Sync,
{
    fn load(&self, symbol: &str, path: &Path) -> AutoloadResult<()> {
        self(symbol, path)
    }
}

/// Loader that does nothing; the resolved path is the whole answer.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLoader;

impl SourceLoader for NoopLoader {
    fn load(&self, _symbol: &str, _path: &Path) -> AutoloadResult<()> {
        Ok(())
    }
}

/// Runs the inner loader at most once per distinct path.
#[derive(Debug, Default)]
pub struct LoadOnce<L> {
    inner: L,
    loaded: Mutex<HashSet<PathBuf>>,
}

impl<L: SourceLoader> LoadOnce<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            loaded: Mutex::new(HashSet::new()),
        }
    }

    pub fn is_loaded(&self, path: &Path) -> bool {
        self.loaded.lock().contains(path)
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.lock().len()
    }
}

impl<L: SourceLoader> SourceLoader for LoadOnce<L> {
    fn load(&self, symbol: &str, path: &Path) -> AutoloadResult<()> {
        if !self.loaded.lock().insert(path.to_path_buf()) {
            return Ok(());
        }
        // The inner loader may resolve further symbols, so no guard is held here.
        if let Err(error) = self.inner.load(symbol, path) {
            self.loaded.lock().remove(path);
            return Err(error);
        }
        Ok(())
    }
}
