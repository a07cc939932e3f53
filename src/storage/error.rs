use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("No content has been written in cache class map file {}: {reason}", .path.display())]
    CacheWriteFailed { path: PathBuf, reason: String },

    #[error("Bad cache file content in {}: {reason}", .path.display())]
    CorruptedCache { path: PathBuf, reason: String },
}

impl StorageError {
    pub fn write_failed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        StorageError::CacheWriteFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn corrupted(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        StorageError::CorruptedCache {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
