//! Error types for run-time resolution.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutoloadError {
    #[error("Failed to load {} for '{symbol}': {reason}", .path.display())]
    LoadFailed {
        symbol: String,
        path: PathBuf,
        reason: String,
    },

    #[error("Resolver '{resolver}' failed for '{symbol}': {reason}")]
    ResolverFailed {
        resolver: String,
        symbol: String,
        reason: String,
    },

    #[error("Invalid namespace configuration {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },
}

pub type AutoloadResult<T> = Result<T, AutoloadError>;
