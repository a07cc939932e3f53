//! Error types for scanning and class map generation.

use std::path::PathBuf;
use thiserror::Error;

use crate::storage::StorageError;

/// Errors raised while scanning sources and building a class map.
#[derive(Error, Debug)]
pub enum ClassMapError {
    /// The file is missing, unreadable, or not text.
    #[error("{reason}{}", detail_suffix(.detail))]
    SourceUnreadable {
        path: PathBuf,
        reason: String,
        detail: Option<String>,
    },

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Cannot walk {}: {reason}", .path.display())]
    Walk { path: PathBuf, reason: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ClassMapError {
    /// Build a `SourceUnreadable` error from a failed read, naming the likely cause.
    pub fn unreadable(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        let path = path.into();
        let reason = match err.kind() {
            std::io::ErrorKind::NotFound => format!(
                "File at \"{}\" does not exist, check your classmap definitions",
                path.display()
            ),
            std::io::ErrorKind::PermissionDenied => format!(
                "File at \"{}\" is not readable, check its permissions",
                path.display()
            ),
            std::io::ErrorKind::InvalidData => format!(
                "File at \"{}\" could not be parsed as source, it may be binary or corrupted",
                path.display()
            ),
            _ => format!("File at \"{}\" could not be read", path.display()),
        };

        ClassMapError::SourceUnreadable {
            path,
            reason,
            detail: Some(err.to_string()),
        }
    }

    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        ClassMapError::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_ref()
        .map(|d| format!("\nThe following message may be helpful:\n{d}"))
        .unwrap_or_default()
}

pub type ClassMapResult<T> = Result<T, ClassMapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_message_names_path_and_cause() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let error = ClassMapError::unreadable("/tmp/missing.php", &err);

        let message = error.to_string();
        assert!(message.contains("/tmp/missing.php"));
        assert!(message.contains("does not exist"));
        assert!(message.contains("no such file"));
    }

    #[test]
    fn test_binary_content_is_reported_as_corrupted() {
        let err = std::io::Error::new(std::io::ErrorKind::InvalidData, "stream did not contain valid UTF-8");
        let error = ClassMapError::unreadable("/tmp/blob.php", &err);

        assert!(error.to_string().contains("binary or corrupted"));
    }
}
