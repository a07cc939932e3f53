//! File system walker for discovering candidate source files.
//!
//! Every regular file under a root is a candidate; extension and blacklist
//! filtering happen in the generator. Entries are sorted by file name so two
//! walks over the same tree enumerate files in the same order, which keeps
//! first-wins merging and the dumped cache reproducible.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{ClassMapError, ClassMapResult};

/// Walks directories to find candidate files
#[derive(Debug, Clone)]
pub struct FileWalker {
    follow_links: bool,
}

impl Default for FileWalker {
    fn default() -> Self {
        Self::new()
    }
}

impl FileWalker {
    pub fn new() -> Self {
        Self {
            follow_links: false,
        }
    }

    pub fn follow_links(mut self, yes: bool) -> Self {
        self.follow_links = yes;
        self
    }

    /// Enumerate the regular files under `root` (or `root` itself when it is
    /// a file). A missing root or an unreadable directory is an error: it
    /// usually means the scan root is misconfigured.
    pub fn walk(&self, root: &Path) -> ClassMapResult<Vec<PathBuf>> {
        if !root.exists() {
            return Err(ClassMapError::Walk {
                path: root.to_path_buf(),
                reason: "path does not exist".to_string(),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root)
            .follow_links(self.follow_links)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| ClassMapError::Walk {
                path: e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf()),
                reason: e.to_string(),
            })?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }

        tracing::debug!("[walker] {} files under {}", files.len(), root.display());
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_walk_directory_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("b")).unwrap();
        fs::write(root.join("b/z.php"), "<?php").unwrap();
        fs::write(root.join("a.php"), "<?php").unwrap();
        fs::write(root.join("c.txt"), "text").unwrap();

        let files = FileWalker::new().walk(root).unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.php"),
                PathBuf::from("b/z.php"),
                PathBuf::from("c.txt"),
            ]
        );
    }

    #[test]
    fn test_walk_single_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("only.php");
        fs::write(&file, "<?php").unwrap();

        let files = FileWalker::new().walk(&file).unwrap();

        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_walk_missing_root_is_an_error() {
        let temp_dir = TempDir::new().unwrap();

        let err = FileWalker::new()
            .walk(&temp_dir.path().join("nope"))
            .unwrap_err();

        assert!(matches!(err, ClassMapError::Walk { .. }));
    }
}
