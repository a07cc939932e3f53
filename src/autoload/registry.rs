//! Namespace prefix → base directories table.
//!
//! Prefixes are stored with surrounding separators trimmed and exactly one
//! trailing separator (`App\Sub\`); registering the empty prefix yields the
//! root prefix, a lone separator. Directories keep registration order and
//! carry exactly one trailing path separator.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use crate::autoload::{AutoloadError, AutoloadResult};

/// One `{namespace, path}` configuration record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceEntry {
    pub namespace: String,
    pub path: PathBuf,
}

impl NamespaceEntry {
    pub fn new(namespace: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }
}

/// Read a JSON array of `{"namespace": ..., "path": ...}` records.
pub fn read_entries(path: &Path) -> AutoloadResult<Vec<NamespaceEntry>> {
    let content = std::fs::read_to_string(path).map_err(|e| AutoloadError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    serde_json::from_str(&content).map_err(|e| AutoloadError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[derive(Debug, Clone)]
pub struct NamespaceRegistry {
    separator: char,
    namespaces: IndexMap<String, Vec<PathBuf>>,
}

impl NamespaceRegistry {
    pub fn new(separator: char) -> Self {
        Self {
            separator,
            namespaces: IndexMap::new(),
        }
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn normalize_prefix(&self, namespace: &str) -> String {
        let trimmed = namespace.trim().trim_matches(self.separator);
        format!("{trimmed}{}", self.separator)
    }

    pub fn normalize_directory(directory: &Path) -> PathBuf {
        let raw = directory.to_string_lossy();
        let trimmed = raw.trim_end_matches(MAIN_SEPARATOR);
        PathBuf::from(format!("{trimmed}{MAIN_SEPARATOR}"))
    }

    /// Append `directory` to the list for `namespace`.
    pub fn register(&mut self, namespace: &str, directory: impl AsRef<Path>) -> &mut Self {
        let prefix = self.normalize_prefix(namespace);
        let directory = Self::normalize_directory(directory.as_ref());
        tracing::debug!(
            "[registry] {prefix} -> {}",
            directory.display()
        );
        self.namespaces.entry(prefix).or_default().push(directory);
        self
    }

    /// Register each entry in order.
    pub fn register_batch<'a>(
        &mut self,
        entries: impl IntoIterator<Item = &'a NamespaceEntry>,
    ) -> &mut Self {
        for entry in entries {
            self.register(&entry.namespace, &entry.path);
        }
        self
    }

    /// Directories for an already-normalized prefix.
    pub fn directories(&self, prefix: &str) -> Option<&[PathBuf]> {
        self.namespaces.get(prefix).map(Vec::as_slice)
    }

    /// Snapshot of every prefix and its directories, in registration order.
    pub fn list_namespaces(&self) -> &IndexMap<String, Vec<PathBuf>> {
        &self.namespaces
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn dir(path: &str) -> PathBuf {
        PathBuf::from(format!("{path}{MAIN_SEPARATOR}"))
    }

    #[test]
    fn test_prefix_normalization() {
        let registry = NamespaceRegistry::new('\\');

        assert_eq!(registry.normalize_prefix("App"), "App\\");
        assert_eq!(registry.normalize_prefix("  \\App\\Sub\\\\ "), "App\\Sub\\");
        assert_eq!(registry.normalize_prefix(""), "\\");
    }

    #[test]
    fn test_directory_normalization() {
        assert_eq!(
            NamespaceRegistry::normalize_directory(Path::new("/srv/app/src")),
            dir("/srv/app/src")
        );
        assert_eq!(
            NamespaceRegistry::normalize_directory(Path::new("/srv/app/src///")),
            dir("/srv/app/src")
        );
    }

    #[test]
    fn test_register_appends_in_order() {
        let mut registry = NamespaceRegistry::new('\\');

        registry.register("App", "/a").register("App\\", "/b/");

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.directories("App\\").unwrap(),
            &[dir("/a"), dir("/b")]
        );
    }

    #[test]
    fn test_register_batch_keeps_record_order() {
        let mut registry = NamespaceRegistry::new('.');
        let entries = vec![
            NamespaceEntry::new("App.Sub", "/sub"),
            NamespaceEntry::new("App", "/app"),
            NamespaceEntry::new("App.Sub", "/sub2"),
        ];

        registry.register_batch(&entries);

        let listed: Vec<_> = registry.list_namespaces().keys().cloned().collect();
        assert_eq!(listed, vec!["App.Sub.", "App."]);
        assert_eq!(
            registry.directories("App.Sub.").unwrap(),
            &[dir("/sub"), dir("/sub2")]
        );
    }

    #[test]
    fn test_read_entries_from_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("namespaces.json");
        fs::write(
            &path,
            r#"[{"namespace": "App", "path": "/srv/src"}, {"namespace": "Lib", "path": "/srv/lib"}]"#,
        )
        .unwrap();

        let entries = read_entries(&path).unwrap();

        assert_eq!(
            entries,
            vec![
                NamespaceEntry::new("App", "/srv/src"),
                NamespaceEntry::new("Lib", "/srv/lib"),
            ]
        );
    }

    #[test]
    fn test_read_entries_rejects_bad_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("namespaces.json");
        fs::write(&path, r#"{"namespace": "App"}"#).unwrap();

        assert!(matches!(
            read_entries(&path),
            Err(AutoloadError::Config { .. })
        ));
    }
}
