//! Namespace configuration from composer.json PSR-4 sections.
//!
//! Handles both value shapes:
//! - `"App\\": "src/"`
//! - `"App\\": ["src/", "lib/"]`
//!
//! Directories are joined onto the directory holding composer.json.
//! `autoload` entries come before `autoload-dev` entries.

use serde_json::Value;
use std::path::Path;

use crate::autoload::{AutoloadError, AutoloadResult, NamespaceEntry};

pub fn composer_entries(composer_path: &Path) -> AutoloadResult<Vec<NamespaceEntry>> {
    let content = std::fs::read_to_string(composer_path).map_err(|e| AutoloadError::Config {
        path: composer_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let json: Value = serde_json::from_str(&content).map_err(|e| AutoloadError::Config {
        path: composer_path.to_path_buf(),
        reason: format!("Failed to parse composer.json: {e}"),
    })?;

    let project_root = composer_path.parent().unwrap_or(Path::new("."));
    let mut entries = Vec::new();

    for section in ["autoload", "autoload-dev"] {
        if let Some(psr4) = json.get(section).and_then(|a| a.get("psr-4")) {
            entries.extend(psr4_entries(psr4, project_root));
        }
    }

    Ok(entries)
}

fn psr4_entries(psr4: &Value, project_root: &Path) -> Vec<NamespaceEntry> {
    let Some(obj) = psr4.as_object() else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    for (namespace, dirs) in obj {
        let dirs: Vec<&str> = match dirs {
            Value::Array(arr) => arr.iter().filter_map(|v| v.as_str()).collect(),
            Value::String(s) => vec![s.as_str()],
            _ => continue,
        };
        for dir in dirs {
            entries.push(NamespaceEntry::new(namespace.clone(), project_root.join(dir)));
        }
    }
    entries
}
