//! Persisted class map file.
//!
//! The file is a PHP script that returns the map as an array literal, so the
//! host runtime can load it directly:
//!
//! ```text
//! <?php
//!
//! return array (
//!   'App\\Widget' => '/srv/app/src/Widget.php',
//! );
//!
//! ```
//!
//! Keys and values are single-quoted with `\` and `'` escaped. Rendering the
//! same map twice yields identical bytes.

use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::NamedTempFile;

use crate::storage::{StorageError, StorageResult};
use crate::types::ClassMap;

const HEADER: &str = "<?php\n\nreturn ";
const FOOTER: &str = ";\n\n";

static ENVELOPE: OnceLock<Regex> = OnceLock::new();
static ENTRY: OnceLock<Regex> = OnceLock::new();

fn envelope_pattern() -> &'static Regex {
    ENVELOPE.get_or_init(|| {
        Regex::new(
            r"(?s)\A\s*<\?php\s+return\s+(?:array\s*\((?P<long>.*)\)|\[(?P<short>.*)\])\s*;\s*\z",
        )
        .expect("envelope pattern is valid")
    })
}

fn entry_pattern() -> &'static Regex {
    ENTRY.get_or_init(|| {
        Regex::new(r"\A\s*'((?:[^'\\]|\\.)*)'\s*=>\s*'((?:[^'\\]|\\.)*)'\s*(?:,|\z)")
            .expect("entry pattern is valid")
    })
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn unquote(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next @ ('\\' | '\'')) => out.push(next),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Render `map` as the cache file content.
pub fn render(map: &ClassMap) -> String {
    let mut out = String::from(HEADER);
    out.push_str("array (\n");
    for (symbol, path) in map.iter() {
        out.push_str("  ");
        out.push_str(&quote(symbol));
        out.push_str(" => ");
        out.push_str(&quote(&path.to_string_lossy()));
        out.push_str(",\n");
    }
    out.push(')');
    out.push_str(FOOTER);
    out
}

/// Parse cache file content back into a map. The error names what is wrong
/// with the shape.
pub fn parse(content: &str) -> Result<ClassMap, String> {
    let caps = envelope_pattern()
        .captures(content)
        .ok_or_else(|| "content does not return an array literal".to_string())?;
    let body = caps
        .name("long")
        .or_else(|| caps.name("short"))
        .map(|m| m.as_str())
        .unwrap_or_default();

    let mut map = ClassMap::new();
    let mut rest = body;
    loop {
        if rest.trim().is_empty() {
            break;
        }
        let entry = entry_pattern().captures(rest).ok_or_else(|| {
            let near: String = rest.trim_start().chars().take(40).collect();
            format!("expected a 'symbol' => 'path' entry near \"{near}\"")
        })?;
        let (Some(whole), Some(symbol), Some(path)) = (entry.get(0), entry.get(1), entry.get(2))
        else {
            return Err("malformed entry".to_string());
        };
        map.insert(unquote(symbol.as_str()), PathBuf::from(unquote(path.as_str())));
        rest = &rest[whole.end()..];
    }

    Ok(map)
}

/// Write `map` to `destination`.
pub fn dump(map: &ClassMap, destination: &Path) -> StorageResult<()> {
    CacheFile::new(destination).save(map)
}

/// Reads and writes the class map file at a fixed location.
#[derive(Debug, Clone)]
pub struct CacheFile {
    path: PathBuf,
}

impl CacheFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Write `map` atomically: the content goes to a temporary file next to
    /// the destination, which is then renamed over it.
    pub fn save(&self, map: &ClassMap) -> StorageResult<()> {
        let content = render(map);
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        std::fs::create_dir_all(&parent).map_err(|e| StorageError::write_failed(&self.path, e))?;
        let mut tmp =
            NamedTempFile::new_in(&parent).map_err(|e| StorageError::write_failed(&self.path, e))?;
        tmp.write_all(content.as_bytes())
            .and_then(|_| tmp.flush())
            .map_err(|e| StorageError::write_failed(&self.path, e))?;

        let written = tmp
            .as_file()
            .metadata()
            .map(|m| m.len())
            .map_err(|e| StorageError::write_failed(&self.path, e))?;
        if written == 0 {
            return Err(StorageError::write_failed(&self.path, "zero bytes written"));
        }

        tmp.persist(&self.path)
            .map_err(|e| StorageError::write_failed(&self.path, e.error))?;

        tracing::debug!(
            "[cache] wrote {} entries ({written} bytes) to {}",
            map.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Load the map. `Ok(None)` when the file does not exist.
    pub fn load(&self) -> StorageResult<Option<ClassMap>> {
        if !self.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| StorageError::corrupted(&self.path, e))?;
        let map = parse(&content).map_err(|reason| StorageError::corrupted(&self.path, reason))?;

        tracing::debug!(
            "[cache] loaded {} entries from {}",
            map.len(),
            self.path.display()
        );
        Ok(Some(map))
    }
}
