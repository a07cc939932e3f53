//! Lexical conventions shared by the scanner and the autoloader.
//!
//! A dialect says which character separates namespace segments, which
//! markers delimit source regions inside a file, which extensions hold
//! source, which keywords declare a symbol and which tokens start a line
//! comment. The default is PHP-shaped.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialect {
    /// Namespace separator (`\` for PHP).
    #[serde(default = "default_separator")]
    pub separator: char,

    /// Marker opening a source region. `None` means the whole file is source.
    #[serde(default = "default_open_tag")]
    pub open_tag: Option<String>,

    /// Marker closing a source region.
    #[serde(default = "default_close_tag")]
    pub close_tag: Option<String>,

    /// Accepted file extensions, without the dot. The first one is used to
    /// build file names when probing namespace directories.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Declaration keywords, matched case-insensitively.
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    /// Tokens starting a comment that runs to end of line.
    #[serde(default = "default_line_comments")]
    pub line_comments: Vec<String>,
}

fn default_separator() -> char {
    '\\'
}
fn default_open_tag() -> Option<String> {
    Some("<?".to_string())
}
fn default_close_tag() -> Option<String> {
    Some("?>".to_string())
}
fn default_extensions() -> Vec<String> {
    vec!["php".to_string(), "inc".to_string(), "hh".to_string()]
}
fn default_keywords() -> Vec<String> {
    ["class", "interface", "trait", "enum"]
        .iter()
        .map(|k| k.to_string())
        .collect()
}
fn default_line_comments() -> Vec<String> {
    vec!["//".to_string(), "#".to_string()]
}

impl Default for Dialect {
    fn default() -> Self {
        Self::php()
    }
}

impl Dialect {
    /// PHP / Hack sources: `<?php` regions, `\` namespaces.
    pub fn php() -> Self {
        Self {
            separator: default_separator(),
            open_tag: default_open_tag(),
            close_tag: default_close_tag(),
            extensions: default_extensions(),
            keywords: default_keywords(),
            line_comments: default_line_comments(),
        }
    }

    /// Marker-less sources with `.`-separated namespaces and a single
    /// extension, e.g. `namespace App.Sub; class Widget {}` in `*.src`.
    pub fn dotted(extension: &str) -> Self {
        Self {
            separator: '.',
            open_tag: None,
            close_tag: None,
            extensions: vec![extension.trim_start_matches('.').to_string()],
            keywords: default_keywords(),
            line_comments: vec!["//".to_string()],
        }
    }

    /// Extension used when turning a symbol into a file name.
    pub fn primary_extension(&self) -> &str {
        self.extensions.first().map(String::as_str).unwrap_or("php")
    }

    /// Whether `path` carries one of the accepted extensions.
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e == ext))
            .unwrap_or(false)
    }

    /// Region markers, only when both are configured.
    pub fn markers(&self) -> Option<(&str, &str)> {
        match (&self.open_tag, &self.close_tag) {
            (Some(open), Some(close)) if !open.is_empty() && !close.is_empty() => {
                Some((open.as_str(), close.as_str()))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_php_dialect_accepts_its_extensions() {
        let dialect = Dialect::php();

        assert!(dialect.accepts(Path::new("/src/Foo.php")));
        assert!(dialect.accepts(Path::new("/src/legacy.inc")));
        assert!(dialect.accepts(Path::new("/src/Bar.hh")));
        assert!(!dialect.accepts(Path::new("/src/README.md")));
        assert!(!dialect.accepts(Path::new("/src/Makefile")));
        assert_eq!(dialect.primary_extension(), "php");
    }

    #[test]
    fn test_dotted_dialect_has_no_markers() {
        let dialect = Dialect::dotted(".src");

        assert_eq!(dialect.separator, '.');
        assert!(dialect.markers().is_none());
        assert_eq!(dialect.primary_extension(), "src");
        assert!(dialect.accepts(Path::new("foo.src")));
    }

    #[test]
    fn test_partial_toml_falls_back_to_php_defaults() {
        let dialect: Dialect = toml::from_str("separator = \".\"").unwrap();

        assert_eq!(dialect.separator, '.');
        assert_eq!(dialect.markers(), Some(("<?", "?>")));
        assert_eq!(dialect.keywords.len(), 4);
    }
}
