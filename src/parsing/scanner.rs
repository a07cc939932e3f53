//! Symbol scanner: extracts declared symbol names from one source file.

use regex::Regex;
use std::path::Path;

use crate::error::{ClassMapError, ClassMapResult};
use crate::parsing::Dialect;
use crate::parsing::regions::{
    collapse_markup_blocks, strip_leading_markup, strip_literals, strip_trailing_markup,
};
use crate::types::SymbolName;

/// Identifier start: ASCII letters, underscore, any non-ASCII character, and
/// `:` for markup (XHP) class names.
const NAME: &str = r"[a-zA-Z_\x{80}-\x{10FFFF}:][a-zA-Z0-9_\x{80}-\x{10FFFF}:\-]*";
const NS_SEGMENT: &str = r"[a-zA-Z_\x{80}-\x{10FFFF}][a-zA-Z0-9_\x{80}-\x{10FFFF}]*";

/// Words a `class` keyword can be followed by in an anonymous class.
const ANONYMOUS_CLASS_WORDS: [&str; 2] = ["extends", "implements"];

/// Scans source text for class-like declarations.
#[derive(Debug, Clone)]
pub struct SymbolScanner {
    dialect: Dialect,
    /// Fast rejection: any declaration keyword followed by whitespace.
    probe: Regex,
    /// Declarations and namespace statements, in source order.
    declarations: Regex,
}

impl SymbolScanner {
    pub fn new(dialect: Dialect) -> ClassMapResult<Self> {
        let keywords = dialect
            .keywords
            .iter()
            .filter(|k| !k.is_empty())
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let separator = regex::escape(&dialect.separator.to_string());

        let probe_pattern = format!(r"(?i)\b(?:{keywords})\s");
        let probe = Regex::new(&probe_pattern)
            .map_err(|e| ClassMapError::invalid_pattern(probe_pattern, e))?;

        let declaration_pattern = format!(
            r"(?i)\b(?P<type>{keywords})\s+(?P<name>{NAME})|\b(?P<ns>namespace)(?P<nsname>\s+{NS_SEGMENT}(?:\s*{separator}\s*{NS_SEGMENT})*)?\s*[{{;]"
        );
        let declarations = Regex::new(&declaration_pattern)
            .map_err(|e| ClassMapError::invalid_pattern(declaration_pattern, e))?;

        Ok(Self {
            dialect,
            probe,
            declarations,
        })
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Read `path` and scan its content.
    pub fn scan_file(&self, path: &Path) -> ClassMapResult<Vec<SymbolName>> {
        let bytes = std::fs::read(path).map_err(|e| ClassMapError::unreadable(path, &e))?;
        if bytes.contains(&0) {
            let binary = std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "content contains NUL bytes",
            );
            return Err(ClassMapError::unreadable(path, &binary));
        }
        // Legacy single-byte encodings are valid source; undecodable bytes become U+FFFD.
        let content = String::from_utf8_lossy(&bytes);

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let symbols = self.scan(&content);
        tracing::trace!("[scanner] {} symbols in {}", symbols.len(), path.display());
        Ok(symbols)
    }

    /// Return the fully-qualified names declared in `text`, in file order.
    pub fn scan(&self, text: &str) -> Vec<SymbolName> {
        if !self.probe.is_match(text) {
            return Vec::new();
        }

        let stripped = strip_literals(text, &self.dialect);
        let source = match self.dialect.markers() {
            Some((open, close)) => {
                let Some(source) = strip_leading_markup(&stripped, open) else {
                    return Vec::new();
                };
                let collapsed = collapse_markup_blocks(source, open, close);
                strip_trailing_markup(&collapsed, open, close).to_string()
            }
            None => stripped,
        };

        self.match_declarations(&source)
    }

    fn match_declarations(&self, source: &str) -> Vec<SymbolName> {
        let separator = self.dialect.separator;
        let mut symbols = Vec::new();
        let mut namespace = String::new();

        for caps in self.declarations.captures_iter(source) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            // No `$class`, `Foo::class`, `->class` or `Vendor\Namespace;`
            let preceding = source[..whole.start()].chars().next_back();
            if matches!(preceding, Some('$' | ':' | '>')) || preceding == Some(separator) {
                continue;
            }

            if caps.name("ns").is_some() {
                namespace = caps
                    .name("nsname")
                    .map(|m| m.as_str().chars().filter(|c| !c.is_whitespace()).collect())
                    .unwrap_or_default();
                namespace.push(separator);
                continue;
            }

            let (Some(kind), Some(name)) = (caps.name("type"), caps.name("name")) else {
                continue;
            };
            let name = name.as_str();
            if ANONYMOUS_CLASS_WORDS
                .iter()
                .any(|word| name.eq_ignore_ascii_case(word))
            {
                continue;
            }

            let name = if name.starts_with(':') {
                let mangled = name.replace('-', "_").replace(':', "__");
                format!("xhp{}", &mangled[1..])
            } else if kind.as_str().eq_ignore_ascii_case("enum") {
                name.trim_end_matches(':').to_string()
            } else {
                name.to_string()
            };

            let qualified = format!("{namespace}{name}");
            symbols.push(qualified.trim_start_matches(separator).to_string());
        }

        symbols
    }
}
