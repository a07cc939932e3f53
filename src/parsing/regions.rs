//! Text-region elimination passes.
//!
//! The scanner never parses a grammar. It removes everything that could
//! produce a false declaration match, one pass at a time, then pattern
//! matches what is left:
//!
//! 1. [`strip_literals`]: heredocs, quoted strings and comments inside
//!    source regions.
//! 2. [`strip_leading_markup`]: text before the first open marker.
//! 3. [`collapse_markup_blocks`]: markup between a close and the next open
//!    marker.
//! 4. [`strip_trailing_markup`]: a markup tail that never reopens.
//!
//! Passes 2 to 4 only apply to dialects with region markers.

use crate::parsing::Dialect;

/// Replacement for every eliminated literal body.
pub const LITERAL_PLACEHOLDER: &str = "null";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Markup,
    Source,
}

/// Replace heredoc and quoted literals with [`LITERAL_PLACEHOLDER`] and drop
/// comments. Markup regions are copied verbatim.
pub fn strip_literals(text: &str, dialect: &Dialect) -> String {
    let markers = dialect.markers();
    let mut out = String::with_capacity(text.len());
    let mut mode = if markers.is_some() {
        Mode::Markup
    } else {
        Mode::Source
    };
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];

        if mode == Mode::Markup {
            let Some((open, _)) = markers else {
                out.push_str(rest);
                break;
            };
            match rest.find(open) {
                Some(k) => {
                    let end = k + open.len();
                    out.push_str(&rest[..end]);
                    i += end;
                    mode = Mode::Source;
                }
                None => {
                    out.push_str(rest);
                    break;
                }
            }
            continue;
        }

        let close = markers.map(|(_, close)| close);
        if let Some(close) = close {
            if rest.starts_with(close) {
                out.push_str(close);
                i += close.len();
                mode = Mode::Markup;
                continue;
            }
        }

        if rest.starts_with("<<<") {
            if let Some(len) = heredoc_len(rest) {
                out.push_str(LITERAL_PLACEHOLDER);
                i += len;
                continue;
            }
        }

        if rest.starts_with("/*") {
            let len = rest[2..].find("*/").map(|k| k + 4).unwrap_or(rest.len());
            out.push(' ');
            i += len;
            continue;
        }

        if let Some(len) = line_comment_len(rest, dialect, close) {
            i += len;
            continue;
        }

        let Some(c) = rest.chars().next() else {
            break;
        };
        if c == '\'' || c == '"' {
            out.push_str(LITERAL_PLACEHOLDER);
            i += quoted_len(rest, c as u8);
            continue;
        }

        out.push(c);
        i += c.len_utf8();
    }

    out
}

/// Length of a quoted literal starting at `rest[0]`, honoring backslash
/// escapes. Unterminated literals run to the end of the text.
fn quoted_len(rest: &str, quote: u8) -> usize {
    let bytes = rest.as_bytes();
    let mut j = 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b if b == quote => return j + 1,
            _ => j += 1,
        }
    }
    rest.len()
}

/// Length of a line comment starting at `rest[0]`, excluding the line break
/// and any close marker that ends it.
fn line_comment_len(rest: &str, dialect: &Dialect, close: Option<&str>) -> Option<usize> {
    let token = dialect
        .line_comments
        .iter()
        .find(|token| !token.is_empty() && rest.starts_with(token.as_str()))?;

    // `#[...]` is attribute syntax
    if token == "#" && rest[1..].starts_with('[') {
        return None;
    }

    let line_end = rest.find(['\n', '\r']).unwrap_or(rest.len());
    let marker_end = close
        .and_then(|close| rest[..line_end].find(close))
        .unwrap_or(line_end);
    Some(marker_end)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii()
}

/// Length of a heredoc/nowdoc block starting at `rest[0]` (`<<<`), or `None`
/// when the text after `<<<` is not a heredoc opener.
fn heredoc_len(rest: &str) -> Option<usize> {
    let mut j = 3;
    j += rest[j..].len() - rest[j..].trim_start_matches([' ', '\t']).len();

    let quote = match rest[j..].chars().next()? {
        q @ ('\'' | '"') => {
            j += 1;
            Some(q)
        }
        _ => None,
    };

    let ident_len = rest[j..]
        .char_indices()
        .find(|(_, c)| !is_ident_char(*c))
        .map(|(k, _)| k)
        .unwrap_or(rest.len() - j);
    if ident_len == 0 || rest[j..].starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let ident = &rest[j..j + ident_len];
    j += ident_len;

    if let Some(q) = quote {
        if !rest[j..].starts_with(q) {
            return None;
        }
        j += 1;
    }

    let newline = if rest[j..].starts_with("\r\n") {
        2
    } else if rest[j..].starts_with(['\n', '\r']) {
        1
    } else {
        return None;
    };
    let mut line_start = j + newline;

    loop {
        let line = &rest[line_start..];
        let indented = line.trim_start_matches([' ', '\t']);
        let offset = line_start + (line.len() - indented.len());
        if let Some(after) = indented.strip_prefix(ident) {
            if !after.starts_with(is_ident_char) {
                return Some(offset + ident.len());
            }
        }
        match line.find(['\n', '\r']) {
            Some(k) => line_start += k + 1,
            None => return Some(rest.len()),
        }
    }
}

/// Drop everything before the first `open` marker. `None` when the text
/// holds no marker at all.
pub fn strip_leading_markup<'a>(text: &'a str, open: &str) -> Option<&'a str> {
    text.find(open).map(|k| &text[k..])
}

/// Remove the markup between each `close` marker and the next `open`
/// marker, leaving one contiguous source region.
pub fn collapse_markup_blocks(text: &str, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(a) = rest.find(close) {
        let after_close = a + close.len();
        match rest[after_close..].find(open) {
            Some(b) => {
                out.push_str(&rest[..after_close]);
                out.push_str(open);
                rest = &rest[after_close + b + open.len()..];
            }
            None => break,
        }
    }

    out.push_str(rest);
    out
}

/// Drop a trailing markup tail: the text from the last `close` marker on,
/// when no `open` marker follows it.
pub fn strip_trailing_markup<'a>(text: &'a str, open: &str, close: &str) -> &'a str {
    match text.rfind(close) {
        Some(pos) if !text[pos..].contains(open) => &text[..pos],
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn php() -> Dialect {
        Dialect::php()
    }

    #[test]
    fn test_quoted_strings_become_placeholders() {
        let text = r#"<?php $a = 'class Fake {}'; $b = "it's \"class Other\""; class Real {}"#;

        let stripped = strip_literals(text, &php());

        assert!(!stripped.contains("Fake"));
        assert!(!stripped.contains("Other"));
        assert!(stripped.contains("$a = null;"));
        assert!(stripped.contains("class Real"));
    }

    #[test]
    fn test_escaped_quote_does_not_end_string() {
        let text = r"<?php $a = 'don\'t class Fake'; class Real {}";

        let stripped = strip_literals(text, &php());

        assert_eq!(stripped, "<?php $a = null; class Real {}");
    }

    #[test]
    fn test_heredoc_and_nowdoc_are_removed() {
        let text = "<?php\n$a = <<<EOT\nclass Fake {}\nEOT;\n$b = <<<'RAW'\ninterface Hidden {}\nRAW;\nclass Real {}\n";

        let stripped = strip_literals(text, &php());

        assert!(!stripped.contains("Fake"));
        assert!(!stripped.contains("Hidden"));
        assert!(stripped.contains("$a = null;"));
        assert!(stripped.contains("$b = null;"));
        assert!(stripped.contains("class Real"));
    }

    #[test]
    fn test_indented_heredoc_terminator() {
        let text = "<?php\n    $sql = <<<SQL\n        class Fake\n        SQL;\nclass Real {}";

        let stripped = strip_literals(text, &php());

        assert!(!stripped.contains("Fake"));
        assert!(stripped.contains("class Real"));
    }

    #[test]
    fn test_comments_are_dropped() {
        let text = "<?php\n// class LineFake {}\n# class HashFake {}\n/* class BlockFake {} */\nclass Real {}";

        let stripped = strip_literals(text, &php());

        assert!(!stripped.contains("Fake"));
        assert!(stripped.contains("class Real"));
    }

    #[test]
    fn test_attribute_is_not_a_comment() {
        let text = "<?php\n#[Attribute]\nclass Real {}";

        let stripped = strip_literals(text, &php());

        assert!(stripped.contains("#[Attribute]"));
    }

    #[test]
    fn test_line_comment_ends_at_close_marker() {
        let text = "<?php // note ?>markup 'quoted' <?php class Real {}";

        let stripped = strip_literals(text, &php());

        assert!(stripped.contains("?>markup 'quoted' <?php"));
        assert!(stripped.contains("class Real"));
    }

    #[test]
    fn test_markup_quotes_are_not_literals() {
        let text = "<p>don't</p><?php class Real {} ?><p>it's</p>";

        let stripped = strip_literals(text, &php());

        assert_eq!(stripped, text);
    }

    #[test]
    fn test_markerless_dialect_treats_everything_as_source() {
        let dialect = Dialect::dotted("src");

        let stripped = strip_literals("namespace App; // class Fake\nclass Widget {}", &dialect);

        assert_eq!(stripped, "namespace App; \nclass Widget {}");
    }

    #[test]
    fn test_leading_markup() {
        assert_eq!(
            strip_leading_markup("<html><?php class A {}", "<?"),
            Some("<?php class A {}")
        );
        assert_eq!(strip_leading_markup("<?php class A {}", "<?"), Some("<?php class A {}"));
        assert_eq!(strip_leading_markup("plain text", "<?"), None);
    }

    #[test]
    fn test_collapse_keeps_every_source_region() {
        let text = "<?php class A {} ?><b>x</b><?php class B {} ?><i>y</i><?php class C {}";

        let collapsed = collapse_markup_blocks(text, "<?", "?>");

        assert_eq!(
            collapsed,
            "<?php class A {} ?><?php class B {} ?><?php class C {}"
        );
    }

    #[test]
    fn test_trailing_markup() {
        assert_eq!(
            strip_trailing_markup("<?php class A {} ?>\n<footer/>", "<?", "?>"),
            "<?php class A {} "
        );
        assert_eq!(
            strip_trailing_markup("<?php class A {}", "<?", "?>"),
            "<?php class A {}"
        );
    }
}
