//! Parser for the .grd initial-input format.
//!
//! One `KEY: RAW` pair per line. `RAW` is the raw cell input (a literal, or a
//! formula starting with `=`), trimmed, or double-quoted to keep surrounding
//! whitespace. Blank lines and `#` comments are skipped.

use crate::error::{RecellError, Result};
use recell_engine::engine::CellRef;
use std::fs;
use std::path::Path;

const MAX_GRD_FILE_BYTES: u64 = 8 * 1_048_576; // 8 MiB

/// Parse a .grd file into `(key, raw input)` pairs, in file order.
pub fn parse_grd(path: &Path) -> Result<Vec<(CellRef, String)>> {
    let meta = fs::metadata(path)?;
    if meta.len() > MAX_GRD_FILE_BYTES {
        return Err(RecellError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_GRD_FILE_BYTES
            ),
        )));
    }
    let content = fs::read_to_string(path)?;
    parse_grd_content(&content)
}

/// Parse .grd content from a string
pub fn parse_grd_content(content: &str) -> Result<Vec<(CellRef, String)>> {
    let mut inputs = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Parse "KEY: RAW" format
        let Some((key_str, raw)) = line.split_once(':') else {
            return Err(RecellError::Parse {
                line: line_num + 1,
                message: "Expected 'KEY: VALUE' format".to_string(),
            });
        };

        let key_str = key_str.trim();
        let cell_ref = CellRef::from_str(key_str).ok_or_else(|| RecellError::Parse {
            line: line_num + 1,
            message: format!("Invalid cell reference: {}", key_str),
        })?;

        inputs.push((cell_ref, parse_raw_input(raw)));
    }

    Ok(inputs)
}

fn parse_raw_input(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with('"') && raw.ends_with('"') && raw.len() >= 2 {
        unescape_grd_text(&raw[1..raw.len() - 1])
    } else {
        raw.to_string()
    }
}

fn unescape_grd_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('\\') => out.push('\\'),
                Some('"') => out.push('"'),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only(content: &str) -> (CellRef, String) {
        let mut inputs = parse_grd_content(content).unwrap();
        assert_eq!(inputs.len(), 1);
        inputs.remove(0)
    }

    #[test]
    fn test_parse_literal() {
        assert_eq!(only("A1: 42"), (CellRef::new(0, 0), "42".to_string()));
    }

    #[test]
    fn test_parse_formula_keeps_marker() {
        assert_eq!(only("B2: =A1 + C1").1, "=A1 + C1");
    }

    #[test]
    fn test_parse_formula_with_range_colon() {
        assert_eq!(only("B2: =sum(A1:A3)").1, "=sum(A1:A3)");
    }

    #[test]
    fn test_parse_quoted_keeps_whitespace_and_escapes() {
        assert_eq!(only(r#"A1: "  padded ""#).1, "  padded ");
        assert_eq!(only(r#"A1: "He said \"hi\"""#).1, "He said \"hi\"");
    }

    #[test]
    fn test_parse_empty_value() {
        assert_eq!(only("A1:").1, "");
    }

    #[test]
    fn test_skip_comments_and_empty_lines() {
        let content = r#"
# This is a comment
A1: 42

# Another comment

B1: 100
"#;
        assert_eq!(parse_grd_content(content).unwrap().len(), 2);
    }

    #[test]
    fn test_errors_report_line_numbers() {
        let err = parse_grd_content("A1: 1\nnot a pair").unwrap_err();
        assert!(matches!(err, RecellError::Parse { line: 2, .. }));

        let err = parse_grd_content("A1: 1\n\nAA1: 2").unwrap_err();
        assert!(matches!(err, RecellError::Parse { line: 3, .. }));
    }
}
