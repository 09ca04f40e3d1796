//! Cell key parsing and formatting.
//!
//! Keys are a single uppercase column letter followed by a 1-based row number
//! (e.g. "A1", "B12"). Internally they are zero-indexed column/row coordinates.
//!
//! # Examples
//!
//! ```
//! use recell_engine::engine::CellRef;
//!
//! let cell = CellRef::from_str("B3").unwrap();
//! assert_eq!(cell.col, 1); // 0-indexed
//! assert_eq!(cell.row, 2);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Number of addressable columns (one letter per key).
pub const MAX_COLUMNS: usize = 26;

/// A reference to a cell by column and row indices (0-indexed).
///
/// Ordering is row-major, which is also the order cells are stored in a grid.
#[derive(
    Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse a cell key (e.g. "A1", "Z99").
    /// Returns None if the input is not a single uppercase letter followed by a row >= 1.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Option<CellRef> {
        Self::parse_a1(name)
    }

    fn parse_a1(name: &str) -> Option<CellRef> {
        let caps = key_re().captures(name)?;
        let col = (caps["letter"].as_bytes()[0] - b'A') as usize;
        let row = caps["numbers"].parse::<usize>().ok()?.checked_sub(1)?;
        Some(CellRef::new(col, row))
    }

    /// Convert column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
    ///
    /// Keys only ever use one letter; wider columns are still printable so that
    /// out-of-range references show up legibly in errors.
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

fn key_re() -> &'static Regex {
    static KEY_RE: OnceLock<Regex> = OnceLock::new();
    KEY_RE.get_or_init(|| {
        Regex::new(r"^(?<letter>[A-Z])(?<numbers>[0-9]+)$").expect("cell key regex must compile")
    })
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::CellRef;

    #[test]
    fn test_parse_huge_row_returns_none() {
        let huge = format!("A{}", "9".repeat(40));
        assert!(CellRef::from_str(&huge).is_none());
    }

    #[test]
    fn test_display_round_trips_keys() {
        for key in ["A1", "B12", "Z9999"] {
            assert_eq!(CellRef::from_str(key).unwrap().to_string(), key);
        }
    }

    #[test]
    fn test_ordering_is_row_major() {
        assert!(CellRef::new(5, 0) < CellRef::new(0, 1));
        assert!(CellRef::new(0, 3) < CellRef::new(1, 3));
    }

    #[test]
    fn test_trait_from_str_reports_invalid_key() {
        let err = "1A".parse::<CellRef>().unwrap_err();
        assert!(err.contains("1A"));
    }
}
