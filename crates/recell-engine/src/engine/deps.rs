//! Dependency extraction from formula strings.
//!
//! Parses formula text to find all cell keys (e.g. `A1`, `B2:C5`) that the
//! formula depends on. The result feeds the reverse dependency index used for
//! propagation and the reference chain walked by cycle detection.
//!
//! Handles:
//! - Simple cell references: `A1`, `B2`
//! - Ranges: `A1:B5` (every covered cell, row-major)
//! - Ignores references inside string literals

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use super::cell_ref::CellRef;

/// Ranges covering more cells than this are left unexpanded.
pub const MAX_RANGE_CELLS: usize = 10_000;

/// Extract all cell keys referenced by a formula, de-duplicated, in order of first appearance.
pub fn extract_dependencies(formula: &str) -> Vec<CellRef> {
    let mut deps = Vec::new();
    let mut seen = HashSet::new();

    // Ignore references inside string literals.
    let formula = strip_string_literals(formula);

    let range_re = range_ref_re();
    for caps in range_re.captures_iter(&formula) {
        if let Some(cells) = expand_range(&caps[1], &caps[2]) {
            for cell in cells {
                if seen.insert(cell) {
                    deps.push(cell);
                }
            }
        }
    }

    // Remove ranges so their endpoints are not counted twice.
    let without_ranges = range_re.replace_all(&formula, " ");

    for m in cell_ref_re().find_iter(&without_ranges) {
        if let Some(cell) = CellRef::from_str(m.as_str())
            && seen.insert(cell)
        {
            deps.push(cell);
        }
    }

    deps
}

/// Expand a range like `A1`..`B2` into its cells in row-major order.
/// Returns None for invalid endpoints or ranges larger than [`MAX_RANGE_CELLS`].
pub fn expand_range(start: &str, end: &str) -> Option<Vec<CellRef>> {
    let start = CellRef::from_str(start)?;
    let end = CellRef::from_str(end)?;

    let min_row = start.row.min(end.row);
    let max_row = start.row.max(end.row);
    let min_col = start.col.min(end.col);
    let max_col = start.col.max(end.col);

    let cell_count = (max_row - min_row + 1).checked_mul(max_col - min_col + 1)?;
    if cell_count > MAX_RANGE_CELLS {
        return None;
    }

    let mut cells = Vec::with_capacity(cell_count);
    for row in min_row..=max_row {
        for col in min_col..=max_col {
            cells.push(CellRef::new(col, row));
        }
    }
    Some(cells)
}

pub(crate) fn cell_ref_re() -> &'static Regex {
    static CELL_RE: OnceLock<Regex> = OnceLock::new();
    CELL_RE.get_or_init(|| {
        Regex::new(r"\b[A-Z][0-9]+\b").expect("dependency cell reference regex must compile")
    })
}

/// Regex that matches ranges like `A1:B5`.
///
/// Captures:
/// - group 1: start cell key
/// - group 2: end cell key
pub(crate) fn range_ref_re() -> &'static Regex {
    static RANGE_RE: OnceLock<Regex> = OnceLock::new();
    RANGE_RE.get_or_init(|| {
        Regex::new(r"\b([A-Z][0-9]+)\s*:\s*([A-Z][0-9]+)\b").expect("range regex must compile")
    })
}

fn strip_string_literals(formula: &str) -> String {
    let mut out = String::with_capacity(formula.len());
    let mut in_string = false;
    let mut escaped = false;

    for ch in formula.chars() {
        if in_string {
            if escaped {
                escaped = false;
                out.push(' ');
                continue;
            }
            if ch == '\\' {
                escaped = true;
                out.push(' ');
                continue;
            }
            if ch == '"' {
                in_string = false;
                out.push('"');
            } else {
                out.push(' ');
            }
        } else if ch == '"' {
            in_string = true;
            out.push('"');
        } else {
            out.push(ch);
        }
    }

    out
}
