//! Formula evaluation errors.
//!
//! These never cross the sheet's public contract: they are stored on the cell
//! and surface as the `formula-error` status with an `"error"` display.

use thiserror::Error;

use super::cell_ref::CellRef;
use super::cycle::format_path;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    /// The expression could not be parsed or evaluated, or did not yield a number.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The reference chain revisits a key already on the trace path.
    #[error("Circular reference: {}", format_path(.path))]
    CircularReference { path: Vec<CellRef> },
}
