//! Reactive cell engine API.
//!
//! This module provides the primitives the sheet is built from:
//!
//! - [`Cell`], [`CellValue`], [`CellStatus`], [`Grid`], [`GridSize`] - Cell storage
//! - [`CellRef`] - Cell key parsing (A1 notation ↔ row/col indices)
//! - [`detect_cycle`] - Circular reference detection over the reference chain
//! - [`extract_dependencies`] - Parse the cell keys a formula references
//! - [`preprocess_formula`] - Rewrite formula text for Rhai evaluation
//! - [`create_engine`], [`evaluate_formula`] - Rhai engine with built-ins and evaluation
//! - [`format_number`] - Format computed values for display

mod cell;
mod cell_ref;
mod cycle;
mod deps;
mod error;
mod eval;
mod format;
mod preprocess;

pub use cell::{Cell, CellStatus, CellValue, ERROR_DISPLAY, FORMULA_MARKER, Grid, GridSize};
pub use cell_ref::{CellRef, MAX_COLUMNS};
pub use cycle::{detect_cycle, format_path};
pub use deps::{MAX_RANGE_CELLS, expand_range, extract_dependencies};
pub use error::FormulaError;
pub use eval::{create_engine, evaluate_formula};
pub(crate) use eval::dynamic_to_number;
pub use format::{format_number, parse_numeric};
pub use preprocess::preprocess_formula;

pub use rhai::Dynamic;
