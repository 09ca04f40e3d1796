//! Error types for Recell core.

use recell_engine::engine::{CellRef, GridSize, MAX_COLUMNS};
use thiserror::Error;

/// Errors that can cross the sheet's public API.
///
/// Formula problems are not among them: those are recorded on the cell.
#[derive(Error, Debug)]
pub enum RecellError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Cell {0} is outside the grid")]
    OutOfRange(CellRef),

    #[error(
        "Invalid grid dimensions {columns}x{rows} (columns 1-{}, rows 1-{})",
        MAX_COLUMNS,
        GridSize::MAX_ROWS
    )]
    InvalidDimensions { columns: usize, rows: usize },
}

pub type Result<T> = std::result::Result<T, RecellError>;
