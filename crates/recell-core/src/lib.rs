//! recell-core - Sheet model (edits + propagation), initial-input storage and views.

pub mod error;
pub mod sheet;
pub mod storage;

pub use error::{RecellError, Result};
pub use sheet::{CellView, Sheet};

pub use recell_engine::engine::{CellRef, CellStatus, Grid, GridSize};
