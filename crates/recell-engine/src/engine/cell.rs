//! Cell data structures for the fixed-size grid.
//!
//! This module provides the core data types for representing cells:
//! - [`CellStatus`] - Presentation status (plain, formula-ok, formula-error)
//! - [`CellValue`] - The displayed value of a cell
//! - [`Cell`] - A cell with raw input, expression, dependencies, and evaluation state
//! - [`Grid`] - Dense storage with exactly one cell per key in the key space

use serde::{Deserialize, Serialize};

use super::cell_ref::{CellRef, MAX_COLUMNS};
use super::deps::extract_dependencies;
use super::error::FormulaError;
use super::format::{format_number, parse_numeric};

/// Leading character that marks an input as a formula.
pub const FORMULA_MARKER: char = '=';

/// Display text of a cell whose formula failed.
pub const ERROR_DISPLAY: &str = "error";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CellStatus {
    Plain,
    FormulaOk,
    FormulaError,
}

impl CellStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellStatus::Plain => "plain",
            CellStatus::FormulaOk => "formula-ok",
            CellStatus::FormulaError => "formula-error",
        }
    }
}

/// The value a cell displays in read mode.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Error,
}

impl CellValue {
    /// Numeric value used when other formulas reference this cell.
    /// Anything that is not a finite number counts as 0.
    pub fn scope_value(&self) -> f64 {
        match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => parse_numeric(s).unwrap_or(0.0),
            CellValue::Error => 0.0,
        }
    }

    pub fn display(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Error => ERROR_DISPLAY.to_string(),
        }
    }
}

/// A cell in the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    /// Exactly what was entered, marker included.
    pub raw_input: String,
    /// Formula text without the marker, the raw input for plain cells,
    /// or empty once a formula has been rejected.
    pub expression: String,
    pub value: CellValue,
    pub status: CellStatus,
    /// Keys referenced by the formula in `raw_input`, in order of first appearance.
    /// Kept for rejected formulas so they still take part in cycle detection.
    pub depends_on: Vec<CellRef>,
    pub error: Option<FormulaError>,
}

impl Cell {
    pub fn new_empty() -> Cell {
        Cell::new_plain("")
    }

    pub fn new_plain(text: &str) -> Cell {
        Cell {
            raw_input: text.to_string(),
            expression: text.to_string(),
            value: CellValue::Text(text.to_string()),
            status: CellStatus::Plain,
            depends_on: vec![],
            error: None,
        }
    }

    /// Create an unevaluated formula cell.
    /// Dependencies are extracted from the formula text.
    pub fn new_formula(formula: &str) -> Cell {
        Cell {
            raw_input: format!("{}{}", FORMULA_MARKER, formula),
            expression: formula.to_string(),
            value: CellValue::Number(0.0),
            status: CellStatus::FormulaOk,
            depends_on: extract_dependencies(formula),
            error: None,
        }
    }

    /// Classify user input.
    /// - Starts with '=' -> formula (without the '=')
    /// - Otherwise -> plain, displayed verbatim
    pub fn from_input(input: &str) -> Cell {
        match input.strip_prefix(FORMULA_MARKER) {
            Some(formula) => Cell::new_formula(formula),
            None => Cell::new_plain(input),
        }
    }

    /// The formula text, if the raw input is a formula.
    pub fn formula(&self) -> Option<&str> {
        self.raw_input.strip_prefix(FORMULA_MARKER)
    }

    pub fn is_formula(&self) -> bool {
        self.formula().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.raw_input.is_empty()
    }

    /// Record the outcome of evaluating this cell's formula.
    pub fn apply_result(&mut self, result: Result<f64, FormulaError>) {
        match result {
            Ok(n) => {
                self.expression = self.formula().unwrap_or_default().to_string();
                self.value = CellValue::Number(n);
                self.status = CellStatus::FormulaOk;
                self.error = None;
            }
            Err(err) => {
                self.expression.clear();
                self.value = CellValue::Error;
                self.status = CellStatus::FormulaError;
                self.error = Some(err);
            }
        }
    }

    pub fn display_value(&self) -> String {
        self.value.display()
    }
}

/// Dimensions of the key space `{A..column_max} × {1..row_max}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub columns: usize,
    pub rows: usize,
}

impl GridSize {
    pub const MAX_ROWS: usize = 10_000;

    pub fn new(columns: usize, rows: usize) -> GridSize {
        GridSize { columns, rows }
    }

    pub fn is_valid(&self) -> bool {
        (1..=MAX_COLUMNS).contains(&self.columns) && (1..=Self::MAX_ROWS).contains(&self.rows)
    }

    pub fn contains(&self, cell_ref: &CellRef) -> bool {
        cell_ref.col < self.columns && cell_ref.row < self.rows
    }

    pub fn cell_count(&self) -> usize {
        self.columns * self.rows
    }
}

/// Dense row-major grid holding one cell per key.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    size: GridSize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid of empty plain cells. Returns None for invalid dimensions.
    pub fn new(size: GridSize) -> Option<Grid> {
        if !size.is_valid() {
            return None;
        }
        Some(Grid {
            size,
            cells: vec![Cell::new_empty(); size.cell_count()],
        })
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn contains(&self, cell_ref: &CellRef) -> bool {
        self.size.contains(cell_ref)
    }

    pub fn get(&self, cell_ref: &CellRef) -> Option<&Cell> {
        self.index(cell_ref).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, cell_ref: &CellRef) -> Option<&mut Cell> {
        self.index(cell_ref).map(|i| &mut self.cells[i])
    }

    /// All keys in row-major order.
    pub fn keys(&self) -> impl Iterator<Item = CellRef> + '_ {
        let columns = self.size.columns;
        (0..self.cells.len()).map(move |i| CellRef::new(i % columns, i / columns))
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellRef, &Cell)> + '_ {
        self.keys().zip(self.cells.iter())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn index(&self, cell_ref: &CellRef) -> Option<usize> {
        self.contains(cell_ref)
            .then(|| cell_ref.row * self.size.columns + cell_ref.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_input_plain_keeps_text_verbatim() {
        let cell = Cell::from_input(" hello ");
        assert_eq!(cell.status, CellStatus::Plain);
        assert_eq!(cell.expression, " hello ");
        assert_eq!(cell.display_value(), " hello ");
        assert!(cell.depends_on.is_empty());
    }

    #[test]
    fn test_from_input_formula_strips_marker() {
        let cell = Cell::from_input("=A1+B2");
        assert_eq!(cell.expression, "A1+B2");
        assert_eq!(cell.formula(), Some("A1+B2"));
        assert_eq!(cell.depends_on, vec![CellRef::new(0, 0), CellRef::new(1, 1)]);
    }

    #[test]
    fn test_marker_must_be_first_character() {
        let cell = Cell::from_input(" =1");
        assert!(!cell.is_formula());
    }

    #[test]
    fn test_apply_error_clears_expression_but_keeps_dependencies() {
        let mut cell = Cell::from_input("=B1+1");
        cell.apply_result(Err(FormulaError::Parse("bad".into())));
        assert_eq!(cell.status, CellStatus::FormulaError);
        assert_eq!(cell.display_value(), ERROR_DISPLAY);
        assert!(cell.expression.is_empty());
        assert_eq!(cell.depends_on, vec![CellRef::new(1, 0)]);

        cell.apply_result(Ok(2.0));
        assert_eq!(cell.expression, "B1+1");
        assert_eq!(cell.display_value(), "2");
    }

    #[test]
    fn test_scope_value_treats_non_numbers_as_zero() {
        assert_eq!(CellValue::Text("12".into()).scope_value(), 12.0);
        assert_eq!(CellValue::Text("twelve".into()).scope_value(), 0.0);
        assert_eq!(CellValue::Text(String::new()).scope_value(), 0.0);
        assert_eq!(CellValue::Error.scope_value(), 0.0);
        assert_eq!(CellValue::Number(-1.5).scope_value(), -1.5);
    }

    #[test]
    fn test_grid_has_one_cell_per_key() {
        let grid = Grid::new(GridSize::new(3, 2)).unwrap();
        assert_eq!(grid.len(), 6);
        let keys: Vec<String> = grid.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, ["A1", "B1", "C1", "A2", "B2", "C2"]);
        assert!(grid.iter().all(|(_, c)| c.is_empty()));
    }

    #[test]
    fn test_grid_rejects_out_of_range_keys() {
        let grid = Grid::new(GridSize::new(3, 2)).unwrap();
        assert!(grid.get(&CellRef::new(3, 0)).is_none());
        assert!(grid.get(&CellRef::new(0, 2)).is_none());
        assert!(grid.get(&CellRef::new(2, 1)).is_some());
    }

    #[test]
    fn test_grid_size_validation() {
        assert!(Grid::new(GridSize::new(0, 10)).is_none());
        assert!(Grid::new(GridSize::new(27, 10)).is_none());
        assert!(Grid::new(GridSize::new(26, 0)).is_none());
        assert!(Grid::new(GridSize::new(26, GridSize::MAX_ROWS + 1)).is_none());
        assert!(Grid::new(GridSize::new(26, GridSize::MAX_ROWS)).is_some());
    }
}
