use super::Sheet;
use recell_engine::engine::{Cell, CellRef, CellStatus};
use serde::Serialize;

/// Read-only projection of one cell for a UI collaborator.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CellView {
    pub key: String,
    /// Shown in read mode.
    pub display: String,
    /// Formula text without marker, or the plain input; empty for rejected formulas.
    pub expression: String,
    /// Shown in edit mode: the raw input, marker included.
    pub input: String,
    pub status: CellStatus,
}

impl CellView {
    fn new(cell_ref: &CellRef, cell: &Cell) -> Self {
        CellView {
            key: cell_ref.to_string(),
            display: cell.display_value(),
            expression: cell.expression.clone(),
            input: cell.raw_input.clone(),
            status: cell.status,
        }
    }
}

impl Sheet {
    pub fn view(&self, cell_ref: &CellRef) -> Option<CellView> {
        self.grid.get(cell_ref).map(|cell| CellView::new(cell_ref, cell))
    }

    /// Views of every cell, row-major.
    pub fn views(&self) -> impl Iterator<Item = CellView> + '_ {
        self.grid
            .iter()
            .map(|(cell_ref, cell)| CellView::new(&cell_ref, cell))
    }

    /// Get the display value for a cell (empty for keys outside the grid).
    pub fn get_cell_display(&self, cell_ref: &CellRef) -> String {
        self.grid
            .get(cell_ref)
            .map(Cell::display_value)
            .unwrap_or_default()
    }

    pub fn has_errors(&self) -> bool {
        self.grid
            .iter()
            .any(|(_, cell)| cell.status == CellStatus::FormulaError)
    }
}

#[cfg(test)]
mod tests {
    use crate::Sheet;
    use recell_engine::engine::{CellRef, CellStatus, GridSize};

    #[test]
    fn test_view_exposes_display_expression_and_status() {
        let mut sheet = Sheet::new(GridSize::new(3, 3)).unwrap();
        sheet.edit_cell(CellRef::new(0, 0), "2").unwrap();
        sheet.edit_cell(CellRef::new(1, 0), "=A1*21").unwrap();

        let view = sheet.view(&CellRef::new(1, 0)).unwrap();
        assert_eq!(view.key, "B1");
        assert_eq!(view.display, "42");
        assert_eq!(view.expression, "A1*21");
        assert_eq!(view.input, "=A1*21");
        assert_eq!(view.status, CellStatus::FormulaOk);
    }

    #[test]
    fn test_views_cover_every_key() {
        let sheet = Sheet::new(GridSize::new(2, 3)).unwrap();
        assert_eq!(sheet.views().count(), 6);
        assert!(sheet.view(&CellRef::new(2, 0)).is_none());
    }

    #[test]
    fn test_has_errors() {
        let mut sheet = Sheet::new(GridSize::new(2, 2)).unwrap();
        assert!(!sheet.has_errors());
        sheet.edit_cell(CellRef::new(0, 0), "=A1").unwrap();
        assert!(sheet.has_errors());
        assert_eq!(sheet.get_cell_display(&CellRef::new(0, 0)), "error");
    }
}
