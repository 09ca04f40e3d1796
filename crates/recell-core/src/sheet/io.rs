use super::Sheet;
use crate::error::Result;
use crate::storage::{parse_grd, parse_grd_content};
use recell_engine::engine::GridSize;
use std::path::Path;

impl Sheet {
    /// Create a sheet from a `.grd` file of initial inputs.
    pub fn load_file(size: GridSize, path: &Path) -> Result<Self> {
        let inputs = parse_grd(path)?;
        tracing::debug!(path = %path.display(), cells = inputs.len(), "loaded initial inputs");
        Self::with_inputs(size, inputs)
    }

    /// Create a sheet from `.grd` content.
    pub fn from_grd_content(size: GridSize, content: &str) -> Result<Self> {
        Self::with_inputs(size, parse_grd_content(content)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::{RecellError, Sheet};
    use recell_engine::engine::{CellRef, CellStatus, GridSize};

    #[test]
    fn test_initial_inputs_are_evaluated_in_dependency_order() {
        let content = r#"
# C1 comes before the cells it needs
C1: =A1 + B1
A1: 3
B1: =A1 + 1
"#;
        let sheet = Sheet::from_grd_content(GridSize::new(10, 10), content).unwrap();
        assert_eq!(sheet.get_cell_display(&CellRef::new(1, 0)), "4");
        assert_eq!(sheet.get_cell_display(&CellRef::new(2, 0)), "7");
    }

    #[test]
    fn test_initial_cycle_is_rejected() {
        let content = "A1: =B1\nB1: =A1\nC1: 5";
        let sheet = Sheet::from_grd_content(GridSize::new(3, 3), content).unwrap();
        assert_eq!(sheet.get(&CellRef::new(0, 0)).unwrap().status, CellStatus::FormulaError);
        assert_eq!(sheet.get(&CellRef::new(1, 0)).unwrap().status, CellStatus::FormulaError);
        assert_eq!(sheet.get_cell_display(&CellRef::new(2, 0)), "5");
    }

    #[test]
    fn test_initial_input_outside_grid_is_rejected() {
        let result = Sheet::from_grd_content(GridSize::new(3, 3), "D1: 1");
        assert!(matches!(result, Err(RecellError::OutOfRange(_))));
    }

    #[test]
    fn test_invalid_dimensions_are_rejected() {
        let result = Sheet::from_grd_content(GridSize::new(0, 3), "");
        assert!(matches!(result, Err(RecellError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_initial_state_matches_incremental_edits() {
        let content = "A1: 2\nB1: =A1^3\nC1: =B1 - A1";
        let loaded = Sheet::from_grd_content(GridSize::new(4, 4), content).unwrap();

        let mut edited = Sheet::new(GridSize::new(4, 4)).unwrap();
        edited.edit_cell(CellRef::new(0, 0), "2").unwrap();
        edited.edit_cell(CellRef::new(1, 0), "=A1^3").unwrap();
        edited.edit_cell(CellRef::new(2, 0), "=B1 - A1").unwrap();

        assert_eq!(loaded.grid(), edited.grid());
    }
}
