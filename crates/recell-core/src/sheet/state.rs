use crate::error::{RecellError, Result};
use recell_engine::engine::{Cell, CellRef, Grid, GridSize, create_engine};
use rhai::Engine;
use std::collections::{BTreeSet, HashMap};

/// UI-agnostic sheet: a fixed-size grid of cells plus the evaluation engine.
///
/// The grid is owned exclusively by the sheet and only changes through the
/// edit operations; callers get read-only access.
pub struct Sheet {
    pub(crate) grid: Grid,
    /// Rhai engine for evaluating formulas
    pub(crate) engine: Engine,
    /// Reverse dependency map: cell -> cells whose formulas reference it
    pub(crate) dependents: HashMap<CellRef, BTreeSet<CellRef>>,
}

impl Sheet {
    /// Create a sheet with every cell empty.
    pub fn new(size: GridSize) -> Result<Self> {
        let grid = Grid::new(size).ok_or(RecellError::InvalidDimensions {
            columns: size.columns,
            rows: size.rows,
        })?;

        Ok(Sheet {
            grid,
            engine: create_engine(),
            dependents: HashMap::new(),
        })
    }

    /// Create a sheet from an initial key -> raw input mapping.
    ///
    /// Every input is assigned first and the whole grid is then recalculated
    /// in dependency order, so the mapping's order does not matter.
    pub fn with_inputs<I, S>(size: GridSize, inputs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (CellRef, S)>,
        S: AsRef<str>,
    {
        let mut sheet = Self::new(size)?;
        for (cell_ref, input) in inputs {
            let slot = sheet
                .grid
                .get_mut(&cell_ref)
                .ok_or(RecellError::OutOfRange(cell_ref))?;
            *slot = Cell::from_input(input.as_ref());
        }
        sheet.rebuild_dependents();
        sheet.recalculate_all();
        Ok(sheet)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn size(&self) -> GridSize {
        self.grid.size()
    }

    pub fn get(&self, cell_ref: &CellRef) -> Option<&Cell> {
        self.grid.get(cell_ref)
    }

    /// Cells whose formulas reference `cell_ref` directly.
    pub fn dependents_of(&self, cell_ref: &CellRef) -> impl Iterator<Item = CellRef> + '_ {
        self.dependents
            .get(cell_ref)
            .into_iter()
            .flat_map(|deps| deps.iter().copied())
    }

    pub(crate) fn ensure_in_bounds(&self, cell_ref: &CellRef) -> Result<()> {
        if self.grid.contains(cell_ref) {
            Ok(())
        } else {
            Err(RecellError::OutOfRange(*cell_ref))
        }
    }

    /// Rebuild the reverse dependency map from the grid.
    pub(crate) fn rebuild_dependents(&mut self) {
        self.dependents.clear();
        for (cell_ref, cell) in self.grid.iter() {
            for dep in &cell.depends_on {
                self.dependents.entry(*dep).or_default().insert(cell_ref);
            }
        }
    }

    /// Move `cell_ref`'s entries in the reverse map from `old` to `new` dependencies.
    pub(crate) fn relink_dependents(&mut self, cell_ref: CellRef, old: &[CellRef], new: &[CellRef]) {
        for dep in old {
            if let Some(set) = self.dependents.get_mut(dep) {
                set.remove(&cell_ref);
                if set.is_empty() {
                    self.dependents.remove(dep);
                }
            }
        }
        for dep in new {
            self.dependents.entry(*dep).or_default().insert(cell_ref);
        }
    }
}
