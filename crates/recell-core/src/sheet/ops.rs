use super::Sheet;
use crate::error::Result;
use recell_engine::engine::{
    Cell, CellRef, FormulaError, Grid, detect_cycle, evaluate_formula, format_path,
};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

impl Sheet {
    /// Set a cell from user input and recompute everything that depends on it.
    ///
    /// Formula failures (bad syntax, circular references) never surface here:
    /// they are recorded on the affected cells. The only error is a key outside
    /// the grid.
    pub fn edit_cell(&mut self, cell_ref: CellRef, input: &str) -> Result<&Grid> {
        self.ensure_in_bounds(&cell_ref)?;
        self.apply_edit(cell_ref, input);
        Ok(&self.grid)
    }

    /// Apply several edits in order, each with full propagation.
    ///
    /// All keys are validated before anything changes.
    pub fn edit_cells<S: AsRef<str>>(&mut self, edits: &[(CellRef, S)]) -> Result<&Grid> {
        for (cell_ref, _) in edits {
            self.ensure_in_bounds(cell_ref)?;
        }
        for (cell_ref, input) in edits {
            self.apply_edit(*cell_ref, input.as_ref());
        }
        Ok(&self.grid)
    }

    /// Reset a cell to the empty plain state.
    pub fn clear_cell(&mut self, cell_ref: CellRef) -> Result<&Grid> {
        self.edit_cell(cell_ref, "")
    }

    /// Recompute every cell in dependency order.
    pub fn recalculate_all(&mut self) {
        let all: BTreeSet<CellRef> = self.grid.keys().collect();
        let order = self.topological_order(&all);
        debug!(cells = order.len(), "recalculating sheet");
        for cell_ref in &order {
            self.recompute(cell_ref);
        }
    }

    fn apply_edit(&mut self, cell_ref: CellRef, input: &str) {
        debug!(cell = %cell_ref, input, "edit");
        self.assign(cell_ref, input);

        let order = self.recalc_order(&cell_ref);
        debug!(cell = %cell_ref, affected = order.len(), "propagating edit");
        for affected in &order {
            self.recompute(affected);
        }
    }

    /// Replace a cell's input without evaluating it, keeping the reverse map current.
    fn assign(&mut self, cell_ref: CellRef, input: &str) {
        let cell = Cell::from_input(input);
        let Some(slot) = self.grid.get_mut(&cell_ref) else {
            return;
        };
        let old_deps = std::mem::replace(slot, cell).depends_on;
        let new_deps = slot.depends_on.clone();
        self.relink_dependents(cell_ref, &old_deps, &new_deps);
    }

    /// Re-run classification and evaluation for one cell from its own raw input.
    pub(crate) fn recompute(&mut self, cell_ref: &CellRef) {
        let Some(cell) = self.grid.get(cell_ref) else {
            return;
        };
        let Some(formula) = cell.formula().map(str::to_owned) else {
            // Plain cells are final as soon as they are assigned.
            return;
        };
        let depends_on = cell.depends_on.clone();

        let result = match detect_cycle(cell_ref, &self.grid) {
            Some(path) => {
                warn!(cell = %cell_ref, path = %format_path(&path), "circular reference rejected");
                Err(FormulaError::CircularReference { path })
            }
            None => evaluate_formula(&self.engine, &formula, &depends_on, &self.grid),
        };
        if let Err(FormulaError::Parse(message)) = &result {
            debug!(cell = %cell_ref, %message, "formula failed");
        }

        if let Some(cell) = self.grid.get_mut(cell_ref) {
            cell.apply_result(result);
        }
    }

    /// The edited cell followed by its transitive dependents, in dependency order.
    fn recalc_order(&self, start: &CellRef) -> Vec<CellRef> {
        let mut affected = BTreeSet::new();
        let mut to_process = vec![*start];
        while let Some(cell_ref) = to_process.pop() {
            if !affected.insert(cell_ref) {
                continue;
            }
            to_process.extend(self.dependents_of(&cell_ref));
        }
        self.topological_order(&affected)
    }

    /// Order `cells` so every cell comes after the cells it references.
    ///
    /// Kahn's algorithm with ties broken by key. Cells on or downstream of a
    /// cycle can never be ordered; they go last, where cycle detection rejects them.
    /// `cells` must be closed under dependents.
    fn topological_order(&self, cells: &BTreeSet<CellRef>) -> Vec<CellRef> {
        let mut in_degree: HashMap<CellRef, usize> = HashMap::with_capacity(cells.len());
        for cell_ref in cells {
            let degree = self.grid.get(cell_ref).map_or(0, |cell| {
                cell.depends_on
                    .iter()
                    .filter(|dep| cells.contains(*dep))
                    .count()
            });
            in_degree.insert(*cell_ref, degree);
        }

        let mut ready: BTreeSet<CellRef> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(cell_ref, _)| *cell_ref)
            .collect();
        let mut order = Vec::with_capacity(cells.len());

        while let Some(cell_ref) = ready.pop_first() {
            order.push(cell_ref);
            for dependent in self.dependents_of(&cell_ref) {
                if let Some(degree) = in_degree.get_mut(&dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.insert(dependent);
                    }
                }
            }
        }

        if order.len() < cells.len() {
            let ordered: BTreeSet<CellRef> = order.iter().copied().collect();
            order.extend(cells.iter().filter(|c| !ordered.contains(*c)).copied());
        }
        order
    }
}
