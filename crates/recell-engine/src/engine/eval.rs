//! Rhai engine creation and formula evaluation.
//!
//! Creates the Rhai engine with the built-in math functions registered and
//! evaluates formula text against the current values of the cells it references.

use rhai::{Engine, Scope};

use super::{CellRef, Dynamic, FormulaError, Grid, preprocess_formula};

/// Upper bound on Rhai operations per formula.
const MAX_OPERATIONS: u64 = 1_000_000;

/// Create a Rhai engine with built-ins registered.
pub fn create_engine() -> Engine {
    let mut engine = Engine::new();
    engine.set_max_operations(MAX_OPERATIONS);
    engine.set_max_expr_depths(64, 32);
    crate::builtins::register_builtins(&mut engine);
    engine
}

/// Evaluate a formula (without its marker) to a number.
///
/// Every referenced key inside the grid is bound as a constant holding that
/// cell's numeric value; keys outside the grid stay unbound and fail evaluation.
pub fn evaluate_formula(
    engine: &Engine,
    formula: &str,
    depends_on: &[CellRef],
    grid: &Grid,
) -> Result<f64, FormulaError> {
    let mut scope = Scope::new();
    for dep in depends_on {
        if let Some(cell) = grid.get(dep) {
            scope.push_constant(dep.to_string(), cell.value.scope_value());
        }
    }

    let processed = preprocess_formula(formula);
    let value = engine
        .eval_expression_with_scope::<Dynamic>(&mut scope, &processed)
        .map_err(|e| FormulaError::Parse(e.to_string()))?;

    dynamic_to_number(&value).ok_or_else(|| {
        FormulaError::Parse(format!("Expected a number, got {}", value.type_name()))
    })
}

pub(crate) fn dynamic_to_number(value: &Dynamic) -> Option<f64> {
    if let Ok(n) = value.as_float() {
        return Some(n);
    }
    if let Ok(n) = value.as_int() {
        return Some(n as f64);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Cell, GridSize, extract_dependencies};

    fn grid_with(values: &[(&str, &str)]) -> Grid {
        let mut grid = Grid::new(GridSize::new(10, 10)).unwrap();
        for (key, input) in values {
            let cell_ref = CellRef::from_str(key).unwrap();
            *grid.get_mut(&cell_ref).unwrap() = Cell::from_input(input);
        }
        grid
    }

    fn eval(formula: &str, grid: &Grid) -> Result<f64, FormulaError> {
        let engine = create_engine();
        evaluate_formula(&engine, formula, &extract_dependencies(formula), grid)
    }

    #[test]
    fn test_arithmetic_with_references() {
        let grid = grid_with(&[("A1", "3"), ("B1", "4")]);
        assert_eq!(eval("A1+B1", &grid), Ok(7.0));
        assert_eq!(eval("(A1 + B1) * 2 - 1", &grid), Ok(13.0));
    }

    #[test]
    fn test_integer_division_is_not_truncated() {
        let grid = grid_with(&[]);
        assert_eq!(eval("7/2", &grid), Ok(3.5));
    }

    #[test]
    fn test_division_by_zero_is_infinite() {
        let grid = grid_with(&[]);
        assert_eq!(eval("1/0", &grid), Ok(f64::INFINITY));
    }

    #[test]
    fn test_power_operator() {
        let grid = grid_with(&[("A1", "3")]);
        assert_eq!(eval("A1^2", &grid), Ok(9.0));
    }

    #[test]
    fn test_math_functions() {
        let grid = grid_with(&[("A1", "16")]);
        assert_eq!(eval("sqrt(A1)", &grid), Ok(4.0));
        assert_eq!(eval("abs(-2.5)", &grid), Ok(2.5));
        assert_eq!(eval("floor(2.7)", &grid), Ok(2.0));
    }

    #[test]
    fn test_non_numeric_reference_counts_as_zero() {
        let grid = grid_with(&[("A1", "hello"), ("B1", "2")]);
        assert_eq!(eval("A1 + B1", &grid), Ok(2.0));
    }

    #[test]
    fn test_syntax_error() {
        let grid = grid_with(&[]);
        assert!(matches!(eval("1 +", &grid), Err(FormulaError::Parse(_))));
        assert!(matches!(eval("", &grid), Err(FormulaError::Parse(_))));
    }

    #[test]
    fn test_out_of_grid_reference_fails() {
        let grid = grid_with(&[]);
        assert!(matches!(eval("Z99 + 1", &grid), Err(FormulaError::Parse(_))));
    }

    #[test]
    fn test_non_numeric_result_fails() {
        let grid = grid_with(&[]);
        assert!(matches!(eval(r#""text""#, &grid), Err(FormulaError::Parse(_))));
        assert!(matches!(eval("1 < 2", &grid), Err(FormulaError::Parse(_))));
    }

    #[test]
    fn test_statements_are_rejected() {
        let grid = grid_with(&[("A1", "1")]);
        assert!(eval("let x = 1; x", &grid).is_err());
    }
}
