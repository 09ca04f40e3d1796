//! Built-in formula functions (Rust) registered on top of Rhai's math package.
//!
//! Rhai already provides `sqrt`, `abs`, `floor`, `ceiling`, `round`, `sin`,
//! `cos`, `tan`, `exp`, `ln`, `log`, `PI()`, `E()` and friends. These add the
//! aggregates and two-argument helpers common in calculator-style formulas.
//! Aggregates take an array, which is what a range like `A1:A3` expands to.

use rhai::{Array, Engine, EvalAltResult, Position};

use crate::engine::dynamic_to_number;

fn invalid_arg(message: &str) -> Box<EvalAltResult> {
    EvalAltResult::ErrorRuntime(message.into(), Position::NONE).into()
}

fn to_numbers(values: &Array) -> Result<Vec<f64>, Box<EvalAltResult>> {
    values
        .iter()
        .map(|v| {
            dynamic_to_number(v)
                .ok_or_else(|| invalid_arg(&format!("expected a number, got {}", v.type_name())))
        })
        .collect()
}

fn non_empty(values: &Array, name: &str) -> Result<Vec<f64>, Box<EvalAltResult>> {
    let numbers = to_numbers(values)?;
    if numbers.is_empty() {
        return Err(invalid_arg(&format!("{} of an empty list", name)));
    }
    Ok(numbers)
}

pub fn register_builtins(engine: &mut Engine) {
    engine.register_fn("pow", |x: f64, y: f64| x.powf(y));
    engine.register_fn("cbrt", |x: f64| x.cbrt());
    engine.register_fn("hypot", |x: f64, y: f64| x.hypot(y));

    engine.register_fn("min", |x: f64, y: f64| x.min(y));
    engine.register_fn("max", |x: f64, y: f64| x.max(y));

    engine.register_fn("sum", |values: Array| -> Result<f64, Box<EvalAltResult>> {
        Ok(to_numbers(&values)?.iter().sum())
    });
    engine.register_fn("mean", |values: Array| -> Result<f64, Box<EvalAltResult>> {
        let numbers = non_empty(&values, "mean")?;
        Ok(numbers.iter().sum::<f64>() / numbers.len() as f64)
    });
    engine.register_fn("min", |values: Array| -> Result<f64, Box<EvalAltResult>> {
        Ok(non_empty(&values, "min")?
            .into_iter()
            .fold(f64::INFINITY, f64::min))
    });
    engine.register_fn("max", |values: Array| -> Result<f64, Box<EvalAltResult>> {
        Ok(non_empty(&values, "max")?
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max))
    });
}

#[cfg(test)]
mod tests {
    use crate::engine::{Cell, CellRef, Grid, GridSize, create_engine, evaluate_formula};
    use crate::engine::{FormulaError, extract_dependencies};

    fn eval(formula: &str) -> Result<f64, FormulaError> {
        let mut grid = Grid::new(GridSize::new(3, 3)).unwrap();
        for (key, input) in [("A1", "1"), ("A2", "2"), ("A3", "6"), ("B1", "x")] {
            *grid.get_mut(&CellRef::from_str(key).unwrap()).unwrap() = Cell::from_input(input);
        }
        let engine = create_engine();
        evaluate_formula(&engine, formula, &extract_dependencies(formula), &grid)
    }

    #[test]
    fn test_sum_over_range() {
        assert_eq!(eval("sum(A1:A3)"), Ok(9.0));
    }

    #[test]
    fn test_mean_over_range() {
        assert_eq!(eval("mean(A1:A3)"), Ok(3.0));
    }

    #[test]
    fn test_min_max_array_and_pair() {
        assert_eq!(eval("min(A1:A3)"), Ok(1.0));
        assert_eq!(eval("max(A1:A3)"), Ok(6.0));
        assert_eq!(eval("max(A1, A3)"), Ok(6.0));
        assert_eq!(eval("min(2, 5)"), Ok(2.0));
    }

    #[test]
    fn test_range_with_text_cell_counts_zero() {
        assert_eq!(eval("sum(A1:B1)"), Ok(1.0));
    }

    #[test]
    fn test_pow_and_hypot() {
        assert_eq!(eval("pow(2, 10)"), Ok(1024.0));
        assert_eq!(eval("hypot(3, 4)"), Ok(5.0));
    }

    #[test]
    fn test_mean_of_empty_list_fails() {
        assert!(matches!(eval("mean([])"), Err(FormulaError::Parse(_))));
    }
}
