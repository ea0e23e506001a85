//! Comparison function symbols. Results are 1.0 for true, 0.0 for false.

use super::operator::{truth, Operator};
use crate::error::EvalError;

pub static EQUAL: Operator = Operator::new("equal", "=", 2, equal);
pub static UNEQUAL: Operator = Operator::new("unequal", "!", 2, unequal);
pub static LESS: Operator = Operator::new("less", "<", 2, less);
pub static GREATER: Operator = Operator::new("greater", ">", 2, greater);
pub static LESS_OR_EQUAL: Operator = Operator::new("less_or_equal", "<=", 2, less_or_equal);
pub static GREATER_OR_EQUAL: Operator =
    Operator::new("greater_or_equal", ">=", 2, greater_or_equal);

pub static COMPARISON_ALL: [&Operator; 6] = [
    &EQUAL,
    &UNEQUAL,
    &LESS,
    &GREATER,
    &LESS_OR_EQUAL,
    &GREATER_OR_EQUAL,
];

fn equal(args: &[f64]) -> Result<f64, EvalError> {
    Ok(truth(args[0] == args[1]))
}

fn unequal(args: &[f64]) -> Result<f64, EvalError> {
    Ok(truth(args[0] != args[1]))
}

fn less(args: &[f64]) -> Result<f64, EvalError> {
    Ok(truth(args[0] < args[1]))
}

fn greater(args: &[f64]) -> Result<f64, EvalError> {
    Ok(truth(args[0] > args[1]))
}

fn less_or_equal(args: &[f64]) -> Result<f64, EvalError> {
    Ok(truth(args[0] <= args[1]))
}

fn greater_or_equal(args: &[f64]) -> Result<f64, EvalError> {
    Ok(truth(args[0] >= args[1]))
}
