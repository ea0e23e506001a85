//! Arithmetic function symbols.
//!
//! Semantic failures (division by zero) are returned as [`EvalError`]s and
//! passed up to the fitness code untouched.

use super::operator::Operator;
use crate::error::EvalError;

pub static ADD: Operator = Operator::new("add", "+", 2, add);
pub static SUBTRACT: Operator = Operator::new("subtract", "-", 2, subtract);
pub static MULTIPLY: Operator = Operator::new("multiply", "*", 2, multiply);
pub static DIVIDE: Operator = Operator::new("divide", "/", 2, divide);
pub static MODULUS: Operator = Operator::new("modulus", "%", 2, modulus);

pub static ARITHMETIC_ALL: [&Operator; 5] = [&ADD, &SUBTRACT, &MULTIPLY, &DIVIDE, &MODULUS];

fn add(args: &[f64]) -> Result<f64, EvalError> {
    Ok(args[0] + args[1])
}

fn subtract(args: &[f64]) -> Result<f64, EvalError> {
    Ok(args[0] - args[1])
}

fn multiply(args: &[f64]) -> Result<f64, EvalError> {
    Ok(args[0] * args[1])
}

fn divide(args: &[f64]) -> Result<f64, EvalError> {
    if args[1] == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(args[0] / args[1])
}

/// Floored modulus, so the result takes the sign of the divisor
fn modulus(args: &[f64]) -> Result<f64, EvalError> {
    if args[1] == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(args[0] - args[1] * (args[0] / args[1]).floor())
}
