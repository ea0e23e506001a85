//! Powers, roots and trigonometry.

use super::operator::Operator;
use crate::error::EvalError;

pub static POWER: Operator = Operator::new("power", "^", 2, power);
pub static ROOT: Operator = Operator::new("root", "Q", 1, root);
pub static SIN: Operator = Operator::new("sin", "S", 1, sin);
pub static COS: Operator = Operator::new("cos", "C", 1, cos);
pub static TAN: Operator = Operator::new("tan", "T", 1, tan);

pub static MATH_ALL: [&Operator; 5] = [&POWER, &ROOT, &SIN, &COS, &TAN];

fn power(args: &[f64]) -> Result<f64, EvalError> {
    let result = args[0].powf(args[1]);
    if result.is_nan() {
        return Err(EvalError::Domain {
            operator: "power",
            value: args[0],
        });
    }
    Ok(result)
}

fn root(args: &[f64]) -> Result<f64, EvalError> {
    if args[0] < 0.0 {
        return Err(EvalError::Domain {
            operator: "root",
            value: args[0],
        });
    }
    Ok(args[0].sqrt())
}

fn sin(args: &[f64]) -> Result<f64, EvalError> {
    Ok(args[0].sin())
}

fn cos(args: &[f64]) -> Result<f64, EvalError> {
    Ok(args[0].cos())
}

fn tan(args: &[f64]) -> Result<f64, EvalError> {
    Ok(args[0].tan())
}
