//! Boolean function symbols over numeric truth values: any non-zero input is
//! true, outputs are 1.0 or 0.0.

use super::operator::{truth, Operator};
use crate::error::EvalError;

pub static AND: Operator = Operator::new("and", "&", 2, and);
pub static OR: Operator = Operator::new("or", "|", 2, or);
pub static NOT: Operator = Operator::new("not", "~", 1, not);
pub static IF: Operator = Operator::new("if", "I", 3, if_then_else);
pub static NAND: Operator = Operator::new("nand", "N", 2, nand);
pub static NOR: Operator = Operator::new("nor", "R", 2, nor);
pub static XOR: Operator = Operator::new("xor", "X", 2, xor);

pub static LOGIC_ALL: [&Operator; 7] = [&AND, &OR, &NOT, &IF, &NAND, &NOR, &XOR];

fn is_true(value: f64) -> bool {
    value != 0.0
}

fn and(args: &[f64]) -> Result<f64, EvalError> {
    Ok(truth(is_true(args[0]) && is_true(args[1])))
}

fn or(args: &[f64]) -> Result<f64, EvalError> {
    Ok(truth(is_true(args[0]) || is_true(args[1])))
}

fn not(args: &[f64]) -> Result<f64, EvalError> {
    Ok(truth(!is_true(args[0])))
}

/// Returns the second argument when the first is true, the third otherwise
fn if_then_else(args: &[f64]) -> Result<f64, EvalError> {
    Ok(if is_true(args[0]) { args[1] } else { args[2] })
}

fn nand(args: &[f64]) -> Result<f64, EvalError> {
    Ok(truth(!(is_true(args[0]) && is_true(args[1]))))
}

fn nor(args: &[f64]) -> Result<f64, EvalError> {
    Ok(truth(!(is_true(args[0]) || is_true(args[1]))))
}

fn xor(args: &[f64]) -> Result<f64, EvalError> {
    Ok(truth(is_true(args[0]) != is_true(args[1])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truth_tables() {
        for a in [0.0, 1.0] {
            for b in [0.0, 1.0] {
                let (x, y) = (a != 0.0, b != 0.0);
                assert_eq!(AND.apply(&[a, b]), Ok(truth(x && y)));
                assert_eq!(OR.apply(&[a, b]), Ok(truth(x || y)));
                assert_eq!(NAND.apply(&[a, b]), Ok(truth(!(x && y))));
                assert_eq!(NOR.apply(&[a, b]), Ok(truth(!(x || y))));
                assert_eq!(XOR.apply(&[a, b]), Ok(truth(x ^ y)));
            }
        }
        assert_eq!(NOT.apply(&[0.0]), Ok(1.0));
        assert_eq!(NOT.apply(&[3.0]), Ok(0.0));
    }

    #[test]
    fn test_if() {
        assert_eq!(IF.apply(&[1.0, 2.0, 3.0]), Ok(2.0));
        assert_eq!(IF.apply(&[0.0, 2.0, 3.0]), Ok(3.0));
    }
}
