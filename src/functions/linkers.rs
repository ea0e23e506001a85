//! Linkers combine the per-gene results of a multigenic chromosome into the
//! value the chromosome evaluates to.

use crate::types::Linked;

pub type Linker = fn(&[f64]) -> Linked;

/// A single value for one gene, an ordered tuple otherwise
pub fn default_linker(values: &[f64]) -> Linked {
    match values {
        [single] => Linked::Single(*single),
        _ => Linked::Tuple(values.to_vec()),
    }
}

pub fn sum_linker(values: &[f64]) -> Linked {
    Linked::Single(values.iter().sum())
}

pub fn product_linker(values: &[f64]) -> Linked {
    Linked::Single(values.iter().product())
}

/// 1.0 if any gene result is non-zero
pub fn or_linker(values: &[f64]) -> Linked {
    Linked::Single(if values.iter().any(|v| *v != 0.0) { 1.0 } else { 0.0 })
}
