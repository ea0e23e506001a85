use crate::error::EvalError;
use std::fmt;

/// Signature shared by every function symbol. The slice always holds exactly
/// `arity` arguments, in tree order.
pub type Evaluator = fn(&[f64]) -> Result<f64, EvalError>;

/// Registration descriptor for a function symbol.
///
/// Operators are declared as `static` items and referenced from alleles as
/// `&'static Operator`. Two descriptors are equal when name, glyph and arity
/// agree; the evaluator is not compared.
#[derive(Clone, Copy)]
pub struct Operator {
    /// Display name
    pub name: &'static str,
    /// Symbol used when rendering a genome
    pub glyph: &'static str,
    /// Fixed number of arguments
    pub arity: usize,
    pub evaluator: Evaluator,
}

impl Operator {
    pub const fn new(
        name: &'static str,
        glyph: &'static str,
        arity: usize,
        evaluator: Evaluator,
    ) -> Self {
        Self {
            name,
            glyph,
            arity,
            evaluator,
        }
    }

    pub fn apply(&self, args: &[f64]) -> Result<f64, EvalError> {
        debug_assert_eq!(args.len(), self.arity, "arity mismatch for {}", self.name);
        (self.evaluator)(args)
    }
}

impl PartialEq for Operator {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.glyph == other.glyph && self.arity == other.arity
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("name", &self.name)
            .field("glyph", &self.glyph)
            .field("arity", &self.arity)
            .finish()
    }
}

/// Maps a boolean onto the numeric truth values used by logic operators
pub(crate) fn truth(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}
