//! The three-input boolean majority function.

use super::{Problem, SymbolTable};
use crate::engines::generation::Chromosome;
use crate::error::Result;
use crate::types::{next_subject_id, Allele, Subject};

/// One row of the truth table
#[derive(Debug, Clone)]
pub struct Case {
    id: u64,
    pub inputs: [bool; 3],
    pub majority: bool,
}

impl Case {
    pub fn new(a: bool, b: bool, c: bool) -> Self {
        Self {
            id: next_subject_id(),
            inputs: [a, b, c],
            majority: (a && b) || (a && c) || (b && c),
        }
    }
}

impl Subject for Case {
    fn subject_id(&self) -> u64 {
        self.id
    }

    fn attribute(&self, name: &str) -> Option<f64> {
        let index = match name {
            "a" => 0,
            "b" => 1,
            "c" => 2,
            _ => return None,
        };
        Some(if self.inputs[index] { 1.0 } else { 0.0 })
    }
}

pub struct Majority {
    symbols: SymbolTable,
    cases: Vec<Case>,
}

impl Majority {
    pub fn new() -> Result<Self> {
        let symbols = SymbolTable::from_names(
            &["and", "or", "not"],
            vec![
                Allele::Attribute("a"),
                Allele::Attribute("b"),
                Allele::Attribute("c"),
            ],
        )?;

        let mut cases = Vec::with_capacity(8);
        for a in [false, true] {
            for b in [false, true] {
                for c in [false, true] {
                    cases.push(Case::new(a, b, c));
                }
            }
        }
        Ok(Self { symbols, cases })
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }
}

impl Problem for Majority {
    fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Number of truth table rows answered correctly
    fn fitness(&self, chromosome: &Chromosome<Self>) -> Result<f64> {
        let hits = self
            .cases
            .iter()
            .filter(|case| match chromosome.evaluate(*case) {
                Ok(linked) => linked.values().iter().any(|v| *v != 0.0) == case.majority,
                Err(_) => false,
            })
            .count();
        Ok(hits as f64)
    }

    fn solved(&self, chromosome: &Chromosome<Self>) -> Result<bool> {
        Ok(chromosome.fitness()? >= self.cases.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truth_table() {
        let problem = Majority::new().unwrap();
        assert_eq!(problem.cases().len(), 8);
        let majorities = problem.cases().iter().filter(|c| c.majority).count();
        assert_eq!(majorities, 4);
    }

    #[test]
    fn test_case_attributes() {
        let case = Case::new(true, false, true);
        assert_eq!(case.attribute("a"), Some(1.0));
        assert_eq!(case.attribute("b"), Some(0.0));
        assert_eq!(case.attribute("d"), None);
        assert!(case.majority);
    }
}
