//! Problem definitions: the contract between a concrete search problem and
//! the evolutionary engine.
//!
//! A problem registers its function and terminal tables once through a
//! [`SymbolTable`] and supplies the fitness of an organism. The engine wraps
//! that fitness in a per-chromosome memo, so implementations never need to
//! cache anything themselves.

pub mod majority;
pub mod regression;

pub use majority::Majority;
pub use regression::Regression;

use crate::engines::evaluation::Gene;
use crate::engines::generation::Chromosome;
use crate::error::{GepError, Result};
use crate::functions::{FunctionRegistry, Operator};
use crate::types::Allele;
use rand::Rng;

/// Defines a GEP search problem.
///
/// # Implementing
///
/// ```
/// use karva::engines::generation::Chromosome;
/// use karva::error::Result;
/// use karva::functions::arithmetic::{ADD, MULTIPLY};
/// use karva::problems::{Problem, SymbolTable};
/// use karva::types::{Allele, Record};
///
/// struct Square {
///     symbols: SymbolTable,
///     sample: Record,
/// }
///
/// impl Problem for Square {
///     fn symbols(&self) -> &SymbolTable {
///         &self.symbols
///     }
///
///     fn fitness(&self, chromosome: &Chromosome<Self>) -> Result<f64> {
///         let target = 16.0;
///         Ok(match chromosome.evaluate(&self.sample).ok().and_then(|r| r.scalar()) {
///             Some(guess) => 1.0 / (1.0 + (guess - target).abs()),
///             None => 0.0,
///         })
///     }
/// }
///
/// let symbols = SymbolTable::new(vec![&ADD, &MULTIPLY], vec![Allele::Attribute("x")]).unwrap();
/// let square = Square { symbols, sample: Record::new().with("x", 4.0) };
/// # let _ = square;
/// ```
pub trait Problem: Sized {
    fn symbols(&self) -> &SymbolTable;

    /// Scores an organism; higher is better, non-viable organisms should
    /// score 0. Mandatory: the default implementation fails.
    fn fitness(&self, _chromosome: &Chromosome<Self>) -> Result<f64> {
        Err(GepError::Unimplemented(
            "fitness must be supplied by the problem definition".to_string(),
        ))
    }

    /// Whether the organism optimally solves the problem
    fn solved(&self, _chromosome: &Chromosome<Self>) -> Result<bool> {
        Ok(false)
    }
}

/// The function and terminal symbols a problem's genes are drawn from
#[derive(Debug, Clone)]
pub struct SymbolTable {
    functions: Vec<&'static Operator>,
    terminals: Vec<Allele>,
    /// Functions followed by terminals; the alphabet of the head
    symbols: Vec<Allele>,
    max_arity: usize,
}

impl SymbolTable {
    pub fn new(functions: Vec<&'static Operator>, terminals: Vec<Allele>) -> Result<Self> {
        if terminals.is_empty() {
            return Err(GepError::InvalidConfiguration(
                "at least one terminal symbol is required".to_string(),
            ));
        }
        if let Some(function) = terminals.iter().find(|t| t.is_function()) {
            return Err(GepError::InvalidConfiguration(format!(
                "function {} registered as a terminal",
                function
            )));
        }

        let max_arity = functions.iter().map(|f| f.arity).max().unwrap_or(0);
        let symbols = functions
            .iter()
            .map(|f| Allele::Function(*f))
            .chain(terminals.iter().copied())
            .collect();

        Ok(Self {
            functions,
            terminals,
            symbols,
            max_arity,
        })
    }

    /// Resolves the function names through the stock [`FunctionRegistry`]
    pub fn from_names(names: &[&str], terminals: Vec<Allele>) -> Result<Self> {
        let functions = FunctionRegistry::new().get_many(names).map_err(|name| {
            GepError::InvalidConfiguration(format!("unknown function '{}'", name))
        })?;
        Self::new(functions, terminals)
    }

    pub fn functions(&self) -> &[&'static Operator] {
        &self.functions
    }

    pub fn terminals(&self) -> &[Allele] {
        &self.terminals
    }

    pub fn symbols(&self) -> &[Allele] {
        &self.symbols
    }

    pub fn max_arity(&self) -> usize {
        self.max_arity
    }

    /// Tail length that closes any head of the given length
    pub fn tail_length(&self, head: usize) -> usize {
        head * self.max_arity.saturating_sub(1) + 1
    }

    pub fn gene_length(&self, head: usize) -> usize {
        head + self.tail_length(head)
    }

    /// Any symbol, as allowed in the head
    pub fn random_symbol<R: Rng>(&self, rng: &mut R) -> Allele {
        self.symbols[rng.gen_range(0..self.symbols.len())]
    }

    /// A terminal, as required in the tail
    pub fn random_terminal<R: Rng>(&self, rng: &mut R) -> Allele {
        self.terminals[rng.gen_range(0..self.terminals.len())]
    }

    pub fn random_gene<R: Rng>(&self, head: usize, rng: &mut R) -> Result<Gene> {
        let mut alleles: Vec<Allele> = (0..head).map(|_| self.random_symbol(rng)).collect();
        alleles.extend((0..self.tail_length(head)).map(|_| self.random_terminal(rng)));
        Gene::new(alleles, head)
    }
}
