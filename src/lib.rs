//! Gene Expression Programming over Karva-encoded genomes.
//!
//! Organisms are fixed-length linear genomes that decode breadth-first into
//! expression trees. A [`Population`](engines::generation::Population) evolves
//! them toward the fitness objective of a [`Problem`](problems::Problem).

pub mod config;
pub mod engines;
pub mod error;
pub mod functions;
pub mod problems;
pub mod types;

pub use engines::evaluation::Gene;
pub use engines::generation::{Chromosome, Population};
pub use error::{EvalError, GepError, Result};
pub use problems::{Problem, SymbolTable};
pub use types::{Allele, Linked, Record, Subject};
