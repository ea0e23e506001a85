//! Symbolic regression of f(x) = 4x³ + 3x² + 2x + 1.

use super::{Problem, SymbolTable};
use crate::engines::generation::Chromosome;
use crate::error::Result;
use crate::types::{next_subject_id, Allele, Subject};
use rand::Rng;

pub const SAMPLE_SIZE: usize = 10;
pub const RANGE: (f64, f64) = (-10.0, 10.0);
/// Score for a perfect guess at one sample point
pub const REWARD: f64 = 1000.0;

/// One sample of the target function
#[derive(Debug, Clone)]
pub struct DataPoint {
    id: u64,
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    pub fn new(x: f64) -> Self {
        Self {
            id: next_subject_id(),
            x,
            y: target(x),
        }
    }
}

impl Subject for DataPoint {
    fn subject_id(&self) -> u64 {
        self.id
    }

    fn attribute(&self, name: &str) -> Option<f64> {
        match name {
            "x" => Some(self.x),
            _ => None,
        }
    }
}

/// The function being searched for, in Horner form
pub fn target(x: f64) -> f64 {
    ((4.0 * x + 3.0) * x + 2.0) * x + 1.0
}

pub struct Regression {
    symbols: SymbolTable,
    sample: Vec<DataPoint>,
}

impl Regression {
    /// Draws [`SAMPLE_SIZE`] points uniformly from [`RANGE`]
    pub fn new<R: Rng>(rng: &mut R) -> Result<Self> {
        let sample = (0..SAMPLE_SIZE)
            .map(|_| DataPoint::new(rng.gen_range(RANGE.0..RANGE.1)))
            .collect();
        Self::with_sample(sample)
    }

    pub fn with_sample(sample: Vec<DataPoint>) -> Result<Self> {
        let symbols = SymbolTable::from_names(
            &["multiply", "add", "subtract", "divide"],
            vec![
                Allele::Attribute("x"),
                Allele::Constant(1.0),
                Allele::Constant(2.0),
            ],
        )?;
        Ok(Self { symbols, sample })
    }

    pub fn sample(&self) -> &[DataPoint] {
        &self.sample
    }

    pub fn max_fitness(&self) -> f64 {
        REWARD * self.sample.len() as f64
    }
}

impl Problem for Regression {
    fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Accuracy over the sample. Points whose evaluation fails earn nothing.
    fn fitness(&self, chromosome: &Chromosome<Self>) -> Result<f64> {
        let mut total = 0.0;
        for point in &self.sample {
            let guess = match chromosome.evaluate(point) {
                Ok(linked) => linked.values().iter().sum::<f64>(),
                Err(_) => continue,
            };
            let error = ((point.y - guess) / point.y).abs().min(1.0);
            total += REWARD * (1.0 - error);
        }
        Ok(total)
    }

    fn solved(&self, chromosome: &Chromosome<Self>) -> Result<bool> {
        Ok(chromosome.fitness()? == self.max_fitness())
    }
}
