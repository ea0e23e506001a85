use crate::engines::evaluation::Gene;
use crate::error::{EvalError, GepError, Result};
use crate::functions::Linker;
use crate::problems::Problem;
use crate::types::{Allele, Linked, Subject};
use rand::Rng;
use std::cell::OnceCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A multigenic GEP organism.
///
/// Chromosomes are immutable: every variation operator returns either a new
/// child or the very same instance when nothing changed. Genes are shared by
/// reference with ancestors wherever an operator leaves them untouched.
///
/// Fitness and solved status are computed at most once per instance.
pub struct Chromosome<P: Problem> {
    id: u64,
    genes: Vec<Rc<Gene>>,
    head: usize,
    linker: Linker,
    problem: Rc<P>,
    fitness: OnceCell<f64>,
    solved: OnceCell<bool>,
}

impl<P: Problem> Chromosome<P> {
    /// Assembles a chromosome and assigns it the next organism id.
    ///
    /// All genes must share the chromosome's head length and a common length.
    pub fn new(problem: Rc<P>, genes: Vec<Rc<Gene>>, head: usize, linker: Linker) -> Result<Self> {
        let first = genes.first().ok_or_else(|| {
            GepError::InvalidConfiguration("a chromosome needs at least 1 gene".to_string())
        })?;
        let gene_length = first.len();

        for gene in &genes {
            if gene.head() != head {
                return Err(GepError::InvalidConfiguration(format!(
                    "gene head {} does not match chromosome head {}",
                    gene.head(),
                    head
                )));
            }
            if gene.len() != gene_length {
                return Err(GepError::InvalidConfiguration(format!(
                    "genes of unequal length ({} and {})",
                    gene_length,
                    gene.len()
                )));
            }
        }

        Ok(Self {
            id: NEXT_ID.fetch_add(1, AtomicOrdering::Relaxed),
            genes,
            head,
            linker,
            problem,
            fitness: OnceCell::new(),
            solved: OnceCell::new(),
        })
    }

    /// Generates one random chromosome. Every call is an independent draw, so
    /// repeated calls form an unbounded stream of organisms.
    pub fn random<R: Rng>(
        problem: Rc<P>,
        head: usize,
        gene_count: usize,
        linker: Linker,
        rng: &mut R,
    ) -> Result<Self> {
        let genes = (0..gene_count)
            .map(|_| problem.symbols().random_gene(head, rng).map(Rc::new))
            .collect::<Result<Vec<_>>>()?;
        Self::new(problem, genes, head, linker)
    }

    /// Unique, monotonically increasing organism number
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn genes(&self) -> &[Rc<Gene>] {
        &self.genes
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn linker(&self) -> Linker {
        self.linker
    }

    pub fn problem(&self) -> &Rc<P> {
        &self.problem
    }

    /// Total number of alleles over all genes
    pub fn len(&self) -> usize {
        self.genes.iter().map(|g| g.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Alleles of every gene, in order
    pub fn alleles(&self) -> impl Iterator<Item = Allele> + '_ {
        self.genes.iter().flat_map(|g| g.alleles().iter().copied())
    }

    /// Allele at a position of the flattened genome
    pub fn allele(&self, index: usize) -> Option<Allele> {
        let gene_length = self.genes[0].len();
        self.genes
            .get(index / gene_length)
            .and_then(|g| g.get(index % gene_length))
    }

    /// Evaluates every gene against `subject` and links the results.
    /// Semantic errors from the operators are passed through unchanged.
    pub fn evaluate<S: Subject + ?Sized>(
        &self,
        subject: &S,
    ) -> std::result::Result<Linked, EvalError> {
        let values = self
            .genes
            .iter()
            .map(|g| g.evaluate(subject))
            .collect::<std::result::Result<Vec<f64>, EvalError>>()?;
        Ok((self.linker)(&values))
    }

    pub fn fitness(&self) -> Result<f64> {
        if let Some(fitness) = self.fitness.get() {
            return Ok(*fitness);
        }
        let fitness = self.problem.fitness(self)?;
        Ok(*self.fitness.get_or_init(|| fitness))
    }

    pub fn solved(&self) -> Result<bool> {
        if let Some(solved) = self.solved.get() {
            return Ok(*solved);
        }
        let solved = self.problem.solved(self)?;
        Ok(*self.solved.get_or_init(|| solved))
    }

    /// Orders two organisms by fitness. An organism always equals itself,
    /// without its fitness being computed.
    pub fn compare(&self, other: &Self) -> Result<Ordering> {
        if std::ptr::eq(self, other) {
            return Ok(Ordering::Equal);
        }
        Ok(self.fitness()?.total_cmp(&other.fitness()?))
    }

    /// A child with the given genes, or this instance if every gene is the
    /// very same one it already holds
    pub(crate) fn child(self: &Rc<Self>, genes: Vec<Rc<Gene>>) -> Result<Rc<Self>> {
        let unchanged = genes.len() == self.genes.len()
            && genes.iter().zip(&self.genes).all(|(a, b)| Rc::ptr_eq(a, b));
        if unchanged {
            return Ok(Rc::clone(self));
        }
        Ok(Rc::new(Self::new(
            Rc::clone(&self.problem),
            genes,
            self.head,
            self.linker,
        )?))
    }
}

impl<P: Problem> fmt::Display for Chromosome<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for gene in &self.genes {
            write!(f, "{}", gene)?;
        }
        Ok(())
    }
}

impl<P: Problem> fmt::Debug for Chromosome<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chromosome")
            .field("id", &self.id)
            .field("genome", &self.to_string())
            .field("head", &self.head)
            .field("fitness", &self.fitness.get())
            .finish()
    }
}
