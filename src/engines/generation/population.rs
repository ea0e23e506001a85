use super::chromosome::Chromosome;
use super::progress::{NoProgress, ProgressCallback};
use super::selection::sigma_scaled_roulette;
use super::stats::{fitness_stats, FitnessStats};
use crate::config::{ConfigSection, EvolutionConfig};
use crate::error::{GepError, Result};
use crate::functions::Linker;
use crate::problems::Problem;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::ops::Index;
use std::rc::Rc;

/// A fixed-size generation of organisms for one problem.
///
/// Each [`cycle`](Population::cycle) replaces every individual except the
/// elite with a selected and varied offspring. The two generation buffers are
/// exchanged at the boundary, never copied.
pub struct Population<P: Problem> {
    /// Operator rates; may be retuned between cycles
    pub config: EvolutionConfig,
    problem: Rc<P>,
    head: usize,
    gene_count: usize,
    linker: Linker,
    current: Vec<Rc<Chromosome<P>>>,
    next: Vec<Rc<Chromosome<P>>>,
    fitness: Vec<f64>,
    stats: FitnessStats,
    age: usize,
    rng: StdRng,
}

#[derive(Debug, Clone, Copy)]
enum Crossover {
    OnePoint,
    TwoPoint,
    Gene,
}

impl<P: Problem> Population<P> {
    pub fn new(
        problem: P,
        size: usize,
        head: usize,
        gene_count: usize,
        linker: Linker,
    ) -> Result<Self> {
        Self::with_config(problem, size, head, gene_count, linker, EvolutionConfig::default())
    }

    pub fn with_config(
        problem: P,
        size: usize,
        head: usize,
        gene_count: usize,
        linker: Linker,
        config: EvolutionConfig,
    ) -> Result<Self> {
        if size < 1 {
            return Err(GepError::InvalidConfiguration(
                "population size must be at least 1".to_string(),
            ));
        }
        config.validate()?;

        let problem = Rc::new(problem);
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let current = (0..size)
            .map(|_| {
                Chromosome::random(Rc::clone(&problem), head, gene_count, linker, &mut rng)
                    .map(Rc::new)
            })
            .collect::<Result<Vec<_>>>()?;
        let fitness = evaluate(&current)?;
        let stats = fitness_stats(&fitness);

        log::debug!(
            "Population of {} created: head {}, {} gene(s), {:?}",
            size,
            head,
            gene_count,
            config
        );

        Ok(Self {
            config,
            problem,
            head,
            gene_count,
            linker,
            next: Vec::with_capacity(size),
            current,
            fitness,
            stats,
            age: 0,
            rng,
        })
    }

    pub fn problem(&self) -> &Rc<P> {
        &self.problem
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn gene_count(&self) -> usize {
        self.gene_count
    }

    pub fn linker(&self) -> Linker {
        self.linker
    }

    /// Number of completed cycles
    pub fn age(&self) -> usize {
        self.age
    }

    pub fn mean(&self) -> f64 {
        self.stats.mean
    }

    pub fn stdev(&self) -> f64 {
        self.stats.stdev
    }

    /// Fitness of each individual, in population order
    pub fn fitness(&self) -> &[f64] {
        &self.fitness
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Rc<Chromosome<P>>> {
        self.current.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rc<Chromosome<P>>> {
        self.current.iter()
    }

    /// The fittest organism; ties go to the later individual
    pub fn best(&self) -> &Rc<Chromosome<P>> {
        &self.current[self.best_index()]
    }

    fn best_index(&self) -> usize {
        let mut best = 0;
        for (i, fitness) in self.fitness.iter().enumerate().skip(1) {
            if fitness.total_cmp(&self.fitness[best]).is_ge() {
                best = i;
            }
        }
        best
    }

    /// Per-locus mutation rate in effect
    pub fn mutation_rate(&self) -> f64 {
        let genome_length = self.current.first().map_or(0, |c| c.len());
        self.config.mutation_rate_for(genome_length)
    }

    /// Advances the population by one generation
    pub fn cycle(&mut self) -> Result<()> {
        self.config.validate()?;
        let size = self.current.len();
        let mutation_rate = self.mutation_rate();
        let best = self.best_index();

        self.next.clear();
        self.next.push(Rc::clone(&self.current[best]));

        if self.stats.mean > 0.0 {
            log::trace!("Selecting by sigma-scaled roulette, mean {}", self.stats.mean);
            let picks = sigma_scaled_roulette(
                &self.fitness,
                self.stats.mean,
                self.config.exclusion_level,
                size - 1,
                &mut self.rng,
            );
            self.next
                .extend(picks.into_iter().map(|i| Rc::clone(&self.current[i])));
        } else {
            log::trace!("No viable organisms, selecting uniformly");
            for _ in 1..size {
                let pick = self.rng.gen_range(0..size);
                self.next.push(Rc::clone(&self.current[pick]));
            }
        }

        let config = &self.config;
        let rng = &mut self.rng;
        for slot in self.next.iter_mut().skip(1) {
            let mut organism = slot.mutate(mutation_rate, rng)?;
            if chance(rng, config.inversion_rate) {
                organism = organism.invert(rng)?;
            }
            if chance(rng, config.is_transposition_rate) {
                let length = pick_length(&config.is_transposition_lengths, rng);
                organism = organism.transpose_is(length, rng)?;
            }
            if chance(rng, config.ris_transposition_rate) {
                let length = pick_length(&config.ris_transposition_lengths, rng);
                organism = organism.transpose_ris(length, rng)?;
            }
            if chance(rng, config.gene_transposition_rate) {
                organism = organism.transpose_gene(rng)?;
            }
            *slot = organism;
        }

        for (kind, rate) in [
            (Crossover::OnePoint, config.crossover_one_point_rate),
            (Crossover::TwoPoint, config.crossover_two_point_rate),
            (Crossover::Gene, config.crossover_gene_rate),
        ] {
            let mut chosen: Vec<usize> = (1..size).filter(|_| chance(rng, rate)).collect();
            chosen.shuffle(rng);
            for pair in chosen.chunks_exact(2) {
                let (a, b) = (&self.next[pair[0]], &self.next[pair[1]]);
                let (x, y) = match kind {
                    Crossover::OnePoint => a.crossover_one_point(b, rng)?,
                    Crossover::TwoPoint => a.crossover_two_point(b, rng)?,
                    Crossover::Gene => a.crossover_gene(b, rng)?,
                };
                self.next[pair[0]] = x;
                self.next[pair[1]] = y;
            }
        }

        let fitness = evaluate(&self.next)?;
        std::mem::swap(&mut self.current, &mut self.next);
        self.fitness = fitness;
        self.stats = fitness_stats(&self.fitness);
        self.age += 1;

        let best = self.best();
        log::debug!(
            "Generation {}: best #{} ({:.4}), mean {:.4}, stdev {:.4}",
            self.age,
            best.id(),
            self.fitness[self.best_index()],
            self.stats.mean,
            self.stats.stdev
        );
        Ok(())
    }

    /// Cycles until the best organism solves the problem, at most
    /// `generations` times. Returns whether a solution was found.
    pub fn solve(&mut self, generations: usize) -> Result<bool> {
        self.solve_with(generations, &mut NoProgress)
    }

    pub fn solve_with<C: ProgressCallback + ?Sized>(
        &mut self,
        generations: usize,
        callback: &mut C,
    ) -> Result<bool> {
        for _ in 0..generations {
            if self.best().solved()? {
                break;
            }
            callback.on_generation_start(self.age);
            self.cycle()?;
            callback.on_generation_complete(
                self.age,
                self.fitness[self.best_index()],
                self.stats.mean,
            );
        }

        let best = self.best();
        if best.solved()? {
            log::info!("Solved at generation {} by #{}: {}", self.age, best.id(), best);
            Ok(true)
        } else {
            log::warn!("No solution within {} generations", generations);
            Ok(false)
        }
    }

    /// One-line summary of the current generation
    pub fn header(&self) -> String {
        let best = self.best_index();
        format!(
            "[Generation: {} | Best: #{} ({}) | Mean: {}]",
            self.age,
            self.current[best].id(),
            self.fitness[best],
            self.stats.mean
        )
    }
}

fn evaluate<P: Problem>(organisms: &[Rc<Chromosome<P>>]) -> Result<Vec<f64>> {
    organisms.iter().map(|c| c.fitness()).collect()
}

fn chance<R: Rng>(rng: &mut R, rate: f64) -> bool {
    rng.gen::<f64>() < rate
}

fn pick_length<R: Rng>(lengths: &[usize], rng: &mut R) -> usize {
    lengths.choose(rng).copied().unwrap_or(1)
}

impl<P: Problem> Index<usize> for Population<P> {
    type Output = Rc<Chromosome<P>>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.current[index]
    }
}

impl<'a, P: Problem> IntoIterator for &'a Population<P> {
    type Item = &'a Rc<Chromosome<P>>;
    type IntoIter = std::slice::Iter<'a, Rc<Chromosome<P>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<P: Problem> fmt::Display for Population<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header())?;

        let genome_length = self.current[0].len();
        let id_width = self
            .current
            .iter()
            .map(|c| c.id().to_string().len())
            .max()
            .unwrap_or(1);

        let ruler: String = (0..genome_length)
            .map(|i| char::from(b'0' + (i % 10) as u8))
            .collect();
        writeln!(f, "{}", ruler)?;
        writeln!(f, "{}", "-".repeat(genome_length))?;

        for (organism, fitness) in self.current.iter().zip(&self.fitness) {
            writeln!(
                f,
                "{} [{:>width$}]: {}",
                organism,
                organism.id(),
                fitness,
                width = id_width
            )?;
        }
        Ok(())
    }
}
