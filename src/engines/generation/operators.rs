//! Variation operators over chromosomes.
//!
//! Every operator leaves its inputs untouched and returns the input itself
//! when it makes no net change, so unchanged organisms keep their id and
//! cached fitness. Changes to a gene always go through [`Gene::derive`], which
//! lets edits confined to inert DNA keep the gene's evaluation cache.
//!
//! Crossover operators never introduce novel alleles: every allele of a child
//! comes from one of the two parents at the same position.

use super::chromosome::Chromosome;
use crate::engines::evaluation::gene::{Change, Gene};
use crate::error::{GepError, Result};
use crate::problems::Problem;
use crate::types::Allele;
use rand::seq::index;
use rand::Rng;
use std::rc::Rc;

impl<P: Problem> Chromosome<P> {
    /// Point mutation: each locus is independently replaced with probability
    /// `rate` by a random symbol legal for its slot. Replacements that pick the
    /// allele already present are dropped.
    pub fn mutate<R: Rng>(self: &Rc<Self>, rate: f64, rng: &mut R) -> Result<Rc<Self>> {
        let symbols = self.problem().symbols();
        let mut genes = self.genes().to_vec();

        for (gene_index, gene) in self.genes().iter().enumerate() {
            let mut replacements: Vec<(usize, [Allele; 1])> = Vec::new();
            for (locus, allele) in gene.alleles().iter().enumerate() {
                if rng.gen::<f64>() < rate {
                    let replacement = if locus >= self.head() {
                        symbols.random_terminal(rng)
                    } else {
                        symbols.random_symbol(rng)
                    };
                    if replacement != *allele {
                        replacements.push((locus, [replacement]));
                    }
                }
            }

            if !replacements.is_empty() {
                let changes: Vec<Change<'_>> = replacements
                    .iter()
                    .map(|(locus, allele)| (*locus, allele.as_slice()))
                    .collect();
                genes[gene_index] = gene.derive(&changes)?;
            }
        }

        self.child(genes)
    }

    /// Reverses a random stretch of one gene's head
    pub fn invert<R: Rng>(self: &Rc<Self>, rng: &mut R) -> Result<Rc<Self>> {
        let head = self.head();
        if head < 2 {
            return Ok(Rc::clone(self));
        }

        let mut genes = self.genes().to_vec();
        let gene_index = rng.gen_range(0..genes.len());
        let (start, stop) = distinct_pair(head, rng);

        let gene = &self.genes()[gene_index];
        let mut replacement = gene.alleles()[start..=stop].to_vec();
        replacement.reverse();
        genes[gene_index] = gene.derive(&[(start, replacement.as_slice())])?;

        self.child(genes)
    }

    /// Insertion sequence transposition.
    ///
    /// Copies up to `length` alleles starting in the head of a random source
    /// gene into the head of a random target gene, anywhere but the root. The
    /// target's head is shifted right and whatever overflows it is dropped,
    /// so the head length never changes.
    pub fn transpose_is<R: Rng>(self: &Rc<Self>, length: usize, rng: &mut R) -> Result<Rc<Self>> {
        let head = self.head();
        if head < 2 {
            return Ok(Rc::clone(self));
        }

        let mut genes = self.genes().to_vec();
        let source = &self.genes()[rng.gen_range(0..genes.len())];
        let target_index = rng.gen_range(0..genes.len());

        let start = rng.gen_range(0..head);
        let end = start.saturating_add(length).min(head);
        let offset = rng.gen_range(1..head);

        let target = &self.genes()[target_index];
        let replacement = insertion(&source.alleles()[start..end], target, offset);
        genes[target_index] = target.derive(&[(offset, replacement.as_slice())])?;

        self.child(genes)
    }

    /// Root insertion sequence transposition.
    ///
    /// Like [`transpose_is`](Self::transpose_is), but the copied sequence must
    /// start with a function and becomes the new root of the target gene.
    /// Does nothing if the chosen source gene holds no function.
    pub fn transpose_ris<R: Rng>(self: &Rc<Self>, length: usize, rng: &mut R) -> Result<Rc<Self>> {
        let head = self.head();
        let mut genes = self.genes().to_vec();
        let source = &self.genes()[rng.gen_range(0..genes.len())];
        let target_index = rng.gen_range(0..genes.len());

        let starts: Vec<usize> = source
            .alleles()
            .iter()
            .enumerate()
            .filter(|(_, allele)| allele.is_function())
            .map(|(i, _)| i)
            .collect();
        if starts.is_empty() {
            return Ok(Rc::clone(self));
        }

        // functions only occur in the head, so start < head
        let start = starts[rng.gen_range(0..starts.len())];
        let end = start.saturating_add(length).min(head);

        let target = &self.genes()[target_index];
        let replacement = insertion(&source.alleles()[start..end], target, 0);
        genes[target_index] = target.derive(&[(0, replacement.as_slice())])?;

        self.child(genes)
    }

    /// Swaps the first gene with a random other gene
    pub fn transpose_gene<R: Rng>(self: &Rc<Self>, rng: &mut R) -> Result<Rc<Self>> {
        if self.genes().len() < 2 {
            return Ok(Rc::clone(self));
        }

        let mut genes = self.genes().to_vec();
        let which = rng.gen_range(1..genes.len());
        genes.swap(0, which);
        self.child(genes)
    }

    /// Swaps the tails of one gene, cut at a random locus, between two parents
    pub fn crossover_one_point<R: Rng>(
        self: &Rc<Self>,
        other: &Rc<Self>,
        rng: &mut R,
    ) -> Result<(Rc<Self>, Rc<Self>)> {
        self.check_compatible(other)?;
        let mut genes1 = self.genes().to_vec();
        let mut genes2 = other.genes().to_vec();

        let gene_index = rng.gen_range(0..genes1.len());
        let locus = rng.gen_range(0..genes1[gene_index].len());
        swap_suffix(&mut genes1, &mut genes2, gene_index, locus)?;

        Ok((self.child(genes1)?, other.child(genes2)?))
    }

    /// Swaps the stretch between two random loci of the flattened genome.
    /// Genes strictly between the loci are exchanged whole.
    pub fn crossover_two_point<R: Rng>(
        self: &Rc<Self>,
        other: &Rc<Self>,
        rng: &mut R,
    ) -> Result<(Rc<Self>, Rc<Self>)> {
        self.check_compatible(other)?;
        let total = self.len();
        if total < 2 {
            return Ok((Rc::clone(self), Rc::clone(other)));
        }

        let mut genes1 = self.genes().to_vec();
        let mut genes2 = other.genes().to_vec();

        let (first, second) = distinct_pair(total, rng);
        let gene_length = genes1[0].len();
        let (gene1, locus1) = (first / gene_length, first % gene_length);
        let (gene2, locus2) = (second / gene_length, second % gene_length);

        for gene_index in gene1 + 1..gene2 {
            std::mem::swap(&mut genes1[gene_index], &mut genes2[gene_index]);
        }
        swap_suffix(&mut genes1, &mut genes2, gene1, locus1)?;
        swap_prefix(&mut genes1, &mut genes2, gene2, locus2)?;

        Ok((self.child(genes1)?, other.child(genes2)?))
    }

    /// Exchanges one whole gene between two parents
    pub fn crossover_gene<R: Rng>(
        self: &Rc<Self>,
        other: &Rc<Self>,
        rng: &mut R,
    ) -> Result<(Rc<Self>, Rc<Self>)> {
        self.check_compatible(other)?;
        let mut genes1 = self.genes().to_vec();
        let mut genes2 = other.genes().to_vec();

        let gene_index = rng.gen_range(0..genes1.len());
        std::mem::swap(&mut genes1[gene_index], &mut genes2[gene_index]);

        Ok((self.child(genes1)?, other.child(genes2)?))
    }

    fn check_compatible(&self, other: &Self) -> Result<()> {
        let same_shape = self.head() == other.head()
            && self.genes().len() == other.genes().len()
            && self.genes()[0].len() == other.genes()[0].len();
        if same_shape {
            Ok(())
        } else {
            Err(GepError::InvalidConfiguration(format!(
                "cannot cross organisms #{} and #{} of different shapes",
                self.id(),
                other.id()
            )))
        }
    }
}

/// Two distinct positions below `n`, in ascending order
fn distinct_pair<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let picks = index::sample(rng, n, 2);
    let (a, b) = (picks.index(0), picks.index(1));
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// The alleles covering `target[offset..head]` after inserting `sequence` at
/// `offset` and truncating back to the head boundary
fn insertion(sequence: &[Allele], target: &Gene, offset: usize) -> Vec<Allele> {
    let head = target.head();
    let mut replacement: Vec<Allele> = sequence.iter().take(head - offset).copied().collect();
    let keep = head - offset - replacement.len();
    replacement.extend_from_slice(&target.alleles()[offset..offset + keep]);
    replacement
}

fn swap_suffix(
    genes1: &mut [Rc<Gene>],
    genes2: &mut [Rc<Gene>],
    gene_index: usize,
    locus: usize,
) -> Result<()> {
    let (a, b) = (Rc::clone(&genes1[gene_index]), Rc::clone(&genes2[gene_index]));
    genes1[gene_index] = a.derive(&[(locus, &b.alleles()[locus..])])?;
    genes2[gene_index] = b.derive(&[(locus, &a.alleles()[locus..])])?;
    Ok(())
}

fn swap_prefix(
    genes1: &mut [Rc<Gene>],
    genes2: &mut [Rc<Gene>],
    gene_index: usize,
    locus: usize,
) -> Result<()> {
    let (a, b) = (Rc::clone(&genes1[gene_index]), Rc::clone(&genes2[gene_index]));
    genes1[gene_index] = a.derive(&[(0, &b.alleles()[..locus])])?;
    genes2[gene_index] = b.derive(&[(0, &a.alleles()[..locus])])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::arithmetic::{ADD, DIVIDE, MULTIPLY, SUBTRACT};
    use crate::functions::{default_linker, sum_linker, Operator};
    use crate::problems::SymbolTable;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Computation {
        symbols: SymbolTable,
    }

    impl Problem for Computation {
        fn symbols(&self) -> &SymbolTable {
            &self.symbols
        }
    }

    fn problem() -> Rc<Computation> {
        Rc::new(Computation {
            symbols: SymbolTable::new(
                vec![&MULTIPLY, &ADD, &SUBTRACT, &DIVIDE],
                vec![
                    Allele::Attribute("a"),
                    Allele::Constant(1.0),
                    Allele::Constant(2.0),
                ],
            )
            .unwrap(),
        })
    }

    fn random(head: usize, genes: usize, rng: &mut StdRng) -> Rc<Chromosome<Computation>> {
        Rc::new(Chromosome::random(problem(), head, genes, sum_linker, rng).unwrap())
    }

    fn z(_: &[f64]) -> std::result::Result<f64, crate::error::EvalError> {
        Ok(0.0)
    }

    static Z: Operator = Operator::new("z", "z", 2, z);

    fn foreign() -> Rc<Chromosome<Computation>> {
        let gene = Gene::new(
            vec![
                Allele::Function(&Z),
                Allele::Function(&Z),
                Allele::Attribute("y"),
                Allele::Constant(3.0),
                Allele::Constant(4.0),
            ],
            2,
        )
        .unwrap();
        Rc::new(Chromosome::new(problem(), vec![Rc::new(gene)], 2, default_linker).unwrap())
    }

    fn assert_crossover_provenance(
        p1: &Chromosome<Computation>,
        p2: &Chromosome<Computation>,
        c1: &Chromosome<Computation>,
        c2: &Chromosome<Computation>,
    ) {
        let (p1, p2): (Vec<Allele>, Vec<Allele>) = (p1.alleles().collect(), p2.alleles().collect());
        let (c1, c2): (Vec<Allele>, Vec<Allele>) = (c1.alleles().collect(), c2.alleles().collect());
        assert_eq!(c1.len(), p1.len());
        for i in 0..c1.len() {
            assert!(c1[i] == p1[i] || c1[i] == p2[i]);
            assert!(c2[i] == p1[i] || c2[i] == p2[i]);
            assert_eq!(p1[i] == p2[i], c1[i] == c2[i]);
        }
    }

    #[test]
    fn test_mutate_rate_zero_is_identity() {
        let mut rng = StdRng::seed_from_u64(7);
        let c = foreign();
        let child = c.mutate(0.0, &mut rng).unwrap();
        assert!(Rc::ptr_eq(&c, &child));
        assert_eq!(c.id(), child.id());
    }

    #[test]
    fn test_mutate_rate_one_changes_every_locus() {
        let mut rng = StdRng::seed_from_u64(7);
        let c = foreign();
        let child = c.mutate(1.1, &mut rng).unwrap();
        assert_ne!(c.id(), child.id());
        for (before, after) in c.alleles().zip(child.alleles()) {
            assert_ne!(before, after);
        }
        for allele in &child.genes()[0].alleles()[2..] {
            assert!(allele.is_terminal());
        }
    }

    #[test]
    fn test_invert_short_head_is_identity() {
        let mut rng = StdRng::seed_from_u64(8);
        let c = random(1, 1, &mut rng);
        assert!(Rc::ptr_eq(&c, &c.invert(&mut rng).unwrap()));
    }

    #[test]
    fn test_invert_head_of_two_swaps() {
        let mut rng = StdRng::seed_from_u64(9);
        let c = foreign();
        let child = c.invert(&mut rng).unwrap();
        // both head alleles are identical here, so nothing changes
        assert!(Rc::ptr_eq(&c, &child));

        let gene = Gene::new(
            vec![
                Allele::Function(&ADD),
                Allele::Attribute("a"),
                Allele::Constant(1.0),
                Allele::Constant(2.0),
                Allele::Constant(1.0),
            ],
            2,
        )
        .unwrap();
        let c =
            Rc::new(Chromosome::new(problem(), vec![Rc::new(gene)], 2, default_linker).unwrap());
        let child = c.invert(&mut rng).unwrap();
        let before = &c.genes()[0];
        let after = &child.genes()[0];
        assert_eq!(before.get(0), after.get(1));
        assert_eq!(before.get(1), after.get(0));
        assert_eq!(&before.alleles()[2..], &after.alleles()[2..]);
    }

    #[test]
    fn test_transpose_is_short_head_is_identity() {
        let mut rng = StdRng::seed_from_u64(10);
        let c = random(1, 1, &mut rng);
        assert!(Rc::ptr_eq(&c, &c.transpose_is(1, &mut rng).unwrap()));
    }

    #[test]
    fn test_transpositions_preserve_structure() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let c = random(5, 3, &mut rng);
            let is = c.transpose_is(3, &mut rng).unwrap();
            let ris = c.transpose_ris(3, &mut rng).unwrap();
            for child in [&is, &ris] {
                assert_eq!(child.len(), c.len());
                for gene in child.genes() {
                    assert_eq!(gene.head(), 5);
                    assert!(gene.alleles()[5..].iter().all(Allele::is_terminal));
                }
            }
            // tails are never touched
            for (before, after) in c.genes().iter().zip(is.genes()) {
                assert_eq!(&before.alleles()[5..], &after.alleles()[5..]);
            }
        }
    }

    #[test]
    fn test_transpose_is_keeps_root() {
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..100 {
            let c = random(4, 1, &mut rng);
            let child = c.transpose_is(2, &mut rng).unwrap();
            assert_eq!(c.genes()[0].get(0), child.genes()[0].get(0));
        }
    }

    #[test]
    fn test_transposition_length_beyond_head_is_clipped() {
        let mut rng = StdRng::seed_from_u64(16);
        for _ in 0..50 {
            let c = random(4, 2, &mut rng);
            let is = c.transpose_is(usize::MAX, &mut rng).unwrap();
            let ris = c.transpose_ris(usize::MAX, &mut rng).unwrap();
            for child in [&is, &ris] {
                assert_eq!(child.len(), c.len());
                for gene in child.genes() {
                    assert!(gene.alleles()[4..].iter().all(Allele::is_terminal));
                }
            }
        }
    }

    #[test]
    fn test_transpose_ris_root_is_function() {
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..100 {
            let c = random(4, 1, &mut rng);
            let has_function = c.genes()[0].alleles().iter().any(Allele::is_function);
            let child = c.transpose_ris(2, &mut rng).unwrap();
            if has_function {
                assert!(child.genes()[0].alleles()[0].is_function());
            } else {
                assert!(Rc::ptr_eq(&c, &child));
            }
        }
    }

    #[test]
    fn test_transpose_ris_without_functions_is_identity() {
        let mut rng = StdRng::seed_from_u64(14);
        let gene = Gene::new(vec![Allele::Constant(1.0); 5], 2).unwrap();
        let c =
            Rc::new(Chromosome::new(problem(), vec![Rc::new(gene)], 2, default_linker).unwrap());
        assert!(Rc::ptr_eq(&c, &c.transpose_ris(3, &mut rng).unwrap()));
    }

    #[test]
    fn test_transpose_gene() {
        let mut rng = StdRng::seed_from_u64(15);
        let single = random(3, 1, &mut rng);
        assert!(Rc::ptr_eq(&single, &single.transpose_gene(&mut rng).unwrap()));

        let c = random(3, 2, &mut rng);
        let child = c.transpose_gene(&mut rng).unwrap();
        assert!(Rc::ptr_eq(&c.genes()[0], &child.genes()[1]));
        assert!(Rc::ptr_eq(&c.genes()[1], &child.genes()[0]));
    }

    #[test]
    fn test_crossovers_only_recombine_parent_alleles() {
        let mut rng = StdRng::seed_from_u64(16);
        for _ in 0..100 {
            let p1 = random(5, 3, &mut rng);
            let p2 = random(5, 3, &mut rng);

            let (c1, c2) = p1.crossover_one_point(&p2, &mut rng).unwrap();
            assert_crossover_provenance(&p1, &p2, &c1, &c2);
            let (c1, c2) = p1.crossover_two_point(&p2, &mut rng).unwrap();
            assert_crossover_provenance(&p1, &p2, &c1, &c2);
            let (c1, c2) = p1.crossover_gene(&p2, &mut rng).unwrap();
            assert_crossover_provenance(&p1, &p2, &c1, &c2);
        }
    }

    #[test]
    fn test_crossover_gene_shares_genes() {
        let mut rng = StdRng::seed_from_u64(17);
        let p1 = random(3, 1, &mut rng);
        let p2 = random(3, 1, &mut rng);
        let (c1, c2) = p1.crossover_gene(&p2, &mut rng).unwrap();
        assert!(Rc::ptr_eq(&c1.genes()[0], &p2.genes()[0]));
        assert!(Rc::ptr_eq(&c2.genes()[0], &p1.genes()[0]));
    }

    #[test]
    fn test_crossover_with_itself_is_identity() {
        let mut rng = StdRng::seed_from_u64(18);
        let p = random(4, 2, &mut rng);
        let (c1, c2) = p.crossover_two_point(&p, &mut rng).unwrap();
        assert!(Rc::ptr_eq(&p, &c1));
        assert!(Rc::ptr_eq(&p, &c2));
    }

    #[test]
    fn test_crossover_rejects_different_shapes() {
        let mut rng = StdRng::seed_from_u64(19);
        let p1 = random(4, 2, &mut rng);
        let p2 = random(3, 2, &mut rng);
        assert!(p1.crossover_one_point(&p2, &mut rng).is_err());
    }
}
