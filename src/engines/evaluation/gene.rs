use crate::error::{EvalError, GepError, Result};
use crate::types::{Allele, Subject};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A replacement of consecutive alleles starting at an offset
pub type Change<'a> = (usize, &'a [Allele]);

/// Karva gene: a fixed-length linear genome segment that decodes, level by
/// level, into an expression tree.
///
/// A gene is a head of `head` alleles (functions or terminals) followed by a
/// tail of terminals only. The tail is sized `head * (max_arity - 1) + 1` so
/// any arrangement of head symbols can always be closed. Only the prefix up to
/// the coding index is expressed; the rest is inert DNA that can still be
/// carried forward and re-activated by later variation.
///
/// # Example
///
/// ```
/// use karva::engines::evaluation::Gene;
/// use karva::functions::arithmetic::{ADD, SUBTRACT};
/// use karva::types::{Allele, Record};
///
/// let gene = Gene::new(vec![
///     Allele::Function(&ADD),
///     Allele::Function(&SUBTRACT),
///     Allele::Attribute("a"),
///     Allele::Constant(1.0),
///     Allele::Attribute("a"),
/// ], 2).unwrap();
///
/// assert_eq!(gene.coding(), 4);
/// assert_eq!(gene.to_string(), "+-a1a");
/// assert_eq!(gene.evaluate(&Record::new().with("a", 5.0)), Ok(1.0));
/// ```
#[derive(Debug)]
pub struct Gene {
    alleles: Vec<Allele>,
    head: usize,
    coding: usize,
    /// Evaluations keyed by subject id. Valid only for the current coding region.
    cache: RefCell<HashMap<u64, f64>>,
}

impl Gene {
    /// Builds a gene and decodes its coding region.
    ///
    /// Fails if the tail is empty, a function sits in the tail, or the
    /// sequence runs out before the tree closes.
    pub fn new(alleles: Vec<Allele>, head: usize) -> Result<Self> {
        if alleles.len() <= head {
            return Err(GepError::InvalidConfiguration(format!(
                "gene of length {} has no tail after a head of {}",
                alleles.len(),
                head
            )));
        }
        check_tail(&alleles, head)?;
        let coding = find_coding(&alleles)?;

        Ok(Self {
            alleles,
            head,
            coding,
            cache: RefCell::new(HashMap::new()),
        })
    }

    pub fn alleles(&self) -> &[Allele] {
        &self.alleles
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn len(&self) -> usize {
        self.alleles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alleles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Allele> {
        self.alleles.get(index).copied()
    }

    /// Last position of the expressed tree
    pub fn coding(&self) -> usize {
        self.coding
    }

    pub fn coding_region(&self) -> &[Allele] {
        &self.alleles[..=self.coding]
    }

    /// Number of memoized evaluations
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn is_cached<S: Subject + ?Sized>(&self, subject: &S) -> bool {
        self.cache.borrow().contains_key(&subject.subject_id())
    }

    /// Evaluates the expression tree against `subject`, memoized by the
    /// subject's identity. Errors are not cached.
    pub fn evaluate<S: Subject + ?Sized>(
        &self,
        subject: &S,
    ) -> std::result::Result<f64, EvalError> {
        let key = subject.subject_id();
        let cached = self.cache.borrow().get(&key).copied();
        if let Some(value) = cached {
            return Ok(value);
        }

        let value = self.express(subject)?;
        self.cache.borrow_mut().insert(key, value);
        Ok(value)
    }

    /// Reduces the coding region in a single reverse sweep.
    ///
    /// In level order the arguments of the last unresolved function are always
    /// the `arity` values just before the consumption pointer, so walking from
    /// the coding index down to the root resolves the tree bottom-up.
    fn express<S: Subject + ?Sized>(&self, subject: &S) -> std::result::Result<f64, EvalError> {
        let region = self.coding_region();
        let mut buffer = Vec::with_capacity(region.len());
        for allele in region {
            buffer.push(match allele {
                Allele::Constant(value) => *value,
                Allele::Attribute(name) => subject
                    .attribute(name)
                    .ok_or_else(|| EvalError::MissingAttribute(name.to_string()))?,
                Allele::Function(_) => 0.0,
            });
        }

        let mut index = buffer.len();
        for position in (0..region.len()).rev() {
            if let Allele::Function(op) = region[position] {
                let start = index - op.arity;
                buffer[position] = op.apply(&buffer[start..index])?;
                index = start;
            }
        }

        Ok(buffer[0])
    }

    /// Derives a gene by applying `changes` in order.
    ///
    /// Returns this very instance when the changes make no net difference.
    /// When the coding region comes through untouched the child keeps the
    /// coding index and a copy of the evaluation cache; otherwise it is
    /// decoded afresh with an empty cache. The parent is never modified.
    pub fn derive(self: &Rc<Self>, changes: &[Change<'_>]) -> Result<Rc<Self>> {
        let mut derived: Option<Vec<Allele>> = None;

        for &(offset, replacement) in changes {
            let end = offset + replacement.len();
            if end > self.alleles.len() {
                return Err(GepError::InvalidConfiguration(format!(
                    "change {}..{} exceeds gene length {}",
                    offset,
                    end,
                    self.alleles.len()
                )));
            }

            let current = derived.as_deref().unwrap_or(&self.alleles);
            if current[offset..end] != *replacement {
                derived.get_or_insert_with(|| self.alleles.clone())[offset..end]
                    .copy_from_slice(replacement);
            }
        }

        let alleles = match derived {
            Some(alleles) if alleles != self.alleles => alleles,
            _ => return Ok(Rc::clone(self)),
        };
        check_tail(&alleles, self.head)?;

        let gene = if alleles[..=self.coding] == self.alleles[..=self.coding] {
            Gene {
                alleles,
                head: self.head,
                coding: self.coding,
                cache: RefCell::new(self.cache.borrow().clone()),
            }
        } else {
            let coding = find_coding(&alleles)?;
            Gene {
                alleles,
                head: self.head,
                coding,
                cache: RefCell::new(HashMap::new()),
            }
        };

        Ok(Rc::new(gene))
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for allele in &self.alleles {
            write!(f, "{}", allele)?;
        }
        Ok(())
    }
}

fn check_tail(alleles: &[Allele], head: usize) -> Result<()> {
    match alleles[head..].iter().position(Allele::is_function) {
        Some(position) => Err(GepError::InvalidConfiguration(format!(
            "function allele in gene tail at position {}",
            head + position
        ))),
        None => Ok(()),
    }
}

/// Breadth-first arity accounting: each level needs as many alleles as the
/// arities of the level above add up to. Decoding stops when a level needs none.
fn find_coding(alleles: &[Allele]) -> Result<usize> {
    let mut index = 0;
    let mut required = 1;

    while required > 0 {
        let mut next_required = 0;
        for _ in 0..required {
            let allele = alleles.get(index).ok_or_else(|| {
                GepError::InvalidConfiguration(format!(
                    "gene of length {} does not close into a tree",
                    alleles.len()
                ))
            })?;
            next_required += allele.arity();
            index += 1;
        }
        required = next_required;
    }

    Ok(index - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;
    use crate::functions::arithmetic::{ADD, DIVIDE, SUBTRACT};
    use crate::functions::Operator;
    use crate::types::Record;

    fn constant_pi(_: &[f64]) -> std::result::Result<f64, EvalError> {
        Ok(3.0)
    }

    static PI: Operator = Operator::new("pi", "P", 0, constant_pi);

    fn worked_example() -> Rc<Gene> {
        Rc::new(
            Gene::new(
                vec![
                    Allele::Function(&ADD),
                    Allele::Function(&SUBTRACT),
                    Allele::Attribute("a"),
                    Allele::Constant(1.0),
                    Allele::Attribute("a"),
                ],
                2,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_coding_index() {
        let gene = worked_example();
        assert_eq!(gene.coding(), 4);
        assert_eq!(gene.coding_region().len(), 5);
    }

    #[test]
    fn test_evaluation() {
        let gene = worked_example();
        let subject = Record::new().with("a", 5.0);
        assert_eq!(gene.evaluate(&subject), Ok(1.0));
        assert!(gene.is_cached(&subject));
        assert_eq!(gene.cached(), 1);
    }

    #[test]
    fn test_representation() {
        assert_eq!(worked_example().to_string(), "+-a1a");
    }

    #[test]
    fn test_derive_root_terminal() {
        let gene = worked_example();
        let child = gene.derive(&[(0, &[Allele::Attribute("a")])]).unwrap();
        assert_eq!(child.coding(), 0);
        assert_eq!(child.cached(), 0);
    }

    #[test]
    fn test_derive_without_net_change_returns_self() {
        let gene = worked_example();
        let same = gene.derive(&[(2, &[Allele::Attribute("a")])]).unwrap();
        assert!(Rc::ptr_eq(&gene, &same));

        // a later change that reverts an earlier one is no net change either
        let reverted = gene
            .derive(&[
                (3, &[Allele::Constant(2.0)]),
                (3, &[Allele::Constant(1.0)]),
            ])
            .unwrap();
        assert!(Rc::ptr_eq(&gene, &reverted));
    }

    #[test]
    fn test_derive_in_inert_region_keeps_cache() {
        let alleles = vec![
            Allele::Attribute("a"),
            Allele::Function(&ADD),
            Allele::Constant(1.0),
            Allele::Constant(2.0),
            Allele::Constant(3.0),
        ];
        let gene = Rc::new(Gene::new(alleles, 2).unwrap());
        assert_eq!(gene.coding(), 0);

        let subject = Record::new().with("a", 7.0);
        assert_eq!(gene.evaluate(&subject), Ok(7.0));

        let child = gene.derive(&[(3, &[Allele::Constant(9.0)])]).unwrap();
        assert!(!Rc::ptr_eq(&gene, &child));
        assert_eq!(child.coding(), 0);
        assert!(child.is_cached(&subject));
        assert_eq!(child.evaluate(&subject), Ok(7.0));
    }

    #[test]
    fn test_derive_in_coding_region_resets_cache_only_for_child() {
        let gene = worked_example();
        let subject = Record::new().with("a", 5.0);
        gene.evaluate(&subject).unwrap();

        let child = gene.derive(&[(1, &[Allele::Function(&ADD)])]).unwrap();
        assert_eq!(child.cached(), 0);
        assert!(gene.is_cached(&subject));
        assert_eq!(child.evaluate(&subject), Ok(11.0));
        assert_eq!(gene.evaluate(&subject), Ok(1.0));
    }

    #[test]
    fn test_derive_rejects_tail_functions_and_overruns() {
        let gene = worked_example();
        assert!(gene.derive(&[(3, &[Allele::Function(&ADD)])]).is_err());
        assert!(gene
            .derive(&[(4, &[Allele::Constant(1.0), Allele::Constant(1.0)])])
            .is_err());
    }

    #[test]
    fn test_head_zero_is_single_terminal() {
        let gene = Gene::new(vec![Allele::Constant(4.0)], 0).unwrap();
        assert_eq!(gene.coding(), 0);
        assert_eq!(gene.evaluate(&Record::new()), Ok(4.0));
    }

    #[test]
    fn test_zero_arity_function() {
        let gene = Gene::new(
            vec![
                Allele::Function(&ADD),
                Allele::Function(&PI),
                Allele::Constant(1.0),
                Allele::Constant(1.0),
                Allele::Constant(1.0),
            ],
            2,
        )
        .unwrap();
        assert_eq!(gene.coding(), 2);
        assert_eq!(gene.evaluate(&Record::new()), Ok(4.0));
    }

    #[test]
    fn test_invalid_genes() {
        assert!(Gene::new(vec![Allele::Function(&ADD)], 1).is_err());
        assert!(Gene::new(vec![Allele::Constant(1.0), Allele::Function(&ADD)], 1).is_err());
        assert!(Gene::new(
            vec![
                Allele::Function(&ADD),
                Allele::Function(&ADD),
                Allele::Constant(1.0),
            ],
            2
        )
        .is_err());
    }

    #[test]
    fn test_evaluation_errors_propagate_and_are_not_cached() {
        let gene = Gene::new(
            vec![
                Allele::Function(&DIVIDE),
                Allele::Attribute("a"),
                Allele::Attribute("b"),
            ],
            1,
        )
        .unwrap();
        let subject = Record::new().with("a", 1.0).with("b", 0.0);
        assert_eq!(gene.evaluate(&subject), Err(EvalError::DivisionByZero));
        assert!(!gene.is_cached(&subject));

        let partial = Record::new().with("a", 1.0);
        assert_eq!(
            gene.evaluate(&partial),
            Err(EvalError::MissingAttribute("b".to_string()))
        );
    }
}
