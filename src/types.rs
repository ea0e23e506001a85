use crate::functions::Operator;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// One locus of a Karva gene.
///
/// Functions live in the head only. Terminals (attributes and constants) may
/// appear anywhere and are the only symbols allowed in the tail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Allele {
    Function(&'static Operator),
    /// Resolved against the evaluated subject by name
    Attribute(&'static str),
    Constant(f64),
}

impl Allele {
    pub fn is_function(&self) -> bool {
        matches!(self, Allele::Function(_))
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_function()
    }

    /// Number of child nodes this allele takes in the expression tree
    pub fn arity(&self) -> usize {
        match self {
            Allele::Function(op) => op.arity,
            _ => 0,
        }
    }

    /// Raw display name, without delimiters
    pub fn glyph(&self) -> String {
        match self {
            Allele::Function(op) => op.glyph.to_string(),
            Allele::Attribute(name) => name.to_string(),
            Allele::Constant(value) => value.to_string(),
        }
    }
}

impl fmt::Display for Allele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let glyph = self.glyph();
        if glyph.chars().count() == 1 {
            write!(f, "{}", glyph)
        } else {
            write!(f, "{{{}}}", glyph)
        }
    }
}

impl From<&'static Operator> for Allele {
    fn from(op: &'static Operator) -> Self {
        Allele::Function(op)
    }
}

/// Output of a chromosome's linking function
#[derive(Debug, Clone, PartialEq)]
pub enum Linked {
    Single(f64),
    Tuple(Vec<f64>),
}

impl Linked {
    /// The value of a single-valued result, `None` for tuples
    pub fn scalar(&self) -> Option<f64> {
        match self {
            Linked::Single(value) => Some(*value),
            Linked::Tuple(_) => None,
        }
    }

    pub fn values(&self) -> &[f64] {
        match self {
            Linked::Single(value) => std::slice::from_ref(value),
            Linked::Tuple(values) => values,
        }
    }
}

impl fmt::Display for Linked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Linked::Single(value) => write!(f, "{}", value),
            Linked::Tuple(values) => {
                let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "({})", parts.join(", "))
            }
        }
    }
}

/// An input object that expression trees are evaluated against.
///
/// `subject_id` keys the per-gene evaluation caches, so two subjects must never
/// share an id unless they also agree on every attribute value. Draw ids from
/// [`next_subject_id`] to stay unique alongside [`Record`].
pub trait Subject {
    fn subject_id(&self) -> u64;

    fn attribute(&self, name: &str) -> Option<f64>;
}

static NEXT_SUBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Allocates a process-wide unique subject identity
pub fn next_subject_id() -> u64 {
    NEXT_SUBJECT_ID.fetch_add(1, Ordering::Relaxed)
}

/// A named-attribute subject.
///
/// Every modification yields a fresh identity, so results cached for an
/// earlier state of the record can never be served for a later one.
#[derive(Debug, Clone)]
pub struct Record {
    id: u64,
    values: HashMap<String, f64>,
}

impl Record {
    pub fn new() -> Self {
        Self {
            id: next_subject_id(),
            values: HashMap::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.values.insert(name.into(), value);
        self.id = next_subject_id();
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            id: next_subject_id(),
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl Subject for Record {
    fn subject_id(&self) -> u64 {
        self.id
    }

    fn attribute(&self, name: &str) -> Option<f64> {
        self.get(name)
    }
}
