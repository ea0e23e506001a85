use super::{
    arithmetic::ARITHMETIC_ALL, comparison::COMPARISON_ALL, logic::LOGIC_ALL, math::MATH_ALL,
    operator::Operator,
};
use std::collections::HashMap;

/// Name and glyph lookup over the stock function symbols.
///
/// Problem definitions use it to assemble their function tables from
/// configuration, e.g. `registry.get_many(&["add", "subtract"])`.
pub struct FunctionRegistry {
    functions: HashMap<&'static str, &'static Operator>,
    order: Vec<&'static Operator>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
            order: Vec::new(),
        };
        registry.register_all(&ARITHMETIC_ALL);
        registry.register_all(&COMPARISON_ALL);
        registry.register_all(&LOGIC_ALL);
        registry.register_all(&MATH_ALL);
        registry
    }

    /// Adds an operator, replacing any earlier one with the same name
    pub fn register(&mut self, operator: &'static Operator) {
        if let Some(previous) = self.functions.insert(operator.name, operator) {
            self.order.retain(|op| op.name != previous.name);
        }
        self.order.push(operator);
    }

    fn register_all(&mut self, operators: &[&'static Operator]) {
        for operator in operators {
            self.register(operator);
        }
    }

    pub fn get(&self, name: &str) -> Option<&'static Operator> {
        self.functions.get(name).copied()
    }

    pub fn get_by_glyph(&self, glyph: &str) -> Option<&'static Operator> {
        self.order.iter().copied().find(|op| op.glyph == glyph)
    }

    /// Resolves every name, or returns the first unknown one
    pub fn get_many(&self, names: &[&str]) -> Result<Vec<&'static Operator>, String> {
        names
            .iter()
            .map(|name| self.get(name).ok_or_else(|| name.to_string()))
            .collect()
    }

    /// Registered operators in registration order
    pub fn all(&self) -> &[&'static Operator] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
