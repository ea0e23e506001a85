pub mod operator;
pub mod arithmetic;
pub mod comparison;
pub mod logic;
pub mod math;
pub mod linkers;
pub mod registry;

pub use operator::{Evaluator, Operator};
pub use linkers::{default_linker, or_linker, product_linker, sum_linker, Linker};
pub use registry::FunctionRegistry;
