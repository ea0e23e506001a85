use thiserror::Error;

/// Semantic failures raised while evaluating an expression tree.
///
/// These are never caught by the engine. They travel out of gene and
/// chromosome evaluation to the problem's fitness code, which decides how to
/// score a non-viable organism.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Domain error: {operator} is undefined for {value}")]
    Domain { operator: &'static str, value: f64 },

    #[error("Missing attribute: {0}")]
    MissingAttribute(String),
}

#[derive(Error, Debug)]
pub enum GepError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Unimplemented: {0}")]
    Unimplemented(String),

    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvalError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GepError>;
