use thiserror::Error;

pub type RuleResult<T> = Result<T, RuleError>;

/// Failures the engine can produce. All of them are synchronous validation
/// failures; none are retryable.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Malformed rule: {0}")]
    MalformedRule(String),

    #[error("Invalid operand: {0}")]
    InvalidOperand(String),

    #[error("Unexpected token: {0}")]
    UnexpectedToken(String),

    #[error("Missing user attribute: {0}")]
    MissingAttribute(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
