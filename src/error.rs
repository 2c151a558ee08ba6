use thiserror::Error;

/// Outcome of evaluating a mapping at a point.
pub type EvalResult = Result<f64, EvalError>;

/// Errors raised while evaluating a function or its derivative.
///
/// Every error originates in a leaf numeric operation (square root,
/// division) and propagates unchanged through the enclosing mappings.
/// Construction and combination never fail; the mappings are not invoked
/// until an evaluation point is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum EvalError {
    /// Square root of a negative operand value. Carries the value.
    #[error("square root of negative value {0}")]
    Domain(f64),
    /// A denominator evaluated to exactly zero at the requested point.
    #[error("division by zero")]
    DivisionByZero,
}
