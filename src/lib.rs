//! Differentiable scalar functions of one real variable.
//!
//! A [`DiffFn`] pairs two lazily evaluated mappings: the function's value
//! at a point and its first derivative at the same point. The arithmetic
//! operators combine functions by the calculus rules (sum, difference,
//! product, quotient, chain), each building a new pair that closes over its
//! operands without evaluating anything until a point is supplied.
//!
//! ```
//! use gradfn::DiffFn;
//!
//! let f = DiffFn::linear(3.); // 3x
//! let g = DiffFn::linear(2.); // 2x
//! let h = &f * &g; // 6x^2
//! assert_eq!(h.value(5.), Ok(150.));
//! assert_eq!(h.derivative(5.), Ok(60.));
//! ```

mod combine;
mod diff_fn;
pub mod error;

pub use combine::{Combine, Minus, MinusFrom, Operand, Over, Plus, Times};
pub use diff_fn::DiffFn;
pub use error::{EvalError, EvalResult};
