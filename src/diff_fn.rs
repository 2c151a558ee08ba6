use std::fmt;
use std::sync::Arc;

use crate::combine::Combine;
use crate::error::{EvalError, EvalResult};

type Map = Arc<dyn Fn(f64) -> EvalResult + Send + Sync>;

/// A scalar function of one real variable paired with its first derivative.
///
/// Both mappings are pure, lazily evaluated and held by shared read-only
/// ownership, so cloning is a cheap handle copy and the same function can
/// appear as a sub-expression of any number of composites. Nothing is
/// computed until [`value`](DiffFn::value) or
/// [`derivative`](DiffFn::derivative) is called with a point.
#[derive(Clone)]
pub struct DiffFn {
    value: Map,
    derivative: Map,
}

impl fmt::Debug for DiffFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiffFn").finish_non_exhaustive()
    }
}

fn checked_sqrt(v: f64) -> EvalResult {
    if v < 0. {
        Err(EvalError::Domain(v))
    } else {
        Ok(v.sqrt())
    }
}

impl DiffFn {
    /// Raw constructor. Stores the two mappings verbatim without invoking
    /// them; the caller guarantees that `derivative` is the calculus
    /// derivative of `value`.
    pub fn new(
        value: impl Fn(f64) -> EvalResult + Send + Sync + 'static,
        derivative: impl Fn(f64) -> EvalResult + Send + Sync + 'static,
    ) -> Self {
        Self {
            value: Arc::new(value),
            derivative: Arc::new(derivative),
        }
    }

    /// Evaluate the function at `x`.
    pub fn value(&self, x: f64) -> EvalResult {
        (self.value)(x)
    }

    /// Evaluate the first derivative at `x`.
    pub fn derivative(&self, x: f64) -> EvalResult {
        (self.derivative)(x)
    }

    /// Single-dispatch hook: hands `self` to the operator and returns
    /// whatever it produces. All arithmetic combinators run through here;
    /// downstream code can define further [`Combine`] implementations
    /// without touching this type.
    pub fn with<C: Combine>(&self, op: &C) -> C::Output {
        op.combine(self)
    }

    /// f(x) = k for all x, f'(x) = 0.
    pub fn constant(k: f64) -> Self {
        Self::new(move |_| Ok(k), |_| Ok(0.))
    }

    /// f(x) = k·x, f'(x) = k.
    pub fn linear(k: f64) -> Self {
        Self::new(move |x| Ok(k * x), move |_| Ok(k))
    }

    /// Square root of `self` by the chain rule.
    ///
    /// The value fails with [`EvalError::Domain`] wherever `self` is
    /// negative. The derivative has its own failure domain: where `self`
    /// evaluates to exactly zero the value is still defined (zero) but the
    /// derivative divides by zero.
    pub fn sqrt(&self) -> Self {
        let inner = self.clone();
        let dinner = self.clone();
        Self::new(
            move |x| checked_sqrt(inner.value(x)?),
            move |x| {
                let d = dinner.derivative(x)?;
                let root = checked_sqrt(dinner.value(x)?)?;
                if root == 0. {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(0.5 * d / root)
            },
        )
    }

    /// Sine of `self` by the chain rule.
    pub fn sin(&self) -> Self {
        self.apply(f64::sin, f64::cos)
    }

    /// Cosine of `self` by the chain rule.
    pub fn cos(&self) -> Self {
        self.apply(f64::cos, |v| -v.sin())
    }

    /// Exponential of `self` by the chain rule.
    pub fn exp(&self) -> Self {
        self.apply(f64::exp, f64::exp)
    }

    /// Chain an unary function and its pointwise gradient over `self`: the
    /// result evaluates to `f(self(x))` and derives to
    /// `grad(self(x)) · self'(x)`.
    pub fn apply(&self, f: fn(f64) -> f64, grad: fn(f64) -> f64) -> Self {
        let inner = self.clone();
        let dinner = self.clone();
        Self::new(
            move |x| Ok(f(inner.value(x)?)),
            move |x| Ok(grad(dinner.value(x)?) * dinner.derivative(x)?),
        )
    }
}
