use std::ops::{Add, Div, Mul, Sub};

use crate::diff_fn::DiffFn;
use crate::error::EvalError;

/// An operator that can be dispatched over a [`DiffFn`].
///
/// [`DiffFn::with`] hands the function to exactly one `combine` call and
/// returns whatever the operator produces. The arithmetic combinators below
/// are all implementers; the trait is public so further combinators can be
/// added without modifying [`DiffFn`] itself.
pub trait Combine {
    type Output;
    fn combine(&self, f: &DiffFn) -> Self::Output;
}

/// Right-hand operand of an arithmetic combinator: a bare scalar or another
/// function. A closed sum type, so every combination rule is matched
/// exhaustively at compile time.
#[derive(Clone, Debug)]
pub enum Operand {
    Scalar(f64),
    Func(DiffFn),
}

impl From<f64> for Operand {
    fn from(c: f64) -> Self {
        Operand::Scalar(c)
    }
}

impl From<&DiffFn> for Operand {
    fn from(f: &DiffFn) -> Self {
        Operand::Func(f.clone())
    }
}

impl From<DiffFn> for Operand {
    fn from(f: DiffFn) -> Self {
        Operand::Func(f)
    }
}

/// `f + operand`. A constant shifts the value and leaves the slope alone;
/// a function operand uses the sum rule.
pub struct Plus(pub Operand);

impl Combine for Plus {
    type Output = DiffFn;

    fn combine(&self, f: &DiffFn) -> DiffFn {
        match &self.0 {
            Operand::Scalar(c) => {
                let c = *c;
                let (fv, fd) = (f.clone(), f.clone());
                DiffFn::new(move |x| Ok(fv.value(x)? + c), move |x| fd.derivative(x))
            }
            Operand::Func(g) => {
                let (fv, gv) = (f.clone(), g.clone());
                let (fd, gd) = (f.clone(), g.clone());
                DiffFn::new(
                    move |x| Ok(fv.value(x)? + gv.value(x)?),
                    move |x| Ok(fd.derivative(x)? + gd.derivative(x)?),
                )
            }
        }
    }
}

/// `f − operand`, the difference rule.
pub struct Minus(pub Operand);

impl Combine for Minus {
    type Output = DiffFn;

    fn combine(&self, f: &DiffFn) -> DiffFn {
        match &self.0 {
            Operand::Scalar(c) => {
                let c = *c;
                let (fv, fd) = (f.clone(), f.clone());
                DiffFn::new(move |x| Ok(fv.value(x)? - c), move |x| fd.derivative(x))
            }
            Operand::Func(g) => {
                let (fv, gv) = (f.clone(), g.clone());
                let (fd, gd) = (f.clone(), g.clone());
                DiffFn::new(
                    move |x| Ok(fv.value(x)? - gv.value(x)?),
                    move |x| Ok(fd.derivative(x)? - gd.derivative(x)?),
                )
            }
        }
    }
}

/// `c − f`: subtraction with the constant on the left flips the sign of the
/// derivative.
pub struct MinusFrom(pub f64);

impl Combine for MinusFrom {
    type Output = DiffFn;

    fn combine(&self, f: &DiffFn) -> DiffFn {
        let c = self.0;
        let (fv, fd) = (f.clone(), f.clone());
        DiffFn::new(
            move |x| Ok(c - fv.value(x)?),
            move |x| Ok(-fd.derivative(x)?),
        )
    }
}

/// `f × operand`. A constant scales value and slope alike; a function
/// operand uses the product rule.
pub struct Times(pub Operand);

impl Combine for Times {
    type Output = DiffFn;

    fn combine(&self, f: &DiffFn) -> DiffFn {
        match &self.0 {
            Operand::Scalar(c) => {
                let c = *c;
                let (fv, fd) = (f.clone(), f.clone());
                DiffFn::new(
                    move |x| Ok(c * fv.value(x)?),
                    move |x| Ok(c * fd.derivative(x)?),
                )
            }
            Operand::Func(g) => {
                let (fv, gv) = (f.clone(), g.clone());
                let (fd, gd) = (f.clone(), g.clone());
                DiffFn::new(
                    move |x| Ok(fv.value(x)? * gv.value(x)?),
                    // product rule, other operand's slope first
                    move |x| {
                        Ok(gd.derivative(x)? * fd.value(x)? + fd.derivative(x)? * gd.value(x)?)
                    },
                )
            }
        }
    }
}

/// `f ÷ g`, the quotient rule. Both mappings fail with
/// [`EvalError::DivisionByZero`] wherever `g` evaluates to exactly zero.
pub struct Over(pub DiffFn);

impl Combine for Over {
    type Output = DiffFn;

    fn combine(&self, f: &DiffFn) -> DiffFn {
        let (fv, gv) = (f.clone(), self.0.clone());
        let (fd, gd) = (f.clone(), self.0.clone());
        DiffFn::new(
            move |x| {
                let num = fv.value(x)?;
                let denom = gv.value(x)?;
                if denom == 0. {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(num / denom)
            },
            move |x| {
                let num = fd.derivative(x)? * gd.value(x)? - gd.derivative(x)? * fd.value(x)?;
                let denom = gd.value(x)?;
                if denom == 0. {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(num / (denom * denom))
            },
        )
    }
}

impl Add<&DiffFn> for &DiffFn {
    type Output = DiffFn;
    fn add(self, rhs: &DiffFn) -> DiffFn {
        self.with(&Plus(rhs.into()))
    }
}

impl Add<f64> for &DiffFn {
    type Output = DiffFn;
    fn add(self, rhs: f64) -> DiffFn {
        self.with(&Plus(rhs.into()))
    }
}

impl Add<&DiffFn> for f64 {
    type Output = DiffFn;
    fn add(self, rhs: &DiffFn) -> DiffFn {
        rhs.with(&Plus(self.into()))
    }
}

impl Sub<&DiffFn> for &DiffFn {
    type Output = DiffFn;
    fn sub(self, rhs: &DiffFn) -> DiffFn {
        self.with(&Minus(rhs.into()))
    }
}

impl Sub<f64> for &DiffFn {
    type Output = DiffFn;
    fn sub(self, rhs: f64) -> DiffFn {
        self.with(&Minus(rhs.into()))
    }
}

impl Sub<&DiffFn> for f64 {
    type Output = DiffFn;
    fn sub(self, rhs: &DiffFn) -> DiffFn {
        rhs.with(&MinusFrom(self))
    }
}

impl Mul<&DiffFn> for &DiffFn {
    type Output = DiffFn;
    fn mul(self, rhs: &DiffFn) -> DiffFn {
        self.with(&Times(rhs.into()))
    }
}

impl Mul<f64> for &DiffFn {
    type Output = DiffFn;
    fn mul(self, rhs: f64) -> DiffFn {
        self.with(&Times(rhs.into()))
    }
}

impl Mul<&DiffFn> for f64 {
    type Output = DiffFn;
    fn mul(self, rhs: &DiffFn) -> DiffFn {
        rhs.with(&Times(self.into()))
    }
}

impl Div<&DiffFn> for &DiffFn {
    type Output = DiffFn;
    fn div(self, rhs: &DiffFn) -> DiffFn {
        self.with(&Over(rhs.clone()))
    }
}

/// Scalar divisors are shorthand for dividing by a constant function.
impl Div<f64> for &DiffFn {
    type Output = DiffFn;
    fn div(self, rhs: f64) -> DiffFn {
        self.with(&Over(DiffFn::constant(rhs)))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use approx::assert_abs_diff_eq;

    use super::*;

    fn eval_pair(f: &DiffFn, x: f64) -> (f64, f64) {
        (f.value(x).unwrap(), f.derivative(x).unwrap())
    }

    #[test]
    fn add_constant_keeps_derivative() {
        let f = DiffFn::linear(3.);
        let g = &f + 2.;
        let (v, d) = eval_pair(&g, 5.);
        assert_abs_diff_eq!(v, 17.);
        assert_abs_diff_eq!(d, 3.);
    }

    #[test]
    fn add_constant_commutes() {
        let f = DiffFn::linear(-1.);
        assert_eq!(eval_pair(&(5. + &f), 4.), eval_pair(&(&f + 5.), 4.));
    }

    #[test]
    fn add_function_sum_rule() {
        let f = DiffFn::linear(1.5);
        let g = DiffFn::constant(2.);
        let h = &f + &g;
        let (v, d) = eval_pair(&h, 3.);
        assert_abs_diff_eq!(v, 6.5);
        assert_abs_diff_eq!(d, 1.5);
    }

    #[test]
    fn sub_constant_keeps_derivative() {
        let f = DiffFn::linear(4.);
        let h = &f - 3.;
        let (v, d) = eval_pair(&h, 2.);
        assert_abs_diff_eq!(v, 5.);
        assert_abs_diff_eq!(d, 4.);
    }

    #[test]
    fn sub_from_constant_flips_derivative() {
        let f = DiffFn::linear(2.);
        let h = 10. - &f;
        let (v, d) = eval_pair(&h, 1.5);
        assert_abs_diff_eq!(v, 7.);
        assert_abs_diff_eq!(d, -2.);
        // the right-operand form keeps the sign
        assert_abs_diff_eq!((&f - 10.).derivative(1.5).unwrap(), 2.);
    }

    #[test]
    fn sub_function_difference_rule() {
        let h = &DiffFn::linear(5.) - &DiffFn::linear(2.);
        let (v, d) = eval_pair(&h, 7.);
        assert_abs_diff_eq!(v, 21.);
        assert_abs_diff_eq!(d, 3.);
    }

    #[test]
    fn scale_by_constant() {
        let f = DiffFn::linear(3.);
        let h = &f * 4.;
        let (v, d) = eval_pair(&h, 2.);
        assert_abs_diff_eq!(v, 24.);
        assert_abs_diff_eq!(d, 12.);
    }

    #[test]
    fn scale_commutes() {
        let f = DiffFn::linear(1.25);
        assert_eq!(eval_pair(&(2. * &f), 8.), eval_pair(&(&f * 2.), 8.));
    }

    #[test]
    fn multiply_functions_product_rule() {
        // f(x) = ax, g(x) = bx: (fg)(x) = ab x^2, (fg)'(x) = 2ab x
        let (a, b) = (3., 2.);
        let h = &DiffFn::linear(a) * &DiffFn::linear(b);
        let x = 5.;
        let (v, d) = eval_pair(&h, x);
        assert_abs_diff_eq!(v, a * b * x * x);
        assert_abs_diff_eq!(d, 2. * a * b * x);
    }

    #[test]
    fn divide_functions_quotient_rule() {
        // ax / bx is the constant a/b, slope zero away from x = 0
        let (a, b) = (4., 2.);
        let h = &DiffFn::linear(a) / &DiffFn::linear(b);
        let (v, d) = eval_pair(&h, 3.);
        assert_abs_diff_eq!(v, a / b);
        assert_abs_diff_eq!(d, 0.);
    }

    #[test]
    fn divide_by_constant_function() {
        let (a, c) = (6., 3.);
        let h = &DiffFn::linear(a) / &DiffFn::constant(c);
        let x = 10.;
        let (v, d) = eval_pair(&h, x);
        assert_abs_diff_eq!(v, a / c * x);
        assert_abs_diff_eq!(d, a / c);
    }

    #[test]
    fn divide_by_scalar_matches_constant_divisor() {
        let f = DiffFn::linear(6.);
        assert_eq!(
            eval_pair(&(&f / 3.), 10.),
            eval_pair(&(&f / &DiffFn::constant(3.)), 10.)
        );
    }

    #[test]
    fn divide_by_zero_fails_at_evaluation_only() {
        let h = &DiffFn::linear(1.) / &DiffFn::constant(0.);
        // building the quotient is fine; evaluating it is not
        assert_eq!(h.value(1.), Err(EvalError::DivisionByZero));
        assert_eq!(h.derivative(1.), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn quotient_derivative_fails_where_denominator_vanishes() {
        let h = &DiffFn::constant(1.) / &DiffFn::linear(1.);
        assert_eq!(h.derivative(0.), Err(EvalError::DivisionByZero));
        assert_abs_diff_eq!(h.derivative(2.).unwrap(), -0.25);
    }

    #[test]
    fn with_dispatches_exactly_once() {
        struct Probe(Cell<usize>);

        impl Combine for Probe {
            type Output = f64;
            fn combine(&self, f: &DiffFn) -> f64 {
                self.0.set(self.0.get() + 1);
                f.value(1.).unwrap()
            }
        }

        let probe = Probe(Cell::new(0));
        let f = DiffFn::linear(2.);
        assert_eq!(f.with(&probe), 2.);
        assert_eq!(probe.0.get(), 1);
    }

    #[test]
    fn combinators_usable_through_the_hook_directly() {
        let f = DiffFn::linear(3.);
        let g = f.with(&Plus(Operand::Scalar(1.)));
        assert_eq!(g.value(2.), Ok(7.));
        assert_eq!(g.derivative(2.), Ok(3.));
    }
}
