use gradfn::{DiffFn, EvalError};

fn main() -> Result<(), EvalError> {
    // f(x) = sin(2x) / sqrt(x^2 + 1), differentiated by composition
    let x = DiffFn::linear(1.);
    let xx = &x * &x;
    let denom = (&xx + 1.).sqrt();
    let numer = DiffFn::linear(2.).sin();
    let f = &numer / &denom;

    for i in 0..=10 {
        let x = i as f64 * 0.5 - 2.5;
        println!(
            "f({x:5.2}) = {:9.6}   f'({x:5.2}) = {:9.6}",
            f.value(x)?,
            f.derivative(x)?
        );
    }
    Ok(())
}
