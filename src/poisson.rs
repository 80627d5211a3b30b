use thiserror::Error;

/// Error raised for arguments outside the distribution's domain.
#[derive(Debug, Error, PartialEq)]
pub enum PoissonError {
    /// The rate parameter must be non-negative.
    #[error("rate parameter must be non-negative, got {0}")]
    NegativeRate(f64),
}

/// Probability of observing exactly `k` events at rate `lambda`.
///
/// Evaluates `e^-lambda * lambda^k / k!` by multiplicative recurrence, so
/// neither `lambda^k` nor `k!` is ever formed on its own.
pub fn pmf(k: u64, lambda: f64) -> Result<f64, PoissonError> {
    if lambda < 0.0 {
        return Err(PoissonError::NegativeRate(lambda));
    }

    let mut p = (-lambda).exp();

    for i in 1..=k {
        p *= lambda / i as f64;
    }

    Ok(p)
}
