//! Random-number sources and small statistics helpers used by the simulators.

pub mod normal_source;

pub use normal_source::{AntitheticSource, FixedSequenceSource, NormalSource, RngNormalSource};

/// Arithmetic mean; `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (divides by `n`); `NaN` for an empty slice.
pub fn variance(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64
}
