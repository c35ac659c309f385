//! Standard-normal variate sources for path simulation.
//!
//! [`NormalSource`] fixes only the shape and distribution of the draws, so a
//! seeded engine, an entropy-seeded engine, a variance-reduction wrapper, or a
//! fixed test sequence can be injected wherever a simulator needs randomness.
//! All implementations fill matrices in row-major order: every step of path 0,
//! then path 1, and so on.

use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

use crate::core::{MarketError, Result};

/// Source of i.i.d. standard-normal matrices.
pub trait NormalSource {
    /// Returns an `n_paths x n_steps` matrix of independent N(0, 1) draws.
    ///
    /// # Errors
    /// [`MarketError::InvalidParameters`] if either dimension is zero.
    fn generate(&mut self, n_paths: usize, n_steps: usize) -> Result<DMatrix<f64>>;
}

impl<S: NormalSource + ?Sized> NormalSource for Box<S> {
    fn generate(&mut self, n_paths: usize, n_steps: usize) -> Result<DMatrix<f64>> {
        (**self).generate(n_paths, n_steps)
    }
}

/// Validates the requested shape and returns the element count.
#[inline]
fn check_dimensions(n_paths: usize, n_steps: usize) -> Result<usize> {
    if n_paths == 0 || n_steps == 0 {
        return Err(MarketError::InvalidParameters(format!(
            "normal matrix dimensions must be positive, got {n_paths} paths x {n_steps} steps"
        )));
    }
    n_paths.checked_mul(n_steps).ok_or_else(|| {
        MarketError::InvalidParameters(format!(
            "normal matrix of {n_paths} paths x {n_steps} steps overflows usize"
        ))
    })
}

/// Normal source backed by any `rand` engine, sampling via `rand_distr::StandardNormal`.
///
/// # Examples
/// ```
/// use marketgen::math::{NormalSource, RngNormalSource};
///
/// let mut a = RngNormalSource::seeded(42);
/// let mut b = RngNormalSource::seeded(42);
/// let za = a.generate(4, 3).unwrap();
/// let zb = b.generate(4, 3).unwrap();
/// assert_eq!(za.shape(), (4, 3));
/// assert_eq!(za, zb);
/// ```
#[derive(Debug, Clone)]
pub struct RngNormalSource<R> {
    rng: R,
}

impl<R: Rng> RngNormalSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngNormalSource<StdRng> {
    /// Reproducible source: the same seed always yields the same draws.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Non-reproducible source seeded from the thread-local generator.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_rng(&mut rand::rng()))
    }
}

impl<R: Rng> NormalSource for RngNormalSource<R> {
    fn generate(&mut self, n_paths: usize, n_steps: usize) -> Result<DMatrix<f64>> {
        let len = check_dimensions(n_paths, n_steps)?;
        let data: Vec<f64> = (0..len)
            .map(|_| StandardNormal.sample(&mut self.rng))
            .collect();
        Ok(DMatrix::from_row_slice(n_paths, n_steps, &data))
    }
}

/// Antithetic variance reduction: row `2i + 1` is the negation of row `2i`.
///
/// Only `ceil(n_paths / 2)` rows are drawn from the inner source.
#[derive(Debug, Clone)]
pub struct AntitheticSource<S> {
    inner: S,
}

impl<S: NormalSource> AntitheticSource<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: NormalSource> NormalSource for AntitheticSource<S> {
    fn generate(&mut self, n_paths: usize, n_steps: usize) -> Result<DMatrix<f64>> {
        check_dimensions(n_paths, n_steps)?;
        let base = self.inner.generate(n_paths.div_ceil(2), n_steps)?;
        Ok(DMatrix::from_fn(n_paths, n_steps, |i, j| {
            let z = base[(i / 2, j)];
            if i % 2 == 0 { z } else { -z }
        }))
    }
}

/// Deterministic source cycling over a fixed sequence; intended as a test double.
///
/// ```
/// use marketgen::math::{FixedSequenceSource, NormalSource};
///
/// let mut src = FixedSequenceSource::new(vec![1.0, -1.0]).unwrap();
/// let z = src.generate(2, 3).unwrap();
/// assert_eq!(z[(0, 0)], 1.0);
/// assert_eq!(z[(0, 1)], -1.0);
/// assert_eq!(z[(1, 0)], -1.0);
/// ```
#[derive(Debug, Clone)]
pub struct FixedSequenceSource {
    values: Vec<f64>,
    cursor: usize,
}

impl FixedSequenceSource {
    /// # Errors
    /// [`MarketError::InvalidParameters`] if `values` is empty.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(MarketError::InvalidParameters(
                "fixed normal sequence must not be empty".to_string(),
            ));
        }
        Ok(Self { values, cursor: 0 })
    }

    /// Source that always returns `value`.
    pub fn constant(value: f64) -> Self {
        Self {
            values: vec![value],
            cursor: 0,
        }
    }
}

impl NormalSource for FixedSequenceSource {
    fn generate(&mut self, n_paths: usize, n_steps: usize) -> Result<DMatrix<f64>> {
        let len = check_dimensions(n_paths, n_steps)?;
        let mut data = Vec::with_capacity(len);
        for _ in 0..len {
            data.push(self.values[self.cursor]);
            self.cursor = (self.cursor + 1) % self.values.len();
        }
        Ok(DMatrix::from_row_slice(n_paths, n_steps, &data))
    }
}
