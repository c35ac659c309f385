//! Geometric Brownian motion path simulation on a uniform time grid.
//!
//! Paths follow the exact log-space recursion
//! `ln S(t_j) = ln S0 + sum_{i<=j} [(mu - sigma^2/2) dt + sigma sqrt(dt) Z_i]`,
//! which is unbiased at any step size for constant coefficients.
//!
//! Random draws are always taken sequentially from the injected source. With the
//! `parallel` feature the per-path accumulation fans out over rayon, producing
//! bit-identical output.

use nalgebra::DMatrix;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::{MarketError, Result};
use crate::math::{NormalSource, RngNormalSource};
use crate::models::Gbm;

/// Inputs for one GBM simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GbmParams {
    /// Initial level `S0`.
    pub s0: f64,
    /// Drift rate.
    pub mu: f64,
    /// Volatility.
    pub sigma: f64,
    /// Time horizon `T` in years.
    pub horizon: f64,
    /// Number of time steps `K`; output has `K + 1` columns.
    pub n_steps: usize,
    /// Number of simulated paths.
    pub n_paths: usize,
}

impl GbmParams {
    /// Step size `T / n_steps`.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.horizon / self.n_steps as f64
    }

    pub fn model(&self) -> Gbm {
        Gbm {
            mu: self.mu,
            sigma: self.sigma,
        }
    }

    /// Rejects parameter sets that would yield degenerate or non-finite paths.
    pub fn validate(&self) -> Result<()> {
        if self.n_steps == 0 {
            return Err(MarketError::InvalidParameters(
                "gbm n_steps must be > 0".to_string(),
            ));
        }
        if self.n_paths == 0 {
            return Err(MarketError::InvalidParameters(
                "gbm n_paths must be > 0".to_string(),
            ));
        }
        if !self.horizon.is_finite() || self.horizon < 0.0 {
            return Err(MarketError::InvalidParameters(format!(
                "gbm horizon must be finite and >= 0, got {}",
                self.horizon
            )));
        }
        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(MarketError::InvalidParameters(format!(
                "gbm sigma must be finite and >= 0, got {}",
                self.sigma
            )));
        }
        if !self.s0.is_finite() || !self.mu.is_finite() {
            return Err(MarketError::InvalidParameters(
                "gbm s0 and mu must be finite".to_string(),
            ));
        }
        self.output_len()?;
        Ok(())
    }

    /// Element count of the `n_paths x (n_steps + 1)` output.
    fn output_len(&self) -> Result<usize> {
        self.n_steps
            .checked_add(1)
            .and_then(|cols| cols.checked_mul(self.n_paths))
            .ok_or_else(|| {
                MarketError::InvalidParameters(format!(
                    "gbm output of {} paths x {} steps overflows usize",
                    self.n_paths, self.n_steps
                ))
            })
    }
}

/// Simulates `n_paths x (n_steps + 1)` GBM levels; column 0 equals `s0` exactly.
///
/// Parameters are validated before anything is drawn from `source`; errors raised
/// by the source propagate unchanged.
///
/// # Examples
/// ```
/// use marketgen::math::RngNormalSource;
/// use marketgen::mc::{GbmParams, simulate_gbm};
///
/// let params = GbmParams {
///     s0: 100.0,
///     mu: 0.05,
///     sigma: 0.2,
///     horizon: 1.0,
///     n_steps: 12,
///     n_paths: 3,
/// };
/// let paths = simulate_gbm(&params, &mut RngNormalSource::seeded(42)).unwrap();
/// assert_eq!(paths.shape(), (3, 13));
/// assert!(paths.column(0).iter().all(|&s| s == 100.0));
/// ```
pub fn simulate_gbm<S>(params: &GbmParams, source: &mut S) -> Result<DMatrix<f64>>
where
    S: NormalSource + ?Sized,
{
    params.validate()?;
    let len = params.output_len()?;
    let z = source.generate(params.n_paths, params.n_steps)?;

    let model = params.model();
    let dt = params.dt();
    let s0 = params.s0;
    let cols = params.n_steps + 1;

    let fill_path = |(i, row): (usize, &mut [f64])| {
        row[0] = s0;
        let mut log_return = 0.0;
        for j in 0..params.n_steps {
            log_return += model.log_increment(dt, z[(i, j)]);
            row[j + 1] = s0 * log_return.exp();
        }
    };

    let mut data = vec![0.0_f64; len];
    #[cfg(feature = "parallel")]
    data.par_chunks_mut(cols).enumerate().for_each(fill_path);
    #[cfg(not(feature = "parallel"))]
    data.chunks_mut(cols).enumerate().for_each(fill_path);

    Ok(DMatrix::from_row_slice(params.n_paths, cols, &data))
}

/// [`simulate_gbm`] with a fresh entropy-seeded source.
pub fn simulate_gbm_default(params: &GbmParams) -> Result<DMatrix<f64>> {
    simulate_gbm(params, &mut RngNormalSource::from_entropy())
}
