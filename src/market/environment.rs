//! Immutable simulated market state handed to valuation engines.
//!
//! The state tensor has shape `(paths, timesteps + 1, factors)` and is stored
//! row-major in a shared `Arc<[f64]>`. The only writable form is
//! [`StateTensorBuilder`]; [`StateTensorBuilder::freeze`] moves the buffer into a
//! [`StateTensor`], which exposes no mutable access at all. Writes through a
//! frozen tensor are rejected at compile time:
//!
//! ```compile_fail
//! use marketgen::market::{MarketEnvironment, RiskFactorSchema, StateTensorBuilder};
//!
//! let schema = RiskFactorSchema::from_identifiers(["SPX"]);
//! let tensor = StateTensorBuilder::new(2, 2, 1).unwrap().freeze();
//! let env = MarketEnvironment::new(schema, tensor, 1.0).unwrap();
//! let mut view = env.state_tensor().clone();
//! view[[0, 0, 0]] = 1.0;
//! ```

use std::ops::Index;
use std::sync::Arc;

use nalgebra::DMatrix;

use crate::core::{MarketError, Result};
use crate::market::RiskFactorSchema;

/// Write-once staging buffer for a state tensor.
#[derive(Debug, Clone)]
pub struct StateTensorBuilder {
    data: Vec<f64>,
    n_paths: usize,
    n_times: usize,
    n_factors: usize,
}

impl StateTensorBuilder {
    /// Zero-filled buffer of shape `(n_paths, n_times, n_factors)`.
    ///
    /// # Errors
    /// [`MarketError::InvalidParameters`] if the element count overflows `usize`.
    pub fn new(n_paths: usize, n_times: usize, n_factors: usize) -> Result<Self> {
        let len = n_paths
            .checked_mul(n_times)
            .and_then(|n| n.checked_mul(n_factors))
            .ok_or_else(|| {
                MarketError::InvalidParameters(format!(
                    "state tensor shape ({n_paths}, {n_times}, {n_factors}) overflows usize"
                ))
            })?;
        Ok(Self {
            data: vec![0.0; len],
            n_paths,
            n_times,
            n_factors,
        })
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        (self.n_paths, self.n_times, self.n_factors)
    }

    pub fn set(&mut self, path: usize, time: usize, factor: usize, value: f64) -> Result<()> {
        if path >= self.n_paths || time >= self.n_times || factor >= self.n_factors {
            return Err(MarketError::InvalidParameters(format!(
                "tensor index ({path}, {time}, {factor}) outside shape {:?}",
                self.shape()
            )));
        }
        self.data[(path * self.n_times + time) * self.n_factors + factor] = value;
        Ok(())
    }

    /// Copies a `(n_paths, n_times)` path matrix into factor slice `factor`.
    pub fn set_factor_paths(&mut self, factor: usize, paths: &DMatrix<f64>) -> Result<()> {
        if factor >= self.n_factors {
            return Err(MarketError::InvalidParameters(format!(
                "factor slice {factor} outside 0..{}",
                self.n_factors
            )));
        }
        if paths.shape() != (self.n_paths, self.n_times) {
            return Err(MarketError::InvalidParameters(format!(
                "path matrix shape {:?} does not match tensor grid ({}, {})",
                paths.shape(),
                self.n_paths,
                self.n_times
            )));
        }
        for p in 0..self.n_paths {
            let row_base = p * self.n_times;
            for t in 0..self.n_times {
                self.data[(row_base + t) * self.n_factors + factor] = paths[(p, t)];
            }
        }
        Ok(())
    }

    /// Locks the buffer; no further writes are possible.
    pub fn freeze(self) -> StateTensor {
        StateTensor {
            data: Arc::from(self.data),
            n_paths: self.n_paths,
            n_times: self.n_times,
            n_factors: self.n_factors,
        }
    }
}

/// Read-only three-axis tensor `(path, time, factor)`.
///
/// Cloning is cheap and shares the underlying buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct StateTensor {
    data: Arc<[f64]>,
    n_paths: usize,
    n_times: usize,
    n_factors: usize,
}

impl StateTensor {
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.n_paths, self.n_times, self.n_factors)
    }

    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Number of time points, i.e. steps + 1.
    pub fn n_times(&self) -> usize {
        self.n_times
    }

    pub fn n_factors(&self) -> usize {
        self.n_factors
    }

    #[inline]
    fn offset(&self, path: usize, time: usize, factor: usize) -> usize {
        (path * self.n_times + time) * self.n_factors + factor
    }

    pub fn get(&self, path: usize, time: usize, factor: usize) -> Option<f64> {
        if path < self.n_paths && time < self.n_times && factor < self.n_factors {
            Some(self.data[self.offset(path, time, factor)])
        } else {
            None
        }
    }

    /// Flat row-major view.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Detached copy; mutating it never affects this tensor.
    pub fn to_vec(&self) -> Vec<f64> {
        self.data.to_vec()
    }

    /// One path of one factor across the time grid.
    pub fn factor_path(&self, path: usize, factor: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.n_times).map(move |t| self[[path, t, factor]])
    }

    /// Final-time values of `factor` across all paths.
    pub fn terminal_values(&self, factor: usize) -> Vec<f64> {
        let last = self.n_times.saturating_sub(1);
        (0..self.n_paths)
            .map(|p| self[[p, last, factor]])
            .collect()
    }

    /// Copies factor slice `factor` out as a `(paths, times)` matrix.
    pub fn factor_matrix(&self, factor: usize) -> Option<DMatrix<f64>> {
        (factor < self.n_factors).then(|| {
            DMatrix::from_fn(self.n_paths, self.n_times, |p, t| {
                self.data[self.offset(p, t, factor)]
            })
        })
    }

    /// True when both tensors point at the same buffer.
    pub fn shares_buffer_with(&self, other: &StateTensor) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl Index<[usize; 3]> for StateTensor {
    type Output = f64;

    fn index(&self, [path, time, factor]: [usize; 3]) -> &f64 {
        assert!(
            path < self.n_paths && time < self.n_times && factor < self.n_factors,
            "tensor index ({path}, {time}, {factor}) outside shape {:?}",
            self.shape()
        );
        &self.data[self.offset(path, time, factor)]
    }
}

/// Simulated state bundle: schema, locked tensor, and time-step size.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketEnvironment {
    schema: RiskFactorSchema,
    state_tensor: StateTensor,
    dt: f64,
}

impl MarketEnvironment {
    /// # Errors
    /// [`MarketError::InvalidParameters`] if axis 2 disagrees with the schema
    /// length or `dt` is negative or non-finite.
    pub fn new(schema: RiskFactorSchema, state_tensor: StateTensor, dt: f64) -> Result<Self> {
        if state_tensor.n_factors() != schema.len() {
            return Err(MarketError::InvalidParameters(format!(
                "state tensor has {} factor slices but schema has {} factors",
                state_tensor.n_factors(),
                schema.len()
            )));
        }
        if !dt.is_finite() || dt < 0.0 {
            return Err(MarketError::InvalidParameters(format!(
                "dt must be finite and >= 0, got {dt}"
            )));
        }
        Ok(Self {
            schema,
            state_tensor,
            dt,
        })
    }

    pub fn schema(&self) -> &RiskFactorSchema {
        &self.schema
    }

    pub fn state_tensor(&self) -> &StateTensor {
        &self.state_tensor
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn n_paths(&self) -> usize {
        self.state_tensor.n_paths()
    }

    pub fn n_steps(&self) -> usize {
        self.state_tensor.n_times().saturating_sub(1)
    }

    /// Times `j * dt` for every point on axis 1.
    pub fn time_grid(&self) -> Vec<f64> {
        (0..self.state_tensor.n_times())
            .map(|j| j as f64 * self.dt)
            .collect()
    }

    pub fn factor_index(&self, factor: &str) -> Result<usize> {
        self.schema.get_index(factor)
    }

    /// Simulated level of `factor` on `path` at time index `time`.
    pub fn factor_value(&self, factor: &str, path: usize, time: usize) -> Result<f64> {
        let k = self.schema.get_index(factor)?;
        self.state_tensor.get(path, time, k).ok_or_else(|| {
            MarketError::InvalidParameters(format!(
                "path {path} / time {time} outside tensor shape {:?}",
                self.state_tensor.shape()
            ))
        })
    }

    /// `(paths, times)` matrix for `factor`.
    pub fn factor_matrix(&self, factor: &str) -> Result<DMatrix<f64>> {
        let k = self.schema.get_index(factor)?;
        self.state_tensor.factor_matrix(k).ok_or_else(|| {
            MarketError::InvalidParameters(format!("factor slice {k} missing from tensor"))
        })
    }
}
