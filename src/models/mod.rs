//! Stochastic process models for risk-factor dynamics.

use serde::{Deserialize, Serialize};

/// Geometric Brownian motion `dS = mu S dt + sigma S dW`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gbm {
    pub mu: f64,
    pub sigma: f64,
}

impl Gbm {
    pub fn drift(&self, s: f64) -> f64 {
        self.mu * s
    }

    pub fn diffusion(&self, s: f64) -> f64 {
        self.sigma * s
    }

    /// Itô-corrected log-return over `dt` driven by a standard normal `z`.
    #[inline]
    pub fn log_increment(&self, dt: f64, z: f64) -> f64 {
        let drift = (self.mu - 0.5 * self.sigma * self.sigma) * dt;
        (self.sigma * dt.sqrt()).mul_add(z, drift)
    }

    /// Exact one-step transition.
    pub fn step_exact(&self, s: f64, dt: f64, z: f64) -> f64 {
        s * self.log_increment(dt, z).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_shock_step_grows_at_ito_corrected_drift() {
        let m = Gbm {
            mu: 0.05,
            sigma: 0.2,
        };
        let s1 = m.step_exact(100.0, 1.0, 0.0);
        assert_relative_eq!(s1, 100.0 * (0.05_f64 - 0.02).exp(), epsilon = 1e-12);
    }

    #[test]
    fn drift_and_diffusion_are_proportional_to_level() {
        let m = Gbm {
            mu: 0.1,
            sigma: 0.3,
        };
        assert_relative_eq!(m.drift(50.0), 5.0);
        assert_relative_eq!(m.diffusion(50.0), 15.0);
    }

    #[test]
    fn zero_dt_leaves_level_unchanged() {
        let m = Gbm {
            mu: 0.05,
            sigma: 0.2,
        };
        assert_eq!(m.step_exact(42.0, 0.0, 1.7), 42.0);
    }
}
