//! Simulates every schema factor on one shared grid and packages the result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{MarketError, Result};
use crate::market::{MarketEnvironment, RiskFactorSchema, StateTensorBuilder};
use crate::math::NormalSource;
use crate::mc::{GbmParams, simulate_gbm};

/// Per-factor GBM dynamics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorParams {
    /// Initial level.
    pub s0: f64,
    /// Drift rate.
    pub mu: f64,
    /// Volatility.
    pub sigma: f64,
}

/// Time grid and path count shared by every factor in one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Horizon in years.
    pub horizon: f64,
    /// Steps on the shared grid; every factor gets `n_steps + 1` time points.
    pub n_steps: usize,
    /// Paths simulated per factor.
    pub n_paths: usize,
}

impl SimulationSettings {
    #[inline]
    pub fn dt(&self) -> f64 {
        self.horizon / self.n_steps as f64
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_steps == 0 || self.n_paths == 0 {
            return Err(MarketError::InvalidParameters(format!(
                "n_steps and n_paths must be > 0, got {} steps and {} paths",
                self.n_steps, self.n_paths
            )));
        }
        if !self.horizon.is_finite() || self.horizon < 0.0 {
            return Err(MarketError::InvalidParameters(format!(
                "horizon must be finite and >= 0, got {}",
                self.horizon
            )));
        }
        if self
            .n_steps
            .checked_add(1)
            .and_then(|n_times| n_times.checked_mul(self.n_paths))
            .is_none()
        {
            return Err(MarketError::InvalidParameters(format!(
                "grid of {} paths x {} steps overflows usize",
                self.n_paths, self.n_steps
            )));
        }
        Ok(())
    }

    /// Combines the shared grid with one factor's dynamics.
    pub fn gbm_params(&self, factor: &FactorParams) -> GbmParams {
        GbmParams {
            s0: factor.s0,
            mu: factor.mu,
            sigma: factor.sigma,
            horizon: self.horizon,
            n_steps: self.n_steps,
            n_paths: self.n_paths,
        }
    }
}

/// Sole writer of the state tensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentAssembler {
    settings: SimulationSettings,
}

impl EnvironmentAssembler {
    pub fn new(settings: SimulationSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    /// Simulates each factor in schema index order and freezes the stacked tensor.
    ///
    /// All inputs are validated before the first draw; factor `k` of the schema
    /// occupies slice `k` of axis 2. An empty schema yields a zero-width factor axis.
    ///
    /// # Errors
    /// [`MarketError::InvalidParameters`] for a bad grid or factor dynamics,
    /// [`MarketError::MissingFactorParameters`] when a schema factor has no entry
    /// in `params`, and any error raised by `source`.
    pub fn assemble<S>(
        &self,
        schema: &RiskFactorSchema,
        params: &BTreeMap<String, FactorParams>,
        source: &mut S,
    ) -> Result<MarketEnvironment>
    where
        S: NormalSource + ?Sized,
    {
        self.settings.validate()?;
        let per_factor = schema
            .iter()
            .map(|(id, _)| -> Result<GbmParams> {
                let factor = params
                    .get(id)
                    .ok_or_else(|| MarketError::MissingFactorParameters(id.to_string()))?;
                let gbm = self.settings.gbm_params(factor);
                gbm.validate()?;
                Ok(gbm)
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            factors = schema.len(),
            paths = self.settings.n_paths,
            steps = self.settings.n_steps,
            horizon = self.settings.horizon,
            "simulating market environment"
        );

        let mut builder = StateTensorBuilder::new(
            self.settings.n_paths,
            self.settings.n_steps + 1,
            schema.len(),
        )?;
        for ((id, k), gbm) in schema.iter().zip(&per_factor) {
            debug!(
                factor = id,
                index = k,
                s0 = gbm.s0,
                mu = gbm.mu,
                sigma = gbm.sigma,
                "simulating factor"
            );
            let paths = simulate_gbm(gbm, &mut *source)?;
            builder.set_factor_paths(k, &paths)?;
        }

        let env = MarketEnvironment::new(schema.clone(), builder.freeze(), self.settings.dt())?;
        info!(shape = ?env.state_tensor().shape(), dt = env.dt(), "market environment ready");
        Ok(env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{FixedSequenceSource, RngNormalSource};
    use approx::assert_relative_eq;

    fn settings() -> SimulationSettings {
        SimulationSettings {
            horizon: 1.0,
            n_steps: 4,
            n_paths: 3,
        }
    }

    fn params(pairs: &[(&str, f64)]) -> BTreeMap<String, FactorParams> {
        pairs
            .iter()
            .map(|(id, s0)| {
                (
                    id.to_string(),
                    FactorParams {
                        s0: *s0,
                        mu: 0.01,
                        sigma: 0.1,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn factors_occupy_schema_slices() {
        let schema = RiskFactorSchema::from_identifiers(["ZARUSD", "AAPL"]);
        let p = params(&[("AAPL", 150.0), ("ZARUSD", 0.055)]);
        let env = EnvironmentAssembler::new(settings())
            .assemble(&schema, &p, &mut RngNormalSource::seeded(1))
            .unwrap();
        assert_eq!(env.state_tensor().shape(), (3, 5, 2));
        for path in 0..3 {
            assert_eq!(env.state_tensor()[[path, 0, 0]], 150.0);
            assert_eq!(env.state_tensor()[[path, 0, 1]], 0.055);
        }
        assert_relative_eq!(env.dt(), 0.25);
    }

    #[test]
    fn slices_match_individual_simulations_in_index_order() {
        let schema = RiskFactorSchema::from_identifiers(["B", "A"]);
        let p = params(&[("A", 10.0), ("B", 20.0)]);
        let env = EnvironmentAssembler::new(settings())
            .assemble(&schema, &p, &mut RngNormalSource::seeded(99))
            .unwrap();

        let mut src = RngNormalSource::seeded(99);
        let a = simulate_gbm(&settings().gbm_params(&p["A"]), &mut src).unwrap();
        let b = simulate_gbm(&settings().gbm_params(&p["B"]), &mut src).unwrap();
        assert_eq!(env.state_tensor().factor_matrix(0).unwrap(), a);
        assert_eq!(env.state_tensor().factor_matrix(1).unwrap(), b);
    }

    #[test]
    fn empty_schema_yields_zero_width_tensor() {
        let env = EnvironmentAssembler::new(settings())
            .assemble(
                &RiskFactorSchema::empty(),
                &BTreeMap::new(),
                &mut RngNormalSource::seeded(1),
            )
            .unwrap();
        assert_eq!(env.state_tensor().shape(), (3, 5, 0));
        assert!(env.schema().is_empty());
    }

    #[test]
    fn missing_parameters_fail_before_simulation() {
        let schema = RiskFactorSchema::from_identifiers(["AAPL", "MSFT"]);
        let p = params(&[("AAPL", 150.0)]);
        let mut src = FixedSequenceSource::constant(0.0);
        let err = EnvironmentAssembler::new(settings())
            .assemble(&schema, &p, &mut src)
            .unwrap_err();
        assert!(matches!(err, MarketError::MissingFactorParameters(id) if id == "MSFT"));
    }

    #[test]
    fn invalid_grid_is_rejected() {
        let schema = RiskFactorSchema::from_identifiers(["AAPL"]);
        let p = params(&[("AAPL", 150.0)]);
        for bad in [
            SimulationSettings { n_steps: 0, ..settings() },
            SimulationSettings { n_paths: 0, ..settings() },
            SimulationSettings { horizon: -0.5, ..settings() },
        ] {
            let res = EnvironmentAssembler::new(bad).assemble(
                &schema,
                &p,
                &mut RngNormalSource::seeded(1),
            );
            assert!(matches!(res, Err(MarketError::InvalidParameters(_))));
        }
    }

    #[test]
    fn overflowing_grid_is_rejected_even_without_factors() {
        let huge_steps = SimulationSettings {
            n_steps: usize::MAX,
            ..settings()
        };
        let huge_paths = SimulationSettings {
            n_paths: 1 << 62,
            ..settings()
        };
        for bad in [huge_steps, huge_paths] {
            let res = EnvironmentAssembler::new(bad).assemble(
                &RiskFactorSchema::empty(),
                &BTreeMap::new(),
                &mut FixedSequenceSource::constant(0.0),
            );
            assert!(matches!(res, Err(MarketError::InvalidParameters(_))));
        }
    }

    #[test]
    fn negative_volatility_is_rejected() {
        let schema = RiskFactorSchema::from_identifiers(["AAPL"]);
        let mut p = params(&[("AAPL", 150.0)]);
        p.get_mut("AAPL").unwrap().sigma = -0.2;
        let res = EnvironmentAssembler::new(settings()).assemble(
            &schema,
            &p,
            &mut RngNormalSource::seeded(1),
        );
        assert!(res.is_err());
    }

    #[test]
    fn extra_parameters_are_ignored() {
        let schema = RiskFactorSchema::from_identifiers(["AAPL"]);
        let p = params(&[("AAPL", 150.0), ("UNUSED", 1.0)]);
        let env = EnvironmentAssembler::new(settings())
            .assemble(&schema, &p, &mut RngNormalSource::seeded(5))
            .unwrap();
        assert_eq!(env.state_tensor().n_factors(), 1);
    }
}
