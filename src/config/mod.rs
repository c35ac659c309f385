//! JSON simulation configuration.
//!
//! ```
//! use marketgen::config::SimulationConfig;
//!
//! let cfg = SimulationConfig::from_json_str(r#"{
//!     "horizon": 1.0,
//!     "n_steps": 252,
//!     "n_paths": 1000,
//!     "seed": 42,
//!     "factors": {
//!         "AAPL":   { "s0": 150.0, "mu": 0.05, "sigma": 0.25 },
//!         "ZARUSD": { "s0": 0.055, "mu": 0.0,  "sigma": 0.15 }
//!     }
//! }"#).unwrap();
//! assert_eq!(cfg.settings.n_steps, 252);
//! assert!(!cfg.antithetic);
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{MarketError, Result};
use crate::market::{FactorParams, SimulationSettings};
use crate::math::{AntitheticSource, NormalSource, RngNormalSource};

/// Grid, randomness, and per-factor dynamics for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Shared grid, flattened into the top-level JSON object.
    #[serde(flatten)]
    pub settings: SimulationSettings,
    /// Fixed seed for reproducible runs; entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Pair each draw with its negation.
    #[serde(default)]
    pub antithetic: bool,
    /// Dynamics keyed by risk-factor identifier.
    #[serde(default)]
    pub factors: BTreeMap<String, FactorParams>,
}

impl SimulationConfig {
    pub fn new(settings: SimulationSettings) -> Self {
        Self {
            settings,
            seed: None,
            antithetic: false,
            factors: BTreeMap::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_antithetic(mut self, antithetic: bool) -> Self {
        self.antithetic = antithetic;
        self
    }

    pub fn with_factor(mut self, id: impl Into<String>, params: FactorParams) -> Self {
        self.factors.insert(id.into(), params);
        self
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads, parses, and validates a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading simulation config");
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Checks the shared grid and every factor's dynamics.
    pub fn validate(&self) -> Result<()> {
        self.settings.validate()?;
        for (id, factor) in &self.factors {
            self.settings
                .gbm_params(factor)
                .validate()
                .map_err(|err| {
                    MarketError::InvalidParameters(format!("factor '{id}': {err}"))
                })?;
        }
        Ok(())
    }

    /// Builds the configured normal source.
    pub fn normal_source(&self) -> Box<dyn NormalSource> {
        let base = match self.seed {
            Some(seed) => RngNormalSource::seeded(seed),
            None => RngNormalSource::from_entropy(),
        };
        if self.antithetic {
            Box::new(AntitheticSource::new(base))
        } else {
            Box::new(base)
        }
    }
}
