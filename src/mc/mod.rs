//! Monte Carlo path simulators.

pub mod gbm;

pub use gbm::{GbmParams, simulate_gbm, simulate_gbm_default};
