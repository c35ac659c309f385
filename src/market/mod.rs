//! Market-state generation: dependency resolution, factor simulation, and the
//! immutable environment handed to valuation engines.
//!
//! The pipeline runs positions -> [`DependencyResolver`] -> [`RiskFactorSchema`]
//! -> [`EnvironmentAssembler`] -> [`MarketEnvironment`]. The environment keeps no
//! reference to the positions or the resolver.

pub mod assembler;
pub mod environment;
pub mod resolver;
pub mod schema;

pub use assembler::{EnvironmentAssembler, FactorParams, SimulationSettings};
pub use environment::{MarketEnvironment, StateTensor, StateTensorBuilder};
pub use resolver::DependencyResolver;
pub use schema::RiskFactorSchema;

use crate::config::SimulationConfig;
use crate::core::Result;
use crate::portfolio::Position;

/// Resolves `positions` and simulates the resulting schema under `config`.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use marketgen::config::SimulationConfig;
/// use marketgen::core::Currency;
/// use marketgen::instruments::EquityForward;
/// use marketgen::market::{FactorParams, SimulationSettings, generate_environment};
/// use marketgen::portfolio::Position;
///
/// let positions = vec![Position::new("P1", EquityForward {
///     underlying_id: "AAPL".to_string(),
///     strike: 150.0,
///     maturity_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     currency: Currency::Usd,
/// })];
/// let config = SimulationConfig::new(SimulationSettings { horizon: 1.0, n_steps: 12, n_paths: 8 })
///     .with_seed(42)
///     .with_factor("AAPL", FactorParams { s0: 150.0, mu: 0.05, sigma: 0.2 });
///
/// let env = generate_environment(&positions, &config).unwrap();
/// assert_eq!(env.state_tensor().shape(), (8, 13, 1));
/// ```
pub fn generate_environment<'a, I>(
    positions: I,
    config: &SimulationConfig,
) -> Result<MarketEnvironment>
where
    I: IntoIterator<Item = &'a Position>,
{
    let schema = DependencyResolver.resolve(positions);
    let mut source = config.normal_source();
    EnvironmentAssembler::new(config.settings).assemble(&schema, &config.factors, &mut source)
}
