//! marketgen prepares simulated market state for downstream valuation of a
//! derivatives portfolio.
//!
//! Given a set of positions the crate determines exactly which risk factors they
//! depend on, simulates geometric Brownian motion paths for each factor on a
//! shared time grid, and packages the result into an immutable tensor indexed
//! by integer factor slots, so valuation engines never look anything up by name
//! in their inner loops.
//!
//! References:
//! - Glasserman (2004), *Monte Carlo Methods in Financial Engineering*, Ch. 3.2 for
//!   the exact log-space GBM discretization.
//! - Hull, *Options, Futures, and Other Derivatives* (11th ed.), Ch. 14.
//!
//! Numerical considerations:
//! - All arithmetic is `f64`. Path counts and step counts must be positive.
//! - Randomness is injected through [`math::NormalSource`]; seeded sources make
//!   every run bit-for-bit reproducible, including with the `parallel` feature.
//!
//! # Feature Flags
//! - `parallel`: enables Rayon-powered per-path accumulation in the GBM simulator.
//!
//! # Quick Start
//! ```rust
//! use chrono::NaiveDate;
//! use marketgen::core::Currency;
//! use marketgen::instruments::{EquityForward, FxForward};
//! use marketgen::market::{
//!     DependencyResolver, EnvironmentAssembler, FactorParams, SimulationSettings,
//! };
//! use marketgen::math::RngNormalSource;
//! use marketgen::portfolio::Position;
//! use std::collections::BTreeMap;
//!
//! let date = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
//! let positions = vec![
//!     Position::new("P1", EquityForward {
//!         underlying_id: "AAPL".to_string(),
//!         strike: 150.0,
//!         maturity_date: date,
//!         currency: Currency::Usd,
//!     }),
//!     Position::new("P2", FxForward {
//!         base_currency: Currency::Zar,
//!         quote_currency: Currency::Usd,
//!         strike: 0.055,
//!         maturity_date: date,
//!     }),
//! ];
//!
//! let schema = DependencyResolver.resolve(&positions);
//! let params = BTreeMap::from([
//!     ("AAPL".to_string(), FactorParams { s0: 150.0, mu: 0.05, sigma: 0.25 }),
//!     ("ZARUSD".to_string(), FactorParams { s0: 0.055, mu: 0.0, sigma: 0.15 }),
//! ]);
//! let settings = SimulationSettings { horizon: 1.0, n_steps: 252, n_paths: 100 };
//! let env = EnvironmentAssembler::new(settings)
//!     .assemble(&schema, &params, &mut RngNormalSource::seeded(42))
//!     .unwrap();
//!
//! let fx = env.schema().get_index("ZARUSD").unwrap();
//! assert_eq!(env.state_tensor().shape(), (100, 253, 2));
//! assert_eq!(env.state_tensor()[[0, 0, fx]], 0.055);
//! ```

pub mod config;
pub mod core;
pub mod instruments;
pub mod market;
pub mod math;
pub mod mc;
pub mod models;
pub mod portfolio;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::config::SimulationConfig;
    pub use crate::core::{Currency, LongShort, MarketError, OptionType, Side};
    pub use crate::instruments::*;
    pub use crate::market::*;
    pub use crate::math::{NormalSource, RngNormalSource};
    pub use crate::portfolio::*;
}
