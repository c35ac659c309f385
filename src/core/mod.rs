//! Common domain enums and the library-wide error type.

pub mod types;

pub use types::*;

/// Errors surfaced by resolution, simulation, and environment assembly.
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    /// Instrument variant outside the closed set the resolver understands.
    #[error("unsupported instrument type in resolver: {type_name}")]
    UnsupportedInstrument { type_name: String },
    /// Schema lookup for an identifier that was never resolved.
    #[error(
        "risk factor '{factor}' not present in the market environment; available factors: {available:?}"
    )]
    UnknownRiskFactor {
        factor: String,
        available: Vec<String>,
    },
    /// Input validation error raised before any simulation work.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    /// A schema factor has no simulation parameter set.
    #[error("no simulation parameters supplied for risk factor '{0}'")]
    MissingFactorParameters(String),
    #[error("trade '{0}' not found")]
    TradeNotFound(String),
    #[error("duplicate trade id '{0}' in portfolio")]
    DuplicateTrade(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Library-wide result alias.
pub type Result<T> = std::result::Result<T, MarketError>;
