//! Instrument definitions.
//!
//! [`Instrument`] is the closed set of contract variants a position may hold.
//! Every variant maps to exactly one simulated risk factor through
//! [`Instrument::risk_factor`].

pub mod equity;
pub mod fx;

pub use equity::{EquityForward, EquityOption};
pub use fx::{FxForward, FxOption, pair_identifier};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{MarketError, Result};

/// Tagged union over all supported instruments.
///
/// Serialized with an `instrument_type` tag:
/// ```
/// use marketgen::instruments::Instrument;
///
/// let json = r#"{
///     "instrument_type": "fx_forward",
///     "base_currency": "ZAR",
///     "quote_currency": "USD",
///     "strike": 0.055,
///     "maturity_date": "2025-01-01"
/// }"#;
/// let inst: Instrument = serde_json::from_str(json).unwrap();
/// assert_eq!(inst.risk_factor(), "ZARUSD");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "instrument_type", rename_all = "snake_case")]
pub enum Instrument {
    EquityForward(EquityForward),
    EquityOption(EquityOption),
    FxForward(FxForward),
    FxOption(FxOption),
}

impl Instrument {
    /// Wire tags of every supported variant.
    pub const KNOWN_TYPES: [&'static str; 4] =
        ["equity_forward", "equity_option", "fx_forward", "fx_option"];

    /// Returns the `instrument_type` tag of this variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::EquityForward(_) => "equity_forward",
            Self::EquityOption(_) => "equity_option",
            Self::FxForward(_) => "fx_forward",
            Self::FxOption(_) => "fx_option",
        }
    }

    /// Identifier of the risk factor this instrument depends on.
    pub fn risk_factor(&self) -> String {
        match self {
            Self::EquityForward(EquityForward { underlying_id, .. })
            | Self::EquityOption(EquityOption { underlying_id, .. }) => underlying_id.clone(),
            Self::FxForward(FxForward {
                base_currency,
                quote_currency,
                ..
            })
            | Self::FxOption(FxOption {
                base_currency,
                quote_currency,
                ..
            }) => pair_identifier(*base_currency, *quote_currency),
        }
    }

    /// Decodes an untyped instrument payload.
    ///
    /// # Errors
    /// [`MarketError::UnsupportedInstrument`] when the `instrument_type` tag is
    /// missing, not a string, or outside [`Instrument::KNOWN_TYPES`]. A non-string
    /// tag is named by its JSON text. [`MarketError::Json`] when
    /// a known tag carries malformed fields.
    pub fn from_value(value: Value) -> Result<Self> {
        let type_name = match value.get("instrument_type") {
            Some(Value::String(tag)) => tag.clone(),
            Some(other) => other.to_string(),
            None => "<untagged>".to_string(),
        };
        if !Self::KNOWN_TYPES.contains(&type_name.as_str()) {
            return Err(MarketError::UnsupportedInstrument { type_name });
        }
        Ok(serde_json::from_value(value)?)
    }
}

impl From<EquityForward> for Instrument {
    fn from(value: EquityForward) -> Self {
        Self::EquityForward(value)
    }
}

impl From<EquityOption> for Instrument {
    fn from(value: EquityOption) -> Self {
        Self::EquityOption(value)
    }
}

impl From<FxForward> for Instrument {
    fn from(value: FxForward) -> Self {
        Self::FxForward(value)
    }
}

impl From<FxOption> for Instrument {
    fn from(value: FxOption) -> Self {
        Self::FxOption(value)
    }
}
