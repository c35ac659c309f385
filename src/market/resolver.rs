//! Discovers the risk factors a set of positions depends on.

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::debug;

use crate::core::Result;
use crate::market::RiskFactorSchema;
use crate::portfolio::Position;

/// Stateless scanner that turns positions into a [`RiskFactorSchema`].
///
/// Identifiers are deduplicated and sorted before indices are assigned, so the
/// resulting schema depends only on the *set* of factors referenced.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use marketgen::core::Currency;
/// use marketgen::instruments::{EquityForward, FxForward};
/// use marketgen::market::DependencyResolver;
/// use marketgen::portfolio::Position;
///
/// let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// let positions = vec![
///     Position::new("P2", FxForward {
///         base_currency: Currency::Zar,
///         quote_currency: Currency::Usd,
///         strike: 0.055,
///         maturity_date: date,
///     }),
///     Position::new("P1", EquityForward {
///         underlying_id: "AAPL".to_string(),
///         strike: 150.0,
///         maturity_date: date,
///         currency: Currency::Usd,
///     }),
/// ];
/// let schema = DependencyResolver.resolve(&positions);
/// assert_eq!(schema.get_index("AAPL").unwrap(), 0);
/// assert_eq!(schema.get_index("ZARUSD").unwrap(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyResolver;

impl DependencyResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolves typed positions. Empty input yields an empty schema.
    pub fn resolve<'a, I>(&self, positions: I) -> RiskFactorSchema
    where
        I: IntoIterator<Item = &'a Position>,
    {
        let mut scanned = 0_usize;
        let factors: BTreeSet<String> = positions
            .into_iter()
            .inspect(|_| scanned += 1)
            .map(|pos| pos.instrument.risk_factor())
            .collect();
        debug!(
            positions = scanned,
            factors = factors.len(),
            "resolved risk factor dependencies"
        );
        RiskFactorSchema::from_identifiers(factors)
    }

    /// Resolves untyped position payloads, failing on the first instrument
    /// variant outside the supported set.
    ///
    /// # Errors
    /// [`crate::core::MarketError::UnsupportedInstrument`] naming the offending
    /// `instrument_type`, or a decoding error for malformed payloads.
    pub fn resolve_values<I>(&self, values: I) -> Result<RiskFactorSchema>
    where
        I: IntoIterator<Item = Value>,
    {
        let positions = values
            .into_iter()
            .map(Position::from_value)
            .collect::<Result<Vec<_>>>()?;
        Ok(self.resolve(&positions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Currency, MarketError, OptionType};
    use crate::instruments::{EquityForward, EquityOption, FxForward, FxOption};
    use chrono::NaiveDate;
    use serde_json::json;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn equity_fwd(id: &str, underlying: &str) -> Position {
        Position::new(
            id,
            EquityForward {
                underlying_id: underlying.to_string(),
                strike: 150.0,
                maturity_date: date(),
                currency: Currency::Usd,
            },
        )
    }

    fn equity_opt(id: &str, underlying: &str) -> Position {
        Position::new(
            id,
            EquityOption {
                underlying_id: underlying.to_string(),
                strike: 300.0,
                maturity_date: date(),
                currency: Currency::Usd,
                option_type: OptionType::Call,
            },
        )
    }

    fn fx_fwd(id: &str, base: Currency, quote: Currency) -> Position {
        Position::new(
            id,
            FxForward {
                base_currency: base,
                quote_currency: quote,
                strike: 1.1,
                maturity_date: date(),
            },
        )
    }

    fn fx_opt(id: &str, base: Currency, quote: Currency) -> Position {
        Position::new(
            id,
            FxOption {
                base_currency: base,
                quote_currency: quote,
                strike: 1.15,
                maturity_date: date(),
                option_type: OptionType::Put,
            },
        )
    }

    #[test]
    fn empty_positions_give_empty_schema() {
        let schema = DependencyResolver::new().resolve(std::iter::empty());
        assert!(schema.is_empty());
    }

    #[test]
    fn equity_factors_are_sorted() {
        let positions = [equity_opt("P2", "MSFT"), equity_fwd("P1", "AAPL")];
        let schema = DependencyResolver.resolve(&positions);
        assert_eq!(schema.get_index("AAPL").unwrap(), 0);
        assert_eq!(schema.get_index("MSFT").unwrap(), 1);
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn fx_pairs_are_concatenated_and_deduplicated() {
        let positions = [
            fx_fwd("P1", Currency::Zar, Currency::Usd),
            fx_opt("P2", Currency::Zar, Currency::Usd),
        ];
        let schema = DependencyResolver.resolve(&positions);
        assert_eq!(schema.identifiers(), ["ZARUSD"]);
        assert_eq!(schema.get_index("ZARUSD").unwrap(), 0);
    }

    #[test]
    fn mixed_instruments_share_one_index_space() {
        let positions = [
            equity_fwd("P1", "AAPL"),
            fx_fwd("P2", Currency::Zar, Currency::Usd),
        ];
        let schema = DependencyResolver.resolve(&positions);
        let pairs: Vec<_> = schema.iter().collect();
        assert_eq!(pairs, vec![("AAPL", 0), ("ZARUSD", 1)]);
    }

    #[test]
    fn input_order_and_duplicates_do_not_change_schema() {
        let a = [
            equity_fwd("P1", "MSFT"),
            fx_opt("P2", Currency::Usd, Currency::Zar),
            equity_opt("P3", "AAPL"),
            equity_fwd("P4", "AAPL"),
        ];
        let b = [
            equity_opt("P3", "AAPL"),
            equity_fwd("P1", "MSFT"),
            fx_opt("P2", Currency::Usd, Currency::Zar),
        ];
        let schema_a = DependencyResolver.resolve(&a);
        let schema_b = DependencyResolver.resolve(b.iter().rev());
        assert_eq!(schema_a, schema_b);
        let mut indices: Vec<usize> = schema_a.iter().map(|(_, i)| i).collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn untyped_payloads_resolve_like_typed_positions() {
        let values = vec![
            json!({
                "position_id": "P1",
                "instrument": {
                    "instrument_type": "fx_option",
                    "base_currency": "ZAR",
                    "quote_currency": "USD",
                    "strike": 0.06,
                    "maturity_date": "2025-01-01",
                    "option_type": "CALL"
                }
            }),
            json!({
                "position_id": "P2",
                "instrument": {
                    "instrument_type": "equity_option",
                    "underlying_id": "AAPL",
                    "strike": 150.0,
                    "maturity_date": "2025-01-01",
                    "currency": "USD",
                    "option_type": "PUT"
                }
            }),
        ];
        let schema = DependencyResolver.resolve_values(values).unwrap();
        assert_eq!(schema.identifiers(), ["AAPL", "ZARUSD"]);
    }

    #[test]
    fn unsupported_instrument_is_named() {
        let values = vec![json!({
            "position_id": "FAIL",
            "instrument": { "instrument_type": "unsupported_instrument" }
        })];
        let err = DependencyResolver.resolve_values(values).unwrap_err();
        assert!(matches!(err, MarketError::UnsupportedInstrument { .. }));
        assert!(
            err.to_string()
                .contains("unsupported instrument type in resolver: unsupported_instrument")
        );
    }
}
