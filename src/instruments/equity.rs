//! Single-underlying equity contracts.
//!
//! Both records depend on one simulated risk factor: the underlying's own identifier.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{Currency, OptionType};

/// Equity forward contract.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use marketgen::core::Currency;
/// use marketgen::instruments::EquityForward;
///
/// let fwd = EquityForward {
///     underlying_id: "MSFT".to_string(),
///     strike: 300.0,
///     maturity_date: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
///     currency: Currency::Usd,
/// };
/// assert_eq!(fwd.underlying_id, "MSFT");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityForward {
    /// Identifier of the underlying equity.
    pub underlying_id: String,
    /// Delivery price.
    pub strike: f64,
    /// Settlement date.
    pub maturity_date: NaiveDate,
    /// Settlement currency.
    pub currency: Currency,
}

/// European equity option contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityOption {
    /// Identifier of the underlying equity.
    pub underlying_id: String,
    /// Strike level.
    pub strike: f64,
    /// Expiry date.
    pub maturity_date: NaiveDate,
    /// Settlement currency.
    pub currency: Currency,
    /// Call or put.
    pub option_type: OptionType,
}
