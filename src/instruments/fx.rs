//! Currency-pair contracts.
//!
//! The simulated factor for a pair is the base code followed by the quote code
//! (`ZAR` + `USD` -> `ZARUSD`), so both records below share factors whenever
//! their pairs match.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{Currency, OptionType};

/// FX forward: obligation to exchange base for quote currency at `strike`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxForward {
    /// Currency bought or sold.
    pub base_currency: Currency,
    /// Currency the rate is quoted in.
    pub quote_currency: Currency,
    /// Contracted exchange rate in quote units per base unit.
    pub strike: f64,
    /// Settlement date.
    pub maturity_date: NaiveDate,
}

/// European FX option; `option_type` refers to the right on the base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxOption {
    /// Currency the option is written on.
    pub base_currency: Currency,
    /// Currency the strike is quoted in.
    pub quote_currency: Currency,
    /// Strike exchange rate in quote units per base unit.
    pub strike: f64,
    /// Expiry date.
    pub maturity_date: NaiveDate,
    /// Call or put on the base currency.
    pub option_type: OptionType,
}

/// Concatenates base and quote codes into a currency-pair factor identifier.
#[inline]
pub fn pair_identifier(base: Currency, quote: Currency) -> String {
    let mut id = String::with_capacity(6);
    id.push_str(base.code());
    id.push_str(quote.code());
    id
}
