use std::fmt;

use serde::{Deserialize, Serialize};

/// Plain-vanilla option side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OptionType {
    /// Call option payoff profile.
    Call,
    /// Put option payoff profile.
    Put,
}

impl OptionType {
    /// Returns +1.0 for calls and -1.0 for puts.
    pub fn sign(self) -> f64 {
        match self {
            Self::Call => 1.0,
            Self::Put => -1.0,
        }
    }
}

/// ISO currency codes supported by the trade model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// United States dollar.
    Usd,
    /// South African rand.
    Zar,
}

impl Currency {
    /// Three-letter ISO 4217 code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Zar => "ZAR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Transaction side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

/// Direction of a trade's exposure to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LongShort {
    Long,
    Short,
}

impl LongShort {
    /// Returns +1.0 for long exposure and -1.0 for short exposure.
    pub fn sign(self) -> f64 {
        match self {
            Self::Long => 1.0,
            Self::Short => -1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_codes_are_three_letters() {
        assert_eq!(Currency::Usd.code(), "USD");
        assert_eq!(Currency::Zar.to_string(), "ZAR");
    }

    #[test]
    fn enums_use_upper_case_wire_names() {
        assert_eq!(serde_json::to_string(&Currency::Zar).unwrap(), "\"ZAR\"");
        assert_eq!(serde_json::to_string(&OptionType::Put).unwrap(), "\"PUT\"");
        assert_eq!(serde_json::to_string(&LongShort::Short).unwrap(), "\"SHORT\"");
        let side: Side = serde_json::from_str("\"BUY\"").unwrap();
        assert_eq!(side, Side::Buy);
    }

    #[test]
    fn signs_match_direction() {
        assert_eq!(OptionType::Call.sign(), 1.0);
        assert_eq!(OptionType::Put.sign(), -1.0);
        assert_eq!(LongShort::Long.sign(), 1.0);
        assert_eq!(LongShort::Short.sign(), -1.0);
    }
}
