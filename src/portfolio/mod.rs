//! Static trade data model: positions, trades, portfolios, and netting sets.
//!
//! These records carry no valuation behaviour. The market-state pipeline only
//! reads [`Position::instrument`].

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{LongShort, MarketError, Result};
use crate::instruments::Instrument;

/// A unique priced position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Unique position identifier.
    pub position_id: String,
    /// Contract held by the position.
    pub instrument: Instrument,
}

impl Position {
    pub fn new(position_id: impl Into<String>, instrument: impl Into<Instrument>) -> Self {
        Self {
            position_id: position_id.into(),
            instrument: instrument.into(),
        }
    }

    /// Decodes an untyped position, rejecting unknown instrument variants by name.
    pub fn from_value(mut value: Value) -> Result<Self> {
        let instrument = value
            .get_mut("instrument")
            .map(Value::take)
            .unwrap_or(Value::Null);
        let instrument = Instrument::from_value(instrument)?;
        let position_id = value
            .get("position_id")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                MarketError::InvalidParameters("position_id is required".to_string())
            })?
            .to_string();
        Ok(Self {
            position_id,
            instrument,
        })
    }
}

/// A scaled, directional exposure to a [`Position`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Unique trade identifier.
    pub trade_id: String,
    /// Position this trade scales.
    pub position_id: String,
    /// Counterparty facing the trade.
    pub counterparty_id: String,
    /// Unsigned number of units.
    pub quantity: f64,
    /// Long or short exposure.
    pub direction: LongShort,
}

impl Trade {
    /// Quantity signed by direction (short exposure is negative).
    #[inline]
    pub fn signed_quantity(&self) -> f64 {
        self.direction.sign() * self.quantity
    }
}

/// Collection of trades with an eagerly built trade-id index.
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    portfolio_id: String,
    trades: Vec<Trade>,
    index: HashMap<String, usize>,
}

impl Portfolio {
    /// Builds a portfolio and its lookup index.
    ///
    /// # Errors
    /// [`MarketError::DuplicateTrade`] when two trades share an id.
    pub fn new(portfolio_id: impl Into<String>, trades: Vec<Trade>) -> Result<Self> {
        let mut index = HashMap::with_capacity(trades.len());
        for (i, trade) in trades.iter().enumerate() {
            if index.insert(trade.trade_id.clone(), i).is_some() {
                return Err(MarketError::DuplicateTrade(trade.trade_id.clone()));
            }
        }
        Ok(Self {
            portfolio_id: portfolio_id.into(),
            trades,
            index,
        })
    }

    pub fn portfolio_id(&self) -> &str {
        &self.portfolio_id
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn get_trade(&self, trade_id: &str) -> Result<&Trade> {
        self.index
            .get(trade_id)
            .map(|&i| &self.trades[i])
            .ok_or_else(|| MarketError::TradeNotFound(trade_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}

/// Legal boundary for offsetting exposures with one counterparty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NettingSet {
    /// Unique netting-set identifier.
    pub netting_set_id: String,
    /// Counterparty the agreement is with.
    pub counterparty_id: String,
    /// Trades covered by the agreement.
    pub trade_ids: BTreeSet<String>,
}

impl NettingSet {
    pub fn contains(&self, trade_id: &str) -> bool {
        self.trade_ids.contains(trade_id)
    }
}
