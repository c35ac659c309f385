//! Risk-factor identifier to tensor-axis index mapping.
//!
//! Indices are always dense (`0..len`) and assigned in lexicographic (byte)
//! order of the identifiers, so the same set of factors yields the same layout
//! regardless of discovery order or duplicates.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::{MarketError, Result};

/// Immutable identifier -> index map for axis 2 of the state tensor.
///
/// # Examples
/// ```
/// use marketgen::market::RiskFactorSchema;
///
/// let schema = RiskFactorSchema::from_identifiers(["MSFT", "AAPL", "MSFT"]);
/// assert_eq!(schema.len(), 2);
/// assert_eq!(schema.get_index("AAPL").unwrap(), 0);
/// assert_eq!(schema.get_index("MSFT").unwrap(), 1);
/// assert!(schema.get_index("TSLA").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, usize>",
    into = "BTreeMap<String, usize>"
)]
pub struct RiskFactorSchema {
    factors: Vec<String>,
    indices: BTreeMap<String, usize>,
}

impl RiskFactorSchema {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Deduplicates, sorts, and enumerates identifiers from zero.
    pub fn from_identifiers<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique: BTreeSet<String> = identifiers.into_iter().map(Into::into).collect();
        let factors: Vec<String> = unique.into_iter().collect();
        let indices = factors
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.clone(), idx))
            .collect();
        Self { factors, indices }
    }

    /// Adopts an explicit mapping after checking that indices are exactly `0..len`.
    ///
    /// # Errors
    /// [`MarketError::InvalidParameters`] on gaps, duplicates, or out-of-range indices.
    pub fn from_indices(indices: BTreeMap<String, usize>) -> Result<Self> {
        let n = indices.len();
        let mut slots: Vec<Option<String>> = vec![None; n];
        for (id, &idx) in &indices {
            let slot = slots.get_mut(idx).ok_or_else(|| {
                MarketError::InvalidParameters(format!(
                    "risk factor '{id}' has index {idx}, outside 0..{n}"
                ))
            })?;
            if let Some(other) = slot {
                return Err(MarketError::InvalidParameters(format!(
                    "risk factors '{other}' and '{id}' share index {idx}"
                )));
            }
            *slot = Some(id.clone());
        }
        let factors = slots.into_iter().flatten().collect();
        Ok(Self { factors, indices })
    }

    /// Tensor index of `factor`.
    ///
    /// # Errors
    /// [`MarketError::UnknownRiskFactor`] listing every known identifier.
    pub fn get_index(&self, factor: &str) -> Result<usize> {
        self.indices
            .get(factor)
            .copied()
            .ok_or_else(|| MarketError::UnknownRiskFactor {
                factor: factor.to_string(),
                available: self.factors.clone(),
            })
    }

    pub fn factor_at(&self, index: usize) -> Option<&str> {
        self.factors.get(index).map(String::as_str)
    }

    pub fn contains(&self, factor: &str) -> bool {
        self.indices.contains_key(factor)
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Identifiers in index order.
    pub fn identifiers(&self) -> &[String] {
        &self.factors
    }

    /// `(identifier, index)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.factors
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.as_str(), idx))
    }

    pub fn indices(&self) -> &BTreeMap<String, usize> {
        &self.indices
    }
}

impl TryFrom<BTreeMap<String, usize>> for RiskFactorSchema {
    type Error = MarketError;

    fn try_from(value: BTreeMap<String, usize>) -> Result<Self> {
        Self::from_indices(value)
    }
}

impl From<RiskFactorSchema> for BTreeMap<String, usize> {
    fn from(value: RiskFactorSchema) -> Self {
        value.indices
    }
}
