//! Validated experiment parameters.
//!
//! Loading them from a file is left to the caller: `IsrParams` derives serde
//! so any format works, and `validate` applies the checks that do not depend
//! on a fold. `validate_for` adds the neighbourhood size check once the fold
//! size is known.

use crate::errors::{IsrError, Result};
use crate::weighting::{Combination, WeightingScheme};

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IsrParams {
    /// Weighting scheme, e.g. `proximity-x`
    pub scheme: WeightingScheme,
    /// Minkowski parameter (> 0); 2 is Euclidean
    pub metric: f64,
    /// Neighbourhood size, `1 <= k < N`
    pub k: usize,
    /// Only read by remoteness schemes
    #[serde(default)]
    pub combination: Combination,
    /// Percentages of records to remove, each in `[0, 100]`
    pub removal_levels: Vec<f64>,
    /// Min-max normalise every attribute before ranking
    #[serde(default)]
    pub normalise: bool,
}

impl Default for IsrParams {
    fn default() -> Self {
        Self {
            scheme: WeightingScheme::default(),
            metric: 2.0,
            k: 3,
            combination: Combination::default(),
            removal_levels: vec![50.0],
            normalise: false,
        }
    }
}

impl IsrParams {
    /// Checks that hold for any fold.
    pub fn validate(&self) -> Result<()> {
        if !self.metric.is_finite() || self.metric <= 0.0 {
            return Err(IsrError::InvalidMetric(self.metric));
        }
        if self.k == 0 {
            return Err(IsrError::NeighbourCount { k: self.k, n: 0 });
        }
        if self.removal_levels.is_empty() {
            return Err(IsrError::NoRemovalLevels);
        }
        if let Some(&level) = self
            .removal_levels
            .iter()
            .find(|l| !(0.0..=100.0).contains(*l))
        {
            return Err(IsrError::InvalidRemovalLevel(level));
        }
        Ok(())
    }

    /// `validate` plus `1 <= k < n` for a fold of `n` records.
    pub fn validate_for(&self, n: usize) -> Result<()> {
        self.validate()?;
        if self.k >= n {
            return Err(IsrError::NeighbourCount { k: self.k, n });
        }
        Ok(())
    }

    /// `{scheme}-L{metric}-k{k}`, e.g. `proximity-x-L2-k3`.
    pub fn experiment_id(&self) -> String {
        format!("{}-L{}-k{}", self.scheme, self.metric, self.k)
    }
}
