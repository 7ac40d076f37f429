//! Selection of the records that survive a removal level.
//!
//! For a removal level `r` (percentage of records to discard) the fold keeps
//! `round(N × (100 − r) / 100)` records: those with the smallest ranks, i.e.
//! the ones eliminated last. Kept rows come back in their original order and
//! original (pre-normalisation) values.

use crate::errors::{IsrError, Result};
use crate::fold::Fold;
use crate::ranker::verify_ranks;

use log::{debug, info};

#[derive(Clone, Debug)]
pub struct Selection {
    pub removal_level: f64,
    /// Ids of retained records, ascending
    pub kept: Vec<usize>,
    /// Ids of discarded records, ascending
    pub removed: Vec<usize>,
    /// Original rows of the retained records, same order as `kept`
    pub rows: Vec<Vec<f64>>,
}

impl Selection {
    /// Fraction of the fold that was retained.
    pub fn retention(&self) -> f64 {
        let total = self.kept.len() + self.removed.len();
        if total == 0 {
            0.0
        } else {
            self.kept.len() as f64 / total as f64
        }
    }
}

pub struct Selector;

impl Selector {
    /// Number of records retained out of `n` at `removal_level`.
    pub fn kept_count(n: usize, removal_level: f64) -> usize {
        (n as f64 * (100.0 - removal_level) / 100.0).round() as usize
    }

    /// Retain the records with `rank <= kept_count`.
    pub fn select(fold: &Fold, removal_level: f64) -> Result<Selection> {
        if !(0.0..=100.0).contains(&removal_level) {
            return Err(IsrError::InvalidRemovalLevel(removal_level));
        }
        if fold.records().iter().any(|r| r.rank() == 0) {
            return Err(IsrError::InvalidState(format!(
                "fold {} has unranked records",
                fold.name()
            )));
        }
        verify_ranks(fold)?;

        let n = fold.len();
        let threshold = Self::kept_count(n, removal_level);

        let (kept, removed): (Vec<usize>, Vec<usize>) =
            (0..n).partition(|&id| fold.record(id).rank() <= threshold);

        if kept.len() != threshold || kept.len() + removed.len() != n {
            return Err(IsrError::Invariant(format!(
                "selection kept {} and removed {} of {} records, expected {} kept",
                kept.len(),
                removed.len(),
                n,
                threshold
            )));
        }

        let rows = kept
            .iter()
            .map(|&id| fold.original_row(id).to_vec())
            .collect();

        debug!(
            "Removal level {}%: kept {} / removed {} of fold {}",
            removal_level,
            kept.len(),
            removed.len(),
            fold.name()
        );

        Ok(Selection { removal_level, kept, removed, rows })
    }

    /// One selection per removal level, in the given order.
    pub fn select_all(fold: &Fold, removal_levels: &[f64]) -> Result<Vec<Selection>> {
        info!(
            "Selecting fold {} at {} removal levels",
            fold.name(),
            removal_levels.len()
        );
        removal_levels
            .iter()
            .map(|&level| Self::select(fold, level))
            .collect()
    }
}
