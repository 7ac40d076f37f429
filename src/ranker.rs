//! Elimination ranking: the peeling loop.
//!
//! Starting from a fully weighted fold, the least important active record is
//! repeatedly eliminated and ranked `N, N-1, …, 1`, so the first record to go
//! gets rank `N` and the last survivor rank 1. After each elimination only
//! the records that had the eliminated one as a neighbour (its associates)
//! are repaired: their neighbourhood is searched again on the updated
//! distance matrix and their weight recomputed by the [`Reweighting`]
//! strategy.
//!
//! Once `k` or fewer records remain unranked no record can gather `k` active
//! neighbours, so repair stops and the tail is ranked from the weights as
//! they stand. The order within that tail carries no geometric meaning.

use crate::errors::{IsrError, Result};
use crate::fold::Fold;
use crate::params::IsrParams;
use crate::reweighting::{Reweigher, Reweighting};

use log::{debug, info, trace};

pub struct EliminationRanker<R: Reweighting> {
    k: usize,
    metric: f64,
    reweighting: R,
}

impl EliminationRanker<Reweigher> {
    /// Ranker with the strategy matching the configured scheme.
    pub fn from_params(params: &IsrParams) -> Self {
        Self::new(
            params.k,
            params.metric,
            Reweigher::for_scheme(params.scheme, params.combination, params.metric),
        )
    }
}

impl<R: Reweighting> EliminationRanker<R> {
    pub fn new(k: usize, metric: f64, reweighting: R) -> Self {
        Self { k, metric, reweighting }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn reweighting(&self) -> &R {
        &self.reweighting
    }

    /// Bring the fold to its initial state: distance matrix, k-NN relation
    /// of every record, and a full weighting pass. All ranks stay 0.
    ///
    /// Returns the initial weight of each record.
    pub fn prepare(&self, fold: &mut Fold) -> Result<Vec<f64>> {
        let n = fold.len();
        if self.k == 0 || self.k >= n {
            return Err(IsrError::NeighbourCount { k: self.k, n });
        }

        fold.measure_distances(self.metric)?;
        for id in 0..n {
            fold.find_neighbours(id, self.k)?;
        }
        debug!(
            "Initial {}-NN relation of fold {} consistent: {}",
            self.k,
            fold.name(),
            fold.relations_consistent()
        );

        self.reweighting.weigh_all(fold)?;

        let weights = fold.weights();
        let (min, max, mean) = {
            let min = weights.iter().fold(f64::INFINITY, |a, &b| a.min(b));
            let max = weights.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
            let mean = weights.iter().sum::<f64>() / weights.len() as f64;
            (min, max, mean)
        };
        debug!(
            "Initial weights - min: {:.6}, max: {:.6}, mean: {:.6}",
            min, max, mean
        );

        Ok(weights)
    }

    /// Eliminate every record of a prepared fold, assigning ranks `N..=1`.
    pub fn eliminate_all(&self, fold: &mut Fold) -> Result<()> {
        let n = fold.len();
        info!("Ranking {} records of fold {}", n, fold.name());

        for rank in (1..=n).rev() {
            let id = fold.lightest_active().ok_or_else(|| {
                IsrError::Invariant(format!("no active record left for rank {}", rank))
            })?;
            trace!(
                "Rank {} -> record {} (weight {:.6})",
                rank,
                id,
                fold.record(id).weight()
            );
            fold.eliminate(id, rank)?;

            let remaining = rank - 1;
            if remaining <= self.k {
                if remaining == self.k {
                    debug!(
                        "{} records left unranked in fold {}; neighbourhood repair stops",
                        remaining,
                        fold.name()
                    );
                }
                continue;
            }

            let affected = fold.clear_traces(id);
            for &a in &affected {
                fold.unlink_neighbours(a);
                fold.find_neighbours(a, self.k)?;
            }
            trace!("Repaired {} associates of record {}", affected.len(), id);

            self.reweighting.reweigh(fold, &affected)?;
        }

        verify_ranks(fold)?;
        info!("Fold {} fully ranked", fold.name());
        Ok(())
    }

    /// `prepare` followed by `eliminate_all`; returns the initial weights.
    pub fn rank(&self, fold: &mut Fold) -> Result<Vec<f64>> {
        let initial = self.prepare(fold)?;
        self.eliminate_all(fold)?;
        Ok(initial)
    }
}

/// Ranks must be exactly `{1, …, N}`.
pub fn verify_ranks(fold: &Fold) -> Result<()> {
    let n = fold.len();
    let mut seen = vec![false; n];
    for record in fold.records() {
        let r = record.rank();
        if r == 0 || r > n || seen[r - 1] {
            return Err(IsrError::Invariant(format!(
                "record {} holds rank {} outside a permutation of 1..={}",
                record.id(),
                r,
                n
            )));
        }
        seen[r - 1] = true;
    }
    Ok(())
}

/// Record ids in elimination order (rank `N` first).
pub fn elimination_order(fold: &Fold) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fold.len()).collect();
    order.sort_by(|&a, &b| fold.record(b).rank().cmp(&fold.record(a).rank()));
    order
}
