//! Re-weighting strategies used by the ranker.
//!
//! After an elimination only the records whose neighbourhood was rebuilt
//! need new weights, provided each weight depends on its own neighbourhood
//! alone (`LocalReweighting`). Ordinal remoteness weights are ordering
//! positions over the whole fold, so any change forces a full pass
//! (`GlobalReweighting`). `Reweigher::for_scheme` picks the strategy once,
//! the ranker never branches on the scheme.

use crate::errors::Result;
use crate::fold::Fold;
use crate::weighting::{ordinal_weights, proximity, surrounding, weigh, Combination, Scope, WeightingScheme};

use log::{debug, trace};

pub trait Reweighting {
    /// Weigh every active record from its current neighbourhood.
    fn weigh_all(&self, fold: &mut Fold) -> Result<()>;

    /// Refresh weights once the neighbourhoods of `affected` were rebuilt.
    fn reweigh(&self, fold: &mut Fold, affected: &[usize]) -> Result<()>;
}

/// Per-record recomputation: every scheme except ordinal remoteness.
#[derive(Clone, Debug)]
pub struct LocalReweighting {
    scheme: WeightingScheme,
    metric: f64,
}

impl LocalReweighting {
    pub fn new(scheme: WeightingScheme, metric: f64) -> Self {
        Self { scheme, metric }
    }
}

impl Reweighting for LocalReweighting {
    fn weigh_all(&self, fold: &mut Fold) -> Result<()> {
        let active: Vec<usize> = fold
            .records()
            .iter()
            .filter(|r| r.is_active())
            .map(|r| r.id())
            .collect();
        debug!("Weighing {} active records with {}", active.len(), self.scheme);
        self.reweigh(fold, &active)
    }

    fn reweigh(&self, fold: &mut Fold, affected: &[usize]) -> Result<()> {
        for &id in affected {
            if !fold.record(id).is_active() {
                continue;
            }
            let w = weigh(fold.records(), id, self.scheme, self.metric);
            trace!("Record {} weighed {:.6}", id, w);
            fold.set_weight(id, w)?;
        }
        Ok(())
    }
}

/// Whole-fold recomputation for ordinal remoteness.
///
/// Positions are taken among active records only; eliminated records keep
/// their infinite weight.
#[derive(Clone, Debug)]
pub struct GlobalReweighting {
    scope: Scope,
    metric: f64,
}

impl GlobalReweighting {
    pub fn new(scope: Scope, metric: f64) -> Self {
        Self { scope, metric }
    }
}

impl Reweighting for GlobalReweighting {
    fn weigh_all(&self, fold: &mut Fold) -> Result<()> {
        let active: Vec<usize> = fold
            .records()
            .iter()
            .filter(|r| r.is_active())
            .map(|r| r.id())
            .collect();

        let records = fold.records();
        let prox: Vec<f64> = active
            .iter()
            .map(|&id| proximity(records, id, self.scope, self.metric))
            .collect();
        let surr: Vec<f64> = active
            .iter()
            .map(|&id| surrounding(records, id, self.scope, self.metric))
            .collect();
        let weights = ordinal_weights(&prox, &surr);

        trace!("Ordinal re-weighting over {} active records", active.len());
        for (&id, &w) in active.iter().zip(weights.iter()) {
            fold.set_weight(id, w)?;
        }
        Ok(())
    }

    fn reweigh(&self, fold: &mut Fold, _affected: &[usize]) -> Result<()> {
        self.weigh_all(fold)
    }
}

/// Strategy selected from the scheme and combination method.
#[derive(Clone, Debug)]
pub enum Reweigher {
    Local(LocalReweighting),
    Global(GlobalReweighting),
}

impl Reweigher {
    /// `Global` only for remoteness with the ordinal combination.
    pub fn for_scheme(scheme: WeightingScheme, combination: Combination, metric: f64) -> Self {
        match (scheme, combination) {
            (WeightingScheme::Remoteness(scope), Combination::Ordinal) => {
                Reweigher::Global(GlobalReweighting::new(scope, metric))
            }
            _ => Reweigher::Local(LocalReweighting::new(scheme, metric)),
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Reweigher::Global(_))
    }
}

impl Reweighting for Reweigher {
    fn weigh_all(&self, fold: &mut Fold) -> Result<()> {
        match self {
            Reweigher::Local(r) => r.weigh_all(fold),
            Reweigher::Global(r) => r.weigh_all(fold),
        }
    }

    fn reweigh(&self, fold: &mut Fold, affected: &[usize]) -> Result<()> {
        match self {
            Reweigher::Local(r) => r.reweigh(fold, affected),
            Reweigher::Global(r) => r.reweigh(fold, affected),
        }
    }
}
