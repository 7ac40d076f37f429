use crate::errors::Result;
use crate::fold::Fold;
use crate::params::IsrParams;
use crate::ranker::EliminationRanker;
use crate::selection::{Selection, Selector};
use crate::weighting::{rank_positions, Combination, WeightingScheme};

use log::{debug, info, trace, warn};
use rayon::prelude::*;

/// Outcome of ranking one fold and selecting it at every removal level.
#[derive(Clone, Debug)]
pub struct FoldReport {
    pub fold_name: String,
    /// `{scheme}-L{metric}-k{k}`
    pub experiment_id: String,
    /// Weights after the first full weighting pass, in record order
    pub initial_weights: Vec<f64>,
    /// Zero-based ascending position of each initial weight
    pub initial_positions: Vec<usize>,
    /// Final rank of each record, in record order
    pub ranks: Vec<usize>,
    /// One entry per configured removal level, same order
    pub selections: Vec<Selection>,
}

impl FoldReport {
    /// Initial weights scaled to sum to 1.
    ///
    /// All-zero weights (e.g. nonlinearity on a flat fold) are returned as a
    /// uniform distribution.
    pub fn normalised_weights(&self) -> Vec<f64> {
        let n = self.initial_weights.len();
        let total: f64 = self.initial_weights.iter().sum();
        if total > 0.0 {
            self.initial_weights.iter().map(|w| w / total).collect()
        } else {
            vec![1.0 / n as f64; n]
        }
    }

    /// Selection made at `removal_level`, if it was configured.
    pub fn selection(&self, removal_level: f64) -> Option<&Selection> {
        self.selections
            .iter()
            .find(|s| s.removal_level == removal_level)
    }
}

pub struct IsrBuilder {
    params: IsrParams,
}

impl Default for IsrBuilder {
    fn default() -> Self {
        debug!("Creating IsrBuilder with default parameters");
        Self {
            params: IsrParams::default(),
        }
    }
}

impl IsrBuilder {
    pub fn new() -> Self {
        info!("Initializing new IsrBuilder");
        Self::default()
    }

    /// Start from already loaded parameters.
    pub fn from_params(params: IsrParams) -> Self {
        info!("Initializing IsrBuilder for {}", params.experiment_id());
        Self { params }
    }

    // -------------------- Configuration --------------------

    pub fn with_scheme(mut self, scheme: WeightingScheme) -> Self {
        info!("Setting weighting scheme: {}", scheme);
        self.params.scheme = scheme;
        self
    }

    /// Minkowski parameter; 1 is Manhattan, 2 Euclidean.
    pub fn with_metric(mut self, metric: f64) -> Self {
        info!("Setting distance metric: L{}", metric);
        self.params.metric = metric;
        self
    }

    pub fn with_neighbours(mut self, k: usize) -> Self {
        info!("Setting neighbourhood size: k={}", k);
        self.params.k = k;
        self
    }

    /// Only read by remoteness schemes.
    pub fn with_combination(mut self, combination: Combination) -> Self {
        info!("Setting combination method: {}", combination);
        if !self.params.scheme.is_compound() {
            debug!(
                "Combination {} has no effect on scheme {}",
                combination, self.params.scheme
            );
        }
        self.params.combination = combination;
        self
    }

    pub fn with_removal_levels(mut self, removal_levels: Vec<f64>) -> Self {
        info!("Setting removal levels: {:?}", removal_levels);
        self.params.removal_levels = removal_levels;
        self
    }

    pub fn with_normalisation(mut self, normalise: bool) -> Self {
        info!("Setting normalisation: {}", normalise);
        self.params.normalise = normalise;
        self
    }

    /// Validated parameters.
    pub fn params(&self) -> Result<&IsrParams> {
        self.params.validate()?;
        Ok(&self.params)
    }

    pub fn experiment_id(&self) -> String {
        self.params.experiment_id()
    }

    // -------------------- Build --------------------

    /// Rank a single fold given as rows and select it at every removal level.
    pub fn build(&self, rows: Vec<Vec<f64>>) -> Result<FoldReport> {
        self.params.validate()?;
        let fold = Fold::from_rows("fold-0", rows)?;
        self.build_fold(fold)
    }

    /// Rank `fold` and select it at every removal level.
    pub fn build_fold(&self, mut fold: Fold) -> Result<FoldReport> {
        let params = &self.params;
        params.validate_for(fold.len())?;

        info!(
            "Building {} on fold {} ({} records, {} attributes)",
            params.experiment_id(),
            fold.name(),
            fold.len(),
            fold.n_attributes()
        );
        debug!(
            "Build configuration: scheme={}, metric={}, k={}, combination={}, normalise={}",
            params.scheme, params.metric, params.k, params.combination, params.normalise
        );

        if params.normalise {
            trace!("Normalising fold {}", fold.name());
            fold.normalise();
        }

        let ranker = EliminationRanker::from_params(params);
        debug!(
            "Re-weighting strategy: {}",
            if ranker.reweighting().is_global() {
                "global"
            } else {
                "local"
            }
        );
        let initial_weights = ranker.rank(&mut fold)?;
        let initial_positions = rank_positions(&initial_weights);

        let selections = Selector::select_all(&fold, &params.removal_levels)?;

        info!("Fold {} build completed successfully", fold.name());
        Ok(FoldReport {
            fold_name: fold.name().to_string(),
            experiment_id: params.experiment_id(),
            initial_weights,
            initial_positions,
            ranks: fold.ranks(),
            selections,
        })
    }

    /// Process independent folds in parallel.
    ///
    /// Results come back in input order; a failing fold does not stop the
    /// others.
    pub fn build_folds(&self, folds: Vec<Fold>) -> Vec<Result<FoldReport>> {
        info!("Building {} folds in parallel", folds.len());
        let reports: Vec<Result<FoldReport>> = folds
            .into_par_iter()
            .map(|fold| {
                let name = fold.name().to_string();
                self.build_fold(fold).map_err(|e| {
                    warn!("Fold {} aborted: {}", name, e);
                    e
                })
            })
            .collect();

        let failed = reports.iter().filter(|r| r.is_err()).count();
        info!(
            "{} folds completed, {} failed",
            reports.len() - failed,
            failed
        );
        reports
    }
}
