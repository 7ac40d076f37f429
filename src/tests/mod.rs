mod test_fold;
mod test_graph;
mod test_selection;

/// Neighbourhood size used by the small hand-checked folds
pub const SMALL_K: usize = 2;

/// Manhattan keeps the hand-checked distances exact
pub const EXACT_METRIC: f64 = 1.0;
