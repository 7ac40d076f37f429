//! # isrank
//!
//! Instance Selection by Ranking (ISR) for labelled tabular folds.
//!
//! Every record of a fold is weighted from the geometry of its k nearest
//! neighbours; the least important record is then peeled off repeatedly while
//! the neighbourhoods it touched are repaired in place. The elimination order
//! becomes a rank, and the rank decides which records survive a given
//! removal level.
//!
//! ```
//! use isrank::builder::IsrBuilder;
//! use isrank::weighting::{Scope, WeightingScheme};
//!
//! let rows = vec![
//!     vec![0.0, 1.0],
//!     vec![0.1, 1.1],
//!     vec![0.2, 0.9],
//!     vec![0.3, 1.0],
//!     vec![2.0, 3.0],
//!     vec![5.0, 0.0],
//! ];
//!
//! let report = IsrBuilder::new()
//!     .with_scheme(WeightingScheme::Proximity(Scope::Input))
//!     .with_neighbours(2)
//!     .with_removal_levels(vec![50.0])
//!     .build(rows)
//!     .unwrap();
//!
//! assert_eq!(report.selections[0].kept.len(), 3);
//! ```

/// Configuration builder and fold pipeline
pub mod builder;

/// Minkowski distance and norm
pub mod distance;

/// Error taxonomy
pub mod errors;

/// Partitions of records
pub mod fold;

/// Distance matrix and k-NN search
pub mod graph;

/// Validated experiment parameters
pub mod params;

/// Peeling loop assigning elimination ranks
pub mod ranker;

/// Single dataset row
pub mod record;

/// Local and global re-weighting strategies
pub mod reweighting;

/// Retained subsets per removal level
pub mod selection;

/// Weighting schemes
pub mod weighting;

pub use errors::{IsrError, Result};

#[cfg(test)]
mod tests;

#[cfg(test)]
pub(crate) fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}
