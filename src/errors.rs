use thiserror::Error;

/// Result type for ranking and selection operations
pub type Result<T> = std::result::Result<T, IsrError>;

/// Error types for ranking and selection operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IsrError {
    /// Weighting scheme name not recognised
    #[error("Unknown weighting scheme: {0}")]
    UnknownScheme(String),

    /// Combination method name not recognised
    #[error("Unknown combination method: {0}")]
    UnknownCombination(String),

    /// Minkowski parameter must be finite and strictly positive
    #[error("Invalid distance metric parameter: {0}")]
    InvalidMetric(f64),

    /// Neighbourhood size out of range for the fold
    #[error("Invalid number of neighbours: k={k} must satisfy 1 <= k < {n}")]
    NeighbourCount { k: usize, n: usize },

    /// Removal level outside [0, 100]
    #[error("Invalid removal level: {0}")]
    InvalidRemovalLevel(f64),

    /// No removal level configured
    #[error("At least one removal level is required")]
    NoRemovalLevels,

    /// Rows cannot form a fold
    #[error("Invalid fold: {0}")]
    InvalidFold(String),

    /// Vector or matrix dimensions do not agree
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Internal consistency check failed; the fold run must be aborted
    #[error("Invariant violated: {0}")]
    Invariant(String),

    /// Operation called before its prerequisite
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl IsrError {
    /// True for errors caused by the configuration rather than the data.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            IsrError::UnknownScheme(_)
                | IsrError::UnknownCombination(_)
                | IsrError::InvalidMetric(_)
                | IsrError::NeighbourCount { .. }
                | IsrError::InvalidRemovalLevel(_)
                | IsrError::NoRemovalLevels
        )
    }
}
