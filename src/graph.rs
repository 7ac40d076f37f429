use std::fmt;

use crate::distance::distance;
use crate::errors::{IsrError, Result};
use crate::record::Record;

use rayon::prelude::*;
use smartcore::linalg::basic::arrays::{Array, Array2, MutArray};
use smartcore::linalg::basic::matrix::DenseMatrix;

// Add logging
use log::{debug, info, trace};

/// Pairwise input-space distances of a fold and the k-NN search over them.
///
/// The matrix is symmetric with a zero diagonal. Disabling a record forces
/// its whole row and column to `+∞`, so it can neither be chosen as a
/// neighbour nor compete for one again. Records are never removed.
#[derive(Debug, Clone)]
pub struct NeighbourGraph {
    matrix: DenseMatrix<f64>,
    nnodes: usize,
    metric: f64,
}

impl NeighbourGraph {
    /// Measure the distance between each pair of records, always on the
    /// input attributes (`dims = attributes - 1`). The output never takes part.
    ///
    /// Rows of the lower triangle are computed in parallel, then mirrored.
    pub fn build(records: &[Record], metric: f64) -> Result<Self> {
        let n = records.len();
        if n < 2 {
            return Err(IsrError::InvalidFold(format!(
                "at least two records are needed to measure distances, got {}",
                n
            )));
        }
        let dims = records[0].n_inputs();
        for record in records {
            if record.n_inputs() != dims {
                return Err(IsrError::DimensionMismatch {
                    expected: dims,
                    actual: record.n_inputs(),
                });
            }
        }

        info!("Measuring distances between {} records", n);
        debug!("Distance parameters: dims={}, metric={}", dims, metric);

        let lower: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| {
                (0..i)
                    .map(|j| distance(records[i].input(), records[j].input(), dims, metric))
                    .collect()
            })
            .collect();

        let mut data = vec![0.0; n * n];
        for (i, row) in lower.iter().enumerate() {
            for (j, &d) in row.iter().enumerate() {
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }

        let matrix = DenseMatrix::from_iterator(data.into_iter(), n, n, 0);
        debug!("Distance matrix built: {}×{}", n, n);

        Ok(Self { matrix, nnodes: n, metric })
    }

    /// Number of records covered by the matrix.
    pub fn nnodes(&self) -> usize {
        self.nnodes
    }

    /// Minkowski parameter the matrix was measured with.
    pub fn metric(&self) -> f64 {
        self.metric
    }

    /// Get the matrix dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.matrix.shape()
    }

    /// Distance between records `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(
            i < self.nnodes && j < self.nnodes,
            "Index out of bounds: ({}, {}) for {}x{} matrix",
            i,
            j,
            self.nnodes,
            self.nnodes
        );
        *self.matrix.get((i, j))
    }

    /// Get the i-th row as a vector
    pub fn get_row(&self, i: usize) -> Vec<f64> {
        assert!(
            i < self.nnodes,
            "Row index {} out of bounds for {} nodes",
            i,
            self.nnodes
        );
        (0..self.nnodes).map(|j| *self.matrix.get((i, j))).collect()
    }

    /// The `k` nearest records to `i`.
    ///
    /// Candidates are sorted by distance with a stable sort, so records at
    /// exactly the same distance keep ascending index order and the lowest
    /// index wins a tie. The record itself is skipped by index, never by a
    /// zero distance: duplicated inputs legitimately sit at distance 0.
    ///
    /// Fails with [`IsrError::Invariant`] if fewer than `k` candidates are at
    /// a finite distance, since the remaining ones are disabled.
    pub fn nearest(&self, i: usize, k: usize) -> Result<Vec<usize>> {
        if i >= self.nnodes {
            return Err(IsrError::DimensionMismatch {
                expected: self.nnodes,
                actual: i + 1,
            });
        }

        let mut candidates: Vec<(usize, f64)> = self.get_row(i).into_iter().enumerate().collect();
        candidates.sort_by(|a, b| a.1.total_cmp(&b.1));

        let picked: Vec<(usize, f64)> = candidates
            .into_iter()
            .filter(|&(j, _)| j != i)
            .take(k)
            .collect();

        if picked.len() != k || picked.iter().any(|&(_, d)| !d.is_finite()) {
            return Err(IsrError::Invariant(format!(
                "record {} has fewer than {} reachable neighbours",
                i, k
            )));
        }

        trace!("Nearest {} to record {}: {:?}", k, i, picked);
        Ok(picked.into_iter().map(|(j, _)| j).collect())
    }

    /// Force every distance to or from record `i` to `+∞`.
    pub fn disable(&mut self, i: usize) {
        assert!(
            i < self.nnodes,
            "Row index {} out of bounds for {} nodes",
            i,
            self.nnodes
        );
        trace!("Disabling record {} in the distance matrix", i);
        for j in 0..self.nnodes {
            self.matrix.set((i, j), f64::INFINITY);
            self.matrix.set((j, i), f64::INFINITY);
        }
    }

    /// True once `disable(i)` has been called.
    pub fn is_disabled(&self, i: usize) -> bool {
        self.get(i, i).is_infinite()
    }

    /// Check if the matrix is symmetric within tolerance
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        trace!("Checking matrix symmetry with tolerance {:.2e}", tolerance);
        for i in 0..self.nnodes {
            for j in (i + 1)..self.nnodes {
                let a = self.get(i, j);
                let b = self.get(j, i);
                if a.is_infinite() && b.is_infinite() {
                    continue;
                }
                if (a - b).abs() > tolerance {
                    debug!("Asymmetry at ({}, {}): {} vs {}", i, j, a, b);
                    return false;
                }
            }
        }
        true
    }
}

/// Pretty printing implementation
impl fmt::Display for NeighbourGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "NeighbourGraph ({}×{}), metric={}:", self.nnodes, self.nnodes, self.metric)?;

        if self.nnodes <= 10 {
            for i in 0..self.nnodes {
                write!(f, "Row {}: [", i)?;
                for j in 0..self.nnodes {
                    write!(f, "{:8.4} ", self.get(i, j))?;
                }
                writeln!(f, "]")?;
            }
        } else {
            let disabled = (0..self.nnodes).filter(|&i| self.is_disabled(i)).count();
            writeln!(f, "Matrix too large to display ({} nodes)", self.nnodes)?;
            writeln!(f, "Disabled records: {}", disabled)?;
        }

        Ok(())
    }
}
