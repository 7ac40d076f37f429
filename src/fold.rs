//! Fold: one independent partition of a dataset.
//!
//! A fold owns its records (an arena indexed by record id), the rows exactly
//! as they were supplied, and, once measured, the [`NeighbourGraph`] of the
//! ranking pass. Records are appended at construction and never removed;
//! elimination only changes their weight, rank and relations.
//!
//! Relation maintenance lives here so that both directions are always
//! updated together:
//! `a ∈ b.associates ⇔ b ∈ a.neighbours`.

use crate::errors::{IsrError, Result};
use crate::graph::NeighbourGraph;
use crate::record::Record;

use log::{debug, info, trace, warn};

#[derive(Debug, Clone)]
pub struct Fold {
    name: String,
    original: Vec<Vec<f64>>,
    records: Vec<Record>,
    n_attributes: usize,
    graph: Option<NeighbourGraph>,
}

impl Fold {
    /// Build a fold from numeric rows; the last column is the output.
    ///
    /// Rows must be non-empty, of equal length, with at least one input and
    /// one output column, and hold finite values only.
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        let name = name.into();
        if rows.is_empty() {
            return Err(IsrError::InvalidFold(format!("fold {} has no rows", name)));
        }
        let n_attributes = rows[0].len();
        if n_attributes < 2 {
            return Err(IsrError::InvalidFold(format!(
                "fold {} needs at least one input and one output attribute, got {}",
                name, n_attributes
            )));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_attributes {
                return Err(IsrError::InvalidFold(format!(
                    "row {} of fold {} has {} attributes, expected {}",
                    i,
                    name,
                    row.len(),
                    n_attributes
                )));
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(IsrError::InvalidFold(format!(
                    "row {} of fold {} holds a non-finite value",
                    i, name
                )));
            }
        }

        let records = rows
            .iter()
            .enumerate()
            .map(|(id, row)| Record::new(id, row.clone()))
            .collect();

        info!(
            "Fold {} created with {} records and {} attributes",
            name,
            rows.len(),
            n_attributes
        );

        Ok(Self {
            name,
            original: rows,
            records,
            n_attributes,
            graph: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of attributes, inputs plus output.
    pub fn n_attributes(&self) -> usize {
        self.n_attributes
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, id: usize) -> &Record {
        &self.records[id]
    }

    /// Row `id` exactly as supplied, before any normalisation.
    pub fn original_row(&self, id: usize) -> &[f64] {
        &self.original[id]
    }

    /// Current weight of every record, in record order.
    pub fn weights(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.weight).collect()
    }

    /// Current rank of every record, in record order.
    pub fn ranks(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.rank).collect()
    }

    /// Number of records not yet eliminated.
    pub fn n_active(&self) -> usize {
        self.records.iter().filter(|r| r.is_active()).count()
    }

    /// Rescale every attribute (inputs and output) to `[0, 1]` using the
    /// fold's own minimum and maximum. The original rows are kept untouched.
    ///
    /// An attribute with zero range is mapped to 0.
    pub fn normalise(&mut self) {
        debug!("Normalising {} attributes of fold {}", self.n_attributes, self.name);
        for a in 0..self.n_attributes {
            let (min, max) = self
                .records
                .iter()
                .map(|r| r.attributes()[a])
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
                    (min.min(v), max.max(v))
                });
            let range = max - min;

            if range <= 0.0 {
                warn!(
                    "Attribute {} of fold {} is constant; normalised to 0",
                    a, self.name
                );
            }

            for record in self.records.iter_mut() {
                let value = if range > 0.0 {
                    (record.attributes()[a] - min) / range
                } else {
                    0.0
                };
                record.set_attribute(a, value);
            }
        }
        trace!("Fold {} normalised", self.name);
    }

    /// Measure the distance matrix for this ranking pass.
    pub fn measure_distances(&mut self, metric: f64) -> Result<()> {
        self.graph = Some(NeighbourGraph::build(&self.records, metric)?);
        Ok(())
    }

    /// Distance matrix, once measured.
    pub fn graph(&self) -> Result<&NeighbourGraph> {
        self.graph.as_ref().ok_or_else(|| {
            IsrError::InvalidState(format!("distances of fold {} not measured", self.name))
        })
    }

    fn graph_mut(&mut self) -> Result<&mut NeighbourGraph> {
        let name = &self.name;
        self.graph.as_mut().ok_or_else(|| {
            IsrError::InvalidState(format!("distances of fold {} not measured", name))
        })
    }

    /// Find the `k` nearest neighbours of record `id` and register both
    /// directions of each link. Ends with exactly `k` neighbours or fails.
    pub fn find_neighbours(&mut self, id: usize, k: usize) -> Result<()> {
        let nearest = self.graph()?.nearest(id, k)?;

        for nb in nearest {
            self.records[id].neighbours.insert(nb);
            self.records[nb].associates.insert(id);
        }

        let found = self.records[id].neighbours.len();
        if found != k {
            return Err(IsrError::Invariant(format!(
                "record {} ended with {} neighbours instead of {}",
                id, found, k
            )));
        }
        Ok(())
    }

    /// Drop every forward link of record `id`, removing it from its old
    /// neighbours' associate sets as well.
    pub(crate) fn unlink_neighbours(&mut self, id: usize) {
        let neighbours = std::mem::take(&mut self.records[id].neighbours);
        for nb in neighbours {
            self.records[nb].associates.remove(&id);
        }
    }

    /// Sever every link touching record `id` in both directions and return
    /// its former associates, in ascending index order.
    pub(crate) fn clear_traces(&mut self, id: usize) -> Vec<usize> {
        self.unlink_neighbours(id);

        let associates = std::mem::take(&mut self.records[id].associates);
        for &a in &associates {
            self.records[a].neighbours.remove(&id);
        }
        associates.into_iter().collect()
    }

    /// Take record `id` out of the competition: rank it, make its weight
    /// infinite and disable it in the distance matrix.
    pub(crate) fn eliminate(&mut self, id: usize, rank: usize) -> Result<()> {
        self.graph_mut()?.disable(id);
        let record = &mut self.records[id];
        record.rank = rank;
        record.weight = f64::INFINITY;
        Ok(())
    }

    pub(crate) fn set_weight(&mut self, id: usize, weight: f64) -> Result<()> {
        if !weight.is_finite() {
            return Err(IsrError::Invariant(format!(
                "record {} received a non-finite weight {}",
                id, weight
            )));
        }
        self.records[id].weight = weight;
        Ok(())
    }

    /// The active record with the smallest weight.
    ///
    /// Records are scanned in ascending index order and only a strictly
    /// smaller weight replaces the current pick, so the lowest index wins
    /// an exact tie.
    pub fn lightest_active(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for record in self.records.iter().filter(|r| r.is_active()) {
            match best {
                Some((_, w)) if record.weight >= w => {}
                _ => best = Some((record.id(), record.weight)),
            }
        }
        best.map(|(id, _)| id)
    }

    /// Check `a ∈ b.associates ⇔ b ∈ a.neighbours` over the whole fold.
    pub fn relations_consistent(&self) -> bool {
        for record in &self.records {
            for &nb in &record.neighbours {
                if !self.records[nb].associates.contains(&record.id()) {
                    debug!("Record {} lists {} as neighbour without reverse link", record.id(), nb);
                    return false;
                }
            }
            for &a in &record.associates {
                if !self.records[a].neighbours.contains(&record.id()) {
                    debug!("Record {} lists {} as associate without forward link", record.id(), a);
                    return false;
                }
            }
        }
        true
    }
}
