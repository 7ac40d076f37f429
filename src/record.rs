//! A single dataset row taking part in the ranking.
//!
//! The attribute vector is stored once, inputs first and the output last, so
//! both the input-space view and the input+output view are zero-copy slices.
//!
//! Neighbour and associate relations are sets of record indices into the
//! owning [`Fold`](crate::fold::Fold). They never own the records they point to.
//! Only the fold and the ranker mutate weight, rank and relations.

use std::collections::BTreeSet;

/// One row of a fold with its ranking state.
///
/// - `weight`: importance score, lower is more expendable; `+∞` once eliminated
/// - `rank`: 0 while unranked, then `1..=N` where `N` is eliminated first
/// - `neighbours`: the k nearest other active records
/// - `associates`: records that currently list this one among their neighbours
#[derive(Clone, Debug)]
pub struct Record {
    id: usize,
    attributes: Vec<f64>,
    pub(crate) weight: f64,
    pub(crate) rank: usize,
    pub(crate) neighbours: BTreeSet<usize>,
    pub(crate) associates: BTreeSet<usize>,
}

impl Record {
    /// Creates an unranked record; the last attribute is the output.
    ///
    /// # Panics
    ///
    /// Panics if fewer than two attributes are given.
    ///
    /// # Examples
    ///
    /// ```
    /// use isrank::record::Record;
    /// let r = Record::new(0, vec![0.5, 1.5, 3.0]);
    /// assert_eq!(r.input(), &[0.5, 1.5]);
    /// assert_eq!(r.output(), 3.0);
    /// assert_eq!(r.rank(), 0);
    /// ```
    pub fn new(id: usize, attributes: Vec<f64>) -> Self {
        assert!(
            attributes.len() >= 2,
            "a record needs at least one input and one output attribute"
        );
        Self {
            id,
            attributes,
            weight: 0.0,
            rank: 0,
            neighbours: BTreeSet::new(),
            associates: BTreeSet::new(),
        }
    }

    /// Zero-based index of the record inside its fold.
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Input attributes (all but the last).
    #[inline]
    pub fn input(&self) -> &[f64] {
        &self.attributes[..self.attributes.len() - 1]
    }

    /// Output attribute.
    #[inline]
    pub fn output(&self) -> f64 {
        self.attributes[self.attributes.len() - 1]
    }

    /// Input and output attributes together.
    #[inline]
    pub fn attributes(&self) -> &[f64] {
        &self.attributes
    }

    /// Number of input attributes.
    #[inline]
    pub fn n_inputs(&self) -> usize {
        self.attributes.len() - 1
    }

    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// True while the record has not been eliminated.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.rank == 0
    }

    #[inline]
    pub fn neighbours(&self) -> &BTreeSet<usize> {
        &self.neighbours
    }

    #[inline]
    pub fn associates(&self) -> &BTreeSet<usize> {
        &self.associates
    }

    pub(crate) fn set_attribute(&mut self, idx: usize, value: f64) {
        self.attributes[idx] = value;
    }
}
