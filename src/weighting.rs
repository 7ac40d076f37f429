//! Weighting schemes: scalar importance of a record from its current
//! neighbourhood. Lower weight means more expendable.
//!
//! - **proximity**: mean distance to the neighbours
//! - **surrounding**: magnitude of the mean vector pointing from the
//!   neighbours to the record; near 0 when the record is evenly surrounded
//! - **remoteness**: proximity and surrounding combined, either by averaging
//!   the raw weights (`cardinal`) or their ordering positions (`ordinal`)
//! - **nonlinearity**: distance from the record to the least-squares
//!   hyperplane fitted through its neighbours (output regressed on inputs)
//!
//! Every function here reads only the record and its neighbours. The
//! `ordinal` combination is the exception: positions are global, so it is
//! computed over a whole set of weights by [`ordinal_weights`].

use std::fmt;
use std::str::FromStr;

use crate::distance::{distance, norm};
use crate::errors::IsrError;
use crate::record::Record;

use log::trace;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Attribute space a scheme measures in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Input attributes only (`-x`)
    Input,
    /// Inputs and output (`-xy`)
    InputOutput,
}

impl Scope {
    /// Coordinates of `record` in this space.
    #[inline]
    pub fn coordinates<'a>(&self, record: &'a Record) -> &'a [f64] {
        match self {
            Scope::Input => record.input(),
            Scope::InputOutput => record.attributes(),
        }
    }

    fn suffix(&self) -> &'static str {
        match self {
            Scope::Input => "x",
            Scope::InputOutput => "xy",
        }
    }
}

/// Weighting scheme with its attribute scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WeightingScheme {
    Proximity(Scope),
    Surrounding(Scope),
    Remoteness(Scope),
    Nonlinearity,
}

impl Default for WeightingScheme {
    fn default() -> Self {
        WeightingScheme::Proximity(Scope::Input)
    }
}

impl WeightingScheme {
    /// Every accepted scheme, in canonical order.
    pub const ALL: [WeightingScheme; 7] = [
        WeightingScheme::Proximity(Scope::Input),
        WeightingScheme::Proximity(Scope::InputOutput),
        WeightingScheme::Surrounding(Scope::Input),
        WeightingScheme::Surrounding(Scope::InputOutput),
        WeightingScheme::Remoteness(Scope::Input),
        WeightingScheme::Remoteness(Scope::InputOutput),
        WeightingScheme::Nonlinearity,
    ];

    /// True for the schemes that take a combination method.
    pub fn is_compound(&self) -> bool {
        matches!(self, WeightingScheme::Remoteness(_))
    }
}

impl fmt::Display for WeightingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightingScheme::Proximity(s) => write!(f, "proximity-{}", s.suffix()),
            WeightingScheme::Surrounding(s) => write!(f, "surrounding-{}", s.suffix()),
            WeightingScheme::Remoteness(s) => write!(f, "remoteness-{}", s.suffix()),
            WeightingScheme::Nonlinearity => write!(f, "nonlinearity"),
        }
    }
}

impl FromStr for WeightingScheme {
    type Err = IsrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "proximity-x" => Ok(WeightingScheme::Proximity(Scope::Input)),
            "proximity-xy" => Ok(WeightingScheme::Proximity(Scope::InputOutput)),
            "surrounding-x" => Ok(WeightingScheme::Surrounding(Scope::Input)),
            "surrounding-xy" => Ok(WeightingScheme::Surrounding(Scope::InputOutput)),
            "remoteness-x" => Ok(WeightingScheme::Remoteness(Scope::Input)),
            "remoteness-xy" => Ok(WeightingScheme::Remoteness(Scope::InputOutput)),
            "nonlinearity" => Ok(WeightingScheme::Nonlinearity),
            other => Err(IsrError::UnknownScheme(other.to_string())),
        }
    }
}

impl TryFrom<String> for WeightingScheme {
    type Error = IsrError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeightingScheme> for String {
    fn from(value: WeightingScheme) -> Self {
        value.to_string()
    }
}

/// How remoteness merges proximity and surrounding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Combination {
    /// Mean of the two raw weights; recomputable per record
    #[default]
    Cardinal,
    /// `n - ⌊(position_prox + position_surr) / 2⌋`; needs the whole fold
    Ordinal,
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combination::Cardinal => write!(f, "cardinal"),
            Combination::Ordinal => write!(f, "ordinal"),
        }
    }
}

impl FromStr for Combination {
    type Err = IsrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "cardinal" => Ok(Combination::Cardinal),
            "ordinal" => Ok(Combination::Ordinal),
            other => Err(IsrError::UnknownCombination(other.to_string())),
        }
    }
}

impl TryFrom<String> for Combination {
    type Error = IsrError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Combination> for String {
    fn from(value: Combination) -> Self {
        value.to_string()
    }
}

/// Mean distance from record `id` to its current neighbours.
///
/// # Panics
///
/// Panics if the record has no neighbours.
pub fn proximity(records: &[Record], id: usize, scope: Scope, metric: f64) -> f64 {
    let record = &records[id];
    assert!(!record.neighbours().is_empty(), "record {} has no neighbours", id);

    let p = scope.coordinates(record);
    let dims = p.len();
    let sum: f64 = record
        .neighbours()
        .iter()
        .map(|&nb| distance(p, scope.coordinates(&records[nb]), dims, metric))
        .sum();

    sum / record.neighbours().len() as f64
}

/// Magnitude of the resultant of `(record - neighbour)` over all current
/// neighbours, divided by the neighbour count.
///
/// # Panics
///
/// Panics if the record has no neighbours.
pub fn surrounding(records: &[Record], id: usize, scope: Scope, metric: f64) -> f64 {
    let record = &records[id];
    assert!(!record.neighbours().is_empty(), "record {} has no neighbours", id);

    let p = scope.coordinates(record);
    let dims = p.len();
    let mut resultant = vec![0.0; dims];
    for &nb in record.neighbours() {
        let q = scope.coordinates(&records[nb]);
        for (r, (a, b)) in resultant.iter_mut().zip(p.iter().zip(q.iter())) {
            *r += a - b;
        }
    }

    norm(&resultant, dims, metric) / record.neighbours().len() as f64
}

/// Euclidean distance from record `id`, taken in input+output space, to the
/// least-squares hyperplane `y = β·x + β0` fitted through its neighbours.
///
/// When the regression has no unique solution (collinear or too few
/// neighbours for the number of inputs) some hyperplane passes through the
/// record as well, so the weight is exactly 0.
pub fn nonlinearity(records: &[Record], id: usize) -> f64 {
    let record = &records[id];
    let k = record.neighbours().len();
    let d = record.n_inputs();
    let cols = d + 1;

    if k < cols {
        trace!(
            "Record {}: {} neighbours cannot fix a hyperplane in {} inputs; weight 0",
            id,
            k,
            d
        );
        return 0.0;
    }

    let mut design = Vec::with_capacity(k * cols);
    let mut response = Vec::with_capacity(k);
    for &nb in record.neighbours() {
        let neighbour = &records[nb];
        design.extend_from_slice(neighbour.input());
        design.push(1.0);
        response.push(neighbour.output());
    }

    let a = DMatrix::from_row_slice(k, cols, &design);
    let b = DVector::from_vec(response);

    let svd = a.svd(true, true);
    let largest = svd.singular_values.max();
    let eps = largest * (k.max(cols) as f64) * f64::EPSILON;
    if svd.rank(eps) < cols {
        trace!("Record {}: singular regression over its neighbours; weight 0", id);
        return 0.0;
    }

    let beta = match svd.solve(&b, eps) {
        Ok(beta) => beta,
        Err(e) => {
            trace!("Record {}: least-squares solve failed ({}); weight 0", id, e);
            return 0.0;
        }
    };

    // hyperplane: β·x - y + β0 = 0
    let x = record.input();
    let num: f64 = (0..d).map(|i| beta[i] * x[i]).sum::<f64>() - record.output() + beta[d];
    let den = ((0..d).map(|i| beta[i] * beta[i]).sum::<f64>() + 1.0).sqrt();

    (num / den).abs()
}

/// Weight of record `id` computed from its own neighbourhood.
///
/// Remoteness is combined with the `cardinal` policy here; the `ordinal`
/// policy is not locally derivable.
pub fn weigh(records: &[Record], id: usize, scheme: WeightingScheme, metric: f64) -> f64 {
    match scheme {
        WeightingScheme::Proximity(scope) => proximity(records, id, scope, metric),
        WeightingScheme::Surrounding(scope) => surrounding(records, id, scope, metric),
        WeightingScheme::Remoteness(scope) => {
            (proximity(records, id, scope, metric) + surrounding(records, id, scope, metric)) / 2.0
        }
        WeightingScheme::Nonlinearity => nonlinearity(records, id),
    }
}

/// Zero-based position of each weight in ascending order.
///
/// The sort is stable: equal weights keep their input order.
pub fn rank_positions(weights: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|&a, &b| weights[a].total_cmp(&weights[b]));

    let mut positions = vec![0; weights.len()];
    for (pos, &i) in order.iter().enumerate() {
        positions[i] = pos;
    }
    positions
}

/// Ordinal remoteness: `n - ⌊(position_prox + position_surr) / 2⌋`.
///
/// # Panics
///
/// Panics if the two slices differ in length.
pub fn ordinal_weights(proximity: &[f64], surrounding: &[f64]) -> Vec<f64> {
    assert_eq!(
        proximity.len(),
        surrounding.len(),
        "proximity and surrounding weights should be of the same length"
    );
    let n = proximity.len();
    let prox_pos = rank_positions(proximity);
    let surr_pos = rank_positions(surrounding);

    prox_pos
        .iter()
        .zip(surr_pos.iter())
        .map(|(p, s)| (n - (p + s) / 2) as f64)
        .collect()
}
