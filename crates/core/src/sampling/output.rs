//! Sampling results laid out as (realization, draw, variable)

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::core_types::error::SamplingError;

/// A × n × K block of synthetic draws
///
/// Stored as one n × K matrix per realization, so `get(a, i, k)` is draw `i`
/// of variable `k` in realization `a`. Every realization has the same shape;
/// deserialization goes through [`TryFrom`] to keep it that way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<DMatrix<f64>>", try_from = "Vec<DMatrix<f64>>")]
pub struct SampleSet {
    realizations: Vec<DMatrix<f64>>,
}

impl SampleSet {
    /// Wrap per-realization n × K matrices (all the same shape)
    pub(crate) fn from_realizations(realizations: Vec<DMatrix<f64>>) -> Self {
        Self { realizations }
    }

    /// Split an (A·K) × n joint matrix into A blocks of n × K
    ///
    /// Row `a·K + k` of `joint` becomes column `k` of realization `a`.
    pub(crate) fn from_joint(joint: &DMatrix<f64>, realizations: usize) -> Self {
        let k = joint.nrows() / realizations;
        let n = joint.ncols();
        let blocks = (0..realizations)
            .map(|a| DMatrix::from_fn(n, k, |draw, var| joint[(a * k + var, draw)]))
            .collect();
        Self::from_realizations(blocks)
    }

    /// (realizations, draws, variables per realization)
    pub fn shape(&self) -> (usize, usize, usize) {
        let (n, k) = self.realizations.first().map_or((0, 0), |m| m.shape());
        (self.realizations.len(), n, k)
    }

    /// n × K draws of one realization
    pub fn realization(&self, index: usize) -> Option<&DMatrix<f64>> {
        self.realizations.get(index)
    }

    /// All realizations in order
    pub fn realizations(&self) -> &[DMatrix<f64>] {
        &self.realizations
    }

    /// Single draw value
    pub fn get(&self, realization: usize, draw: usize, variable: usize) -> Option<f64> {
        self.realizations
            .get(realization)
            .and_then(|m| m.get((draw, variable)))
            .copied()
    }

    /// Stack back into an (A·K) × n matrix, one row per variable of each realization
    ///
    /// This is the layout the engine's covariance is estimated on, so the
    /// covariance of generated draws can be compared with it directly.
    pub fn to_joint(&self) -> DMatrix<f64> {
        let (a, n, k) = self.shape();
        DMatrix::from_fn(a * k, n, |row, draw| {
            self.realizations[row / k][(draw, row % k)]
        })
    }

    /// Take the per-realization matrices
    pub fn into_realizations(self) -> Vec<DMatrix<f64>> {
        self.realizations
    }
}

impl TryFrom<Vec<DMatrix<f64>>> for SampleSet {
    type Error = SamplingError;

    /// Accept per-realization n × K matrices only if they all share one shape
    fn try_from(realizations: Vec<DMatrix<f64>>) -> Result<Self, Self::Error> {
        if let Some(first) = realizations.first() {
            let expected = first.shape();
            if let Some((index, bad)) = realizations
                .iter()
                .enumerate()
                .find(|(_, m)| m.shape() != expected)
            {
                return Err(SamplingError::ShapeMismatch {
                    index,
                    expected,
                    found: bad.shape(),
                });
            }
        }
        Ok(Self::from_realizations(realizations))
    }
}

impl From<SampleSet> for Vec<DMatrix<f64>> {
    fn from(set: SampleSet) -> Self {
        set.realizations
    }
}
