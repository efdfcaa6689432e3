//! Correlated sampling across realizations
//!
//! The engine stacks A realizations of K variables into an (A·K) × M joint
//! matrix, estimates the joint covariance over the M shared observation
//! indices and factors it into a copula matrix `C` (see
//! [`copula_factor`](crate::stats::copula_factor)). Draws are generated in
//! (A·K) × n form, shaped by `C`, shifted by the joint means and then split
//! back into (realization, draw, variable) order.
//!
//! # Samplers
//!
//! | Method                       | Marginals            | Correlation |
//! |------------------------------|----------------------|-------------|
//! | `sample`                     | empirical (KDE)      | none        |
//! | `correlated_sample_gaussian` | Gaussian             | joint cov   |
//! | `correlated_sample`          | standardized KDE     | joint cov   |
//!
//! `correlated_sample` applies the Gaussian-derived factor to standardized
//! KDE draws without a rank (CDF) transform. The target correlation is exact
//! only for Gaussian marginals; downstream outputs rely on this behaviour.

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use tracing::{debug, info};

use crate::core_types::config::SamplingMode;
use crate::core_types::error::SamplingError;
use crate::sampling::atmosphere::AtmosphereRealization;
use crate::sampling::output::SampleSet;
use crate::stats::{copula_factor, moments};

/// Collection of aligned realizations sampled jointly
///
/// Covariance and copula are recomputed on every call; nothing is cached.
#[derive(Debug, Clone)]
pub struct CorrelatedSamplingEngine {
    atmospheres: Vec<AtmosphereRealization>,
    /// (A·K) × M, row `a·K + k` = variable k of realization a
    values: DMatrix<f64>,
}

impl CorrelatedSamplingEngine {
    /// Combine realizations with identical variable and observation counts
    ///
    /// # Errors
    /// - [`SamplingError::EmptyEngine`] for an empty list
    /// - [`SamplingError::ShapeMismatch`] when a realization's K × M shape differs
    ///   from the first one
    pub fn new(atmospheres: Vec<AtmosphereRealization>) -> Result<Self, SamplingError> {
        let Some(first) = atmospheres.first() else {
            return Err(SamplingError::EmptyEngine);
        };
        let expected = first.values().shape();
        for (index, atm) in atmospheres.iter().enumerate() {
            let found = atm.values().shape();
            if found != expected {
                return Err(SamplingError::ShapeMismatch {
                    index,
                    expected,
                    found,
                });
            }
        }

        let (k, m) = expected;
        let values = DMatrix::from_fn(atmospheres.len() * k, m, |row, j| {
            atmospheres[row / k].values()[(row % k, j)]
        });
        info!(
            realizations = atmospheres.len(),
            variables = k,
            observations = m,
            "Built correlated sampling engine"
        );

        Ok(Self {
            atmospheres,
            values,
        })
    }

    /// Realizations in order
    pub fn atmospheres(&self) -> &[AtmosphereRealization] {
        &self.atmospheres
    }

    /// Observations flattened to (A·K) × M
    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    /// (A, K, M)
    pub fn shape(&self) -> (usize, usize, usize) {
        (
            self.atmospheres.len(),
            self.variables_per_realization(),
            self.values.ncols(),
        )
    }

    /// Number of realizations (A)
    pub fn realization_count(&self) -> usize {
        self.atmospheres.len()
    }

    /// Variables in each realization (K)
    pub fn variables_per_realization(&self) -> usize {
        self.atmospheres[0].variable_count()
    }

    /// Total variable count A·K
    pub fn variable_count(&self) -> usize {
        self.values.nrows()
    }

    /// Realization means flattened to an (A·K) vector
    pub fn joint_means(&self) -> DVector<f64> {
        let parts: Vec<f64> = self
            .atmospheres
            .iter()
            .flat_map(|atm| atm.means().iter().copied())
            .collect();
        DVector::from_vec(parts)
    }

    /// Realization population standard deviations flattened to an (A·K) vector
    pub fn joint_stdevs(&self) -> DVector<f64> {
        let parts: Vec<f64> = self
            .atmospheres
            .iter()
            .flat_map(|atm| atm.stdevs().iter().copied())
            .collect();
        DVector::from_vec(parts)
    }

    /// (A·K) × (A·K) sample covariance of every variable of every realization
    ///
    /// Observation j of each realization is assumed to describe the same instant.
    ///
    /// # Errors
    /// Returns [`SamplingError::InsufficientObservations`] when fewer than two
    /// observation indices are finite across all variables.
    pub fn covariance(&self) -> Result<DMatrix<f64>, SamplingError> {
        let cov = moments::row_covariance(&self.values)?;
        debug!(dimension = cov.nrows(), "Estimated joint covariance");
        Ok(cov)
    }

    /// Copula factor `C` with `C Cᵀ ≈ covariance()`
    ///
    /// Negative eigenvalues from a near-singular estimate are floored at zero.
    ///
    /// # Errors
    /// Propagates [`covariance`](Self::covariance) errors.
    pub fn copula(&self) -> Result<DMatrix<f64>, SamplingError> {
        Ok(copula_factor(&self.covariance()?))
    }

    /// Independent draws per realization and variable, no induced correlation
    ///
    /// # Errors
    /// Returns [`SamplingError::InvalidSampleCount`] when `n` is zero.
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<SampleSet, SamplingError> {
        let blocks = self
            .atmospheres
            .iter()
            .map(|atm| atm.sample(n, rng))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SampleSet::from_realizations(blocks))
    }

    /// Jointly Gaussian draws with the empirical joint covariance and means
    ///
    /// # Errors
    /// - [`SamplingError::InvalidSampleCount`] when `n` is zero
    /// - covariance estimation errors
    pub fn correlated_sample_gaussian<R: Rng + ?Sized>(
        &self,
        n: usize,
        rng: &mut R,
    ) -> Result<SampleSet, SamplingError> {
        if n == 0 {
            return Err(SamplingError::InvalidSampleCount(n));
        }
        let copula = self.copula()?;
        let normal = DMatrix::from_fn(self.variable_count(), n, |_, _| -> f64 {
            StandardNormal.sample(rng)
        });
        Ok(self.shape_draws(&copula, &normal))
    }

    /// Empirical-marginal draws shaped by the copula factor
    ///
    /// Each variable is drawn from its own density, standardized with its
    /// realization's mean and population standard deviation, mixed by the
    /// copula factor and shifted back by the means. Zero-spread variables
    /// standardize to zero.
    ///
    /// # Errors
    /// - [`SamplingError::InvalidSampleCount`] when `n` is zero
    /// - covariance estimation errors
    pub fn correlated_sample<R: Rng + ?Sized>(
        &self,
        n: usize,
        rng: &mut R,
    ) -> Result<SampleSet, SamplingError> {
        let mut joint = self.sample(n, rng)?.to_joint();
        let means = self.joint_means();
        let stdevs = self.joint_stdevs();

        for (i, mut row) in joint.row_iter_mut().enumerate() {
            let (mean, std) = (means[i], stdevs[i]);
            row.apply(|x| *x = if std > 0.0 { (*x - mean) / std } else { 0.0 });
        }

        let copula = self.copula()?;
        Ok(self.shape_draws(&copula, &joint))
    }

    /// Run the sampler selected by `mode`
    ///
    /// # Errors
    /// Propagates the selected sampler's errors.
    pub fn sample_mode<R: Rng + ?Sized>(
        &self,
        mode: SamplingMode,
        n: usize,
        rng: &mut R,
    ) -> Result<SampleSet, SamplingError> {
        match mode {
            SamplingMode::Independent => self.sample(n, rng),
            SamplingMode::Gaussian => self.correlated_sample_gaussian(n, rng),
            SamplingMode::Correlated => self.correlated_sample(n, rng),
        }
    }

    /// `C · draws + means`, split into (realization, draw, variable)
    fn shape_draws(&self, copula: &DMatrix<f64>, draws: &DMatrix<f64>) -> SampleSet {
        let means = self.joint_means();
        let mut joint = copula * draws;
        for mut column in joint.column_iter_mut() {
            column += &means;
        }
        SampleSet::from_joint(&joint, self.realization_count())
    }
}
