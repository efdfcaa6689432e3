//! A single atmospheric variable and its empirical distribution

use rand::Rng;

use crate::core_types::config::BandwidthRule;
use crate::core_types::error::SamplingError;
use crate::stats::{moments, GaussianKde};

/// One variable sampled from a historical time series
///
/// `values` keeps every observation, including non-finite ones, so that the
/// variable stays index-aligned with the other variables of its realization.
/// Non-finite entries are masked out of the density and of every statistic.
/// The density is fitted once at construction and the values are never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct EmpiricalVariable {
    name: String,
    values: Vec<f64>,
    density: GaussianKde,
}

impl EmpiricalVariable {
    /// Build a variable with a Scott's-rule density
    ///
    /// # Errors
    /// Returns [`SamplingError::TooFewValidValues`] when fewer than two values
    /// are finite.
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Result<Self, SamplingError> {
        Self::with_bandwidth(name, values, BandwidthRule::default())
    }

    /// Build a variable with an explicit bandwidth rule
    ///
    /// # Errors
    /// - [`SamplingError::TooFewValidValues`] when fewer than two values are finite
    /// - [`SamplingError::InvalidBandwidth`] for an unusable fixed factor
    pub fn with_bandwidth(
        name: impl Into<String>,
        values: Vec<f64>,
        rule: BandwidthRule,
    ) -> Result<Self, SamplingError> {
        let name = name.into();
        let density = GaussianKde::fit(&name, &values, rule)?;
        Ok(Self {
            name,
            values,
            density,
        })
    }

    /// Variable identifier
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All observations, masked entries included
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of observations, masked entries included
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the variable has no observations at all
    ///
    /// Always false for a constructed variable.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of finite observations
    pub fn valid_count(&self) -> usize {
        self.density.data().len()
    }

    /// Fitted density estimate
    pub fn density(&self) -> &GaussianKde {
        &self.density
    }

    /// Mean of the finite observations
    pub fn mean(&self) -> f64 {
        moments::mean(&self.values)
    }

    /// Population standard deviation of the finite observations
    pub fn population_std(&self) -> f64 {
        moments::population_std(&self.values)
    }

    /// Draw `n` independent values from the fitted density
    ///
    /// # Errors
    /// Returns [`SamplingError::InvalidSampleCount`] when `n` is zero.
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Vec<f64>, SamplingError> {
        if n == 0 {
            return Err(SamplingError::InvalidSampleCount(n));
        }
        Ok(self.density.resample(n, rng))
    }

    /// Estimated density at each of `points`
    pub fn density_at(&self, points: &[f64]) -> Vec<f64> {
        self.density.evaluate_many(points)
    }

    /// Density on `points` evenly spaced values spanning the finite min..max
    ///
    /// Returns `(x, density)`; intended for plotting collaborators.
    pub fn density_curve(&self, points: usize) -> (Vec<f64>, Vec<f64>) {
        let data = self.density.data();
        let lo = data.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let x: Vec<f64> = match points {
            0 => Vec::new(),
            1 => vec![lo],
            _ => {
                let step = (hi - lo) / (points - 1) as f64;
                (0..points).map(|i| lo + step * i as f64).collect()
            }
        };
        let y = self.density_at(&x);
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_masked_values_keep_alignment() {
        let var = EmpiricalVariable::new("temperature", vec![280.0, f64::NAN, 282.0, 284.0])
            .unwrap();
        assert_eq!(var.name(), "temperature");
        assert_eq!(var.len(), 4);
        assert_eq!(var.valid_count(), 3);
        assert!(var.values()[1].is_nan());
        assert_relative_eq!(var.mean(), 282.0);
        assert_relative_eq!(var.population_std(), (8.0_f64 / 3.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_all_invalid_input_fails() {
        let err = EmpiricalVariable::new("pwv", vec![f64::NAN, f64::INFINITY]).unwrap_err();
        assert_eq!(
            err,
            SamplingError::TooFewValidValues {
                name: "pwv".to_string(),
                valid: 0
            }
        );
    }

    #[test]
    fn test_sample_length_and_zero_count() {
        let var = EmpiricalVariable::new("p", vec![1.0, 2.0, 3.0, 5.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let draws = var.sample(128, &mut rng).unwrap();
        assert_eq!(draws.len(), 128);
        assert!(draws.iter().all(|v| v.is_finite()));
        assert_eq!(
            var.sample(0, &mut rng),
            Err(SamplingError::InvalidSampleCount(0))
        );
    }

    #[test]
    fn test_sample_stays_finite_for_huge_values() {
        let var = EmpiricalVariable::new("x", vec![1e200, -1e200, 0.0]).unwrap();
        let draws = var.sample(500, &mut StdRng::seed_from_u64(2)).unwrap();
        assert!(draws.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_density_curve_spans_valid_range() {
        let var = EmpiricalVariable::new("t", vec![f64::NAN, -2.0, 0.0, 3.0]).unwrap();
        let (x, y) = var.density_curve(11);
        assert_eq!(x.len(), 11);
        assert_eq!(y.len(), 11);
        assert_relative_eq!(x[0], -2.0);
        assert_relative_eq!(x[10], 3.0, epsilon = 1e-12);
        assert!(y.iter().all(|&d| d > 0.0 && d.is_finite()));
    }
}
