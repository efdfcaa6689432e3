//! One realization of the atmosphere: co-observed variables sharing an index

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use rustc_hash::FxHashMap;

use crate::core_types::error::SamplingError;
use crate::sampling::variable::EmpiricalVariable;
use crate::stats::moments;

/// Ordered bundle of variables observed at the same instants
///
/// Variable order defines row order in [`values`](Self::values) and column
/// order in [`sample`](Self::sample). Means and standard deviations are
/// computed once, at construction.
#[derive(Debug, Clone)]
pub struct AtmosphereRealization {
    variables: Vec<EmpiricalVariable>,
    names: Vec<String>,
    /// First position of each name
    index: FxHashMap<String, usize>,
    /// K × M, row i = `variables[i].values()`
    values: DMatrix<f64>,
    means: DVector<f64>,
    stdevs: DVector<f64>,
}

impl AtmosphereRealization {
    /// Bundle `variables`, which must all have the same observation count
    ///
    /// # Errors
    /// - [`SamplingError::EmptyRealization`] for an empty list
    /// - [`SamplingError::LengthMismatch`] when observation counts differ
    pub fn new(variables: Vec<EmpiricalVariable>) -> Result<Self, SamplingError> {
        let Some(first) = variables.first() else {
            return Err(SamplingError::EmptyRealization);
        };
        let m = first.len();
        if let Some(bad) = variables.iter().find(|v| v.len() != m) {
            return Err(SamplingError::LengthMismatch {
                name: bad.name().to_string(),
                expected: m,
                found: bad.len(),
            });
        }

        let k = variables.len();
        let names: Vec<String> = variables.iter().map(|v| v.name().to_string()).collect();
        let mut index = FxHashMap::default();
        for (i, name) in names.iter().enumerate() {
            index.entry(name.clone()).or_insert(i);
        }

        let values = DMatrix::from_fn(k, m, |i, j| variables[i].values()[j]);
        let means = DVector::from_iterator(k, variables.iter().map(EmpiricalVariable::mean));
        let stdevs =
            DVector::from_iterator(k, variables.iter().map(EmpiricalVariable::population_std));

        Ok(Self {
            variables,
            names,
            index,
            values,
            means,
            stdevs,
        })
    }

    /// Variables in column order
    pub fn variables(&self) -> &[EmpiricalVariable] {
        &self.variables
    }

    /// Variable identifiers in column order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// First variable called `name`
    pub fn variable(&self, name: &str) -> Option<&EmpiricalVariable> {
        self.index.get(name).map(|&i| &self.variables[i])
    }

    /// Observations as a K × M matrix, masked entries included
    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    /// Per-variable mean of the finite observations
    pub fn means(&self) -> &DVector<f64> {
        &self.means
    }

    /// Per-variable population standard deviation of the finite observations
    pub fn stdevs(&self) -> &DVector<f64> {
        &self.stdevs
    }

    /// Number of variables (K)
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Number of observations per variable (M)
    pub fn observation_count(&self) -> usize {
        self.values.ncols()
    }

    /// Draw `n` values per variable, independently for each variable
    ///
    /// Returns an n × K matrix: one row per draw, one column per variable.
    /// No correlation between columns is induced here.
    ///
    /// # Errors
    /// Returns [`SamplingError::InvalidSampleCount`] when `n` is zero.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        n: usize,
        rng: &mut R,
    ) -> Result<DMatrix<f64>, SamplingError> {
        let columns = self
            .variables
            .iter()
            .map(|v| v.sample(n, rng).map(DVector::from_vec))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DMatrix::from_columns(&columns))
    }

    /// K × K sample covariance among this realization's variables
    ///
    /// # Errors
    /// Returns [`SamplingError::InsufficientObservations`] when fewer than two
    /// observations are finite for every variable.
    pub fn covariance(&self) -> Result<DMatrix<f64>, SamplingError> {
        moments::row_covariance(&self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn variable(name: &str, values: &[f64]) -> EmpiricalVariable {
        EmpiricalVariable::new(name, values.to_vec()).unwrap()
    }

    #[test]
    fn test_statistics_are_eager() {
        let atm = AtmosphereRealization::new(vec![
            variable("t", &[270.0, 272.0, 274.0, 276.0]),
            variable("p", &[1000.0, f64::NAN, 990.0, 995.0]),
        ])
        .unwrap();

        assert_eq!(atm.names(), &["t".to_string(), "p".to_string()]);
        assert_eq!(atm.values().shape(), (2, 4));
        assert_relative_eq!(atm.means()[0], 273.0);
        assert_relative_eq!(atm.means()[1], 995.0);
        assert_relative_eq!(atm.stdevs()[0], 5.0_f64.sqrt(), epsilon = 1e-12);
        assert!(atm.values()[(1, 1)].is_nan());
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let err = AtmosphereRealization::new(vec![
            variable("t", &[1.0, 2.0, 3.0]),
            variable("pwv", &[1.0, 2.0]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            SamplingError::LengthMismatch {
                name: "pwv".to_string(),
                expected: 3,
                found: 2
            }
        );
        assert_eq!(
            AtmosphereRealization::new(Vec::new()).unwrap_err(),
            SamplingError::EmptyRealization
        );
    }

    #[test]
    fn test_lookup_by_name_takes_first() {
        let atm = AtmosphereRealization::new(vec![
            variable("t", &[1.0, 2.0]),
            variable("t", &[5.0, 7.0]),
        ])
        .unwrap();
        assert_eq!(atm.variable("t").unwrap().values(), &[1.0, 2.0]);
        assert!(atm.variable("pwv").is_none());
    }

    #[test]
    fn test_sample_shape_is_draws_by_variables() {
        let atm = AtmosphereRealization::new(vec![
            variable("a", &[0.0, 1.0, 2.0]),
            variable("b", &[10.0, 11.0, 15.0]),
            variable("c", &[-3.0, 3.0, 0.0]),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let draws = atm.sample(40, &mut rng).unwrap();
        assert_eq!(draws.shape(), (40, 3));
        assert!(atm.sample(0, &mut rng).is_err());
    }

    #[test]
    fn test_covariance_with_constant_variable() {
        let atm = AtmosphereRealization::new(vec![
            variable("t", &[1.0, 3.0, 2.0, 6.0]),
            variable("c", &[4.0, 4.0, 4.0, 4.0]),
        ])
        .unwrap();
        let cov = atm.covariance().unwrap();
        assert_eq!(cov, cov.transpose());
        assert_eq!(cov[(1, 1)], 0.0);
        assert_eq!(cov[(0, 1)], 0.0);
        let eigenvalues = cov.symmetric_eigenvalues();
        assert!(eigenvalues.iter().all(|&l| l >= -1e-12));
    }
}
