//! Error type shared by the sampling engine
//!
//! Every failure in this crate is a precondition violation detected at the
//! call boundary. Numerical degeneracy (indefinite or singular covariance) is
//! never reported here; it is absorbed by eigenvalue clipping.

/// Errors that can occur while building or sampling from the engine
#[derive(Debug, Clone, PartialEq)]
pub enum SamplingError {
    /// A variable has fewer than two finite values, so no density can be fitted
    TooFewValidValues {
        /// Identifier of the offending variable
        name: String,
        /// Number of finite values that survived masking
        valid: usize,
    },
    /// A variable's observation count differs from the rest of its realization
    LengthMismatch {
        /// Identifier of the offending variable
        name: String,
        /// Observation count of the first variable in the realization
        expected: usize,
        /// Observation count of the offending variable
        found: usize,
    },
    /// A realization's (variables, observations) shape differs from the first one
    ShapeMismatch {
        /// Position of the offending realization
        index: usize,
        /// Shape of the first realization
        expected: (usize, usize),
        /// Shape of the offending realization
        found: (usize, usize),
    },
    /// A realization was built without any variable
    EmptyRealization,
    /// An engine was built without any realization
    EmptyEngine,
    /// Requested sample count is not strictly positive
    InvalidSampleCount(usize),
    /// Fewer than two observation columns are finite for every variable
    InsufficientObservations {
        /// Number of fully valid observation columns
        complete: usize,
    },
    /// A bandwidth factor that is not finite and positive
    InvalidBandwidth(f64),
}

impl std::fmt::Display for SamplingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SamplingError::TooFewValidValues { name, valid } => write!(
                f,
                "Variable '{name}' has {valid} valid values, at least 2 are required"
            ),
            SamplingError::LengthMismatch {
                name,
                expected,
                found,
            } => write!(
                f,
                "Variable '{name}' has {found} observations, expected {expected}"
            ),
            SamplingError::ShapeMismatch {
                index,
                expected,
                found,
            } => write!(
                f,
                "Realization {index} has shape {}x{}, expected {}x{}",
                found.0, found.1, expected.0, expected.1
            ),
            SamplingError::EmptyRealization => {
                write!(f, "A realization needs at least one variable")
            }
            SamplingError::EmptyEngine => {
                write!(f, "A sampling engine needs at least one realization")
            }
            SamplingError::InvalidSampleCount(n) => {
                write!(f, "Sample count must be positive, got {n}")
            }
            SamplingError::InsufficientObservations { complete } => write!(
                f,
                "Covariance needs at least 2 fully valid observations, found {complete}"
            ),
            SamplingError::InvalidBandwidth(factor) => {
                write!(f, "Bandwidth factor must be finite and positive, got {factor}")
            }
        }
    }
}

impl std::error::Error for SamplingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SamplingError::TooFewValidValues {
            name: "pwv".to_string(),
            valid: 1,
        };
        assert_eq!(
            err.to_string(),
            "Variable 'pwv' has 1 valid values, at least 2 are required"
        );

        let err = SamplingError::ShapeMismatch {
            index: 2,
            expected: (3, 100),
            found: (3, 99),
        };
        assert_eq!(err.to_string(), "Realization 2 has shape 3x99, expected 3x100");

        assert_eq!(
            SamplingError::InvalidSampleCount(0).to_string(),
            "Sample count must be positive, got 0"
        );
    }
}
