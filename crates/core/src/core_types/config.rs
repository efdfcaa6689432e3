//! Configuration values for density fitting and sampling
//!
//! Both types are plain data: they carry no state, derive serde so they can
//! live in a caller's config file, and parse from the short names used on the
//! command line.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core_types::error::SamplingError;

/// Rule used to pick the Gaussian kernel bandwidth
///
/// The bandwidth is `factor * s`, where `s` is the sample standard deviation
/// (ddof = 1) of the finite values and `factor` depends on the rule:
/// - **Scott**: `n^(-1/5)`
/// - **Silverman**: `(3n/4)^(-1/5)`
/// - **Factor**: a fixed, caller-supplied factor
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum BandwidthRule {
    /// Scott's rule of thumb
    #[default]
    Scott,
    /// Silverman's rule of thumb
    Silverman,
    /// Fixed bandwidth factor (multiplies the sample standard deviation)
    Factor(f64),
}

impl BandwidthRule {
    /// Bandwidth factor for `n` data points
    ///
    /// # Errors
    /// Returns [`SamplingError::InvalidBandwidth`] when a fixed factor is not
    /// finite and positive.
    pub fn factor(self, n: usize) -> Result<f64, SamplingError> {
        let n = n as f64;
        match self {
            BandwidthRule::Scott => Ok(n.powf(-0.2)),
            BandwidthRule::Silverman => Ok((n * 0.75).powf(-0.2)),
            BandwidthRule::Factor(f) if f.is_finite() && f > 0.0 => Ok(f),
            BandwidthRule::Factor(f) => Err(SamplingError::InvalidBandwidth(f)),
        }
    }
}

impl FromStr for BandwidthRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scott" => Ok(BandwidthRule::Scott),
            "silverman" => Ok(BandwidthRule::Silverman),
            other => other
                .parse::<f64>()
                .map(BandwidthRule::Factor)
                .map_err(|_| format!("Unknown bandwidth rule '{s}' (scott, silverman or a number)")),
        }
    }
}

/// Which engine sampler to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SamplingMode {
    /// Independent per-variable draws, no induced correlation
    Independent,
    /// Jointly Gaussian draws shaped by the copula factor
    Gaussian,
    /// Empirical marginal draws, standardized and shaped by the copula factor
    #[default]
    Correlated,
}

impl FromStr for SamplingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "independent" => Ok(SamplingMode::Independent),
            "gaussian" => Ok(SamplingMode::Gaussian),
            "correlated" | "empirical" => Ok(SamplingMode::Correlated),
            _ => Err(format!(
                "Unknown sampling mode '{s}' (independent, gaussian, correlated)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scott_and_silverman_factors() {
        let scott = BandwidthRule::Scott.factor(32).unwrap();
        assert!((scott - 0.5).abs() < 1e-12);

        // (0.75 * 32)^(-1/5) = 24^(-0.2)
        let silverman = BandwidthRule::Silverman.factor(32).unwrap();
        assert!((silverman - 24.0_f64.powf(-0.2)).abs() < 1e-12);
        assert!(silverman > scott);
    }

    #[test]
    fn test_fixed_factor_validation() {
        assert_eq!(BandwidthRule::Factor(0.3).factor(10), Ok(0.3));
        assert_eq!(
            BandwidthRule::Factor(0.0).factor(10),
            Err(SamplingError::InvalidBandwidth(0.0))
        );
        assert!(BandwidthRule::Factor(f64::NAN).factor(10).is_err());
    }

    #[test]
    fn test_parse_from_cli_names() {
        assert_eq!("Scott".parse(), Ok(BandwidthRule::Scott));
        assert_eq!("silverman".parse(), Ok(BandwidthRule::Silverman));
        assert_eq!("0.25".parse(), Ok(BandwidthRule::Factor(0.25)));
        assert!("wide".parse::<BandwidthRule>().is_err());

        assert_eq!("gaussian".parse(), Ok(SamplingMode::Gaussian));
        assert_eq!("empirical".parse(), Ok(SamplingMode::Correlated));
        assert!("copula".parse::<SamplingMode>().is_err());
    }
}
