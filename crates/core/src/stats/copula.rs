//! Symmetric square-root factor of a covariance matrix
//!
//! For a symmetric `Σ = V Λ Vᵀ` the factor is `C = V · diag(√max(λ, 0))`, so
//! `C Cᵀ` reproduces `Σ` with any negative eigenvalues floored at zero.
//! Multiplying i.i.d. unit-variance draws by `C` imposes the covariance `Σ`.

use nalgebra::{DMatrix, SymmetricEigen};
use tracing::{debug, warn};

/// Negative eigenvalues larger than this fraction of the spectral radius are
/// reported as more than round-off.
const NEGATIVE_EIGENVALUE_WARN_RATIO: f64 = 1e-8;

/// Copula factor `C` with `C Cᵀ ≈ covariance`
///
/// Never fails: an indefinite or singular input gives a rank-deficient factor.
pub fn copula_factor(covariance: &DMatrix<f64>) -> DMatrix<f64> {
    let eigen = SymmetricEigen::new(covariance.clone());

    let spectral_radius = eigen.eigenvalues.amax();
    let most_negative = eigen.eigenvalues.min();
    let clipped = eigen.eigenvalues.iter().filter(|&&l| l < 0.0).count();
    debug!(
        dimension = covariance.nrows(),
        clipped,
        most_negative,
        "Eigendecomposed covariance"
    );
    if most_negative < -NEGATIVE_EIGENVALUE_WARN_RATIO * spectral_radius {
        warn!(
            most_negative,
            spectral_radius, "Covariance is indefinite beyond round-off, flooring eigenvalues at zero"
        );
    }

    let mut factor = eigen.eigenvectors;
    for (j, mut column) in factor.column_iter_mut().enumerate() {
        column *= eigen.eigenvalues[j].max(0.0).sqrt();
    }
    factor
}
