//! Finite-aware summary statistics
//!
//! Non-finite entries (NaN, ±inf) are treated as masked observations: they are
//! skipped by the scalar moments and excluded listwise by the covariance.

use nalgebra::DMatrix;

use crate::core_types::error::SamplingError;

/// Iterator over the finite entries of `values`
pub fn finite(values: &[f64]) -> impl Iterator<Item = f64> + '_ {
    values.iter().copied().filter(|v| v.is_finite())
}

/// Mean of the finite entries, NaN when there are none
///
/// Falls back to a rescaled sum when the plain sum overflows, so any finite
/// input has a finite mean.
pub fn mean(values: &[f64]) -> f64 {
    let (sum, count) = finite(values).fold((0.0, 0_usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        return f64::NAN;
    }
    if sum.is_finite() {
        return sum / count as f64;
    }

    let scale = finite(values).fold(0.0_f64, |acc, v| acc.max(v.abs()));
    scale * (finite(values).map(|v| v / scale).sum::<f64>() / count as f64)
}

/// Squared deviations from the mean as `(scale, sum, count)`
///
/// The deviations are divided by `scale` before squaring, so the standard
/// deviation is `scale * sqrt(sum / denominator)`. `scale` is 1 unless the
/// plain sum of squares overflows.
fn squared_deviations(values: &[f64]) -> (f64, f64, usize) {
    let m = mean(values);
    let (ss, count) = finite(values).fold((0.0, 0), |(s, c), v| (s + (v - m) * (v - m), c + 1));
    if ss.is_finite() {
        return (1.0, ss, count);
    }

    let scale = finite(values).fold(0.0_f64, |acc, v| acc.max((v - m).abs()));
    let scaled = finite(values)
        .map(|v| {
            let d = (v - m) / scale;
            d * d
        })
        .sum();
    (scale, scaled, count)
}

/// Population standard deviation (ddof = 0) of the finite entries
pub fn population_std(values: &[f64]) -> f64 {
    let (scale, ss, count) = squared_deviations(values);
    if count == 0 {
        f64::NAN
    } else {
        scale * (ss / count as f64).sqrt()
    }
}

/// Sample standard deviation (ddof = 1) of the finite entries
pub fn sample_std(values: &[f64]) -> f64 {
    let (scale, ss, count) = squared_deviations(values);
    if count < 2 {
        f64::NAN
    } else {
        scale * (ss / (count - 1) as f64).sqrt()
    }
}

/// Sample covariance (ddof = 1) between the rows of `rows`
///
/// `rows` is variables × observations. Only observation columns where every row
/// is finite take part, which keeps the estimate positive semi-definite. The
/// result is filled from its upper triangle, so it is exactly symmetric.
///
/// # Errors
/// Returns [`SamplingError::InsufficientObservations`] when fewer than two
/// columns are fully finite.
pub fn row_covariance(rows: &DMatrix<f64>) -> Result<DMatrix<f64>, SamplingError> {
    let nvar = rows.nrows();
    let complete: Vec<usize> = (0..rows.ncols())
        .filter(|&j| rows.column(j).iter().all(|v| v.is_finite()))
        .collect();

    if complete.len() < 2 {
        return Err(SamplingError::InsufficientObservations {
            complete: complete.len(),
        });
    }

    let m = complete.len() as f64;
    let kept = DMatrix::from_fn(nvar, complete.len(), |i, j| rows[(i, complete[j])]);
    let means: Vec<f64> = kept.row_iter().map(|r| r.sum() / m).collect();

    let mut cov = DMatrix::zeros(nvar, nvar);
    for i in 0..nvar {
        for k in i..nvar {
            let s: f64 = kept
                .row(i)
                .iter()
                .zip(kept.row(k).iter())
                .map(|(a, b)| (a - means[i]) * (b - means[k]))
                .sum();
            let c = s / (m - 1.0);
            cov[(i, k)] = c;
            cov[(k, i)] = c;
        }
    }

    Ok(cov)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_moments_skip_non_finite() {
        let values = [1.0, f64::NAN, 2.0, 3.0, f64::INFINITY, 4.0];
        assert_relative_eq!(mean(&values), 2.5);
        assert_relative_eq!(population_std(&values), 1.25_f64.sqrt());
        assert_relative_eq!(sample_std(&values), (5.0_f64 / 3.0).sqrt());
    }

    #[test]
    fn test_moments_of_huge_finite_values() {
        let values = [1e200, -1e200, 0.0];
        assert_eq!(mean(&values), 0.0);
        assert_relative_eq!(sample_std(&values), 1e200, max_relative = 1e-12);
        assert_relative_eq!(
            population_std(&values),
            1e200 * (2.0_f64 / 3.0).sqrt(),
            max_relative = 1e-12
        );

        let same_sign = [1.5e308, 1.7e308];
        assert_relative_eq!(mean(&same_sign), 1.6e308, max_relative = 1e-12);
        assert!(sample_std(&same_sign).is_finite());
    }

    #[test]
    fn test_moments_of_empty_input() {
        assert!(mean(&[f64::NAN]).is_nan());
        assert!(population_std(&[]).is_nan());
        assert!(sample_std(&[1.0]).is_nan());
    }

    #[test]
    fn test_row_covariance_known_values() {
        // x = [1, 2, 3, 4], y = 2x, z constant
        let rows = DMatrix::from_row_slice(
            3,
            4,
            &[1.0, 2.0, 3.0, 4.0, 2.0, 4.0, 6.0, 8.0, 5.0, 5.0, 5.0, 5.0],
        );
        let cov = row_covariance(&rows).unwrap();
        let var_x = 5.0 / 3.0;
        assert_relative_eq!(cov[(0, 0)], var_x, epsilon = 1e-12);
        assert_relative_eq!(cov[(0, 1)], 2.0 * var_x, epsilon = 1e-12);
        assert_relative_eq!(cov[(1, 1)], 4.0 * var_x, epsilon = 1e-12);
        assert_eq!(cov[(2, 2)], 0.0);
        assert_eq!(cov[(0, 2)], 0.0);
        assert_eq!(cov, cov.transpose());
    }

    #[test]
    fn test_row_covariance_drops_incomplete_columns() {
        let rows = DMatrix::from_row_slice(
            2,
            4,
            &[1.0, 2.0, f64::NAN, 3.0, 10.0, 20.0, 99.0, 30.0],
        );
        let cov = row_covariance(&rows).unwrap();
        // Column 2 is ignored for both rows
        assert_relative_eq!(cov[(0, 0)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(cov[(1, 1)], 100.0, epsilon = 1e-12);
        assert_relative_eq!(cov[(0, 1)], 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_row_covariance_needs_two_complete_columns() {
        let rows = DMatrix::from_row_slice(2, 3, &[1.0, f64::NAN, 2.0, 1.0, 2.0, f64::NAN]);
        assert_eq!(
            row_covariance(&rows),
            Err(SamplingError::InsufficientObservations { complete: 1 })
        );
    }
}
