//! Numerical building blocks for the sampling engine
//!
//! - `moments`: finite-aware mean, standard deviation and row covariance
//! - `kde`: Gaussian kernel density estimation and mixture resampling
//! - `copula`: eigenvalue-clipped square-root factor of a covariance matrix

pub mod copula;
pub mod kde;
pub mod moments;

pub use copula::copula_factor;
pub use kde::GaussianKde;
pub use moments::{mean, population_std, row_covariance, sample_std};
