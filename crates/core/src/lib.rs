//! Atmosphere Sampling Core Library
//!
//! Builds statistically faithful synthetic realizations of correlated
//! atmospheric variables (temperature, pressure, precipitable water vapour, ...)
//! from their historical time series.
//!
//! ## Layers
//!
//! - [`EmpiricalVariable`]: one variable's observations with invalid entries
//!   masked, a Gaussian kernel density estimate and a mixture resampler
//! - [`AtmosphereRealization`]: variables co-observed on one index (one site,
//!   one dataset), with per-variable means, deviations and covariance
//! - [`CorrelatedSamplingEngine`]: several realizations sampled jointly through
//!   a copula factor of their joint covariance
//!
//! The engine is pure computation: no I/O, no shared state, no caching. Every
//! random operation takes an explicit [`rand::Rng`], so seeded runs are
//! reproducible.
//!
//! ## Example
//!
//! ```
//! use atmi_core::{AtmosphereRealization, CorrelatedSamplingEngine, EmpiricalVariable};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let site = |offset: f64| {
//!     let t: Vec<f64> = (0..50_i32).map(|i| 280.0 + offset + f64::from(i % 7)).collect();
//!     let p: Vec<f64> = (0..50_i32).map(|i| 1000.0 - f64::from(i % 5)).collect();
//!     AtmosphereRealization::new(vec![
//!         EmpiricalVariable::new("t", t).unwrap(),
//!         EmpiricalVariable::new("p", p).unwrap(),
//!     ])
//!     .unwrap()
//! };
//!
//! let engine = CorrelatedSamplingEngine::new(vec![site(0.0), site(1.5)]).unwrap();
//! let mut rng = StdRng::seed_from_u64(42);
//! let draws = engine.correlated_sample(100, &mut rng).unwrap();
//! assert_eq!(draws.shape(), (2, 100, 2));
//! ```

// Core types and utilities
pub mod core_types;

// Numerical primitives
pub mod stats;

// Variable / realization / engine layers
pub mod sampling;

// Re-export core types
pub use core_types::{BandwidthRule, SamplingError, SamplingMode};

// Re-export sampling types
pub use sampling::{AtmosphereRealization, CorrelatedSamplingEngine, EmpiricalVariable, SampleSet};
