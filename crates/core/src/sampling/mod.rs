//! Layered sampling model
//!
//! - [`EmpiricalVariable`]: one variable, masked values and a fitted KDE
//! - [`AtmosphereRealization`]: K aligned variables with eager means/stdevs
//! - [`CorrelatedSamplingEngine`]: A realizations sampled with a joint copula
//! - [`SampleSet`]: A × n × K sampling output

pub mod atmosphere;
pub mod engine;
pub mod output;
pub mod variable;

pub use atmosphere::AtmosphereRealization;
pub use engine::CorrelatedSamplingEngine;
pub use output::SampleSet;
pub use variable::EmpiricalVariable;
