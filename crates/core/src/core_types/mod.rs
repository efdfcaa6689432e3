//! Core types and utilities

pub mod config;
pub mod error;

pub use config::{BandwidthRule, SamplingMode};
pub use error::SamplingError;
