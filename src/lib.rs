//! Library exports for reuse in binaries, benchmarks and tests.
/// Application directory helpers.
pub mod app_dirs;
/// TOML-backed run configuration.
pub mod config;
/// Labeled dataset loading and train/test splitting.
pub mod dataset;
/// Top-level pipeline error and its failure taxonomy.
pub mod error;
/// Logging configuration.
pub mod logging;
/// Linear models, calibration and evaluation metrics.
pub mod ml;
/// Fit, evaluate and predict orchestration.
pub mod pipeline;
/// Text normalization and n-gram featurization.
pub mod text;

pub use error::{ErrorKind, PipelineError};
