//! Binary classification building blocks: sparse inputs, the averaged
//! perceptron, score calibration and evaluation metrics.

pub mod calibration;
pub mod metrics;
pub mod perceptron;
mod sparse;

pub use sparse::SparseVector;
