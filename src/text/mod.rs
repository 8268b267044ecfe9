//! Text normalization and n-gram featurization.

mod featurizer;
mod normalize;

pub use featurizer::{FeaturizeError, FeaturizerOptions, TextFeaturizer, VectorNorm};
pub use normalize::{ENGLISH_STOP_WORDS, TextNormalizer};
