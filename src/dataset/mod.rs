//! Labeled text records: loading from delimited files and train/test splitting.

pub mod loader;
mod record;
pub mod split;

pub use loader::{DatasetError, LoaderOptions, load_records, parse_records};
pub use record::Record;
pub use split::{SplitError, SplitOptions, TrainTestSplit, train_test_split};
