//! Seeded train/test partitioning.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::Record;

#[derive(Debug, Error, PartialEq)]
pub enum SplitError {
    #[error("test fraction must lie strictly between 0 and 1 (got {0})")]
    InvalidTestFraction(f64),
    #[error("need at least 2 records to split into train and test sets (got {count})")]
    NotEnoughRecords { count: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitOptions {
    /// Share of records held out for evaluation, in `(0, 1)`.
    pub test_fraction: f64,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self { test_fraction: 0.2 }
    }
}

impl SplitOptions {
    pub fn validate(&self) -> Result<(), SplitError> {
        validate_fraction(self.test_fraction)
    }
}

/// Disjoint train and test partitions of one dataset.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: Vec<Record>,
    pub test: Vec<Record>,
}

/// Partition `records` into train and test sets.
///
/// The test set holds `round(n * test_fraction)` records clamped to `[1, n - 1]`,
/// chosen by a shuffle seeded with `seed`. Both sets keep the input order.
pub fn train_test_split(
    records: Vec<Record>,
    options: &SplitOptions,
    seed: u64,
) -> Result<TrainTestSplit, SplitError> {
    options.validate()?;
    let total = records.len();
    if total < 2 {
        return Err(SplitError::NotEnoughRecords { count: total });
    }
    let test_len = test_len(total, options.test_fraction);

    let mut order: Vec<usize> = (0..total).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);
    let mut in_test = vec![false; total];
    for &idx in &order[..test_len] {
        in_test[idx] = true;
    }

    let mut train = Vec::with_capacity(total - test_len);
    let mut test = Vec::with_capacity(test_len);
    for (record, held_out) in records.into_iter().zip(in_test) {
        if held_out {
            test.push(record);
        } else {
            train.push(record);
        }
    }
    info!(
        "Split {} records into {} train / {} test (seed {})",
        total,
        train.len(),
        test.len(),
        seed
    );
    Ok(TrainTestSplit { train, test })
}

fn test_len(total: usize, fraction: f64) -> usize {
    let raw = (total as f64 * fraction).round() as usize;
    raw.clamp(1, total - 1)
}

fn validate_fraction(fraction: f64) -> Result<(), SplitError> {
    if fraction.is_finite() && fraction > 0.0 && fraction < 1.0 {
        Ok(())
    } else {
        Err(SplitError::InvalidTestFraction(fraction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn numbered(count: usize) -> Vec<Record> {
        (0..count)
            .map(|idx| Record::labeled(format!("review {idx}"), idx % 2 == 0))
            .collect()
    }

    fn options(test_fraction: f64) -> SplitOptions {
        SplitOptions { test_fraction }
    }

    #[test]
    fn ten_rows_at_twenty_percent_gives_two_test_rows() {
        let split = train_test_split(numbered(10), &options(0.2), 7).unwrap();
        assert_eq!(split.test.len(), 2);
        assert_eq!(split.train.len(), 8);
    }

    #[test]
    fn partitions_are_disjoint_and_cover_dataset() {
        for seed in 0..5 {
            let split = train_test_split(numbered(37), &options(0.3), seed).unwrap();
            let train: HashSet<&str> = split.train.iter().map(Record::text).collect();
            let test: HashSet<&str> = split.test.iter().map(Record::text).collect();
            assert_eq!(train.len() + test.len(), 37);
            assert!(train.is_disjoint(&test));
        }
    }

    #[test]
    fn same_seed_same_split() {
        let a = train_test_split(numbered(50), &options(0.25), 99).unwrap();
        let b = train_test_split(numbered(50), &options(0.25), 99).unwrap();
        assert_eq!(a.test, b.test);
        assert_eq!(a.train, b.train);
    }

    #[test]
    fn partitions_keep_input_order() {
        let split = train_test_split(numbered(20), &options(0.5), 3).unwrap();
        let index = |r: &Record| {
            r.text()
                .trim_start_matches("review ")
                .parse::<usize>()
                .unwrap()
        };
        let train: Vec<usize> = split.train.iter().map(index).collect();
        let mut sorted = train.clone();
        sorted.sort_unstable();
        assert_eq!(train, sorted);
    }

    #[test]
    fn tiny_fraction_still_holds_out_one_record() {
        let split = train_test_split(numbered(3), &options(0.01), 1).unwrap();
        assert_eq!(split.test.len(), 1);
        let split = train_test_split(numbered(3), &options(0.99), 1).unwrap();
        assert_eq!(split.train.len(), 1);
    }

    #[test]
    fn rejects_fraction_outside_open_interval() {
        for bad in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            let err = train_test_split(numbered(10), &options(bad), 1).unwrap_err();
            assert!(matches!(err, SplitError::InvalidTestFraction(_)));
        }
    }

    #[test]
    fn rejects_single_record() {
        let err = train_test_split(numbered(1), &options(0.2), 1).unwrap_err();
        assert_eq!(err, SplitError::NotEnoughRecords { count: 1 });
    }
}
