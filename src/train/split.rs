//! Seeded stratified train/test split
//!
//! Rows are shuffled and partitioned per class, so both partitions keep
//! the label proportions. Identical seed and labels give the identical
//! partition; row order within each partition is ascending.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::{Result, TrainError};

/// Row indices of the two partitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Stratified split on 0/1 labels. Every class must contribute at
/// least one row to each partition.
pub fn stratified_split(y: &[u32], test_size: f64, seed: u64) -> Result<SplitIndices> {
    if y.is_empty() {
        return Err(TrainError::EmptyDataset);
    }

    let mut classes: Vec<u32> = y.to_vec();
    classes.sort_unstable();
    classes.dedup();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for class in classes {
        let mut rows: Vec<usize> = (0..y.len()).filter(|&i| y[i] == class).collect();
        if rows.len() < 2 {
            return Err(TrainError::TooFewSamples {
                class,
                count: rows.len(),
            });
        }
        rows.shuffle(&mut rng);
        // at least one row on each side, whatever the ratio rounds to
        let n_test = ((rows.len() as f64 * test_size).round() as usize).clamp(1, rows.len() - 1);
        test.extend_from_slice(&rows[..n_test]);
        train.extend_from_slice(&rows[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    Ok(SplitIndices { train, test })
}
