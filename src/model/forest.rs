//! Seeded bootstrap random forest
//!
//! Each tree draws its own bootstrap sample and rng from the run seed,
//! so a fitted forest is a pure function of (data, params, seed).

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::tree::{DecisionTree, TreeParams};
use super::{Classifier, ModelError, Result};

/// Forest hyperparameters; defaults mirror the reference deployment
/// (100 trees, unlimited depth, sqrt-feature subsampling).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

/// Ensemble of seeded gini trees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    params: ForestParams,
    seed: u64,
    trees: Vec<DecisionTree>,
    n_features: usize,
}

// distinct rng stream per tree index
const TREE_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

impl RandomForest {
    pub fn new(params: ForestParams, seed: u64) -> Self {
        Self {
            params,
            seed,
            trees: Vec::new(),
            n_features: 0,
        }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    fn check_fitted(&self, x: &Array2<f64>) -> Result<()> {
        if self.trees.is_empty() {
            return Err(ModelError::NotFitted);
        }
        if x.ncols() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                actual: x.ncols(),
            });
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn fit(&mut self, x: &Array2<f64>, y: &[u32]) -> Result<()> {
        let n = x.nrows();
        if n == 0 {
            return Err(ModelError::EmptyTrainingSet);
        }
        if y.len() != n {
            return Err(ModelError::LabelMismatch {
                labels: y.len(),
                rows: n,
            });
        }
        self.n_features = x.ncols();

        let feature_subsample = ((x.ncols() as f64).sqrt().floor() as usize).max(1);
        let tree_params = TreeParams {
            max_depth: self.params.max_depth,
            min_samples_split: self.params.min_samples_split,
            min_samples_leaf: self.params.min_samples_leaf,
            feature_subsample,
        };

        self.trees = (0..self.params.n_trees)
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(
                    self.seed.wrapping_add((t as u64).wrapping_mul(TREE_SEED_STRIDE)),
                );
                let rows: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                DecisionTree::fit(x, y, &rows, &tree_params, &mut rng)
            })
            .collect();
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<u32>> {
        Ok(self
            .predict_proba(x)?
            .into_iter()
            .map(|p| u32::from(p >= 0.5))
            .collect())
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<f64>> {
        self.check_fitted(x)?;
        let n_trees = self.trees.len() as f64;
        Ok(x.outer_iter()
            .map(|row| {
                self.trees
                    .iter()
                    .map(|t| t.predict_proba_row(row))
                    .sum::<f64>()
                    / n_trees
            })
            .collect())
    }
}
