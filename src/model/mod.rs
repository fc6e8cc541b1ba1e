//! Ensemble classifier
//!
//! The pipeline treats the classifier as an opaque fit/predict unit;
//! the [`Classifier`] trait is that seam. [`RandomForest`] is the
//! shipped implementation: a seeded bootstrap ensemble of gini trees.

mod forest;
mod tree;

pub use forest::{ForestParams, RandomForest};
pub use tree::{DecisionTree, TreeParams};

use ndarray::Array2;
use thiserror::Error;

/// Classifier errors
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Training set is empty")]
    EmptyTrainingSet,

    #[error("Labels length {labels} does not match {rows} training rows")]
    LabelMismatch { labels: usize, rows: usize },

    #[error("Expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Classifier has not been fitted")]
    NotFitted,
}

/// Result type for classifier operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Opaque binary classifier seam: anything with fit/predict/predict_proba
/// can stand behind the pipeline.
pub trait Classifier {
    /// Fit on a feature matrix and 0/1 labels.
    fn fit(&mut self, x: &Array2<f64>, y: &[u32]) -> Result<()>;

    /// One 0/1 class label per input row.
    fn predict(&self, x: &Array2<f64>) -> Result<Vec<u32>>;

    /// P(class 1) per input row.
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<f64>>;
}
