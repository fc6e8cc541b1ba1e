//! Training orchestrator
//!
//! One linear run: split the labeled data, fit every piece of frozen
//! state, fit the classifier, evaluate, persist. Any stage failure is
//! fatal and aborts the run; nothing is published until the terminal
//! persist step, so a failed run never leaves mixed artifacts behind.

mod split;

pub use split::{stratified_split, SplitIndices};

use std::fmt;

use thiserror::Error;

use crate::artifact::{ArtifactStore, TrainingArtifacts};
use crate::config::PipelineSpec;
use crate::data;
use crate::encode::{self, Frame};
use crate::eval::{roc_auc_score, ConfusionCounts, MetricsReport, SplitMetrics};
use crate::model::{Classifier, RandomForest};
use crate::schema::{ClaimRecord, SchemaRegistry};

/// Training-specific errors
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("Training dataset is empty")]
    EmptyDataset,

    #[error("Target class {class} has only {count} samples; cannot stratify")]
    TooFewSamples { class: u32, count: usize },

    #[error("ROC-AUC is undefined: the {split} partition holds a single class")]
    DegenerateSplit { split: &'static str },

    #[error("Failed to read dataset {path}: {reason}")]
    DatasetRead { path: String, reason: String },

    #[error("Failed to parse dataset {path}: {reason}")]
    DatasetParse { path: String, reason: String },
}

/// Result type for training-local operations
pub type Result<T> = std::result::Result<T, TrainError>;

/// Stages of one training run, in order. Linear, no branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Started,
    SplitData,
    FitEncoders,
    FitClassifier,
    Evaluate,
    PersistArtifacts,
    Done,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStage::Started => "started",
            RunStage::SplitData => "split-data",
            RunStage::FitEncoders => "fit-encoders",
            RunStage::FitClassifier => "fit-classifier",
            RunStage::Evaluate => "evaluate",
            RunStage::PersistArtifacts => "persist-artifacts",
            RunStage::Done => "done",
        };
        write!(f, "{name}")
    }
}

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub run_id: String,
    pub report: MetricsReport,
    pub train_rows: usize,
    pub test_rows: usize,
}

fn select(records: &[ClaimRecord], rows: &[usize]) -> Vec<ClaimRecord> {
    rows.iter().map(|&i| records[i].clone()).collect()
}

fn select_labels(y: &[u32], rows: &[usize]) -> Vec<u32> {
    rows.iter().map(|&i| y[i]).collect()
}

fn evaluate_split(
    forest: &RandomForest,
    x: &ndarray::Array2<f64>,
    y: &[u32],
    split: &'static str,
) -> crate::error::Result<SplitMetrics> {
    let preds = forest.predict(x)?;
    let probas = forest.predict_proba(x)?;
    let counts = ConfusionCounts::from_predictions(&preds, y);
    let roc_auc = roc_auc_score(y, &probas).ok_or(TrainError::DegenerateSplit { split })?;
    Ok(SplitMetrics {
        accuracy: counts.accuracy(),
        f1: counts.f1(),
        roc_auc,
    })
}

/// Run one full training pass and publish its artifacts.
pub fn run(spec: &PipelineSpec, registry: &SchemaRegistry) -> crate::error::Result<TrainingOutcome> {
    let mut stage = RunStage::Started;
    println!("Training run {stage}");

    let records = data::load_records(&spec.data.train)?;
    if records.is_empty() {
        return Err(TrainError::EmptyDataset.into());
    }
    for (row, record) in records.iter().enumerate() {
        registry.validate_record(row, record)?;
    }
    let mapping = spec.target.mapping();
    let y = registry.extract_target(&records, &mapping)?;

    stage = RunStage::SplitData;
    println!("[{stage}] {} rows, test_size={}", records.len(), spec.data.test_size);
    let split = stratified_split(&y, spec.data.test_size, spec.seed)?;
    let train_records = select(&records, &split.train);
    let test_records = select(&records, &split.test);
    let y_train = select_labels(&y, &split.train);
    let y_test = select_labels(&y, &split.test);

    stage = RunStage::FitEncoders;
    println!("[{stage}] fitting frozen state on {} rows", train_records.len());
    let (bundle, x_train) = encode::fit(Frame::from_records(registry, &train_records), registry)?;
    let x_test = encode::transform(&bundle, Frame::from_records(registry, &test_records), registry)?;
    println!("[{stage}] {} feature columns", bundle.feature_columns.len());

    stage = RunStage::FitClassifier;
    println!("[{stage}] {} trees, seed={}", spec.model.forest.n_trees, spec.seed);
    let mut forest = RandomForest::new(spec.model.forest.clone(), spec.seed);
    forest.fit(&x_train.values, &y_train)?;

    stage = RunStage::Evaluate;
    println!("[{stage}] scoring both partitions");
    let report = MetricsReport {
        train: evaluate_split(&forest, &x_train.values, &y_train, "train")?,
        test: evaluate_split(&forest, &x_test.values, &y_test, "test")?,
    };

    stage = RunStage::PersistArtifacts;
    let run_id = ArtifactStore::new_run_id(spec.seed);
    println!("[{stage}] publishing run {run_id}");
    let store = ArtifactStore::new(&spec.artifacts.dir);
    store.save(&TrainingArtifacts {
        run_id: run_id.clone(),
        encoders: bundle,
        classifier: forest,
        report,
    })?;

    stage = RunStage::Done;
    println!("Training run {stage}");
    Ok(TrainingOutcome {
        run_id,
        report,
        train_rows: split.train.len(),
        test_rows: split.test.len(),
    })
}
