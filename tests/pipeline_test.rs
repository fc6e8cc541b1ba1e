//! End-to-end pipeline tests: train on a synthetic dataset, publish
//! artifacts, serve predictions against them.
//!
//! The dataset is built so the label is a pure function of the
//! `smashed` triage flag while every other field is constant; the
//! forest has nothing else to split on, so the served decision for the
//! canonical sample record is exactly reproducible.

use std::fs;
use std::path::{Path, PathBuf};

use reclamar::artifact::ArtifactStore;
use reclamar::config::PipelineSpec;
use reclamar::encode::{self, Frame};
use reclamar::infer::{InferenceService, ServingState};
use reclamar::schema::{ClaimRecord, RawValue, SchemaRegistry};
use reclamar::train;
use tempfile::TempDir;

/// 60 rows: smashed=1 -> DECLINED, smashed=0 -> COMPLETED.
fn synthetic_dataset() -> Vec<serde_json::Value> {
    let sample = ClaimRecord::sample();
    (0..60)
        .map(|i| {
            let smashed = i % 2;
            let mut obj = serde_json::Map::new();
            for (name, value) in sample.iter() {
                obj.insert(
                    name.clone(),
                    serde_json::to_value(value).expect("raw value serializes"),
                );
            }
            obj.insert("smashed".into(), serde_json::json!(f64::from(smashed)));
            obj.insert(
                "decision".into(),
                serde_json::json!(if smashed == 1 { "DECLINED" } else { "COMPLETED" }),
            );
            serde_json::Value::Object(obj)
        })
        .collect()
}

fn write_dataset(dir: &Path) -> PathBuf {
    let path = dir.join("claims.json");
    fs::write(
        &path,
        serde_json::to_string(&synthetic_dataset()).expect("dataset serializes"),
    )
    .expect("dataset written");
    path
}

fn spec_for(dir: &Path) -> PipelineSpec {
    let dataset = write_dataset(dir);
    let yaml = format!(
        "data:\n  train: {}\n  test_size: 0.25\nartifacts:\n  dir: {}\nmodel:\n  forest:\n    n_trees: 25\nseed: 42\n",
        dataset.display(),
        dir.join("artifacts").display()
    );
    serde_yaml::from_str(&yaml).expect("spec parses")
}

fn ready_service(dir: &Path) -> InferenceService {
    let mut service = InferenceService::new(spec_for(dir));
    service.ensure_ready().expect("build-if-absent succeeds");
    service
}

#[test]
fn test_training_publishes_a_complete_artifact_set() {
    let dir = TempDir::new().expect("tempdir");
    let spec = spec_for(dir.path());
    let registry = SchemaRegistry::claims();

    let outcome = train::run(&spec, &registry).expect("training run succeeds");
    assert_eq!(outcome.train_rows + outcome.test_rows, 60);
    assert_eq!(outcome.test_rows, 16); // 8 per class at 0.25

    let store = ArtifactStore::new(&spec.artifacts.dir);
    let bundle = store.load().expect("artifacts load");
    assert_eq!(bundle.run_id, outcome.run_id);
    assert!(!bundle.encoders.feature_columns.is_empty());

    let metrics = fs::read_to_string(store.metrics_path(&outcome.run_id)).expect("metrics file");
    assert!(metrics.contains("=== TRAIN RESULTS ==="));
    assert!(metrics.contains("=== TEST RESULTS ==="));
    assert!(metrics.contains("ROC AUC"));
}

#[test]
fn test_training_is_deterministic_for_a_seed() {
    let dir_a = TempDir::new().expect("tempdir a");
    let dir_b = TempDir::new().expect("tempdir b");
    let registry = SchemaRegistry::claims();

    let a = train::run(&spec_for(dir_a.path()), &registry).expect("run a");
    let b = train::run(&spec_for(dir_b.path()), &registry).expect("run b");

    assert_eq!(a.train_rows, b.train_rows);
    assert_eq!(a.test_rows, b.test_rows);
    // the whole pipeline is seeded, so metrics match exactly
    assert_eq!(a.report, b.report);
}

#[test]
fn test_cold_start_builds_then_serves() {
    let dir = TempDir::new().expect("tempdir");
    let mut service = InferenceService::new(spec_for(dir.path()));
    assert_eq!(service.state(), ServingState::Absent);

    service.ensure_ready().expect("build succeeds");
    assert_eq!(service.state(), ServingState::Ready);
    assert!(service.run_id().is_some());

    // idempotent once ready
    service.ensure_ready().expect("still ready");
    assert_eq!(service.state(), ServingState::Ready);
}

#[test]
fn test_warm_start_loads_without_retraining() {
    let dir = TempDir::new().expect("tempdir");
    let first = ready_service(dir.path());
    let first_run = first.run_id().expect("run id").to_string();

    // a second service over the same artifacts dir must reuse the run
    let mut second = InferenceService::new(spec_for(dir.path()));
    second.ensure_ready().expect("loads existing artifacts");
    assert_eq!(second.run_id(), Some(first_run.as_str()));
}

#[test]
fn test_golden_sample_prediction_reproduces() {
    let dir = TempDir::new().expect("tempdir");
    let service = ready_service(dir.path());

    // sample has smashed=0, the training rule says COMPLETED
    let first = service.predict(&ClaimRecord::sample()).expect("predict");
    assert_eq!(first, 1);
    for _ in 0..5 {
        let again = service.predict(&ClaimRecord::sample()).expect("repeat");
        assert_eq!(again, first);
    }

    let mut smashed = ClaimRecord::sample();
    smashed.set("smashed", RawValue::Number(1.0));
    assert_eq!(service.predict(&smashed).expect("predict"), 0);
}

#[test]
fn test_batch_matches_input_order_and_count() {
    let dir = TempDir::new().expect("tempdir");
    let service = ready_service(dir.path());

    let mut declined = ClaimRecord::sample();
    declined.set("smashed", RawValue::Number(1.0));
    let batch = vec![
        ClaimRecord::sample(),
        declined.clone(),
        ClaimRecord::sample(),
        declined,
    ];
    let preds = service.predict_batch(&batch).expect("batch predict");
    assert_eq!(preds, vec![1, 0, 1, 0]);
}

#[test]
fn test_batch_of_one_equals_single_call() {
    let dir = TempDir::new().expect("tempdir");
    let service = ready_service(dir.path());

    let record = ClaimRecord::sample();
    let single = service.predict(&record).expect("single");
    let batch = service
        .predict_batch(std::slice::from_ref(&record))
        .expect("batch of one");
    assert_eq!(batch, vec![single]);
}

#[test]
fn test_unseen_categorical_is_absorbed_at_serving_time() {
    let dir = TempDir::new().expect("tempdir");
    let service = ready_service(dir.path());

    let mut record = ClaimRecord::sample();
    record.set("make", RawValue::Text("BRAND_NEW_MAKE".into()));
    record.set("country", RawValue::Text("XX".into()));
    let pred = service.predict(&record).expect("unseen categories absorbed");
    assert!(pred == 0 || pred == 1);
}

#[test]
fn test_unseen_binary_fails_the_record() {
    let dir = TempDir::new().expect("tempdir");
    let service = ready_service(dir.path());

    let mut record = ClaimRecord::sample();
    record.set("charging", RawValue::Number(5.0));
    let err = service.predict(&record).unwrap_err();
    assert!(err.to_string().contains("charging"), "got: {err}");
}

#[test]
fn test_bad_date_fails_the_record() {
    let dir = TempDir::new().expect("tempdir");
    let service = ready_service(dir.path());

    let mut record = ClaimRecord::sample();
    record.set("purchaseDate", RawValue::Text("soonish".into()));
    let err = service.predict(&record).unwrap_err();
    assert!(err.to_string().contains("purchaseDate"), "got: {err}");
}

#[test]
fn test_served_matrix_always_has_the_frozen_width() {
    let dir = TempDir::new().expect("tempdir");
    let spec = spec_for(dir.path());
    let registry = SchemaRegistry::claims();
    train::run(&spec, &registry).expect("train");
    let bundle = ArtifactStore::new(&spec.artifacts.dir).load().expect("load");

    let mut novel = ClaimRecord::sample();
    novel.set("coverage", RawValue::Text("SOMETHING_ELSE".into()));
    for records in [vec![ClaimRecord::sample()], vec![novel.clone(), novel]] {
        let matrix = encode::transform(
            &bundle.encoders,
            Frame::from_records(&registry, &records),
            &registry,
        )
        .expect("transform");
        assert_eq!(matrix.n_cols(), bundle.encoders.feature_columns.len());
        assert_eq!(matrix.n_rows(), records.len());
    }
}

#[test]
fn test_malformed_input_is_rejected_before_the_pipeline() {
    let dir = TempDir::new().expect("tempdir");
    let service = ready_service(dir.path());

    let mut record = ClaimRecord::sample();
    record.set("excessFee", RawValue::Text("one hundred".into()));
    let err = service.predict(&record).unwrap_err();
    assert!(err.to_string().contains("excessFee"), "got: {err}");
}
