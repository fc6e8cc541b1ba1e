//! Filesystem layout and atomic publication of training artifacts
//!
//! ```text
//! artifacts/
//!   manifest.json          current-run pointer, written last
//!   run-<id>/
//!     imputer.json
//!     binary_encoders.json
//!     ohe_encoder.json
//!     classifier.json
//!     metrics.txt
//! ```
//!
//! A run is staged under a dot-directory and published with rename(2),
//! then the manifest is swapped the same way. Readers either see the
//! previous complete run or the new complete run, never a mix.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::encode::{BinaryEncoder, EncoderBundle, Imputer, OneHotEncoder};
use crate::eval::MetricsReport;
use crate::model::RandomForest;

use super::{ArtifactBundle, ArtifactError, Result};

pub const MANIFEST_FILE: &str = "manifest.json";
pub const IMPUTER_FILE: &str = "imputer.json";
pub const BINARY_ENCODERS_FILE: &str = "binary_encoders.json";
pub const OHE_ENCODER_FILE: &str = "ohe_encoder.json";
pub const CLASSIFIER_FILE: &str = "classifier.json";
pub const METRICS_FILE: &str = "metrics.txt";

/// Current-run pointer, the last file written by a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub run_id: String,
    pub created: String,
}

/// Payload wrapper carrying the producing run's id
#[derive(Debug, Serialize, Deserialize)]
struct Versioned<T> {
    run_id: String,
    payload: T,
}

#[derive(Debug, Serialize, Deserialize)]
struct OheRecord {
    encoder: OneHotEncoder,
    feature_columns: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ClassifierRecord {
    n_features: usize,
    forest: RandomForest,
}

/// Everything a completed training run persists
#[derive(Debug, Clone)]
pub struct TrainingArtifacts {
    pub run_id: String,
    pub encoders: EncoderBundle,
    pub classifier: RandomForest,
    pub report: MetricsReport,
}

/// Owner of the artifacts directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| ArtifactError::Serialization(format!("{}: {e}", path.display())))?;
    fs::write(path, json)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(ArtifactError::Missing(path.display().to_string()));
    }
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw)
        .map_err(|e| ArtifactError::Serialization(format!("{}: {e}", path.display())))
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a complete artifact set has been published.
    pub fn exists(&self) -> bool {
        self.root.join(MANIFEST_FILE).exists()
    }

    /// Short content-free run identifier: sha256 over seed and wall
    /// clock, truncated the way run labels are everywhere else.
    pub fn new_run_id(seed: u64) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(seed.to_le_bytes());
        hasher.update(nanos.to_le_bytes());
        let digest = hasher.finalize();
        digest.iter().take(6).map(|b| format!("{b:02x}")).collect()
    }

    fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root.join(format!("run-{run_id}"))
    }

    /// Persist a completed run. Files are staged under a dot-directory
    /// and published by rename, manifest last.
    pub fn save(&self, artifacts: &TrainingArtifacts) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let run_id = &artifacts.run_id;

        let staging = self.root.join(format!(".staging-{run_id}"));
        if staging.exists() {
            fs::remove_dir_all(&staging)?;
        }
        fs::create_dir_all(&staging)?;

        write_json(
            &staging.join(IMPUTER_FILE),
            &Versioned {
                run_id: run_id.clone(),
                payload: artifacts.encoders.imputer.clone(),
            },
        )?;
        write_json(
            &staging.join(BINARY_ENCODERS_FILE),
            &Versioned {
                run_id: run_id.clone(),
                payload: artifacts.encoders.binary.clone(),
            },
        )?;
        write_json(
            &staging.join(OHE_ENCODER_FILE),
            &Versioned {
                run_id: run_id.clone(),
                payload: OheRecord {
                    encoder: artifacts.encoders.one_hot.clone(),
                    feature_columns: artifacts.encoders.feature_columns.clone(),
                },
            },
        )?;
        write_json(
            &staging.join(CLASSIFIER_FILE),
            &Versioned {
                run_id: run_id.clone(),
                payload: ClassifierRecord {
                    n_features: artifacts.encoders.feature_columns.len(),
                    forest: artifacts.classifier.clone(),
                },
            },
        )?;
        fs::write(staging.join(METRICS_FILE), artifacts.report.to_string())?;

        let run_dir = self.run_dir(run_id);
        if run_dir.exists() {
            fs::remove_dir_all(&run_dir)?;
        }
        fs::rename(&staging, &run_dir)?;

        let manifest = Manifest {
            run_id: run_id.clone(),
            created: chrono::Utc::now().to_rfc3339(),
        };
        let tmp = self.root.join(".manifest.json.tmp");
        write_json(&tmp, &manifest)?;
        fs::rename(&tmp, self.root.join(MANIFEST_FILE))?;
        Ok(())
    }

    /// Load the current artifact set for serving, verifying that every
    /// file was produced by the run the manifest points at.
    pub fn load(&self) -> Result<ArtifactBundle> {
        let manifest: Manifest = read_json(&self.root.join(MANIFEST_FILE))?;
        let dir = self.run_dir(&manifest.run_id);

        let imputer: Versioned<Imputer> = read_json(&dir.join(IMPUTER_FILE))?;
        let binary: Versioned<BinaryEncoder> = read_json(&dir.join(BINARY_ENCODERS_FILE))?;
        let ohe: Versioned<OheRecord> = read_json(&dir.join(OHE_ENCODER_FILE))?;
        let classifier: Versioned<ClassifierRecord> = read_json(&dir.join(CLASSIFIER_FILE))?;

        for (file, found) in [
            (IMPUTER_FILE, &imputer.run_id),
            (BINARY_ENCODERS_FILE, &binary.run_id),
            (OHE_ENCODER_FILE, &ohe.run_id),
            (CLASSIFIER_FILE, &classifier.run_id),
        ] {
            if found != &manifest.run_id {
                return Err(ArtifactError::VersionMismatch {
                    file: file.to_string(),
                    expected: manifest.run_id.clone(),
                    found: found.clone(),
                });
            }
        }

        Ok(ArtifactBundle {
            run_id: manifest.run_id,
            encoders: EncoderBundle {
                imputer: imputer.payload,
                binary: binary.payload,
                one_hot: ohe.payload.encoder,
                feature_columns: ohe.payload.feature_columns,
            },
            classifier: classifier.payload.forest,
        })
    }

    /// Path of the metrics report for a run.
    pub fn metrics_path(&self, run_id: &str) -> PathBuf {
        self.run_dir(run_id).join(METRICS_FILE)
    }
}
