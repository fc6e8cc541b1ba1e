//! YAML schema for the pipeline configuration

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::ForestParams;

/// Complete pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSpec {
    /// Data configuration
    pub data: DataConfig,

    /// Artifact storage configuration
    #[serde(default)]
    pub artifacts: ArtifactConfig,

    /// Classifier hyperparameters
    #[serde(default)]
    pub model: ModelConfig,

    /// Target label mapping
    #[serde(default)]
    pub target: TargetConfig,

    /// Seed shared by the split and the forest
    #[serde(default = "default_seed")]
    pub seed: u64,
}

/// Data configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Labeled training dataset (JSON array of records)
    pub train: PathBuf,

    /// Fraction of rows held out for evaluation
    #[serde(default = "default_test_size")]
    pub test_size: f64,
}

/// Artifact storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    /// Directory holding published runs and the manifest
    #[serde(default = "default_artifacts_dir")]
    pub dir: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: default_artifacts_dir(),
        }
    }
}

/// Classifier hyperparameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub forest: ForestParams,
}

/// Decision label → class code mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    #[serde(default = "default_target_keys")]
    pub keys: Vec<String>,

    #[serde(default = "default_target_values")]
    pub values: Vec<u32>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            keys: default_target_keys(),
            values: default_target_values(),
        }
    }
}

impl TargetConfig {
    /// Label → code lookup
    pub fn mapping(&self) -> HashMap<String, u32> {
        self.keys
            .iter()
            .cloned()
            .zip(self.values.iter().copied())
            .collect()
    }

    /// Code → label lookup, for rendering decisions back to text
    pub fn label_of(&self, code: u32) -> Option<&str> {
        self.values
            .iter()
            .position(|&v| v == code)
            .map(|i| self.keys[i].as_str())
    }
}

fn default_seed() -> u64 {
    42
}

fn default_test_size() -> f64 {
    0.2
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("artifacts")
}

fn default_target_keys() -> Vec<String> {
    vec!["COMPLETED".to_string(), "DECLINED".to_string()]
}

fn default_target_values() -> Vec<u32> {
    vec![1, 0]
}

/// Load and parse a pipeline configuration file.
pub fn load_spec<P: AsRef<Path>>(path: P) -> Result<PipelineSpec> {
    let raw = fs::read_to_string(path.as_ref()).map_err(|e| {
        Error::Config(format!(
            "Failed to read config file {}: {e}",
            path.as_ref().display()
        ))
    })?;
    let spec: PipelineSpec = serde_yaml::from_str(&raw)
        .map_err(|e| Error::Config(format!("Failed to parse YAML config: {e}")))?;
    Ok(spec)
}
