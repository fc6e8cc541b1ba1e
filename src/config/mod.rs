//! Declarative pipeline configuration (YAML)

mod schema;
mod validate;

pub use schema::{
    load_spec, ArtifactConfig, DataConfig, ModelConfig, PipelineSpec, TargetConfig,
};
pub use validate::validate_config;
