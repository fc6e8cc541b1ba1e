//! Inference orchestrator
//!
//! Owns the serving lifecycle: `Absent → Building → Ready`. When no
//! artifact set exists, `ensure_ready` runs the full training
//! orchestrator synchronously before anything is served; a failed build
//! leaves the service refusing requests instead of serving against a
//! missing classifier. After `Ready` the loaded bundle is immutable and
//! every call only reads it.

use std::fmt;

use thiserror::Error;

use crate::artifact::{ArtifactBundle, ArtifactStore};
use crate::config::PipelineSpec;
use crate::encode::{self, Frame};
use crate::error::{Error, Result};
use crate::model::Classifier;
use crate::schema::{ClaimRecord, SchemaRegistry};
use crate::train;

/// Inference errors
#[derive(Debug, Error)]
pub enum InferError {
    #[error("Service is not ready to serve (state: {0})")]
    NotReady(ServingState),
}

/// Serving lifecycle state, first-class so cold-start behavior is
/// observable without poking the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServingState {
    /// No artifact set has been loaded
    Absent,
    /// A build-if-absent training run is in flight
    Building,
    /// Artifacts loaded; serving
    Ready,
}

impl fmt::Display for ServingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServingState::Absent => "absent",
            ServingState::Building => "building",
            ServingState::Ready => "ready",
        };
        write!(f, "{name}")
    }
}

/// Serving-side orchestrator: loads artifacts once, replays the frozen
/// stages per request, never refits anything.
pub struct InferenceService {
    spec: PipelineSpec,
    registry: SchemaRegistry,
    store: ArtifactStore,
    bundle: Option<ArtifactBundle>,
    state: ServingState,
}

impl InferenceService {
    pub fn new(spec: PipelineSpec) -> Self {
        let store = ArtifactStore::new(&spec.artifacts.dir);
        Self {
            spec,
            registry: SchemaRegistry::claims(),
            store,
            bundle: None,
            state: ServingState::Absent,
        }
    }

    pub fn state(&self) -> ServingState {
        self.state
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Identifier of the loaded artifact set, once ready.
    pub fn run_id(&self) -> Option<&str> {
        self.bundle.as_ref().map(|b| b.run_id.as_str())
    }

    /// Block until artifacts are loaded, training first if none exist.
    /// Idempotent once ready.
    pub fn ensure_ready(&mut self) -> Result<()> {
        if self.state == ServingState::Ready {
            return Ok(());
        }
        self.state = ServingState::Building;
        let outcome = (|| -> Result<()> {
            if !self.store.exists() {
                train::run(&self.spec, &self.registry)?;
            }
            self.bundle = Some(self.store.load()?);
            Ok(())
        })();
        match outcome {
            Ok(()) => {
                self.state = ServingState::Ready;
                Ok(())
            }
            Err(e) => {
                self.state = ServingState::Absent;
                Err(e)
            }
        }
    }

    fn bundle(&self) -> Result<&ArtifactBundle> {
        match (&self.bundle, self.state) {
            (Some(bundle), ServingState::Ready) => Ok(bundle),
            _ => Err(InferError::NotReady(self.state).into()),
        }
    }

    /// Predict a batch: one 0/1 label per record, in input order.
    pub fn predict_batch(&self, records: &[ClaimRecord]) -> Result<Vec<u32>> {
        let bundle = self.bundle()?;
        for (row, record) in records.iter().enumerate() {
            self.registry.validate_record(row, record)?;
        }
        let frame = Frame::from_records(&self.registry, records);
        let matrix = encode::transform(&bundle.encoders, frame, &self.registry)?;
        let preds = bundle
            .classifier
            .predict(&matrix.values)
            .map_err(Error::from)?;
        Ok(preds)
    }

    /// Predict a single record. Same code path as a batch of one.
    pub fn predict(&self, record: &ClaimRecord) -> Result<u32> {
        let preds = self.predict_batch(std::slice::from_ref(record))?;
        Ok(preds[0])
    }
}
