//! Feature encoding pipeline
//!
//! Raw records flow through the same stage sequence at training and at
//! serving time: drop free-text columns, impute from frozen statistics,
//! label-encode binary flags, one-hot categorical columns, decompose
//! dates. The only difference between the two paths is who owns the
//! state: [`fit`] computes it once, [`transform`] only replays it.

mod binary;
mod frame;
mod impute;
mod one_hot;
mod temporal;

pub use binary::BinaryEncoder;
pub use frame::Frame;
pub use impute::{Imputer, MISSING_SENTINEL};
pub use one_hot::OneHotEncoder;
pub use temporal::{parse_date, DATETIME_FORMATS, DATE_FORMATS};

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::{FieldRole, SchemaRegistry};

/// Encoding stage errors
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Value '{value}' in binary column '{column}' was never seen at training time")]
    UnseenCategory { column: String, value: String },

    #[error("No accepted date format matches '{value}' in column '{column}'")]
    DateParse { column: String, value: String },

    #[error("Feature matrix has {actual} columns, artifacts expect {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Feature column {position} is '{actual}', artifacts expect '{expected}'")]
    ColumnMismatch {
        position: usize,
        expected: String,
        actual: String,
    },

    #[error("Column '{column}' is missing from the frame")]
    MissingColumn { column: String },

    #[error("Non-numeric cell survived encoding in column '{column}'")]
    NonNumeric { column: String },
}

/// Result type for encoding operations
pub type Result<T> = std::result::Result<T, EncodeError>;

/// Numeric result of the full stage sequence for a batch
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub columns: Vec<String>,
    pub values: Array2<f64>,
}

impl FeatureMatrix {
    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.values.ncols()
    }
}

/// All frozen transformation state plus the feature column contract.
///
/// Produced once by [`fit`], then shared read-only by every
/// [`transform`] call for the lifetime of the artifact set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderBundle {
    pub imputer: Imputer,
    pub binary: BinaryEncoder,
    pub one_hot: OneHotEncoder,
    /// Column names of the feature matrix, recorded at training time.
    /// Transform output must match exactly or the call fails.
    pub feature_columns: Vec<String>,
}

fn drop_columns(frame: &mut Frame, registry: &SchemaRegistry) -> Result<()> {
    for name in registry.columns_with_role(FieldRole::Drop) {
        frame.drop_col(name)?;
    }
    Ok(())
}

/// Fit all frozen state on a training frame and encode it in one pass.
pub fn fit(mut frame: Frame, registry: &SchemaRegistry) -> Result<(EncoderBundle, FeatureMatrix)> {
    drop_columns(&mut frame, registry)?;

    let imputer = Imputer::fit(&frame, registry)?;
    imputer.apply(&mut frame)?;

    let binary = BinaryEncoder::fit(&frame, registry)?;
    binary.apply(&mut frame)?;

    let one_hot = OneHotEncoder::fit(&frame, registry)?;
    one_hot.apply(&mut frame)?;

    temporal::expand(&mut frame, registry)?;

    let (columns, values) = frame.into_matrix()?;
    let bundle = EncoderBundle {
        imputer,
        binary,
        one_hot,
        feature_columns: columns.clone(),
    };
    Ok((bundle, FeatureMatrix { columns, values }))
}

/// Replay the frozen stages over a frame. Never refits anything; fails
/// explicitly if the output drifts from the recorded column contract.
pub fn transform(
    bundle: &EncoderBundle,
    mut frame: Frame,
    registry: &SchemaRegistry,
) -> Result<FeatureMatrix> {
    drop_columns(&mut frame, registry)?;
    bundle.imputer.apply(&mut frame)?;
    bundle.binary.apply(&mut frame)?;
    bundle.one_hot.apply(&mut frame)?;
    temporal::expand(&mut frame, registry)?;

    let (columns, values) = frame.into_matrix()?;
    if columns.len() != bundle.feature_columns.len() {
        return Err(EncodeError::ShapeMismatch {
            expected: bundle.feature_columns.len(),
            actual: columns.len(),
        });
    }
    for (position, (actual, expected)) in
        columns.iter().zip(&bundle.feature_columns).enumerate()
    {
        if actual != expected {
            return Err(EncodeError::ColumnMismatch {
                position,
                expected: expected.clone(),
                actual: actual.clone(),
            });
        }
    }
    Ok(FeatureMatrix { columns, values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ClaimRecord, RawValue};

    fn training_rows() -> Vec<ClaimRecord> {
        let mut rows = Vec::new();
        for i in 0..6 {
            let mut r = ClaimRecord::sample();
            r.set("smashed", RawValue::Number(f64::from(i % 2)));
            r.set(
                "coverage",
                RawValue::Text(if i % 3 == 0 { "ADLD/THEFT" } else { "ADLD" }.into()),
            );
            r.set("rrp", RawValue::Number(500.0 + f64::from(i) * 100.0));
            rows.push(r);
        }
        rows
    }

    fn fitted() -> (SchemaRegistry, EncoderBundle) {
        let registry = SchemaRegistry::claims();
        let frame = Frame::from_records(&registry, &training_rows());
        let (bundle, _) = fit(frame, &registry).expect("fit succeeds");
        (registry, bundle)
    }

    #[test]
    fn test_fit_records_feature_columns() {
        let registry = SchemaRegistry::claims();
        let frame = Frame::from_records(&registry, &training_rows());
        let (bundle, matrix) = fit(frame, &registry).expect("fit");
        assert_eq!(bundle.feature_columns, matrix.columns);
        assert_eq!(matrix.n_rows(), 6);
        // passthrough block, then indicators, then 3 per datetime column
        assert!(matrix.columns.ends_with(&[
            "purchaseDate_year".to_string(),
            "purchaseDate_month".to_string(),
            "purchaseDate_day".to_string(),
        ]));
    }

    #[test]
    fn test_transform_matches_training_shape() {
        let (registry, bundle) = fitted();
        let frame = Frame::from_records(&registry, &[ClaimRecord::sample()]);
        let matrix = transform(&bundle, frame, &registry).expect("transform");
        assert_eq!(matrix.columns, bundle.feature_columns);
        assert_eq!(matrix.n_rows(), 1);
    }

    #[test]
    fn test_transform_is_deterministic() {
        let (registry, bundle) = fitted();
        let a = transform(
            &bundle,
            Frame::from_records(&registry, &[ClaimRecord::sample()]),
            &registry,
        )
        .expect("first transform");
        let b = transform(
            &bundle,
            Frame::from_records(&registry, &[ClaimRecord::sample()]),
            &registry,
        )
        .expect("second transform");
        assert_eq!(a.columns, b.columns);
        assert_eq!(a.values, b.values);
    }

    #[test]
    fn test_transform_absorbs_unseen_categorical() {
        let (registry, bundle) = fitted();
        let mut record = ClaimRecord::sample();
        record.set("coverage", RawValue::Text("NEVER_SEEN".into()));
        let matrix = transform(&bundle, Frame::from_records(&registry, &[record]), &registry)
            .expect("unseen categorical is absorbed");
        // same width as always
        assert_eq!(matrix.n_cols(), bundle.feature_columns.len());
        // the coverage block is all zeros
        for (i, name) in matrix.columns.iter().enumerate() {
            if name.starts_with("coverage_") {
                assert_eq!(matrix.values[[0, i]], 0.0, "{name} should be 0");
            }
        }
    }

    #[test]
    fn test_transform_rejects_unseen_binary() {
        let (registry, bundle) = fitted();
        let mut record = ClaimRecord::sample();
        record.set("smashed", RawValue::Number(3.0));
        let err = transform(&bundle, Frame::from_records(&registry, &[record]), &registry)
            .unwrap_err();
        assert!(matches!(err, EncodeError::UnseenCategory { .. }));
    }

    #[test]
    fn test_transform_fills_nulls_from_frozen_stats() {
        let (registry, bundle) = fitted();
        // an empty record: everything missing except dates
        let mut record = ClaimRecord::new();
        record.set("policyStartDate", RawValue::Number(1_678_320_000_000.0));
        record.set("policyEndDate", RawValue::Number(1_709_942_400_000.0));
        record.set("purchaseDate", RawValue::Number(1_678_320_000_000.0));
        let matrix = transform(&bundle, Frame::from_records(&registry, &[record]), &registry)
            .expect("nulls are imputable");
        let rrp_idx = matrix.columns.iter().position(|c| c == "rrp").unwrap();
        // median of 500..1000 step 100 over 6 rows
        assert_eq!(matrix.values[[0, rrp_idx]], 750.0);
    }
}
