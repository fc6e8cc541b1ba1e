//! One-hot expansion of categorical columns over frozen vocabularies
//!
//! The output block is always exactly the frozen vocabulary's columns in
//! the frozen order, whatever appears in the current batch. An unseen
//! category becomes an all-zero row for its column's block. Unlike the
//! binary stage this never errors, since the indicator representation
//! absorbs novelty without corrupting any existing column's meaning.

use serde::{Deserialize, Serialize};

use crate::schema::{FieldRole, RawValue, SchemaRegistry};

use super::frame::Frame;
use super::Result;

/// Frozen vocabulary per categorical column, in registry column order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    /// (column name, sorted category list) pairs
    pub vocab: Vec<(String, Vec<String>)>,
}

impl OneHotEncoder {
    /// Learn sorted vocabularies from the training frame. Runs after
    /// imputation, so every cell is already canonical text.
    pub fn fit(frame: &Frame, registry: &SchemaRegistry) -> Result<OneHotEncoder> {
        let mut encoder = OneHotEncoder::default();
        for name in registry.columns_with_role(FieldRole::Categorical) {
            let mut categories: Vec<String> =
                frame.col(name)?.iter().filter_map(RawValue::canon).collect();
            categories.sort();
            categories.dedup();
            encoder.vocab.push((name.to_string(), categories));
        }
        Ok(encoder)
    }

    /// Indicator column names this encoder produces, in frozen order.
    pub fn feature_names(&self) -> Vec<String> {
        self.vocab
            .iter()
            .flat_map(|(col, cats)| cats.iter().map(move |c| format!("{col}_{c}")))
            .collect()
    }

    /// Total indicator width across all columns.
    pub fn width(&self) -> usize {
        self.vocab.iter().map(|(_, cats)| cats.len()).sum()
    }

    /// Replace each categorical column with its indicator block,
    /// appended after the passthrough columns.
    pub fn apply(&self, frame: &mut Frame) -> Result<()> {
        for (name, categories) in &self.vocab {
            let cells = frame.drop_col(name)?;
            let mut blocks: Vec<Vec<RawValue>> =
                vec![vec![RawValue::Number(0.0); cells.len()]; categories.len()];
            for (row, cell) in cells.iter().enumerate() {
                let canon = cell.canon().unwrap_or_default();
                // unseen category: leave the whole block at zero
                if let Ok(idx) = categories.binary_search(&canon) {
                    blocks[idx][row] = RawValue::Number(1.0);
                }
            }
            for (category, block) in categories.iter().zip(blocks) {
                frame.push_col(format!("{name}_{category}"), block);
            }
        }
        Ok(())
    }
}
