//! Missing-value imputation from frozen training-time statistics
//!
//! Fill values are computed exactly once, when the imputer is fitted on
//! the training partition, and persisted with the other encoders. At
//! serving time they are only ever read; a batch of one must fill its
//! nulls from these statistics, never from itself.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::{FieldRole, RawValue, SchemaRegistry};

use super::frame::Frame;
use super::Result;

/// Sentinel category for columns with no observed mode.
pub const MISSING_SENTINEL: &str = "MISSING";

/// Frozen per-column fill statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Imputer {
    /// Binary columns: most frequent canonical value
    pub binary_fill: BTreeMap<String, String>,
    /// Categorical columns: most frequent canonical value, or the
    /// MISSING sentinel when the column was never observed
    pub categorical_fill: BTreeMap<String, String>,
    /// Continuous columns: median of observed values
    pub continuous_fill: BTreeMap<String, f64>,
}

/// Most frequent canonical value of a column; ties break toward the
/// lexicographically smallest so fitting is deterministic.
fn mode(cells: &[RawValue]) -> Option<String> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for cell in cells {
        if let Some(canon) = cell.canon() {
            *counts.entry(canon).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .max_by(|(a_val, a_n), (b_val, b_n)| a_n.cmp(b_n).then(b_val.cmp(a_val)))
        .map(|(value, _)| value)
}

/// Median of observed numeric cells; even counts average the middle two.
fn median(cells: &[RawValue]) -> Option<f64> {
    let mut observed: Vec<f64> = cells.iter().filter_map(RawValue::as_number).collect();
    if observed.is_empty() {
        return None;
    }
    observed.sort_by(f64::total_cmp);
    let mid = observed.len() / 2;
    Some(if observed.len() % 2 == 1 {
        observed[mid]
    } else {
        (observed[mid - 1] + observed[mid]) / 2.0
    })
}

impl Imputer {
    /// Fit fill statistics from a training frame. Runs once per
    /// training run; inference never calls this.
    pub fn fit(frame: &Frame, registry: &SchemaRegistry) -> Result<Imputer> {
        let mut imputer = Imputer::default();
        for name in registry.columns_with_role(FieldRole::Binary) {
            let fill = mode(frame.col(name)?).unwrap_or_else(|| MISSING_SENTINEL.to_string());
            imputer.binary_fill.insert(name.to_string(), fill);
        }
        for name in registry.columns_with_role(FieldRole::Categorical) {
            let fill = mode(frame.col(name)?).unwrap_or_else(|| MISSING_SENTINEL.to_string());
            imputer.categorical_fill.insert(name.to_string(), fill);
        }
        for name in registry.columns_with_role(FieldRole::Continuous) {
            let fill = median(frame.col(name)?).unwrap_or(0.0);
            imputer.continuous_fill.insert(name.to_string(), fill);
        }
        Ok(imputer)
    }

    /// Fill nulls in place from the frozen statistics. Categorical
    /// cells are also coerced to their canonical string form here so
    /// the one-hot stage sees one uniform representation.
    pub fn apply(&self, frame: &mut Frame) -> Result<()> {
        for (name, fill) in &self.binary_fill {
            for cell in frame.col_mut(name)?.iter_mut() {
                if cell.is_null() {
                    *cell = RawValue::Text(fill.clone());
                }
            }
        }
        for (name, fill) in &self.categorical_fill {
            for cell in frame.col_mut(name)?.iter_mut() {
                *cell = match cell.canon() {
                    Some(canon) => RawValue::Text(canon),
                    None => RawValue::Text(fill.clone()),
                };
            }
        }
        for (name, fill) in &self.continuous_fill {
            for cell in frame.col_mut(name)?.iter_mut() {
                if cell.is_null() {
                    *cell = RawValue::Number(*fill);
                }
            }
        }
        Ok(())
    }
}
