//! Integer label encoding for binary triage columns
//!
//! Codes are assigned by sorting each column's distinct canonical
//! values at fit time, so `0`/`1` flags encode to 0/1. A value outside
//! the frozen map fails the record: a flag's integer code carries
//! direct meaning to the classifier, so guessing is worse than failing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::{FieldRole, RawValue, SchemaRegistry};

use super::frame::Frame;
use super::{EncodeError, Result};

/// Frozen label maps for all binary columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BinaryEncoder {
    /// column name → (canonical value → integer code)
    pub maps: BTreeMap<String, BTreeMap<String, u32>>,
}

impl BinaryEncoder {
    /// Learn one label map per binary column from the training frame.
    /// Must run after imputation so nulls are already filled.
    pub fn fit(frame: &Frame, registry: &SchemaRegistry) -> Result<BinaryEncoder> {
        let mut encoder = BinaryEncoder::default();
        for name in registry.columns_with_role(FieldRole::Binary) {
            // BTreeMap keys are the sorted distinct values; enumerate
            // assigns codes in that order
            let mut map = BTreeMap::new();
            for cell in frame.col(name)? {
                if let Some(canon) = cell.canon() {
                    map.entry(canon).or_insert(0);
                }
            }
            for (code, value) in map.values_mut().zip(0u32..) {
                *code = value;
            }
            encoder.maps.insert(name.to_string(), map);
        }
        Ok(encoder)
    }

    /// Replace each binary cell with its frozen integer code.
    pub fn apply(&self, frame: &mut Frame) -> Result<()> {
        for (name, map) in &self.maps {
            for cell in frame.col_mut(name)?.iter_mut() {
                let canon = cell.canon().unwrap_or_default();
                match map.get(&canon) {
                    Some(&code) => *cell = RawValue::Number(f64::from(code)),
                    None => {
                        return Err(EncodeError::UnseenCategory {
                            column: name.clone(),
                            value: canon,
                        })
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::Imputer;
    use crate::schema::ClaimRecord;

    fn flag_row(value: f64) -> ClaimRecord {
        let mut r = ClaimRecord::new();
        r.set("smashed", RawValue::Number(value));
        r
    }

    fn fitted(rows: &[ClaimRecord]) -> (SchemaRegistry, Imputer, BinaryEncoder) {
        let registry = SchemaRegistry::claims();
        let mut frame = Frame::from_records(&registry, rows);
        let imputer = Imputer::fit(&frame, &registry).expect("imputer fit");
        imputer.apply(&mut frame).expect("impute");
        let encoder = BinaryEncoder::fit(&frame, &registry).expect("encoder fit");
        (registry, imputer, encoder)
    }

    fn imputed(registry: &SchemaRegistry, imputer: &Imputer, rows: &[ClaimRecord]) -> Frame {
        let mut frame = Frame::from_records(registry, rows);
        imputer.apply(&mut frame).expect("impute");
        frame
    }

    #[test]
    fn test_codes_follow_sorted_value_order() {
        let (_, _, encoder) = fitted(&[flag_row(1.0), flag_row(0.0), flag_row(1.0)]);
        let map = &encoder.maps["smashed"];
        assert_eq!(map.get("0"), Some(&0));
        assert_eq!(map.get("1"), Some(&1));
    }

    #[test]
    fn test_one_map_per_binary_column() {
        let registry = SchemaRegistry::claims();
        let (_, _, encoder) = fitted(&[flag_row(1.0)]);
        assert_eq!(
            encoder.maps.len(),
            registry.columns_with_role(FieldRole::Binary).len()
        );
    }

    #[test]
    fn test_apply_encodes_in_place() {
        let (registry, imputer, encoder) = fitted(&[flag_row(1.0), flag_row(0.0)]);
        let mut frame = imputed(&registry, &imputer, &[flag_row(1.0)]);
        encoder.apply(&mut frame).expect("apply");
        assert_eq!(frame.col("smashed").unwrap()[0], RawValue::Number(1.0));
        // untouched flags were filled and encoded from frozen state too
        assert!(matches!(
            frame.col("turnOnOff").unwrap()[0],
            RawValue::Number(_)
        ));
    }

    #[test]
    fn test_unseen_value_is_a_typed_error() {
        let (registry, imputer, encoder) = fitted(&[flag_row(1.0), flag_row(0.0)]);
        let mut frame = imputed(&registry, &imputer, &[flag_row(7.0)]);
        let err = encoder.apply(&mut frame).unwrap_err();
        match err {
            EncodeError::UnseenCategory { column, value } => {
                assert_eq!(column, "smashed");
                assert_eq!(value, "7");
            }
            other => panic!("expected UnseenCategory, got {other:?}"),
        }
    }

    #[test]
    fn test_numeric_and_text_flags_share_codes() {
        let (registry, imputer, encoder) = fitted(&[flag_row(1.0), flag_row(0.0)]);
        let mut text_row = ClaimRecord::new();
        text_row.set("smashed", RawValue::Text("1".into()));
        let mut frame = imputed(&registry, &imputer, &[text_row]);
        encoder.apply(&mut frame).expect("apply");
        assert_eq!(frame.col("smashed").unwrap()[0], RawValue::Number(1.0));
    }
}
