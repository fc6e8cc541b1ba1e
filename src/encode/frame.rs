//! Column-major working frame shared by every encoding stage
//!
//! Column order is dictated by the registry at construction and by the
//! stages afterwards; the incoming payload never influences it.

use ndarray::Array2;

use crate::schema::{ClaimRecord, RawValue, SchemaRegistry};

use super::{EncodeError, Result};

/// Ordered columns of raw cells for a batch of records
#[derive(Debug, Clone)]
pub struct Frame {
    names: Vec<String>,
    cols: Vec<Vec<RawValue>>,
    rows: usize,
}

impl Frame {
    /// Reindex records to the registry's field order: absent fields
    /// become nulls, keys outside the registry are ignored. Continuous
    /// cells are coerced to numbers here so later stages only ever see
    /// `Number` or `Null` in those columns.
    pub fn from_records(registry: &SchemaRegistry, records: &[ClaimRecord]) -> Frame {
        let mut frame = Frame {
            names: Vec::with_capacity(registry.fields().len()),
            cols: Vec::with_capacity(registry.fields().len()),
            rows: records.len(),
        };
        for field in registry.fields() {
            let col = records
                .iter()
                .map(|r| match r.get(field.name) {
                    v if field.role == crate::schema::FieldRole::Continuous => match v.as_number()
                    {
                        Some(n) => RawValue::Number(n),
                        None => RawValue::Null,
                    },
                    v => v.clone(),
                })
                .collect();
            frame.names.push(field.name.to_string());
            frame.cols.push(col);
        }
        frame
    }

    pub fn n_rows(&self) -> usize {
        self.rows
    }

    pub fn n_cols(&self) -> usize {
        self.cols.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn col(&self, name: &str) -> Result<&[RawValue]> {
        self.position(name)
            .map(|i| self.cols[i].as_slice())
            .ok_or_else(|| EncodeError::MissingColumn {
                column: name.to_string(),
            })
    }

    pub fn col_mut(&mut self, name: &str) -> Result<&mut Vec<RawValue>> {
        match self.position(name) {
            Some(i) => Ok(&mut self.cols[i]),
            None => Err(EncodeError::MissingColumn {
                column: name.to_string(),
            }),
        }
    }

    /// Append a column at the end of the frame.
    pub fn push_col(&mut self, name: impl Into<String>, values: Vec<RawValue>) {
        debug_assert_eq!(values.len(), self.rows);
        self.names.push(name.into());
        self.cols.push(values);
    }

    /// Remove a column, returning its cells.
    pub fn drop_col(&mut self, name: &str) -> Result<Vec<RawValue>> {
        match self.position(name) {
            Some(i) => {
                self.names.remove(i);
                Ok(self.cols.remove(i))
            }
            None => Err(EncodeError::MissingColumn {
                column: name.to_string(),
            }),
        }
    }

    /// Collapse the frame into a dense numeric matrix. Every cell must
    /// be a number by now; anything else means a stage was skipped.
    pub fn into_matrix(self) -> Result<(Vec<String>, Array2<f64>)> {
        let (rows, cols) = (self.rows, self.cols.len());
        let mut flat = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for (c, col) in self.cols.iter().enumerate() {
                match col[row] {
                    RawValue::Number(n) => flat.push(n),
                    _ => {
                        return Err(EncodeError::NonNumeric {
                            column: self.names[c].clone(),
                        })
                    }
                }
            }
        }
        let matrix = Array2::from_shape_vec((rows, cols), flat)
            .expect("row-major buffer matches frame shape");
        Ok((self.names, matrix))
    }
}
