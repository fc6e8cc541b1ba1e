//! Labeled dataset loading
//!
//! Training data is a JSON array of claim records, each carrying the
//! registry fields plus the decision label.

use std::fs;
use std::path::Path;

use crate::schema::ClaimRecord;
use crate::train::TrainError;

/// Read a dataset file into records. The shape of each record is not
/// validated here; that is the registry's job.
pub fn load_records(path: &Path) -> Result<Vec<ClaimRecord>, TrainError> {
    let raw = fs::read_to_string(path).map_err(|e| TrainError::DatasetRead {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|e| TrainError::DatasetParse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_array_of_records() {
        let mut file = NamedTempFile::new().expect("tempfile");
        write!(
            file,
            r#"[{{"coverage": "ADLD", "decision": "COMPLETED"}}, {{"coverage": "THEFT", "decision": "DECLINED"}}]"#
        )
        .expect("write");

        let records = load_records(file.path()).expect("loads");
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].get("decision"),
            &crate::schema::RawValue::Text("COMPLETED".into())
        );
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let err = load_records(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, TrainError::DatasetRead { .. }));
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let mut file = NamedTempFile::new().expect("tempfile");
        write!(file, "not json").expect("write");
        let err = load_records(file.path()).unwrap_err();
        assert!(matches!(err, TrainError::DatasetParse { .. }));
    }
}
