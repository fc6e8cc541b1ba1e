//! Per-run metrics report

use std::fmt;

use serde::{Deserialize, Serialize};

/// Metrics for one data partition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitMetrics {
    pub accuracy: f64,
    pub f1: f64,
    pub roc_auc: f64,
}

/// Accuracy/F1/ROC-AUC for both partitions of a training run.
/// Write-only after creation: rendered once to `metrics.txt`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub train: SplitMetrics,
    pub test: SplitMetrics,
}

impl fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, split) in [("TRAIN", &self.train), ("TEST", &self.test)] {
            writeln!(f, "=== {name} RESULTS ===")?;
            writeln!(f, "Accuracy : {:.4}", split.accuracy)?;
            writeln!(f, "F1-score : {:.4}", split.f1)?;
            writeln!(f, "ROC AUC  : {:.4}", split.roc_auc)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_format() {
        let report = MetricsReport {
            train: SplitMetrics {
                accuracy: 1.0,
                f1: 1.0,
                roc_auc: 1.0,
            },
            test: SplitMetrics {
                accuracy: 0.9123,
                f1: 0.88,
                roc_auc: 0.95678,
            },
        };
        let text = report.to_string();
        assert!(text.contains("=== TRAIN RESULTS ==="));
        assert!(text.contains("=== TEST RESULTS ==="));
        assert!(text.contains("Accuracy : 0.9123"));
        assert!(text.contains("F1-score : 0.8800"));
        assert!(text.contains("ROC AUC  : 0.9568"));
    }
}
