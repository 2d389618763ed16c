use crate::catalog::LoadSummary;
use crate::quality_filter::FilterOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Written,
    /// Filtered but not written (dry run)
    Checked,
    Failed,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Written => "Written",
            FileStatus::Checked => "Checked",
            FileStatus::Failed => "Failed",
        }
    }
}

/// Result of reducing one input catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub input: String,
    pub output: Option<String>,
    pub status: FileStatus,
    pub loaded: LoadSummary,
    pub candidates: usize,
    pub critical_kept: usize,
    pub out_of_band: usize,
    pub written: usize,
    pub empty_bins: usize,
    pub undefined_bins: usize,
    pub corrected_bins: usize,
    pub error: Option<String>,
    pub processed_at: DateTime<Utc>,
}

impl FileReport {
    pub fn from_outcome(
        input: String,
        output: Option<String>,
        status: FileStatus,
        loaded: LoadSummary,
        outcome: &FilterOutcome,
    ) -> Self {
        Self {
            input,
            output,
            status,
            loaded,
            candidates: outcome.candidates,
            critical_kept: outcome.critical_survivors,
            out_of_band: outcome.out_of_band,
            written: outcome.entries.len(),
            empty_bins: outcome.empty_bins(),
            undefined_bins: outcome.undefined_bins(),
            corrected_bins: outcome.corrected_bins(),
            error: None,
            processed_at: Utc::now(),
        }
    }

    pub fn failed(input: String, error: String) -> Self {
        Self {
            input,
            output: None,
            status: FileStatus::Failed,
            loaded: LoadSummary::default(),
            candidates: 0,
            critical_kept: 0,
            out_of_band: 0,
            written: 0,
            empty_bins: 0,
            undefined_bins: 0,
            corrected_bins: 0,
            error: Some(error),
            processed_at: Utc::now(),
        }
    }
}

/// Star count for one saved diagram region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionCount {
    pub region_id: u32,
    pub vertices: usize,
    pub stars: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;
    use crate::config::FilterConfig;
    use crate::quality_filter::QualityFilter;

    #[test]
    fn test_file_status_names() {
        assert_eq!(FileStatus::Written.as_str(), "Written");
        assert_eq!(FileStatus::Checked.as_str(), "Checked");
        assert_eq!(FileStatus::Failed.as_str(), "Failed");
        assert_eq!(serde_json::to_string(&FileStatus::Failed).unwrap(), "\"failed\"");
    }

    #[test]
    fn test_report_from_outcome() {
        let filter = QualityFilter::new(FilterConfig::default()).unwrap();
        let entries = vec![
            CatalogEntry::new(1.0, 1.0, -15.0, 0.3),
            CatalogEntry::new(2.0, 2.0, -8.0, 0.05),
            CatalogEntry::new(3.0, 3.0, -8.0, 0.06),
        ];
        let outcome = filter.apply(&entries);
        let report = FileReport::from_outcome(
            "field.xym".to_string(),
            Some("field_s.xym".to_string()),
            FileStatus::Written,
            LoadSummary {
                rows: 4,
                accepted: 3,
                sentinel: 1,
                ..Default::default()
            },
            &outcome,
        );

        assert_eq!(report.candidates, 2);
        assert_eq!(report.critical_kept, 2);
        assert_eq!(report.out_of_band, 1);
        assert_eq!(report.written, 3);
        assert_eq!(report.undefined_bins, 0);
        assert_eq!(report.loaded.rejected(), 1);
        assert!(report.error.is_none());
    }

    #[test]
    fn test_failed_report_serialization() {
        let report = FileReport::failed("missing.xym".to_string(), "not found".to_string());
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"status\":\"failed\""));
        assert!(json.contains("\"error\":\"not found\""));
        assert!(json.contains("\"output\":null"));

        let parsed: FileReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.status, FileStatus::Failed);
        assert_eq!(parsed.input, "missing.xym");
    }
}
