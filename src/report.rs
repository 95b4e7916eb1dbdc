//! Run reporting
//!
//! Aggregates counts and sizes for one pipeline run. Purely observational:
//! nothing here feeds back into decisions.

use console::Style;
use serde::Serialize;

use crate::error::{Result, UnidupError};
use crate::removal::{Outcome, RemovalResult};

/// Aggregated totals for one run.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub candidates: usize,
    pub ignored: usize,
    pub groups: usize,
    pub kept: usize,
    pub removed: usize,
    pub failed: usize,
    pub errored: usize,
    pub bytes_freed: u64,
    pub advisories: Vec<String>,
}

impl RunReport {
    /// Fold removal results into the totals. Bytes freed counts only
    /// records whose uninstall succeeded.
    pub fn record_outcomes(&mut self, results: &[RemovalResult]) {
        for result in results {
            match &result.outcome {
                Outcome::Succeeded => {
                    self.removed += 1;
                    self.bytes_freed += result.record.estimated_size_kb.unwrap_or(0) * 1024;
                }
                Outcome::Failed(_) => self.failed += 1,
                Outcome::Errored(_) => self.errored += 1,
            }
        }
    }

    /// Format freed bytes as a human-readable string.
    pub fn formatted_bytes_freed(&self) -> String {
        format_size(self.bytes_freed)
    }

    /// Serialize the report as pretty JSON for machine use.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| UnidupError::ReportSerializeFailed {
            reason: e.to_string(),
        })
    }
}

/// Format a byte count as a human-readable string
pub fn format_size(bytes: u64) -> String {
    let size = bytes as f64;
    if size < 1024.0 {
        format!("{} B", bytes)
    } else if size < 1024.0 * 1024.0 {
        format!("{:.1} KB", size / 1024.0)
    } else if size < 1024.0 * 1024.0 * 1024.0 {
        format!("{:.1} MB", size / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", size / (1024.0 * 1024.0 * 1024.0))
    }
}

/// Print the report summary.
pub fn render(report: &RunReport) {
    let bold = Style::new().bold();
    println!("\n{}", bold.apply_to("Run summary:"));
    println!("  Candidates analyzed: {}", report.candidates);
    println!("  Ignored records:     {}", report.ignored);
    println!("  Product groups:      {}", report.groups);
    println!("  Kept:                {}", report.kept);
    println!(
        "  Removed:             {} ({} freed)",
        report.removed,
        report.formatted_bytes_freed()
    );
    if report.failed > 0 {
        println!(
            "  {}              {}",
            Style::new().red().apply_to("Failed:"),
            report.failed
        );
    }
    if report.errored > 0 {
        println!(
            "  {}             {}",
            Style::new().red().apply_to("Errored:"),
            report.errored
        );
    }
    for advisory in &report.advisories {
        println!("  {} {}", Style::new().yellow().apply_to("note:"), advisory);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::InstallationRecord;

    fn result(size_kb: Option<u64>, outcome: Outcome) -> RemovalResult {
        RemovalResult {
            record: InstallationRecord {
                display_name: "A".to_string(),
                display_version: None,
                publisher: None,
                uninstall_command: "a.exe".to_string(),
                install_date: None,
                estimated_size_kb: size_kb,
                source_key: "test:A".to_string(),
            },
            outcome,
        }
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536 * 1024), "1.5 MB");
        assert_eq!(format_size(2 * 1024 * 1024 * 1024), "2.0 GB");
    }

    #[test]
    fn test_record_outcomes_counts_by_kind() {
        let mut report = RunReport::default();
        report.record_outcomes(&[
            result(Some(100), Outcome::Succeeded),
            result(Some(50), Outcome::Failed(1603)),
            result(None, Outcome::Errored("launch failed".to_string())),
        ]);
        assert_eq!(report.removed, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.errored, 1);
        assert_eq!(report.bytes_freed, 100 * 1024);
    }

    #[test]
    fn test_bytes_freed_only_counts_successes() {
        let mut report = RunReport::default();
        report.record_outcomes(&[result(Some(100), Outcome::Failed(1))]);
        assert_eq!(report.bytes_freed, 0);
    }

    #[test]
    fn test_to_json_round_trips_counts() {
        let report = RunReport {
            kept: 3,
            removed: 2,
            ..RunReport::default()
        };
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kept"], 3);
        assert_eq!(value["removed"], 2);
    }
}
