//! Inventory sources
//!
//! An inventory source yields raw installation records for the pipeline.
//! The shipped implementation reads JSON export files (a single file or a
//! directory tree of them); platform-native stores plug in behind the same
//! trait. Unreadable or malformed files degrade to zero records from that
//! file, never a fatal abort - multiple sources may exist and the rest of
//! the inventory is still actionable.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, UnidupError};
use crate::record::{self, InstallationRecord, RawRecord};

/// Outcome of collecting one inventory source: the normalized records plus
/// the files that could not be read or parsed.
#[derive(Debug, Default)]
pub struct InventoryScan {
    pub records: Vec<InstallationRecord>,
    pub skipped: Vec<String>,
}

/// A source of raw installation records.
pub trait InventorySource {
    /// Human-readable label for reporting.
    fn describe(&self) -> String;

    /// Collect and normalize all records, best-effort.
    fn collect(&self) -> InventoryScan;
}

/// Reads JSON export files: either one file or every `.json` file under a
/// directory, in path order for determinism.
pub struct ExportFileSource {
    path: PathBuf,
}

impl ExportFileSource {
    pub fn new(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(UnidupError::InventoryNotFound {
                path: path.display().to_string(),
            });
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    fn export_files(&self) -> Vec<PathBuf> {
        if self.path.is_file() {
            return vec![self.path.clone()];
        }
        WalkDir::new(&self.path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
            .map(|e| e.path().to_path_buf())
            .collect()
    }

    fn read_export(path: &Path) -> std::result::Result<Vec<RawRecord>, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        serde_json::from_str(&content).map_err(|e| e.to_string())
    }
}

impl InventorySource for ExportFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn collect(&self) -> InventoryScan {
        let mut scan = InventoryScan::default();
        for file in self.export_files() {
            let origin = file.display().to_string();
            match Self::read_export(&file) {
                Ok(raw) => scan.records.extend(record::normalize(raw, &origin)),
                Err(reason) => scan.skipped.push(format!("{origin}: {reason}")),
            }
        }
        scan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const EXPORT: &str = r#"[
        {
            "display_name": "Update for Windows (KB1)",
            "display_version": "1.0",
            "uninstall_string": "msiexec /x {AAAA}"
        },
        {
            "display_name": "No uninstall entry"
        }
    ]"#;

    #[test]
    fn test_source_missing_path() {
        let result = ExportFileSource::new(Path::new("/nonexistent/exports"));
        assert!(matches!(result, Err(UnidupError::InventoryNotFound { .. })));
    }

    #[test]
    fn test_collect_single_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("export.json");
        fs::write(&file, EXPORT).unwrap();

        let scan = ExportFileSource::new(&file).unwrap().collect();
        assert_eq!(scan.records.len(), 1);
        assert_eq!(scan.records[0].display_name, "Update for Windows (KB1)");
        assert!(scan.skipped.is_empty());
    }

    #[test]
    fn test_collect_directory_in_path_order() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("b.json"),
            r#"[{"display_name": "B", "uninstall_string": "b.exe"}]"#,
        )
        .unwrap();
        fs::write(
            temp.path().join("a.json"),
            r#"[{"display_name": "A", "uninstall_string": "a.exe"}]"#,
        )
        .unwrap();

        let scan = ExportFileSource::new(temp.path()).unwrap().collect();
        let names: Vec<_> = scan.records.iter().map(|r| r.display_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_malformed_file_degrades_to_skipped() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("bad.json"), "not json").unwrap();
        fs::write(
            temp.path().join("good.json"),
            r#"[{"display_name": "A", "uninstall_string": "a.exe"}]"#,
        )
        .unwrap();

        let scan = ExportFileSource::new(temp.path()).unwrap().collect();
        assert_eq!(scan.records.len(), 1);
        assert_eq!(scan.skipped.len(), 1);
        assert!(scan.skipped[0].contains("bad.json"));
    }

    #[test]
    fn test_non_json_files_ignored() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("notes.txt"), "not an export").unwrap();

        let scan = ExportFileSource::new(temp.path()).unwrap().collect();
        assert!(scan.records.is_empty());
        assert!(scan.skipped.is_empty());
    }

    #[test]
    fn test_records_get_derived_source_keys() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("export.json");
        fs::write(&file, EXPORT).unwrap();

        let scan = ExportFileSource::new(&file).unwrap().collect();
        assert!(scan.records[0].source_key.starts_with("blake3:"));
    }
}
