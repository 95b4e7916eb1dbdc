//! Common test utilities for Unidup integration tests

use std::path::PathBuf;
use tempfile::TempDir;

/// A test inventory directory for integration tests
#[allow(dead_code)]
pub struct TestInventory {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to the inventory root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestInventory {
    /// Create a new empty inventory directory
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write an export file into the inventory directory
    pub fn write_export(&self, name: &str, content: &str) -> PathBuf {
        let file_path = self.path.join(name);
        std::fs::write(&file_path, content).expect("Failed to write export file");
        file_path
    }

    /// Write a rules file into the inventory directory
    pub fn write_rules(&self, content: &str) -> PathBuf {
        let file_path = self.path.join("rules.yaml");
        std::fs::write(&file_path, content).expect("Failed to write rules file");
        file_path
    }
}

/// Build a command for the unidup binary
pub fn unidup_cmd() -> assert_cmd::Command {
    assert_cmd::Command::cargo_bin("unidup").expect("Failed to find unidup binary")
}

/// An export with two superseded-duplicate KB updates and one ordinary
/// application. Uninstall commands resolve to `true` so clean runs succeed
/// on any unix-like test host.
pub const DUPLICATE_UPDATES_EXPORT: &str = r#"[
    {
        "display_name": "Update for Test Platform (KB100001)",
        "display_version": "1.0.0",
        "uninstall_string": "true /S",
        "estimated_size_kb": 512
    },
    {
        "display_name": "Update for Test Platform (KB100001)",
        "display_version": "2.0.0",
        "uninstall_string": "true /S",
        "estimated_size_kb": 640
    },
    {
        "display_name": "Ordinary Application",
        "display_version": "3.1.4",
        "uninstall_string": "true /S"
    }
]"#;
