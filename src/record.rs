//! Installation records and inventory normalization
//!
//! Raw records come from an inventory source in whatever shape the platform
//! store provides. Normalization turns them into canonical
//! [`InstallationRecord`]s and silently drops entries that cannot be acted
//! on (missing display name or uninstall command) - the inventory is
//! best-effort by contract.

use blake3::Hasher;
use serde::{Deserialize, Serialize};

/// One raw entry as read from an inventory source, before normalization.
///
/// Field names match the conventional platform store column names, so a
/// registry export converts to this shape without renaming.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub display_version: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub uninstall_string: Option<String>,
    #[serde(default)]
    pub install_date: Option<String>,
    #[serde(default)]
    pub estimated_size_kb: Option<u64>,
    #[serde(default)]
    pub source_key: Option<String>,
}

/// One discovered software entry, normalized.
///
/// Invariant: `display_name` and `uninstall_command` are never empty for a
/// record that reaches the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationRecord {
    pub display_name: String,
    pub display_version: Option<String>,
    pub publisher: Option<String>,
    pub uninstall_command: String,
    pub install_date: Option<String>,
    pub estimated_size_kb: Option<u64>,
    /// Stable identifier of where the record was read from, for idempotent
    /// re-scans.
    pub source_key: String,
}

/// Hash prefix for derived source keys
const SOURCE_KEY_PREFIX: &str = "blake3:";

/// Derive a stable source key for a raw record that did not carry one.
///
/// Keyed on the origin (file path or store name), the record's position in
/// that source, and the display name, so the same record gets the same key
/// on every re-scan of the same source and same-named records in one
/// source stay distinct.
pub fn derive_source_key(origin: &str, position: usize, display_name: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(origin.as_bytes());
    hasher.update(b"\0");
    hasher.update(position.to_le_bytes().as_slice());
    hasher.update(b"\0");
    hasher.update(display_name.as_bytes());
    format!("{}{}", SOURCE_KEY_PREFIX, hasher.finalize().to_hex())
}

/// Normalize raw records into canonical installation records.
///
/// Entries without a non-empty display name and uninstall command are
/// dropped with no error. `origin` labels the source for derived keys.
pub fn normalize(raw_records: Vec<RawRecord>, origin: &str) -> Vec<InstallationRecord> {
    raw_records
        .into_iter()
        .enumerate()
        .filter_map(|(position, raw)| normalize_one(raw, origin, position))
        .collect()
}

fn normalize_one(raw: RawRecord, origin: &str, position: usize) -> Option<InstallationRecord> {
    let display_name = raw.display_name?.trim().to_string();
    let uninstall_command = raw.uninstall_string?.trim().to_string();
    if display_name.is_empty() || uninstall_command.is_empty() {
        return None;
    }

    let source_key = match raw.source_key {
        Some(key) if !key.trim().is_empty() => key,
        _ => derive_source_key(origin, position, &display_name),
    };

    Some(InstallationRecord {
        display_name,
        display_version: raw.display_version.filter(|v| !v.trim().is_empty()),
        publisher: raw.publisher.filter(|p| !p.trim().is_empty()),
        uninstall_command,
        install_date: raw.install_date.filter(|d| !d.trim().is_empty()),
        estimated_size_kb: raw.estimated_size_kb,
        source_key,
    })
}
