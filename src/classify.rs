//! Candidate classification
//!
//! Splits normalized records into duplicate-analysis candidates and ignored
//! records. Pure given (records, rules); exclusion takes precedence over
//! inclusion so sub-components of a composite install can never be deduped
//! away even when an inclusion pattern also matches them.

use crate::record::InstallationRecord;
use crate::rules::CompiledRules;

/// Result of classifying an inventory.
#[derive(Debug, Default)]
pub struct Classified {
    pub candidates: Vec<InstallationRecord>,
    pub ignored: Vec<InstallationRecord>,
}

/// Split records into candidates and ignored by the configured patterns.
pub fn classify(records: Vec<InstallationRecord>, rules: &CompiledRules) -> Classified {
    let mut classified = Classified::default();
    for record in records {
        if rules.is_excluded(&record.display_name) {
            classified.ignored.push(record);
        } else if rules.is_included(&record.display_name) {
            classified.candidates.push(record);
        } else {
            classified.ignored.push(record);
        }
    }
    classified
}
