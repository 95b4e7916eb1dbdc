//! Scan operation: the analysis half of the pipeline
//!
//! Runs Normalizer -> Classifier -> Grouper -> Version Resolver -> Decision
//! Engine over one inventory source and produces a [`ScanPlan`]. No side
//! effects on the machine; the plan is what `scan` prints and what `clean`
//! confirms and executes.

use console::Style;
use serde::Serialize;

use crate::classify;
use crate::engine::{self, DecisionSet};
use crate::error::Result;
use crate::grouping;
use crate::inventory::InventorySource;
use crate::oracle::{VersionOracle, VersionResolver};
use crate::record::InstallationRecord;
use crate::report::{RunReport, format_size};
use crate::rules::CompiledRules;

/// One group's resolved latest version and keep/remove partition.
#[derive(Debug, Serialize)]
pub struct GroupDecision {
    pub canonical_key: String,
    pub latest_version: Option<String>,
    pub decision: DecisionSet,
}

/// Full analysis result for one run.
#[derive(Debug, Default, Serialize)]
pub struct ScanPlan {
    pub records_total: usize,
    pub candidates_total: usize,
    pub ignored_total: usize,
    pub skipped_sources: Vec<String>,
    pub decisions: Vec<GroupDecision>,
}

impl ScanPlan {
    /// Records marked for removal, across all groups, in group order.
    pub fn removals(&self) -> Vec<InstallationRecord> {
        self.decisions
            .iter()
            .flat_map(|d| d.decision.remove.iter().cloned())
            .collect()
    }

    pub fn kept_total(&self) -> usize {
        self.decisions.iter().map(|d| d.decision.keep.len()).sum()
    }

    pub fn advisories(&self) -> Vec<String> {
        self.decisions
            .iter()
            .flat_map(|d| d.decision.advisories.iter().cloned())
            .collect()
    }

    /// Seed a run report with the analysis-side totals.
    pub fn seed_report(&self) -> RunReport {
        RunReport {
            candidates: self.candidates_total,
            ignored: self.ignored_total,
            groups: self.decisions.len(),
            kept: self.kept_total(),
            advisories: self.advisories(),
            ..RunReport::default()
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            crate::error::UnidupError::ReportSerializeFailed {
                reason: e.to_string(),
            }
        })
    }
}

/// Scan operation over one inventory source.
pub struct ScanOperation<'a> {
    rules: &'a CompiledRules,
    oracle: Box<dyn VersionOracle>,
}

impl<'a> ScanOperation<'a> {
    pub fn new(rules: &'a CompiledRules, oracle: Box<dyn VersionOracle>) -> Self {
        Self { rules, oracle }
    }

    /// Run the analysis pipeline. The oracle cache is scoped to this call,
    /// so consecutive runs are independent.
    pub fn run(&self, source: &dyn InventorySource) -> ScanPlan {
        let scan = source.collect();
        let records_total = scan.records.len();

        let classified = classify::classify(scan.records, self.rules);
        let candidates_total = classified.candidates.len();
        let ignored_total = classified.ignored.len();

        let groups = grouping::group(classified.candidates, self.rules);

        let mut resolver = VersionResolver::new(&*self.oracle);
        let mut decisions = Vec::with_capacity(groups.len());
        for group in groups.values() {
            let latest_version = group
                .members
                .first()
                .and_then(|sample| resolver.resolve(&group.canonical_key, sample));
            let decision = engine::decide(group, latest_version.as_deref(), self.rules);
            decisions.push(GroupDecision {
                canonical_key: group.canonical_key.clone(),
                latest_version,
                decision,
            });
        }

        ScanPlan {
            records_total,
            candidates_total,
            ignored_total,
            skipped_sources: scan.skipped,
            decisions,
        }
    }
}

/// Print the plan: per-group keep/remove decisions, then totals.
pub fn render_plan(plan: &ScanPlan, verbose: bool) {
    let bold = Style::new().bold();
    let keep_style = Style::new().green();
    let remove_style = Style::new().red();

    for skipped in &plan.skipped_sources {
        eprintln!(
            "{} skipped unreadable export: {}",
            Style::new().yellow().apply_to("warning:"),
            skipped
        );
    }

    for decision in &plan.decisions {
        if !verbose && decision.decision.remove.is_empty() {
            continue;
        }
        println!("\n{}", bold.apply_to(&decision.canonical_key));
        if let Some(ref latest) = decision.latest_version {
            println!("  latest known version: {latest}");
        }
        for record in &decision.decision.keep {
            println!(
                "  {} {}",
                keep_style.apply_to("keep  "),
                describe_record(record)
            );
        }
        for record in &decision.decision.remove {
            println!(
                "  {} {}",
                remove_style.apply_to("remove"),
                describe_record(record)
            );
        }
        for advisory in &decision.decision.advisories {
            println!("  {} {}", Style::new().yellow().apply_to("note:"), advisory);
        }
    }

    let removals = plan.removals();
    let reclaimable: u64 = removals
        .iter()
        .map(|r| r.estimated_size_kb.unwrap_or(0) * 1024)
        .sum();
    println!(
        "\n{} {} record(s) analyzed, {} candidate(s) in {} group(s); {} to remove ({} reclaimable)",
        bold.apply_to("Plan:"),
        plan.records_total,
        plan.candidates_total,
        plan.decisions.len(),
        removals.len(),
        format_size(reclaimable)
    );
}

fn describe_record(record: &InstallationRecord) -> String {
    let version = record.display_version.as_deref().unwrap_or("?");
    match record.estimated_size_kb {
        Some(kb) => format!(
            "{} ({}, {})",
            record.display_name,
            version,
            format_size(kb * 1024)
        ),
        None => format!("{} ({})", record.display_name, version),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::InventoryScan;
    use crate::oracle::{NullOracle, StaticTableOracle};
    use crate::rules::RuleSet;

    struct FixedSource(Vec<InstallationRecord>);

    impl InventorySource for FixedSource {
        fn describe(&self) -> String {
            "fixed".to_string()
        }

        fn collect(&self) -> InventoryScan {
            InventoryScan {
                records: self.0.clone(),
                skipped: Vec::new(),
            }
        }
    }

    fn record(name: &str, version: Option<&str>) -> InstallationRecord {
        InstallationRecord {
            display_name: name.to_string(),
            display_version: version.map(String::from),
            publisher: None,
            uninstall_command: "uninstall.exe".to_string(),
            install_date: None,
            estimated_size_kb: Some(100),
            source_key: format!("test:{name}:{version:?}"),
        }
    }

    fn compiled() -> CompiledRules {
        RuleSet::default().compile().expect("default rules compile")
    }

    #[test]
    fn test_scan_partitions_every_candidate() {
        let rules = compiled();
        let operation = ScanOperation::new(&rules, Box::new(NullOracle));
        let plan = operation.run(&FixedSource(vec![
            record("Update for Windows (KB1)", Some("1.0")),
            record("Update for Windows (KB1)", Some("2.0")),
            record("Mozilla Firefox", Some("118.0")),
        ]));

        assert_eq!(plan.records_total, 3);
        assert_eq!(plan.candidates_total, 2);
        assert_eq!(plan.ignored_total, 1);
        assert_eq!(plan.kept_total() + plan.removals().len(), 2);
    }

    #[test]
    fn test_scan_no_oracle_keeps_highest() {
        let rules = compiled();
        let operation = ScanOperation::new(&rules, Box::new(NullOracle));
        let plan = operation.run(&FixedSource(vec![
            record("Update for Windows (KB1)", Some("1.0")),
            record("Update for Windows (KB1)", Some("2.0")),
            record("Update for Windows (KB1)", Some("1.5")),
        ]));

        let removals = plan.removals();
        assert_eq!(removals.len(), 2);
        assert_eq!(plan.kept_total(), 1);
        assert!(!removals.iter().any(|r| r.display_version.as_deref() == Some("2.0")));
    }

    #[test]
    fn test_scan_is_idempotent_over_survivors() {
        let rules = compiled();
        let operation = ScanOperation::new(&rules, Box::new(StaticTableOracle));
        let inventory = vec![
            record(
                "Microsoft Visual C++ 2015 Redistributable (x64) - 14.0.24215",
                Some("14.0.24215"),
            ),
            record(
                "Microsoft Visual C++ 2015 Redistributable (x64) - 14.0.23026",
                Some("14.0.23026"),
            ),
        ];

        let first = operation.run(&FixedSource(inventory.clone()));
        let survivors: Vec<InstallationRecord> = first
            .decisions
            .iter()
            .flat_map(|d| d.decision.keep.iter().cloned())
            .collect();

        let second = operation.run(&FixedSource(survivors));
        assert!(second.removals().is_empty());
    }

    #[test]
    fn test_scan_empty_inventory() {
        let rules = compiled();
        let operation = ScanOperation::new(&rules, Box::new(NullOracle));
        let plan = operation.run(&FixedSource(vec![]));
        assert_eq!(plan.records_total, 0);
        assert!(plan.decisions.is_empty());
        assert!(plan.removals().is_empty());
    }

    #[test]
    fn test_seed_report_totals() {
        let rules = compiled();
        let operation = ScanOperation::new(&rules, Box::new(NullOracle));
        let plan = operation.run(&FixedSource(vec![
            record("Update for Windows (KB1)", Some("1.0")),
            record("Update for Windows (KB1)", Some("2.0")),
        ]));
        let report = plan.seed_report();
        assert_eq!(report.candidates, 2);
        assert_eq!(report.groups, 1);
        assert_eq!(report.kept, 1);
    }

    #[test]
    fn test_plan_json_serializes() {
        let rules = compiled();
        let operation = ScanOperation::new(&rules, Box::new(NullOracle));
        let plan = operation.run(&FixedSource(vec![record(
            "Update for Windows (KB1)",
            Some("1.0"),
        )]));
        let json = plan.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["candidates_total"], 1);
    }
}
