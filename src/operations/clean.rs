//! Clean operation: scan, confirm, execute removals, report
//!
//! Coordinates the analysis plan with the confirmation gate and the
//! sequential removal executor. Removal failures never stop the run; they
//! are aggregated into the report for the user to act on manually.

use std::time::Duration;

use inquire::Confirm;

use crate::error::{Result, UnidupError};
use crate::inventory::InventorySource;
use crate::operations::scan::{ScanOperation, render_plan};
use crate::progress::RemovalProgress;
use crate::record::InstallationRecord;
use crate::removal::{RemovalExecutor, UninstallInvoker};
use crate::report::{self, RunReport, format_size};

/// Configuration options for clean
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// Skip the confirmation prompt
    pub yes: bool,
    /// Analyze and print the plan, remove nothing
    pub dry_run: bool,
    /// Settling delay between uninstall invocations
    pub settle_delay: Duration,
    pub verbose: bool,
}

/// High-level clean operation
pub struct CleanOperation<'a> {
    scan: ScanOperation<'a>,
    invoker: &'a dyn UninstallInvoker,
    options: CleanOptions,
}

impl<'a> CleanOperation<'a> {
    pub fn new(
        scan: ScanOperation<'a>,
        invoker: &'a dyn UninstallInvoker,
        options: CleanOptions,
    ) -> Self {
        Self {
            scan,
            invoker,
            options,
        }
    }

    pub fn execute(&self, source: &dyn InventorySource) -> Result<RunReport> {
        let plan = self.scan.run(source);
        render_plan(&plan, self.options.verbose);

        let removals = plan.removals();
        let mut report = plan.seed_report();

        if removals.is_empty() {
            println!("\nNothing to remove.");
            return Ok(report);
        }

        if self.options.dry_run {
            println!("\nDry run: {} record(s) would be removed.", removals.len());
            return Ok(report);
        }

        if !self.options.yes && !confirm_removal(&removals)? {
            println!("Clean cancelled.");
            return Ok(report);
        }

        let results = self.run_executor(&removals);
        report.record_outcomes(&results);
        report::render(&report);
        Ok(report)
    }

    fn run_executor(&self, removals: &[InstallationRecord]) -> Vec<crate::removal::RemovalResult> {
        let executor = RemovalExecutor::new(self.invoker, self.options.settle_delay);
        let progress = RemovalProgress::new(removals.len() as u64);
        let results = executor.execute(removals, |record, _outcome| {
            progress.update(&record.display_name);
            progress.inc();
        });
        progress.finish();
        results
    }
}

/// Confirm removal with the user, showing what would be done
fn confirm_removal(removals: &[InstallationRecord]) -> Result<bool> {
    println!("\nThe following installation(s) will be uninstalled:");
    for record in removals {
        let size = record
            .estimated_size_kb
            .map(|kb| format!(", {}", format_size(kb * 1024)))
            .unwrap_or_default();
        println!(
            "  - {} ({}{})",
            record.display_name,
            record.display_version.as_deref().unwrap_or("?"),
            size
        );
    }
    println!();

    Confirm::new("Proceed with uninstall?")
        .with_default(false)
        .with_help_message("Press 'y' to confirm, Enter to cancel")
        .prompt()
        .map_err(|e| UnidupError::ConfirmationFailed {
            reason: e.to_string(),
        })
}
