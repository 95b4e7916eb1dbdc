//! Clean command CLI wrapper
//!
//! Wires the scan operation, confirmation gate, and removal executor
//! together; all business logic lives in operations/clean.rs.

use std::time::Duration;

use crate::cli::CleanArgs;
use crate::commands::helpers;
use crate::error::Result;
use crate::inventory::{ExportFileSource, InventorySource};
use crate::operations::clean::{CleanOperation, CleanOptions};
use crate::operations::scan::ScanOperation;
use crate::removal::ProcessInvoker;

/// Run clean command
pub fn run(verbose: bool, args: CleanArgs) -> Result<()> {
    let (_, rules) = helpers::load_rules(args.rules.as_deref())?;
    let oracle = helpers::build_oracle(args.no_oracle);
    let source = ExportFileSource::new(&args.source)?;
    if verbose {
        println!("Scanning inventory: {}", source.describe());
    }

    let invoker = ProcessInvoker;
    let options = CleanOptions {
        yes: args.yes,
        dry_run: args.dry_run,
        settle_delay: Duration::from_secs(args.settle_delay),
        verbose,
    };

    let operation = CleanOperation::new(ScanOperation::new(&rules, oracle), &invoker, options);
    operation.execute(&source)?;

    Ok(())
}
