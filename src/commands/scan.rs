//! Scan command CLI wrapper
//!
//! Analysis only: prints the keep/remove plan, removes nothing.

use crate::cli::ScanArgs;
use crate::commands::helpers;
use crate::error::Result;
use crate::inventory::{ExportFileSource, InventorySource};
use crate::operations::scan::{ScanOperation, render_plan};

/// Run scan command
pub fn run(verbose: bool, args: ScanArgs) -> Result<()> {
    let (_, rules) = helpers::load_rules(args.rules.as_deref())?;
    let oracle = helpers::build_oracle(args.no_oracle);
    let source = ExportFileSource::new(&args.source)?;
    if verbose {
        println!("Scanning inventory: {}", source.describe());
    }

    let operation = ScanOperation::new(&rules, oracle);
    let plan = operation.run(&source);

    if args.json {
        println!("{}", plan.to_json()?);
    } else {
        render_plan(&plan, verbose);
    }

    Ok(())
}
