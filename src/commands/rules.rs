//! Rules command CLI wrapper
//!
//! Prints the effective pattern rules as YAML, after validating that every
//! pattern compiles. Useful when overriding the built-ins with --rules.

use crate::cli::RulesArgs;
use crate::commands::helpers;
use crate::error::{Result, UnidupError};

/// Run rules command
pub fn run(args: RulesArgs) -> Result<()> {
    let (rule_set, _) = helpers::load_rules(args.rules.as_deref())?;
    let yaml = serde_yaml::to_string(&rule_set).map_err(|e| UnidupError::RulesParseFailed {
        path: "effective rules".to_string(),
        reason: e.to_string(),
    })?;
    print!("{yaml}");
    Ok(())
}
