//! Shared wiring for command wrappers

use std::path::Path;

use crate::error::Result;
use crate::oracle::{NullOracle, StaticTableOracle, VersionOracle};
use crate::rules::{CompiledRules, RuleSet};

/// Load the rule set from a file, or use the built-in defaults, and
/// compile it.
pub fn load_rules(path: Option<&Path>) -> Result<(RuleSet, CompiledRules)> {
    let rule_set = match path {
        Some(path) => RuleSet::load(path)?,
        None => RuleSet::default(),
    };
    let compiled = rule_set.compile()?;
    Ok((rule_set, compiled))
}

/// Select the version oracle for a run.
pub fn build_oracle(no_oracle: bool) -> Box<dyn VersionOracle> {
    if no_oracle {
        Box::new(NullOracle)
    } else {
        Box::new(StaticTableOracle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_rules() {
        let (rule_set, compiled) = load_rules(None).unwrap();
        assert!(!rule_set.include.is_empty());
        assert!(!compiled.include.is_empty());
    }

    #[test]
    fn test_load_missing_rules_file() {
        let result = load_rules(Some(Path::new("/nonexistent/rules.yaml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_build_oracle_null() {
        let oracle = build_oracle(true);
        assert_eq!(oracle.lookup("microsoft visual c++ 2019 runtime [2019]", None), None);
    }

    #[test]
    fn test_build_oracle_static() {
        let oracle = build_oracle(false);
        assert!(
            oracle
                .lookup("microsoft visual c++ 2019 runtime [2019]", None)
                .is_some()
        );
    }
}
