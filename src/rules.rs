//! Pattern rules for classification, grouping, and edition safety
//!
//! All string classification in the pipeline is driven by this module so the
//! inclusion/exclusion/edition rules stay data, independently testable and
//! extensible without touching engine control flow. A built-in default set
//! covers the common update/redistributable families; a YAML rules file can
//! replace any section.

use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, UnidupError};

/// Valid range for product-year qualifiers captured from display names.
pub const YEAR_RANGE: std::ops::RangeInclusive<u32> = 2005..=2030;

/// Serializable rule set, as written in a YAML rules file.
///
/// Every pattern is a regular expression matched against the record's
/// display name. Sections left out of the file fall back to the built-in
/// defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// A record is a candidate iff its display name matches at least one
    /// of these. OR'd, first match short-circuits.
    pub include: Vec<String>,
    /// Force-excluded regardless of inclusion match. Models sub-components
    /// of a single composite installation that must never be treated as
    /// independent duplicates.
    pub exclude: Vec<String>,
    /// Canonical keys matching any of these belong to a family whose
    /// editions must coexist.
    pub edition_sensitive: Vec<String>,
    /// Edition token extractors. The first capture group is the token.
    pub edition_tokens: Vec<String>,
    /// Versioned-family markers whose trailing 4-digit year becomes a
    /// grouping qualifier. The first capture group is the year.
    pub year_families: Vec<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            include: vec![
                // Platform updates and hotfix-style entries
                r"(?i)^(?:update|hotfix|security update)\s+for\s+".to_string(),
                r"\(KB\d+\)".to_string(),
                // Redistributable runtimes
                r"(?i)visual c\+\+.*redistributable".to_string(),
                r"(?i)\b(?:vcredist|redistributable runtime)\b".to_string(),
                // Browser/runtime security patches
                r"(?i)^microsoft edge (?:update|webview2)".to_string(),
                r"(?i)(?:\bjava\b|\.net framework|\bdotnet\b).*\bupdate\b".to_string(),
            ],
            exclude: vec![
                // Pieces of one composite install, never independent duplicates
                r"(?i)\bstandard library\b".to_string(),
                r"(?i)\bexecutables\b".to_string(),
                r"(?i)\bdocumentation\b".to_string(),
                r"(?i)\bcore interpreter\b".to_string(),
                r"(?i)\bdevelopment libraries\b".to_string(),
                r"(?i)\btest suite\b".to_string(),
                r"(?i)\bpip bootstrap\b".to_string(),
            ],
            edition_sensitive: vec![r"(?i)visual c\+\+.*(?:redistributable|runtime)".to_string()],
            edition_tokens: vec![r"(?i)\b(minimum|additional|debug)\b".to_string()],
            year_families: vec![
                r"(?i)visual c\+\+\s+((?:19|20)\d{2})\b".to_string(),
                r"(?i)report viewer\s+((?:19|20)\d{2})\b".to_string(),
                r"(?i)redistributable\s+((?:19|20)\d{2})\b".to_string(),
            ],
        }
    }
}

impl RuleSet {
    /// Load a rule set from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(UnidupError::RulesNotFound {
                path: path.display().to_string(),
            });
        }
        let content = fs::read_to_string(path).map_err(|e| UnidupError::RulesParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_yaml::from_str(&content).map_err(|e| UnidupError::RulesParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Compile every pattern, failing on the first invalid one.
    pub fn compile(&self) -> Result<CompiledRules> {
        Ok(CompiledRules {
            include: compile_all(&self.include)?,
            exclude: compile_all(&self.exclude)?,
            edition_sensitive: compile_all(&self.edition_sensitive)?,
            edition_tokens: compile_all(&self.edition_tokens)?,
            year_families: compile_all(&self.year_families)?,
        })
    }
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|e| UnidupError::InvalidPattern {
                pattern: p.clone(),
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Compiled matcher lists, ready for the pipeline.
#[derive(Debug)]
pub struct CompiledRules {
    pub include: Vec<Regex>,
    pub exclude: Vec<Regex>,
    pub edition_sensitive: Vec<Regex>,
    pub edition_tokens: Vec<Regex>,
    pub year_families: Vec<Regex>,
}

impl CompiledRules {
    /// Whether a display name matches any inclusion pattern.
    pub fn is_included(&self, display_name: &str) -> bool {
        self.include.iter().any(|re| re.is_match(display_name))
    }

    /// Whether a display name matches any exclusion pattern.
    pub fn is_excluded(&self, display_name: &str) -> bool {
        self.exclude.iter().any(|re| re.is_match(display_name))
    }

    /// Whether a canonical key belongs to an edition-sensitive family.
    pub fn is_edition_sensitive(&self, canonical_key: &str) -> bool {
        self.edition_sensitive
            .iter()
            .any(|re| re.is_match(canonical_key))
    }

    /// Extract the edition token from a display name, lowercased.
    pub fn edition_token(&self, display_name: &str) -> Option<String> {
        for re in &self.edition_tokens {
            if let Some(caps) = re.captures(display_name) {
                if let Some(token) = caps.get(1) {
                    return Some(token.as_str().to_lowercase());
                }
            }
        }
        None
    }

    /// Extract a product-year qualifier from the original display name.
    ///
    /// The year must follow a recognized family marker and fall inside
    /// [`YEAR_RANGE`]; anything else yields no qualifier.
    pub fn year_qualifier(&self, display_name: &str) -> Option<u32> {
        for re in &self.year_families {
            if let Some(caps) = re.captures(display_name) {
                if let Some(year) = caps.get(1) {
                    if let Ok(year) = year.as_str().parse::<u32>() {
                        if YEAR_RANGE.contains(&year) {
                            return Some(year);
                        }
                    }
                }
            }
        }
        None
    }
}
