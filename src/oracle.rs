//! Latest-version oracle and per-run resolver
//!
//! The oracle answers "what is the latest known version for this product
//! family", keyed by canonical key. Implementations must degrade to `None`
//! on any internal failure (timeout, network, parse) instead of returning
//! an error; the decision engine works conservatively with partial or no
//! oracle data. The resolver memoizes answers for the lifetime of one run
//! so an oracle is consulted at most once per canonical key.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::record::InstallationRecord;

/// External source of the known latest version for a product family.
pub trait VersionOracle {
    /// Return the latest known version for the canonical key, or `None`
    /// when the family is not understood. Must not block unboundedly and
    /// must not fail.
    fn lookup(&self, canonical_key: &str, publisher_hint: Option<&str>) -> Option<String>;
}

/// Oracle that knows nothing. The engine must behave conservatively with
/// this one plugged in.
#[derive(Debug, Default)]
pub struct NullOracle;

impl VersionOracle for NullOracle {
    fn lookup(&self, _canonical_key: &str, _publisher_hint: Option<&str>) -> Option<String> {
        None
    }
}

static YEAR_QUALIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d{4})\]$").expect("static pattern"));

/// Built-in static lookup table for well-understood redistributable
/// runtime families, keyed by product-year qualifier.
///
/// The 2015-2022 generations share one binary-compatible runtime line, so
/// they resolve to the same latest version.
#[derive(Debug, Default)]
pub struct StaticTableOracle;

impl StaticTableOracle {
    fn latest_for_year(year: u32) -> Option<&'static str> {
        match year {
            2005 => Some("8.0.61001"),
            2008 => Some("9.0.30729.6161"),
            2010 => Some("10.0.40219.473"),
            2012 => Some("11.0.61030"),
            2013 => Some("12.0.40664"),
            2015..=2022 => Some("14.44.35211"),
            _ => None,
        }
    }
}

impl VersionOracle for StaticTableOracle {
    fn lookup(&self, canonical_key: &str, publisher_hint: Option<&str>) -> Option<String> {
        // The table only covers Microsoft runtime families; a conflicting
        // publisher hint means this is some other vendor's product.
        if let Some(publisher) = publisher_hint {
            if !publisher.to_lowercase().contains("microsoft") {
                return None;
            }
        }
        if !canonical_key.contains("redistributable") && !canonical_key.contains("runtime") {
            return None;
        }
        let caps = YEAR_QUALIFIER.captures(canonical_key)?;
        let year = caps.get(1)?.as_str().parse::<u32>().ok()?;
        Self::latest_for_year(year).map(String::from)
    }
}

/// Per-run memoizing wrapper around an oracle.
///
/// Run-scoped by construction: build one per pipeline run and drop it with
/// the run, never persist it.
pub struct VersionResolver<'a> {
    oracle: &'a dyn VersionOracle,
    cache: HashMap<String, Option<String>>,
}

impl<'a> VersionResolver<'a> {
    pub fn new(oracle: &'a dyn VersionOracle) -> Self {
        Self {
            oracle,
            cache: HashMap::new(),
        }
    }

    /// Resolve the latest known version for a canonical key, consulting
    /// the oracle at most once per key per run. The sample record supplies
    /// the publisher hint.
    pub fn resolve(&mut self, canonical_key: &str, sample: &InstallationRecord) -> Option<String> {
        if let Some(cached) = self.cache.get(canonical_key) {
            return cached.clone();
        }
        let answer = self
            .oracle
            .lookup(canonical_key, sample.publisher.as_deref());
        self.cache.insert(canonical_key.to_string(), answer.clone());
        answer
    }
}
