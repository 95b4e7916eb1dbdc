//! Product grouping by canonical identity
//!
//! Clusters candidate records into groups believed to be versions/editions of
//! the same logical product. Grouping is a pure function of the display name:
//! deterministic and idempotent, so re-scans after a removal converge instead
//! of oscillating.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::record::InstallationRecord;
use crate::rules::CompiledRules;

/// Records believed to be versions/editions of one logical product.
#[derive(Debug, Clone)]
pub struct ProductGroup {
    pub canonical_key: String,
    /// Insertion order = inventory discovery order.
    pub members: Vec<InstallationRecord>,
}

static VERSION_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    // A dotted numeric token and everything after it
    Regex::new(r"\s*\bv?\d+(?:\.\d+)+\b.*$").expect("static pattern")
});
static KB_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(KB\d+\)").expect("static pattern"));
static ARCH_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:x86|x64)\b").expect("static pattern"));
static DASH_VERSION_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*-\s*\d+(?:\.\d+)+.*$").expect("static pattern"));
static EMPTY_PARENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*\)").expect("static pattern"));

/// Derive the canonical grouping key for a display name.
///
/// Applied in order: strip the trailing dotted version token and everything
/// after it, strip `(KB...)` markers, strip standalone architecture markers,
/// strip a trailing ` - <version>` suffix, then strip edition-token words so
/// editions of one family land in one group (the decision engine separates
/// them again). If the original name carries a valid product-year after a
/// recognized family marker, the year is appended as a qualifier so distinct
/// product generations never merge.
pub fn canonical_key(display_name: &str, rules: &CompiledRules) -> String {
    let mut base = VERSION_TAIL.replace(display_name, "").into_owned();
    base = KB_MARKER.replace_all(&base, "").into_owned();
    base = ARCH_MARKER.replace_all(&base, "").into_owned();
    base = DASH_VERSION_TAIL.replace(&base, "").into_owned();

    for re in &rules.edition_tokens {
        base = re.replace_all(&base, "").into_owned();
    }

    let base = tidy(&base);
    match rules.year_qualifier(display_name) {
        Some(year) => format!("{base} [{year}]"),
        None => base,
    }
}

/// Collapse whitespace, drop empty parens and trailing separators, lowercase.
fn tidy(s: &str) -> String {
    let without_parens = EMPTY_PARENS.replace_all(s, "");
    let collapsed = without_parens.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| c == '-' || c == ',' || c.is_whitespace())
        .to_lowercase()
}

/// Cluster candidates into product groups, preserving discovery order.
pub fn group(
    candidates: Vec<InstallationRecord>,
    rules: &CompiledRules,
) -> BTreeMap<String, ProductGroup> {
    let mut groups: BTreeMap<String, ProductGroup> = BTreeMap::new();
    for record in candidates {
        let key = canonical_key(&record.display_name, rules);
        groups
            .entry(key.clone())
            .or_insert_with(|| ProductGroup {
                canonical_key: key,
                members: Vec::new(),
            })
            .members
            .push(record);
    }
    groups
}
