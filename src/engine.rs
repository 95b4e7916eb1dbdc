//! Duplicate detection decision engine
//!
//! Partitions each product group into keep/remove sets. The engine is total:
//! every member lands in exactly one bucket, every non-empty group keeps at
//! least one member, and no input shape (empty groups, unparsable versions,
//! missing oracle data) produces an error.
//!
//! Policy, in order of precedence:
//! - a sole installation is always kept, even when it is below the known
//!   latest version (removing the only copy risks breaking dependents);
//! - without a resolved latest version, the best member by (version desc,
//!   install date desc, unknown last) is kept and the rest removed;
//! - with a resolved latest version, members at or above it are kept and
//!   members below it removed, except that edition-sensitive families keep
//!   the first-seen member of each `(canonical_key, edition_token)` pair,
//!   and unparsable members fall back to first-unparsable-keeps.

use std::collections::HashSet;

use serde::Serialize;

use crate::grouping::ProductGroup;
use crate::record::InstallationRecord;
use crate::rules::CompiledRules;
use crate::version::{DateTag, VersionTag};

/// Output of deciding one product group: disjoint keep/remove sequences
/// covering exactly the group's members, plus informational advisories.
#[derive(Debug, Default, Serialize)]
pub struct DecisionSet {
    pub keep: Vec<InstallationRecord>,
    pub remove: Vec<InstallationRecord>,
    pub advisories: Vec<String>,
}

/// Sort key for the no-oracle ordering: version desc, then install date
/// desc, unknown last. Tags order ascending, so comparisons are reversed
/// at the call sites.
fn rank(record: &InstallationRecord) -> (VersionTag, DateTag) {
    (
        VersionTag::parse(record.display_version.as_deref()),
        DateTag::parse(record.install_date.as_deref()),
    )
}

/// Partition a group's members into keep/remove.
///
/// `latest_version` is the oracle's answer for this group's canonical key,
/// if any; an unparsable answer is treated as unresolved.
pub fn decide(
    group: &ProductGroup,
    latest_version: Option<&str>,
    rules: &CompiledRules,
) -> DecisionSet {
    let mut set = DecisionSet::default();
    if group.members.is_empty() {
        return set;
    }

    let latest = match VersionTag::parse(latest_version) {
        VersionTag::Parsed(segments) => Some(VersionTag::Parsed(segments)),
        VersionTag::Unparsable => None,
    };

    if group.members.len() == 1 {
        decide_single(group, latest.as_ref(), &mut set);
        return set;
    }

    match latest {
        Some(latest) => decide_with_latest(group, &latest, rules, &mut set),
        None => decide_without_latest(group, &mut set),
    }

    enforce_keep_invariant(&mut set);
    set
}

/// A sole installation is always kept. Hard safety invariant.
fn decide_single(group: &ProductGroup, latest: Option<&VersionTag>, set: &mut DecisionSet) {
    let member = &group.members[0];
    if let Some(latest) = latest {
        let tag = VersionTag::parse(member.display_version.as_deref());
        if tag.is_parsed() && tag < *latest {
            set.advisories.push(format!(
                "'{}' is below the latest known version for '{}' but is the only installation; keeping it",
                member.display_name, group.canonical_key
            ));
        }
    }
    set.keep.push(member.clone());
}

/// No resolvable latest: keep exactly the best-ordered member.
fn decide_without_latest(group: &ProductGroup, set: &mut DecisionSet) {
    let mut ordered: Vec<&InstallationRecord> = group.members.iter().collect();
    // Stable sort: full ties stay in discovery order
    ordered.sort_by(|a, b| rank(b).cmp(&rank(a)));

    for (i, member) in ordered.into_iter().enumerate() {
        if i == 0 {
            set.keep.push(member.clone());
        } else {
            set.remove.push(member.clone());
        }
    }
}

/// Latest resolved: compare each member against it.
fn decide_with_latest(
    group: &ProductGroup,
    latest: &VersionTag,
    rules: &CompiledRules,
    set: &mut DecisionSet,
) {
    let edition_sensitive = rules.is_edition_sensitive(&group.canonical_key);
    let mut kept_editions: HashSet<String> = HashSet::new();
    let mut unparsable: Vec<&InstallationRecord> = Vec::new();

    for member in &group.members {
        let tag = VersionTag::parse(member.display_version.as_deref());
        if !tag.is_parsed() {
            unparsable.push(member);
            continue;
        }

        if tag >= *latest {
            if let Some(token) = rules.edition_token(&member.display_name) {
                kept_editions.insert(token);
            }
            set.keep.push(member.clone());
            continue;
        }

        // Below latest. Edition-sensitive families keep the first-seen
        // member of each edition; editions are functionally distinct and
        // must coexist.
        if edition_sensitive {
            if let Some(token) = rules.edition_token(&member.display_name) {
                if kept_editions.insert(token) {
                    set.keep.push(member.clone());
                    continue;
                }
            }
        }
        set.remove.push(member.clone());
    }

    // Unparsable members: no-oracle ordering within the unparsable
    // subgroup; the first is kept only when nothing else was.
    unparsable.sort_by(|a, b| rank(b).cmp(&rank(a)));
    for member in unparsable {
        if set.keep.is_empty() {
            set.keep.push(member.clone());
        } else {
            set.remove.push(member.clone());
        }
    }
}

/// Post-condition guard: a pass over a non-empty group must keep at least
/// one member. When the oracle knows a version newer than everything
/// installed, every member can end up below latest; promote the best one
/// back rather than removing a product entirely.
fn enforce_keep_invariant(set: &mut DecisionSet) {
    if !set.keep.is_empty() || set.remove.is_empty() {
        return;
    }
    let best = set
        .remove
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| rank(a).cmp(&rank(b)))
        .map(|(i, _)| i);
    if let Some(i) = best {
        let member = set.remove.remove(i);
        set.advisories.push(format!(
            "every member of this group is below the latest known version; keeping '{}'",
            member.display_name
        ));
        set.keep.push(member);
    }
}
