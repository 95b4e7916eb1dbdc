//! Dotted-numeric version and install-date parsing
//!
//! Both parses are modeled as tagged results rather than errors: an
//! installation record with a garbage `DisplayVersion` is still a valid
//! record, it just sorts as the oldest. The total order over the tagged
//! types keeps the decision engine's sort comparators pure and total.

use std::cmp::Ordering;

/// Result of parsing a display version string.
///
/// `Parsed` holds the numeric segments; `Unparsable` sorts below every
/// parsed version so that records with garbage versions are treated as
/// the oldest members of their group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionTag {
    Parsed(Vec<u64>),
    Unparsable,
}

impl VersionTag {
    /// Parse a display version into dotted numeric segments.
    ///
    /// The string parses iff its first dot-segment starts with a digit.
    /// Later segments take their leading digit run and default to zero,
    /// so `"14.44.35211-p1"` and `"14.44"` both parse. `None` and strings
    /// with a non-numeric first segment are `Unparsable`.
    pub fn parse(version: Option<&str>) -> Self {
        let Some(raw) = version else {
            return VersionTag::Unparsable;
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return VersionTag::Unparsable;
        }

        let mut segments = Vec::new();
        for (i, part) in raw.split('.').enumerate() {
            let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() {
                if i == 0 {
                    return VersionTag::Unparsable;
                }
                segments.push(0);
                continue;
            }
            // Digit runs longer than u64 saturate rather than fail the parse.
            segments.push(digits.parse::<u64>().unwrap_or(u64::MAX));
        }
        VersionTag::Parsed(segments)
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, VersionTag::Parsed(_))
    }
}

impl Ord for VersionTag {
    /// Segment-wise numeric comparison, shorter side padded with zeros.
    /// `Unparsable` is below every parsed version.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (VersionTag::Unparsable, VersionTag::Unparsable) => Ordering::Equal,
            (VersionTag::Unparsable, VersionTag::Parsed(_)) => Ordering::Less,
            (VersionTag::Parsed(_), VersionTag::Unparsable) => Ordering::Greater,
            (VersionTag::Parsed(a), VersionTag::Parsed(b)) => {
                let len = a.len().max(b.len());
                for i in 0..len {
                    let x = a.get(i).copied().unwrap_or(0);
                    let y = b.get(i).copied().unwrap_or(0);
                    match x.cmp(&y) {
                        Ordering::Equal => continue,
                        ord => return ord,
                    }
                }
                Ordering::Equal
            }
        }
    }
}

impl PartialOrd for VersionTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Result of parsing a `YYYYMMDD` install date.
///
/// The eight-digit form compares correctly as a plain number, so no
/// calendar arithmetic is needed. `Unparsable` sorts below every parsed
/// date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTag {
    Parsed(u32),
    Unparsable,
}

impl DateTag {
    /// Parse an install date in `YYYYMMDD` form.
    pub fn parse(date: Option<&str>) -> Self {
        let Some(raw) = date else {
            return DateTag::Unparsable;
        };
        let raw = raw.trim();
        if raw.len() != 8 || !raw.chars().all(|c| c.is_ascii_digit()) {
            return DateTag::Unparsable;
        }
        match raw.parse::<u32>() {
            Ok(v) => DateTag::Parsed(v),
            Err(_) => DateTag::Unparsable,
        }
    }
}

impl Ord for DateTag {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (DateTag::Unparsable, DateTag::Unparsable) => Ordering::Equal,
            (DateTag::Unparsable, DateTag::Parsed(_)) => Ordering::Less,
            (DateTag::Parsed(_), DateTag::Unparsable) => Ordering::Greater,
            (DateTag::Parsed(a), DateTag::Parsed(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for DateTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
