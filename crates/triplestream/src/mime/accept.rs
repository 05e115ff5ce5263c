//! Accept-header construction.
//!
//! Merges a collection of media types in `type/subtype[;q=x.y]` notation
//! into a single content-negotiation header, deduplicating pairs and
//! removing entries already covered by a wildcard with an equal or higher
//! weight. For example, if the set contains `text/*;q=0.5`, then
//! `text/plain;q=0.1` is dropped because the wildcard already asks for it
//! at a higher weight.

use super::{format_quality, MimeType};
use std::collections::BTreeMap;

/// Build an accept header from a collection of media types.
///
/// For each `(major, minor)` pair the highest weight seen wins. Specific
/// entries whose weight does not exceed a covering wildcard's weight are
/// suppressed by that wildcard. The output is ordered by specificity
/// descending, then full type ascending, so any permutation of the same
/// input produces a byte-identical header. Weights of exactly 1.0 are
/// serialized without a suffix. Returns `None` for an empty input.
///
/// ```rust
/// use triplestream::{build_accept_header, MimeType};
///
/// let header = build_accept_header(vec![
///     MimeType::new("text", "csv"),
///     MimeType::any().with_quality(0.01),
/// ]);
/// assert_eq!(header.as_deref(), Some("text/csv, */*;q=0.01"));
/// ```
pub fn build_accept_header<I>(types: I) -> Option<String>
where
    I: IntoIterator<Item = MimeType>,
{
    let mut highest_any: Option<u16> = None;
    let mut highest_any_minor: BTreeMap<String, u16> = BTreeMap::new();
    let mut highest_specific: BTreeMap<(String, String), u16> = BTreeMap::new();

    let mut empty = true;
    for mime in types {
        empty = false;
        let q = mime.quality_thousandths();
        match (mime.is_any_major(), mime.is_any_minor()) {
            (true, _) => {
                if highest_any.map_or(true, |cur| q > cur) {
                    highest_any = Some(q);
                }
            }
            (false, true) => {
                let entry = highest_any_minor.entry(mime.major_type().to_string()).or_insert(q);
                if q > *entry {
                    *entry = q;
                }
            }
            (false, false) => {
                let key = (mime.major_type().to_string(), mime.minor_type().to_string());
                let entry = highest_specific.entry(key).or_insert(q);
                if q > *entry {
                    *entry = q;
                }
            }
        }
    }
    if empty {
        return None;
    }

    // Wildcards absorb every entry they cover at an equal or lower weight.
    if let Some(any_q) = highest_any {
        highest_any_minor.retain(|_, q| *q > any_q);
        highest_specific.retain(|_, q| *q > any_q);
    }
    for (major, major_q) in &highest_any_minor {
        highest_specific.retain(|(m, _), q| m != major || *q > *major_q);
    }

    let mut parts: Vec<String> = Vec::new();
    for ((major, minor), q) in &highest_specific {
        parts.push(render(&format!("{major}/{minor}"), *q));
    }
    for (major, q) in &highest_any_minor {
        parts.push(render(&format!("{major}/*"), *q));
    }
    if let Some(q) = highest_any {
        parts.push(render("*/*", q));
    }
    Some(parts.join(", "))
}

fn render(full_type: &str, q: u16) -> String {
    if q == 1000 {
        full_type.to_string()
    } else {
        format!("{full_type};q={}", format_quality(q))
    }
}
