//! Location, reference and legend helpers applied to each failed assert.

use std::collections::HashSet;
use std::sync::LazyLock;

use notice_model::FieldLabel;
use regex::Regex;

use crate::error::{ReportError, Result};

/// Legend text when no identifier has a label.
pub const EMPTY_LEGEND: &str = "-";

/// Separator between the legend fragments of different identifiers.
pub const FRAGMENT_SEPARATOR: &str = " # ";

static SECTION_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)\]").expect("valid section index pattern"));

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(BT-|OPT-|OPP-|OPA-|GR-|ND-)[^\s'"]+"#).expect("valid identifier pattern")
});

/// Zero-based positions (`k - 1`) of every `[k]` predicate in a location
/// path.
///
/// `/cac:ProcurementProjectLot[2]/cac:Tender[1]` gives `[1, 0]`; `[0]`
/// gives `-1`. A position too large to read fails the whole location.
pub fn section_indices(location: &str) -> Result<Vec<i64>> {
    SECTION_INDEX
        .captures_iter(location)
        .map(|captures| {
            captures[1]
                .parse::<i64>()
                .map(|position| position - 1)
                .map_err(|_| ReportError::SectionIndex {
                    location: location.to_string(),
                    index: captures[1].to_string(),
                })
        })
        .collect()
}

/// The field or group a diagnostic `see` value points at: the text after
/// its first colon (`field:BT-11-Procedure-Buyer`).
pub fn see_reference(see: &str) -> Option<&str> {
    see.split_once(':')
        .map(|(_, reference)| reference)
        .filter(|reference| !reference.is_empty())
}

/// Field and group identifiers mentioned in a message, first occurrence
/// first.
pub fn legend_identifiers(text: &str) -> Vec<&str> {
    let mut seen = HashSet::new();
    IDENTIFIER
        .find_iter(text)
        .map(|found| {
            let id = found.as_str();
            id.strip_suffix(')').unwrap_or(id)
        })
        .filter(|id| seen.insert(*id))
        .collect()
}

/// `"<id> - <name>. - <description>. - <hint>."` with absent parts left out;
/// `None` when the label has none of them.
pub fn legend_fragment(id: &str, label: &FieldLabel) -> Option<String> {
    let parts: Vec<String> = [&label.name, &label.description, &label.hint]
        .into_iter()
        .flatten()
        .map(|part| format!("{part}."))
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(format!("{id} - {}", parts.join(" - ")))
}

/// Joins fragments, or returns [`EMPTY_LEGEND`] when there are none.
pub fn join_legend(fragments: &[String]) -> String {
    if fragments.is_empty() {
        EMPTY_LEGEND.to_string()
    } else {
        fragments.join(FRAGMENT_SEPARATOR)
    }
}
