//! Child lists the sorter walks, derived from the order table.

use std::collections::HashMap;

use notice_model::{SchemaEntry, SchemaOrderTable};
use notice_xml::strip_predicates;
use tracing::{debug, warn};

/// Node pairs whose relative paths reach the same element and differ only
/// by a predicate on the child content. Children of the second id are
/// sorted under the first one.
pub const MERGED_NODES: &[(&str, &str)] = &[("ND-SubcontractedActivity", "ND-SubcontractedContract")];

#[derive(Debug, Clone, Default)]
pub struct OrderPlan {
    children: HashMap<String, Vec<String>>,
}

impl OrderPlan {
    pub fn build(table: &SchemaOrderTable) -> Self {
        let mut children = table.children_by_parent();
        for &(keep, absorb) in MERGED_NODES {
            if !children.contains_key(keep) {
                continue;
            }
            let Some(absorbed) = children.get_mut(absorb).map(std::mem::take) else {
                continue;
            };
            debug!(keep, absorb, moved = absorbed.len(), "merging child lists");
            if let Some(kept) = children.get_mut(keep) {
                kept.extend(absorbed);
            }
        }
        warn_divergent_orders(table);
        Self { children }
    }

    pub fn children(&self, id: &str) -> &[String] {
        self.children.get(id).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Warns about sibling nodes that reach the same element through paths
/// differing only in predicates while declaring different sequence orders.
/// The first node encountered keeps the key.
fn warn_divergent_orders(table: &SchemaOrderTable) {
    let mut seen: HashMap<(&str, String), &SchemaEntry> = HashMap::new();
    for entry in table.entries() {
        if !entry.is_node || entry.id == table.root_id() {
            continue;
        }
        let Some(parent) = entry.parent_id.as_deref() else {
            continue;
        };
        let key = (parent, first_step(&entry.xpath_relative));
        match seen.get(&key) {
            Some(other) => {
                let related = other.xpath_relative.starts_with(&entry.xpath_relative)
                    || entry.xpath_relative.starts_with(&other.xpath_relative);
                if related {
                    debug!(id = %entry.id, other = %other.id, "nodes share an element");
                    if other.sequence_order != entry.sequence_order {
                        warn!(
                            first = %other.id,
                            second = %entry.id,
                            "sort order differs for nodes sharing the same element"
                        );
                    }
                }
            }
            None => {
                seen.insert(key, entry);
            }
        }
    }
}

fn first_step(relative: &str) -> String {
    let stripped = strip_predicates(relative);
    stripped
        .split('/')
        .find(|step| !step.is_empty())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use notice_model::{SdkVersion, SequenceOrder};

    use super::*;

    fn node(id: &str, parent: &str, relative: &str, order: i64) -> SchemaEntry {
        SchemaEntry {
            id: id.to_string(),
            parent_id: Some(parent.to_string()),
            xpath_absolute: format!("/*/{relative}"),
            xpath_relative: relative.to_string(),
            sequence_order: vec![SequenceOrder {
                element: strip_predicates(relative),
                order,
            }],
            is_node: true,
        }
    }

    #[test]
    fn merges_documented_pair() {
        let table = SchemaOrderTable::new(
            SdkVersion::new(1, 10, None),
            Some("schema.xsd".to_string()),
            vec![
                node("ND-SubcontractedActivity", "ND-LotTender", "efac:SubcontractingTerm", 3),
                node(
                    "ND-SubcontractedContract",
                    "ND-LotTender",
                    "efac:SubcontractingTerm[efbc:TermCode/@listName='applicability']",
                    3,
                ),
                node("BT-773", "ND-SubcontractedActivity", "efbc:TermCode", 1),
                node("BT-730", "ND-SubcontractedContract", "efbc:ValueKnownIndicator", 2),
            ],
        );
        let plan = OrderPlan::build(&table);
        assert_eq!(plan.children("ND-SubcontractedActivity"), ["BT-773", "BT-730"]);
        assert!(plan.children("ND-SubcontractedContract").is_empty());
        assert!(plan.children("missing").is_empty());
    }

    #[test]
    fn first_step_ignores_predicates() {
        assert_eq!(
            first_step("efac:SubcontractingTerm[efbc:TermCode/@listName='x']/efbc:Amount"),
            "efac:SubcontractingTerm"
        );
        assert_eq!(first_step("/*"), "*");
    }
}
