use std::collections::BTreeSet;

use notice_model::{
    DATA_SUBTREE_INDEX, FieldPath, PruneCategory, PruneRules, VisualNode,
};
use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::error::{PruneError, Result};
use crate::occurrence::OccurrenceIndex;
use crate::resolve::all_fields_empty;

/// Groups removed by one category pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryOutcome {
    pub category: PruneCategory,
    /// False when no rule set exists for the subtype.
    pub applied: bool,
    pub removed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PruneSummary {
    pub notice_sub_type: String,
    pub categories: Vec<CategoryOutcome>,
}

impl PruneSummary {
    pub fn total_removed(&self) -> usize {
        self.categories.iter().map(|outcome| outcome.removed).sum()
    }

    pub fn removed(&self, category: PruneCategory) -> usize {
        self.categories
            .iter()
            .filter(|outcome| outcome.category == category)
            .map(|outcome| outcome.removed)
            .sum()
    }
}

/// Applies the five category passes to visual models.
#[derive(Debug, Clone, Copy)]
pub struct TreePruner<'a> {
    rules: &'a PruneRules,
}

impl<'a> TreePruner<'a> {
    pub fn new(rules: &'a PruneRules) -> Self {
        Self { rules }
    }

    /// Prunes using the subtype stored on the root.
    pub fn prune_visual_model(&self, root: &mut VisualNode) -> Result<PruneSummary> {
        let sub_type = root.notice_sub_type().ok_or(PruneError::MissingSubType)?;
        self.prune(root, &sub_type)
    }

    /// Runs every category in order over the data subtree of `root`.
    pub fn prune(&self, root: &mut VisualNode, sub_type: &str) -> Result<PruneSummary> {
        let _span = info_span!("prune", sub_type).entered();
        let children = root.children.len();
        let data = root
            .children
            .get_mut(DATA_SUBTREE_INDEX)
            .ok_or(PruneError::MissingDataSubtree {
                children,
                index: DATA_SUBTREE_INDEX,
            })?;

        let mut summary = PruneSummary {
            notice_sub_type: sub_type.to_string(),
            categories: Vec::with_capacity(PruneCategory::ALL.len()),
        };
        for category in PruneCategory::ALL {
            let outcome = match self.rules.paths_for(category, sub_type) {
                None => {
                    debug!(%category, "no rule set for subtype");
                    CategoryOutcome {
                        category,
                        applied: false,
                        removed: 0,
                    }
                }
                Some(paths) if paths.is_empty() => {
                    return Err(PruneError::EmptyRuleSet {
                        category,
                        sub_type: sub_type.to_string(),
                    });
                }
                Some(paths) => CategoryOutcome {
                    category,
                    applied: true,
                    removed: prune_category(data, category, paths),
                },
            };
            summary.categories.push(outcome);
        }
        info!(removed = summary.total_removed(), "pruning finished");
        Ok(summary)
    }
}

/// One category pass: mark over the whole subtree, then remove.
fn prune_category(data: &mut VisualNode, category: PruneCategory, paths: &BTreeSet<FieldPath>) -> usize {
    let occurrences = OccurrenceIndex::build(data);
    let mut marks = Vec::new();
    let mut position = Vec::new();
    mark_groups(data, category, paths, &occurrences, &mut position, &mut marks);

    // Descending lexicographic order removes later siblings and deeper
    // nodes first, so every remaining mark still points at its node.
    marks.sort_unstable_by(|a, b| b.cmp(a));
    let removed = marks.len();
    for mark in &marks {
        remove_at(data, mark);
    }
    info!(
        %category,
        group = category.group_marker(),
        removed,
        "category pass finished"
    );
    removed
}

fn mark_groups(
    node: &VisualNode,
    category: PruneCategory,
    paths: &BTreeSet<FieldPath>,
    occurrences: &OccurrenceIndex,
    position: &mut Vec<usize>,
    marks: &mut Vec<Vec<usize>>,
) {
    for (index, child) in node.children.iter().enumerate() {
        position.push(index);
        if child.is(category.group_marker()) && is_removable(child, category, paths, occurrences) {
            debug!(%category, position = ?position, "marking group for removal");
            marks.push(position.clone());
        }
        mark_groups(child, category, paths, occurrences, position, marks);
        position.pop();
    }
}

fn is_removable(
    group: &VisualNode,
    category: PruneCategory,
    paths: &BTreeSet<FieldPath>,
    occurrences: &OccurrenceIndex,
) -> bool {
    let Some(marker) = find_marker(group, category.field_marker()) else {
        return false;
    };
    let Some(value) = marker.value.as_deref().filter(|value| !value.trim().is_empty()) else {
        return false;
    };
    if !occurrences.is_unique(value) {
        debug!(%category, value, count = occurrences.count(value), "identifier is referenced");
        return false;
    }
    all_fields_empty(group, paths)
}

/// The identifying field among direct children, else among grandchildren.
fn find_marker<'a>(group: &'a VisualNode, marker: &str) -> Option<&'a VisualNode> {
    group
        .children
        .iter()
        .find(|child| child.is(marker))
        .or_else(|| {
            group
                .children
                .iter()
                .flat_map(|child| child.children.iter())
                .find(|grandchild| grandchild.is(marker))
        })
}

fn remove_at(data: &mut VisualNode, position: &[usize]) {
    let Some((&last, parents)) = position.split_last() else {
        return;
    };
    let mut parent = data;
    for &index in parents {
        match parent.children.get_mut(index) {
            Some(next) => parent = next,
            None => return,
        }
    }
    if last < parent.children.len() {
        parent.children.remove(last);
    }
}
