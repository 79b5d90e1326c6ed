//! Resolution of dotted field paths inside one group instance.

use std::collections::{BTreeMap, BTreeSet};

use notice_model::{FieldPath, VisualNode};

/// All field nodes a path reaches from `group`, descending one segment at a
/// time through every child instance with a matching identifier.
pub fn resolve<'a>(group: &'a VisualNode, path: &FieldPath) -> Vec<&'a VisualNode> {
    let mut current = vec![group];
    for segment in path.groups() {
        current = children_named(&current, segment);
        if current.is_empty() {
            return current;
        }
    }
    children_named(&current, path.field())
}

fn children_named<'a>(parents: &[&'a VisualNode], identifier: &str) -> Vec<&'a VisualNode> {
    parents
        .iter()
        .flat_map(|parent| parent.children.iter())
        .filter(|child| child.is(identifier))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldState {
    Empty,
    Filled,
}

/// Emptiness recorded per configured path while one group is evaluated.
///
/// A path seen filled in any repeated instance stays filled: a later empty
/// instance never overwrites it.
#[derive(Debug, Default)]
pub struct FieldStates<'p> {
    states: BTreeMap<&'p FieldPath, FieldState>,
}

impl<'p> FieldStates<'p> {
    pub fn record(&mut self, path: &'p FieldPath, empty: bool) {
        let state = if empty {
            FieldState::Empty
        } else {
            FieldState::Filled
        };
        self.states
            .entry(path)
            .and_modify(|current| {
                if *current == FieldState::Empty {
                    *current = state;
                }
            })
            .or_insert(state);
    }

    pub fn is_recorded(&self, path: &FieldPath) -> bool {
        self.states.contains_key(path)
    }

    pub fn is_filled(&self, path: &FieldPath) -> bool {
        self.states.get(path) == Some(&FieldState::Filled)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// True when every path resolves to at least one field and no resolved
/// field holds a value. An unresolved path makes the group not removable.
pub fn all_fields_empty(group: &VisualNode, paths: &BTreeSet<FieldPath>) -> bool {
    let mut states = FieldStates::default();
    for path in paths {
        for field in resolve(group, path) {
            states.record(path, field.has_blank_value());
        }
    }
    if states.len() != paths.len() {
        return false;
    }
    paths.iter().all(|path| !states.is_filled(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(value: &str) -> FieldPath {
        FieldPath::parse(value).unwrap()
    }

    #[test]
    fn filled_state_is_sticky() {
        let a = path("GR-A.BT-1");
        let mut states = FieldStates::default();
        states.record(&a, true);
        states.record(&a, false);
        states.record(&a, true);
        assert!(states.is_filled(&a));
        assert!(states.is_recorded(&a));
    }

    #[test]
    fn resolves_through_every_instance() {
        let group = VisualNode::new("GR-Org").with_children([
            VisualNode::new("GR-Address").with_child(VisualNode::field("BT-1", "")),
            VisualNode::new("GR-Address").with_child(VisualNode::field("BT-1", "x")),
        ]);
        let found = resolve(&group, &path("GR-Address.BT-1"));
        assert_eq!(found.len(), 2);
        assert!(resolve(&group, &path("GR-Other.BT-1")).is_empty());
    }
}
