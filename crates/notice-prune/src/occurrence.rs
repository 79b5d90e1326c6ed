use std::collections::HashMap;

use notice_model::VisualNode;

/// How often each value occurs in a tree. Every node carrying a value
/// counts, blank values included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccurrenceIndex {
    counts: HashMap<String, usize>,
}

impl OccurrenceIndex {
    pub fn build(root: &VisualNode) -> Self {
        let mut index = Self::default();
        index.visit(root);
        index
    }

    fn visit(&mut self, node: &VisualNode) {
        if let Some(value) = &node.value {
            *self.counts.entry(value.clone()).or_insert(0) += 1;
        }
        for child in &node.children {
            self.visit(child);
        }
    }

    pub fn count(&self, value: &str) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    pub fn is_unique(&self, value: &str) -> bool {
        self.count(value) == 1
    }

    pub fn distinct_values(&self) -> usize {
        self.counts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_blank_values_too() {
        let tree = VisualNode::new("root").with_children([
            VisualNode::field("a", "ORG-0001"),
            VisualNode::field("b", " "),
            VisualNode::new("g").with_child(VisualNode::field("c", "ORG-0001")),
            VisualNode::new("no-value"),
        ]);
        let index = OccurrenceIndex::build(&tree);
        assert_eq!(index.count("ORG-0001"), 2);
        assert_eq!(index.count(" "), 1);
        assert_eq!(index.count("missing"), 0);
        assert_eq!(index.distinct_values(), 2);
    }
}
