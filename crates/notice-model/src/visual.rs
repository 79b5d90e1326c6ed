use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Key holding the notice subtype on the visual model root.
pub const NOTICE_SUB_TYPE_KEY: &str = "noticeSubType";

/// Position of the business-data subtree among the root's children.
pub const DATA_SUBTREE_INDEX: usize = 1;

/// A node of the visual model, the tree the notice form is edited as.
///
/// Keys other than the identifier, the value and the children are kept in
/// `extra` so a pruned tree serialises back with everything the upstream
/// builder put there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualNode {
    #[serde(rename = "contentId", alias = "identifier")]
    pub identifier: String,
    #[serde(
        default,
        deserialize_with = "value_as_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<VisualNode>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl VisualNode {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    pub fn field(identifier: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_child(mut self, child: VisualNode) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = VisualNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn is(&self, identifier: &str) -> bool {
        self.identifier == identifier
    }

    /// Absent, null and whitespace-only values all count as empty.
    pub fn has_blank_value(&self) -> bool {
        self.value
            .as_deref()
            .is_none_or(|value| value.trim().is_empty())
    }

    /// Notice subtype stored on the root (`noticeSubType`), if present.
    pub fn notice_sub_type(&self) -> Option<String> {
        match self.extra.get(NOTICE_SUB_TYPE_KEY)? {
            serde_json::Value::String(value) => Some(value.clone()),
            serde_json::Value::Number(value) => Some(value.to_string()),
            _ => None,
        }
    }

    /// Total node count, this node included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(VisualNode::node_count).sum::<usize>()
    }
}

fn value_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(text)) => Some(text),
        Some(serde_json::Value::Bool(flag)) => Some(flag.to_string()),
        Some(serde_json::Value::Number(number)) => Some(number.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_upstream_json() {
        let json = r#"{
            "contentId": "notice-root",
            "noticeSubType": "16",
            "children": [
                {"contentId": "BT-01", "value": 12, "type": "field"},
                {"contentId": "GR-X", "children": [{"contentId": "F", "value": null}]}
            ]
        }"#;
        let root: VisualNode = serde_json::from_str(json).expect("parse visual model");
        assert_eq!(root.notice_sub_type().as_deref(), Some("16"));
        assert_eq!(root.children[0].value.as_deref(), Some("12"));
        assert_eq!(
            root.children[0].extra.get("type"),
            Some(&serde_json::Value::String("field".into()))
        );
        assert!(root.children[1].children[0].has_blank_value());
        assert_eq!(root.node_count(), 4);
    }

    #[test]
    fn blank_detection_trims() {
        assert!(VisualNode::field("F", "   ").has_blank_value());
        assert!(!VisualNode::field("F", " x ").has_blank_value());
        assert!(VisualNode::new("F").has_blank_value());
    }
}
