//! `fields/fields.json`: the node hierarchy and the fields hanging off it.

use std::collections::BTreeMap;
use std::path::Path;

use notice_model::{SchemaEntry, SequenceOrder};
use serde::Deserialize;

use crate::error::{Result, SdkError};
use crate::paths;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldsFile {
    #[serde(default)]
    pub sdk_version: Option<String>,
    #[serde(default)]
    pub xml_structure: Vec<NodeDefinition>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDefinition {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub xpath_absolute: String,
    #[serde(default)]
    pub xpath_relative: Option<String>,
    /// Missing before SDK 1.8.
    #[serde(default)]
    pub xsd_sequence_order: Vec<BTreeMap<String, i64>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub id: String,
    #[serde(default)]
    pub parent_node_id: Option<String>,
    pub xpath_absolute: String,
    #[serde(default)]
    pub xpath_relative: Option<String>,
    #[serde(default)]
    pub xsd_sequence_order: Vec<BTreeMap<String, i64>>,
}

impl FieldsFile {
    pub fn read(version_dir: &Path) -> Result<Self> {
        let path = paths::fields_json(version_dir);
        let text = std::fs::read_to_string(&path).map_err(|e| SdkError::io(&path, e))?;
        serde_json::from_str(&text).map_err(|e| SdkError::json(&path, e))
    }

    /// Ordering entries, nodes first and then fields, each in file order.
    pub fn schema_entries(&self) -> Vec<SchemaEntry> {
        let nodes = self.xml_structure.iter().map(|node| SchemaEntry {
            id: node.id.clone(),
            parent_id: node.parent_id.clone(),
            xpath_absolute: node.xpath_absolute.clone(),
            xpath_relative: relative_or_absolute(node.xpath_relative.as_ref(), &node.xpath_absolute),
            sequence_order: sequence_order(&node.xsd_sequence_order),
            is_node: true,
        });
        let fields = self.fields.iter().map(|field| SchemaEntry {
            id: field.id.clone(),
            parent_id: field.parent_node_id.clone(),
            xpath_absolute: field.xpath_absolute.clone(),
            xpath_relative: relative_or_absolute(
                field.xpath_relative.as_ref(),
                &field.xpath_absolute,
            ),
            sequence_order: sequence_order(&field.xsd_sequence_order),
            is_node: false,
        });
        nodes.chain(fields).collect()
    }
}

fn relative_or_absolute(relative: Option<&String>, absolute: &str) -> String {
    relative.cloned().unwrap_or_else(|| absolute.to_string())
}

fn sequence_order(raw: &[BTreeMap<String, i64>]) -> Vec<SequenceOrder> {
    raw.iter()
        .flat_map(|entry| {
            entry.iter().map(|(element, order)| SequenceOrder {
                element: element.clone(),
                order: *order,
            })
        })
        .collect()
}
