use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::version::SdkVersion;

/// Id of the conceptual root node in SDK field metadata.
pub const ROOT_NODE_ID: &str = "ND-Root";

/// Position of an element inside its parent's XSD sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceOrder {
    /// Element name as written in the notice, e.g. `cbc:ID`.
    pub element: String,
    pub order: i64,
}

/// One node or field of the SDK metadata, reduced to what ordering needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaEntry {
    pub id: String,
    pub parent_id: Option<String>,
    pub xpath_absolute: String,
    pub xpath_relative: String,
    /// `xsdSequenceOrder` entries; only the first one drives sorting.
    pub sequence_order: Vec<SequenceOrder>,
    pub is_node: bool,
}

impl SchemaEntry {
    pub fn primary_order(&self) -> Option<&SequenceOrder> {
        self.sequence_order.first()
    }
}

/// Declared per-parent child ordering for one SDK version and document type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaOrderTable {
    version: SdkVersion,
    root_id: String,
    main_schema_path: Option<String>,
    entries: Vec<SchemaEntry>,
    index_by_id: HashMap<String, usize>,
}

impl SchemaOrderTable {
    /// Builds the table; entries keep the metadata order (nodes, then fields).
    /// A repeated id keeps its first entry.
    pub fn new(
        version: SdkVersion,
        main_schema_path: Option<String>,
        entries: Vec<SchemaEntry>,
    ) -> Self {
        let mut kept = Vec::with_capacity(entries.len());
        let mut index_by_id = HashMap::with_capacity(entries.len());
        for entry in entries {
            if index_by_id.contains_key(&entry.id) {
                continue;
            }
            index_by_id.insert(entry.id.clone(), kept.len());
            kept.push(entry);
        }
        Self {
            version,
            root_id: ROOT_NODE_ID.to_string(),
            main_schema_path,
            entries: kept,
            index_by_id,
        }
    }

    #[must_use]
    pub fn with_root_id(mut self, root_id: impl Into<String>) -> Self {
        self.root_id = root_id.into();
        self
    }

    pub fn version(&self) -> SdkVersion {
        self.version
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    /// Path of the main content-model schema; `None` when the SDK version
    /// predates it, in which case sorting is unsupported.
    pub fn main_schema_path(&self) -> Option<&str> {
        self.main_schema_path.as_deref()
    }

    pub fn entry(&self, id: &str) -> Option<&SchemaEntry> {
        self.index_by_id.get(id).map(|&idx| &self.entries[idx])
    }

    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    /// `parentId -> child ids`, children in metadata order.
    pub fn children_by_parent(&self) -> HashMap<String, Vec<String>> {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for entry in &self.entries {
            if let Some(parent) = &entry.parent_id {
                map.entry(parent.clone()).or_default().push(entry.id.clone());
            }
        }
        map
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
