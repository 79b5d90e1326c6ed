//! `notice-types/notice-types.json`: declared document types.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SdkError};
use crate::paths;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeTypesFile {
    #[serde(default)]
    pub document_types: Vec<DocumentType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentType {
    pub id: String,
    #[serde(default)]
    pub root_element: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
    /// Main XSD of the document type, relative to the SDK folder. Older
    /// SDKs do not declare it.
    #[serde(default, alias = "sdkXsdPath")]
    pub schema_location: Option<String>,
}

impl NoticeTypesFile {
    pub fn read(version_dir: &Path) -> Result<Self> {
        let path = paths::notice_types_json(version_dir);
        let text = std::fs::read_to_string(&path).map_err(|e| SdkError::io(&path, e))?;
        serde_json::from_str(&text).map_err(|e| SdkError::json(&path, e))
    }

    /// Finds a document type by id (`CN`) or by root element name
    /// (`ContractNotice`).
    pub fn find(&self, id_or_root: &str) -> Option<&DocumentType> {
        self.document_types
            .iter()
            .find(|doc_type| doc_type.id == id_or_root)
            .or_else(|| {
                self.document_types
                    .iter()
                    .find(|doc_type| doc_type.root_element.as_deref() == Some(id_or_root))
            })
    }
}
