use std::path::Path;

use notice_model::{SchemaOrderTable, SdkVersion};
use tracing::info;

use crate::error::{Result, SdkError};
use crate::fields::FieldsFile;
use crate::notice_types::NoticeTypesFile;

/// Builds the ordering table of one document type (`CN`, or its root element
/// name `ContractNotice`) from an SDK version directory.
pub fn load_schema_order_table(
    version_dir: &Path,
    version: SdkVersion,
    document_type: &str,
) -> Result<SchemaOrderTable> {
    let notice_types = NoticeTypesFile::read(version_dir)?;
    let doc_type = notice_types
        .find(document_type)
        .ok_or_else(|| SdkError::UnknownDocumentType {
            version,
            document_type: document_type.to_string(),
        })?;
    let fields = FieldsFile::read(version_dir)?;
    let table = SchemaOrderTable::new(
        version,
        doc_type.schema_location.clone(),
        fields.schema_entries(),
    );
    info!(
        %version,
        document_type = %doc_type.id,
        entries = table.len(),
        sortable = table.main_schema_path().is_some(),
        "loaded schema order table"
    );
    Ok(table)
}
