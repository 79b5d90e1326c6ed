use notice_model::{ModelError, SdkVersion};
use notice_xml::XmlError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SortError {
    #[error("failed to find {element} under the root element {root}")]
    MissingVersionMarker { element: String, root: String },

    #[error("invalid version marker {value:?}: {source}")]
    InvalidVersionMarker {
        value: String,
        #[source]
        source: ModelError,
    },

    #[error("incompatible version: sorter is {sorter}, notice is {notice}")]
    VersionMismatch {
        sorter: SdkVersion,
        notice: SdkVersion,
    },

    #[error("schema node {id} is not in the order table")]
    UnknownSchemaNode { id: String },

    #[error("failed to evaluate {expr:?}: {source}")]
    Path {
        expr: String,
        #[source]
        source: XmlError,
    },

    #[error(transparent)]
    Xml(#[from] XmlError),
}

pub type Result<T> = std::result::Result<T, SortError>;
