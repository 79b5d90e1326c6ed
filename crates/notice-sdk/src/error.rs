#![deny(unsafe_code)]

use std::path::PathBuf;

use notice_model::{ModelError, SdkVersion};

#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse translations {path}: {message}")]
    Translations { path: PathBuf, message: String },

    #[error("invalid prune rule table {path}: {message}")]
    InvalidRuleTable { path: PathBuf, message: String },

    #[error("no SDK directory for version {version} under {root}")]
    MissingVersion { version: SdkVersion, root: PathBuf },

    #[error("document type {document_type} is not declared by SDK {version}")]
    UnknownDocumentType {
        version: SdkVersion,
        document_type: String,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl SdkError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SdkError>;
