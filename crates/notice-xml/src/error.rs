use thiserror::Error;

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("malformed XML at byte {position}: {message}")]
    Malformed { position: u64, message: String },

    #[error("unexpected closing tag </{found}> (open element is {expected:?})")]
    UnbalancedEnd {
        found: String,
        expected: Option<String>,
    },

    #[error("document has no root element")]
    MissingRoot,

    #[error("invalid UTF-8 in {context}")]
    Utf8 { context: String },

    #[error("invalid escape sequence in {context}: {message}")]
    Escape { context: String, message: String },

    #[error("failed to write XML: {message}")]
    Write { message: String },

    #[error("path expression error: {0}")]
    Path(#[from] PathError),
}

#[derive(Debug, Error)]
pub enum PathError {
    #[error("cannot parse path expression {expr:?}: {message}")]
    Syntax { expr: String, message: String },

    #[error("unsupported construct in path expression {expr:?}: {message}")]
    Unsupported { expr: String, message: String },
}

pub type Result<T> = std::result::Result<T, XmlError>;
