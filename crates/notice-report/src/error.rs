use notice_model::SdkVersion;
use notice_xml::XmlError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("malformed validation report at byte {position}: {message}")]
    Malformed { position: u64, message: String },

    #[error("unexpected report root element <{found}>, expected <{expected}>")]
    UnexpectedRoot { found: String, expected: String },

    #[error("report has no root element")]
    Empty,

    #[error("section index [{index}] in location {location:?} is out of range")]
    SectionIndex { location: String, index: String },

    #[error("<{element}> without required attribute {attribute}")]
    MissingAttribute { element: String, attribute: String },

    #[error("no labels loaded for SDK {version} in language {lang:?}")]
    UnknownLabelSet { version: SdkVersion, lang: String },

    #[error(transparent)]
    Text(#[from] XmlError),
}

pub type Result<T> = std::result::Result<T, ReportError>;
