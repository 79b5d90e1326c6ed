use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid SDK version {value:?}: {message}")]
    InvalidVersion { value: String, message: String },

    #[error("invalid field path {value:?}: {message}")]
    InvalidFieldPath { value: String, message: String },

    #[error("unknown prune category code {code:?}")]
    UnknownCategory { code: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
