use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AtlasError {
    #[error("Insufficient data: {0}")]
    InsufficientDataErr(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameterErr(String),
    #[error("Invalid price history: {0}")]
    InvalidHistoryErr(String),
    #[error("Not found: {0}")]
    NotFoundErr(String),
}

pub type Result<T> = std::result::Result<T, AtlasError>;
