use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown snap type: {0}")]
    UnknownSnapType(String),
    #[error("Unknown snap mode: {0}")]
    UnknownSnapMode(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, SnapError>;
