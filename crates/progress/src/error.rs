use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImportError>;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("failed to read progress snapshot: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to decode progress snapshot: {0}")]
    Decode(#[source] serde_json::Error),
}
