use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to enumerate catalog partitions: {0}")]
    Enumerate(#[source] std::io::Error),
}
