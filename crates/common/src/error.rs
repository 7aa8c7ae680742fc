use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Registration input shorter than a canonical tag identifier
    #[error("uid must be at least 10 hex chars")]
    InvalidIdentifier { length: usize },

    #[error("Dashboard asset not found: {}", .0.display())]
    AssetNotFound(PathBuf),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
