use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed to read point cloud: {0}")]
    Las(#[from] las::Error),
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV must contain the columns x, y, z (missing: {})", .missing.join(", "))]
    Schema { missing: Vec<String> },
    #[error("unsupported file extension: {0:?}")]
    UnsupportedExtension(String),
}
