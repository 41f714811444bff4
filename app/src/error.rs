use pcd_exporter::ExportError;
use pcd_matcher::Interrupted;
use pcd_parser::ParseError;
use thiserror::Error;

/// Run-level failures; any of these aborts the run before output is written.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("please provide both a LAS/LAZ file and a CSV file (missing: {})", .0.join(", "))]
    InputMissing(Vec<String>),
    #[error("{0}")]
    Schema(ParseError),
    #[error("{0}")]
    Format(ParseError),
    #[error(transparent)]
    Interrupted(#[from] Interrupted),
    #[error("failed to export results: {0}")]
    Export(#[from] ExportError),
}

impl From<ParseError> for AppError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Schema { .. } => AppError::Schema(err),
            other => AppError::Format(other),
        }
    }
}
