// errors.rs
use std::fmt;

/// Errors originating from the pipeline itself
/// (bad config, CSV problems, reports) or downstream layers (DB, store).
#[derive(Debug)]
pub enum PipelineError {
    Config(String),
    DbError(String),
    Io(String),
    Csv(String),
    Store(String),
    Xlsx(String),
}

// Type alias commonly used by pipeline steps.
pub type PipelineResult<T> = Result<T, PipelineError>;

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Config(msg) => write!(f, "Config error: {msg}"),
            PipelineError::DbError(msg) => write!(f, "Database Error: {msg}"),
            PipelineError::Io(msg) => write!(f, "IO error: {msg}"),
            PipelineError::Csv(msg) => write!(f, "CSV error: {msg}"),
            PipelineError::Store(msg) => write!(f, "Artifact store error: {msg}"),
            PipelineError::Xlsx(msg) => write!(f, "XLSX error: {msg}"),
        }
    }
}

impl std::error::Error for PipelineError {}
