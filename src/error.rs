use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the workflow building blocks.
///
/// Commands wrap these in [`anyhow::Error`] so callers can still downcast to
/// tell validation failures apart from tool failures.
#[derive(Debug, Error)]
pub enum Error {
    /// A required answer was left empty or the prompt was cancelled.
    #[error("{0} is required")]
    MissingInput(&'static str),

    /// An external command exited unsuccessfully. `output` is the raw
    /// combined stdout and stderr of the tool.
    #[error("Command failed: {command}\n{output}")]
    CommandFailed { command: String, output: String },

    #[error("{} must be inside repository {}", folder.display(), repository.display())]
    OutsideRepository {
        folder: PathBuf,
        repository: PathBuf,
    },

    #[error(
        "{} is not a valid changelog (missing </databaseChangeLog> tag)",
        .0.display()
    )]
    MalformedDocument(PathBuf),

    #[error("Not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
