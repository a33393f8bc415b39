//! Error taxonomy shared by the dataset readers.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for dataset ingestion operations.
pub type Result<T> = std::result::Result<T, DatasetError>;

/// Failures raised while resolving, extracting or parsing a corpus.
///
/// None of these are recovered internally: any malformed record aborts the
/// read that encountered it.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// A line does not have the expected shape (field count, integer offset).
    #[error("malformed input at line {line}: {message}")]
    Format { line: usize, message: String },

    /// A label mapping was supplied but has no entry for this mention type.
    #[error("no label mapping for mention type {0:?}")]
    MissingLabel(String),

    /// An expected dataset file or local path does not exist.
    #[error("missing dataset file {}", .0.display())]
    MissingFile(PathBuf),

    /// A remote resource could not be downloaded.
    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// An archive could not be opened or unpacked.
    #[error("failed to extract archive {}: {message}", .path.display())]
    Archive { path: PathBuf, message: String },

    /// An entity's offsets do not select its mention text.
    #[error(
        "offsets {start}..{end} in document {pubmed_id} select {found:?}, annotation says {expected:?}"
    )]
    OffsetMismatch {
        pubmed_id: String,
        start: usize,
        end: usize,
        expected: String,
        found: String,
    },

    /// A document id is listed in more than one of the train/dev/test files.
    #[error("document {pubmed_id} appears in more than one split")]
    SplitOverlap { pubmed_id: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DatasetError {
    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        Self::Format {
            line,
            message: message.into(),
        }
    }

    /// Shift a block-relative line number to an absolute one.
    pub(crate) fn offset_line(self, first_line: usize) -> Self {
        match self {
            Self::Format { line, message } => Self::Format {
                line: line + first_line - 1,
                message,
            },
            other => other,
        }
    }
}
