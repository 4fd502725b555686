use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the scorecard pipeline.
#[derive(Error, Debug)]
pub enum ScorecardError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the file structure.
    #[error("Failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A required column is absent from the header row.
    #[error("Missing column {column} in {path}")]
    MissingColumn { path: PathBuf, column: String },

    /// A required field holds a value that cannot be interpreted.
    #[error("Malformed value in {path}, row {row}, column {column}: {message}")]
    MalformedInput {
        path: PathBuf,
        /// 1-based data row (the header is not counted).
        row: usize,
        column: String,
        message: String,
    },

    /// Classification was requested for a hole with no par row.
    #[error("Par not found for course {course:?}, layout {layout:?}{}", hole_suffix(.hole))]
    MissingParReference {
        course: String,
        layout: String,
        hole: Option<u32>,
    },

    /// A hole score of 0 means "not played" and cannot be classified.
    #[error("Invalid hole score: {0}")]
    InvalidScore(u32),

    /// A filter chain produced no rows.
    #[error("No data found for {0}")]
    EmptyResultSet(String),

    /// A combination of options that cannot be honoured.
    #[error("Configuration error: {0}")]
    InvalidConfiguration(String),

    /// A date argument did not match `YYYY-MM-DD`.
    #[error("Invalid date: '{0}'. Format must be YYYY-MM-DD")]
    InvalidDate(String),

    /// The scorecard directory does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// No CSV files were found in the scorecard directory.
    #[error("No CSV files found in {0}")]
    NoDataFiles(PathBuf),

    /// CSV files exist but every one of them failed to load.
    #[error("None of the {failed} CSV files in {path} could be loaded")]
    NoValidFiles { path: PathBuf, failed: usize },

    /// A JSON document could not be produced.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScorecardError {
    /// Whether callers are expected to handle this outcome and carry on.
    ///
    /// Only an empty filter result qualifies; everything else is a hard
    /// failure with file or row context.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ScorecardError::EmptyResultSet(_))
    }
}

fn hole_suffix(hole: &Option<u32>) -> String {
    match hole {
        Some(h) => format!(", hole {}", h),
        None => String::new(),
    }
}

/// Convenience alias used throughout the scorecard crates.
pub type Result<T> = std::result::Result<T, ScorecardError>;
