//! Error types for the eye-tracker log converter.

use std::path::PathBuf;

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading, reshaping or writing an eye-tracker log.
///
/// Every variant is scoped to a single input file; the bulk converter records
/// them in the diagnostic log and moves on to the next file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error occurred while reading or writing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input file is not valid UTF-8 text
    #[error("Could not read {}: {source}", .path.display())]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Raw bytes could not be decoded as text (no path known yet)
    #[error("Could not decode log text: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// End of file reached before the header and required metadata were seen
    #[error("Malformed eye-tracker log: {} not found", .missing.join(", "))]
    MalformedLog { missing: Vec<&'static str> },

    /// A canonical column is absent after renaming
    #[error("Schema mismatch: missing column '{column}'")]
    SchemaMismatch { column: String },

    /// More than one row type survived cleanup (only raised under the reject policy)
    #[error("More than one type of row: {}", .values.join(", "))]
    RowTypeInconsistency { values: Vec<String> },

    /// A value that must be numeric is not
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// TSV reading or writing error
    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Sidecar serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Output format error (e.g., Parquet write error)
    #[error("Output error: {0}")]
    Output(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Attach the input path to a decode failure.
    pub(crate) fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Error::Encoding(source) => Error::UnreadableFile {
                path: path.into(),
                source,
            },
            other => other,
        }
    }
}
