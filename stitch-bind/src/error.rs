use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during catalogue binding.
///
/// Missing optional inputs (no CSV, no asset directories) are not errors —
/// they degrade to empty collections at the loader level. The only fatal
/// condition is an unwritable output destination.
#[derive(Debug, Error)]
pub enum BindError {
    /// I/O error while reading sources or renaming model files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The price list CSV could not be parsed at all
    #[error("Invalid price list: {0}")]
    Csv(#[from] csv::Error),

    /// Catalogue serialization failed
    #[error("Catalogue serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The output destination could not be written
    #[error("Cannot write catalogue to {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
