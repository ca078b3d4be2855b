use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("please enter a search term")]
    EmptyQuery,

    #[error("no data to export")]
    NothingToExport,

    #[error("could not export to {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a single file produced no text.
///
/// These are recovered locally by the ingestion loop: the file is skipped
/// and the batch continues.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionFailure {
    #[error("unsupported file type: {extension}")]
    Unsupported { extension: String },

    #[error("no extractor available for .{extension} files in this build")]
    MissingExtractor { extension: &'static str },

    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("{format} decode failed: {message}")]
    Decode {
        format: &'static str,
        message: String,
    },

    #[error("no text content")]
    Empty,
}
