use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the royalty report.
#[derive(Error, Debug)]
pub enum RoyaltyError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A delimited input file could not be parsed.
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// A required column is absent from an input file's header row.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// An input file is structurally malformed beyond a single cell.
    #[error("Malformed input: {0}")]
    Parse(String),

    /// The channel-resolution API could not be reached or answered with a
    /// non-success status.
    #[error("Channel lookup failed: {0}")]
    Lookup(String),

    /// The views export declares a grand total of zero views, so view
    /// shares cannot be computed.
    #[error("Cannot attribute revenue: grand total views is zero")]
    ZeroTotalViews,

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the royalty crates.
pub type Result<T> = std::result::Result<T, RoyaltyError>;
