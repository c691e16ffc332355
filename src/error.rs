use thiserror::Error;

/// Errors surfaced by the dataset store, filter engine and exporters.
///
/// Every variant is recoverable: a failed upload keeps the previous dataset,
/// an unknown metric or player is reported to the caller and the session
/// carries on.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Uploaded bytes could not be decoded as the declared tabular format.
    #[error("could not parse {format} data: {message}")]
    Parse { format: String, message: String },

    #[error("unknown metric '{0}' (expected one of: goals, assists, passes, pass_accuracy, tackles, interceptions)")]
    InvalidMetric(String),

    #[error("no such player: {0}")]
    NotFound(String),

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("export failed: {0}")]
    Export(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
