use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the transport engine and its loaders.
///
/// Exiting the drift region or running out of collision budget are normal
/// terminations and never surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid user or API parameter.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Malformed cross-section data, reported with the 1-based line number.
    #[error("data format error at line {line}{}: {message}", channel_suffix(.channel))]
    DataFormat {
        line: usize,
        channel: Option<String>,
        message: String,
    },

    /// The null-collision ceiling is zero or not finite, so free-flight times are undefined.
    #[error("degenerate rate model: {0}")]
    DegenerateRateModel(String),

    /// Propagated I/O errors (data files, CSV export).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Configuration files that fail to deserialize.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn data_format(
        line: usize,
        channel: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Error::DataFormat {
            line,
            channel: channel.map(str::to_string),
            message: message.into(),
        }
    }
}

fn channel_suffix(channel: &Option<String>) -> String {
    match channel {
        Some(c) => format!(" (channel {c})"),
        None => String::new(),
    }
}
