use captivox_core::ParamError;

/// Why an export did not produce a file.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The encoder for the requested format was not compiled in.
    #[error("{0} export is unavailable: {1}")]
    Unavailable(&'static str, &'static str),
    #[error("cannot export while the animation is paused (speed or delay is 0)")]
    Paused,
    #[error("unsupported export format {0:?}, expected .mp4 or .gif")]
    UnsupportedFormat(String),
    #[error(transparent)]
    InvalidParameters(#[from] ParamError),
    #[error("I/O error during export: {0}")]
    Io(#[from] std::io::Error),
    #[error("encoder error: {0}")]
    Encoder(String),
}

impl ExportError {
    /// A missing optional capability is reported as information, not as a
    /// failure.
    pub fn is_informational(&self) -> bool {
        matches!(self, ExportError::Unavailable(..))
    }
}
