/// Convenience result type used across MovieColor.
pub type MovieColorResult<T> = Result<T, MovieColorError>;

/// Top-level error taxonomy for a barcode run.
///
/// Every variant is terminal for the run that produced it; nothing in the crate retries.
#[derive(thiserror::Error, Debug)]
pub enum MovieColorError {
    /// Invalid caller-provided input or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Media dimensions or duration could not be determined.
    #[error("probe error: {0}")]
    Probe(String),

    /// The raw frame stream ended mid-frame or could not be read.
    #[error("stream protocol error: {0}")]
    StreamProtocol(String),

    /// The final barcode image could not be laid out, encoded or written.
    #[error("compositing error: {0}")]
    Compositing(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MovieColorError {
    /// Build a [`MovieColorError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MovieColorError::Probe`] value.
    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe(msg.into())
    }

    /// Build a [`MovieColorError::StreamProtocol`] value.
    pub fn stream_protocol(msg: impl Into<String>) -> Self {
        Self::StreamProtocol(msg.into())
    }

    /// Build a [`MovieColorError::Compositing`] value.
    pub fn compositing(msg: impl Into<String>) -> Self {
        Self::Compositing(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
