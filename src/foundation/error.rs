/// Convenience result type used across the crate.
pub type LinesResult<T> = Result<T, LinesError>;

/// Error taxonomy for the overlay core.
///
/// None of these are fatal to the host: per-line failures are logged at the frame boundary and the
/// remaining lines keep updating.
#[derive(thiserror::Error, Debug)]
pub enum LinesError {
    /// Invalid configuration or rule data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Degenerate per-line geometry (for example a sample buffer with fewer than two points).
    #[error("geometry error: {0}")]
    Geometry(String),

    /// A host query (camera, projection, entity table) failed for this frame.
    #[error("host error: {0}")]
    Host(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LinesError {
    /// Build a [`LinesError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LinesError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`LinesError::Host`] value.
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }

    /// Build a [`LinesError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for LinesError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
