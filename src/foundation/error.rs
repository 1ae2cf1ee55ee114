/// Convenience result type used across scrollfx.
pub type ScrollfxResult<T> = Result<T, ScrollfxError>;

/// Error taxonomy for the configuration and construction boundaries.
///
/// Nothing on the per-frame path returns one of these: unmounted targets,
/// degenerate measurements and superseded tweens are absorbed where they occur.
#[derive(thiserror::Error, Debug)]
pub enum ScrollfxError {
    /// Invalid user-provided band, registration or scenario data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A configuration value is out of its accepted range.
    #[error("config error: {0}")]
    Config(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrollfxError {
    /// Build a [`ScrollfxError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScrollfxError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`ScrollfxError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
