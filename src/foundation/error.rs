/// Convenience result type used across layercast.
pub type LayercastResult<T> = Result<T, LayercastError>;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum LayercastError {
    /// Bad input data: missing layer, wrong channel count, negative parameter.
    #[error("input error: {0}")]
    Input(String),

    /// Invalid configuration values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while sampling animation curves or rendering frame sequences.
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors while writing PNG/GIF/MP4 output.
    #[error("export error: {0}")]
    Export(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LayercastError {
    /// Build a [`LayercastError::Input`] value.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build a [`LayercastError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LayercastError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`LayercastError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`LayercastError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
