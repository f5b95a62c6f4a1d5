/// Convenience result type used across slash-compare.
pub type CompareResult<T> = Result<T, CompareError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Missing input (an empty image slot) is never reported through this type: every layer
/// treats it as a silent no-op.
#[derive(thiserror::Error, Debug)]
pub enum CompareError {
    /// Invalid caller-provided data or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Failures inside the raster backend (surface limits, buffer mismatches).
    #[error("render error: {0}")]
    Render(String),

    /// Failures while encoding or writing an exported image.
    #[error("export error: {0}")]
    Export(String),

    /// Errors when serializing or deserializing settings.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CompareError {
    /// Build a [`CompareError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CompareError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CompareError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`CompareError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
