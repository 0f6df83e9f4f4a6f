/// Convenience result type used across Tableau.
pub type TableauResult<T> = Result<T, TableauError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Generative content never errors for missing assets or odd parameters; those degrade
/// in place. Errors are reserved for structural problems the caller must fix.
#[derive(thiserror::Error, Debug)]
pub enum TableauError {
    /// Invalid user-provided scene, table or canvas data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rasterizing or compositing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TableauError {
    /// Build a [`TableauError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TableauError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`TableauError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
