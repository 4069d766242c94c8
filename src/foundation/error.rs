/// Convenience result type used across the crate.
pub type SlipResult<T> = Result<T, SlipError>;

/// Top-level error taxonomy for the locator slip flow.
#[derive(thiserror::Error, Debug)]
pub enum SlipError {
    /// Invalid user-provided or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The remote endpoint rejected the slip or could not be reached.
    #[error("submission error: {0}")]
    Submission(String),

    /// Errors while laying out, rasterizing or encoding the receipt.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while writing the receipt file.
    #[error("export error: {0}")]
    Export(String),

    /// Errors while reading or parsing configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlipError {
    /// Build a [`SlipError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SlipError::Submission`] value.
    pub fn submission(msg: impl Into<String>) -> Self {
        Self::Submission(msg.into())
    }

    /// Build a [`SlipError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`SlipError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`SlipError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
