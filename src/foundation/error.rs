/// Convenience result type used across vatbake.
pub type VatResult<T> = Result<T, VatError>;

/// Top-level error taxonomy used by baking APIs.
///
/// Advisory conditions (missing inputs, out-of-range pixels) are not errors; they live in
/// [`crate::ConditionSet`].
#[derive(thiserror::Error, Debug)]
pub enum VatError {
    /// Invalid user-provided configuration or data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The rig/animation source failed to play, advance or sample.
    #[error("rig error: {0}")]
    Rig(String),

    /// A frame could not be packed into its texture buffer.
    #[error("encode error: {0}")]
    Encode(String),

    /// Image serialization or output writing failed.
    #[error("export error: {0}")]
    Export(String),

    /// Errors when serializing or deserializing JSON documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VatError {
    /// Build a [`VatError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`VatError::Rig`] value.
    pub fn rig(msg: impl Into<String>) -> Self {
        Self::Rig(msg.into())
    }

    /// Build a [`VatError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`VatError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`VatError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
