//! Shared value types and the crate error.

/// Frame, fps, dimension and mode types.
pub mod core;
/// `VatError` and `VatResult`.
pub mod error;
