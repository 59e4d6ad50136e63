//! Bake configuration.

/// `BakeSpec` with defaults and validation.
pub mod spec;
