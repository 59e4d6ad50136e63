//! Texture buffers and their way in and out of the process.

/// Float RGBA pixel storage with optional layers.
pub mod buffer;
/// PNG and EXR export and import.
pub mod codec;
/// Baked texture file names.
pub mod naming;
/// Destinations for finished textures.
pub mod sink;
/// Curve-driven post-bake transform.
pub mod transform;
