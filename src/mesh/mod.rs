//! Mesh documents and the tools that work on them directly.

/// Serializable triangle mesh.
pub mod model;
/// Single-frame bake of a mesh rest pose.
pub mod static_bake;
/// Companion UV layout.
pub mod uv;
