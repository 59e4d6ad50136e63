//! Baking: sizing, encoding, planning and the resumable bake task.
//!
//! A [`orchestrator::BakeTask`] advances one slice per `step` and hands finished textures to a
//! [`crate::texture::sink::TextureSink`]. [`scheduler::BakeScheduler`] interleaves several tasks
//! round-robin or runs them on a thread pool.

/// Vertex position to pixel encoding.
pub mod encoder;
/// Resumable bake state machine.
pub mod orchestrator;
/// Per-clip frame counts and texture sizes computed before sampling.
pub mod plan;
/// Round-robin and thread-pool drivers for bake tasks.
pub mod scheduler;
/// Texture size heuristic.
pub mod sizing;
