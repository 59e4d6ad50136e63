//! Rig abstraction and frame sampling.
//!
//! A rig hands out playable instances; the sampler drives one instance at a fixed frame rate and
//! reads back deformed vertex positions.

/// JSON keyframed pose rig.
pub mod pose_rig;
/// Fixed-rate sampling over a rig instance.
pub mod sampler;
/// `RigSource` and `RigInstance` traits.
pub mod source;
