use crate::foundation::{
    core::{Fps, Vec3},
    error::VatResult,
};

/// Name and length of one playable animation clip.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClipDescriptor {
    pub name: String,
    pub duration_secs: f32,
}

impl ClipDescriptor {
    pub fn new(name: impl Into<String>, duration_secs: f32) -> Self {
        Self {
            name: name.into(),
            duration_secs,
        }
    }

    /// Frames captured at `fps`, truncating any partial trailing frame.
    pub fn frame_count(&self, fps: Fps) -> VatResult<u32> {
        fps.frames_in(self.duration_secs)
    }
}

/// A rig that can be baked: a named container of skinned sub-objects sharing one clip list.
///
/// Implementations are read-only descriptions; all mutable playback state lives in the
/// [`RigInstance`] values returned by [`RigSource::instantiate`], so concurrent bakes of the same
/// rig never share state.
pub trait RigSource: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the rig carries an animation player at all.
    fn has_animator(&self) -> bool {
        true
    }

    /// Whether the animation player has a clip controller assigned.
    fn has_controller(&self) -> bool {
        true
    }

    fn clips(&self) -> &[ClipDescriptor];

    /// Number of independently bakeable skinned sub-objects.
    fn sub_object_count(&self) -> usize;

    fn sub_object_name(&self, index: usize) -> Option<&str>;

    fn sub_object_vertex_count(&self, index: usize) -> Option<usize>;

    /// Create a fresh playable instance of one sub-object, posed at time 0.
    fn instantiate(&self, sub_object: usize) -> VatResult<Box<dyn RigInstance>>;

    fn clip(&self, name: &str) -> Option<&ClipDescriptor> {
        self.clips().iter().find(|c| c.name == name)
    }
}

/// Mutable playback state of one sub-object.
pub trait RigInstance: Send {
    fn vertex_count(&self) -> usize;

    /// Start `clip` on `layer` at `normalized_time` (0 = clip start, 1 = clip end).
    fn play(&mut self, clip: &str, layer: i32, normalized_time: f32) -> VatResult<()>;

    /// Advance playback by `delta_secs`. A zero delta forces evaluation of the current pose.
    fn advance(&mut self, delta_secs: f32) -> VatResult<()>;

    /// Replace `out` with the deformed vertex positions of the current pose.
    fn sample_deformed_vertices(&mut self, out: &mut Vec<Vec3>) -> VatResult<()>;
}
