use crate::{
    foundation::{
        core::{Fps, Vec3},
        error::{VatError, VatResult},
    },
    rig::source::{ClipDescriptor, RigInstance},
};

/// Drives one [`RigInstance`] through a clip at a fixed step of `1 / fps` seconds.
///
/// Time only moves forward through [`FrameSampler::step`], so sampled frames are spaced exactly
/// one step apart regardless of how long the caller takes between calls.
pub struct FrameSampler {
    instance: Box<dyn RigInstance>,
    fps: Fps,
    scratch: Vec<Vec3>,
    clip: Option<String>,
    elapsed_secs: f32,
}

impl FrameSampler {
    pub fn new(instance: Box<dyn RigInstance>, fps: Fps) -> Self {
        let scratch = Vec::with_capacity(instance.vertex_count());
        Self {
            instance,
            fps,
            scratch,
            clip: None,
            elapsed_secs: 0.0,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.instance.vertex_count()
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn current_clip(&self) -> Option<&str> {
        self.clip.as_deref()
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed_secs
    }

    /// Play `clip` from its first frame on the base layer.
    pub fn start_clip(&mut self, clip: &ClipDescriptor) -> VatResult<()> {
        self.instance.play(&clip.name, 0, 0.0)?;
        self.clip = Some(clip.name.clone());
        self.elapsed_secs = 0.0;
        Ok(())
    }

    /// Zero-length tick that makes the rig evaluate the pose set by `start_clip`.
    pub fn prime(&mut self) -> VatResult<()> {
        self.instance.advance(0.0)
    }

    /// Advance exactly one capture step.
    pub fn step(&mut self) -> VatResult<()> {
        let dt = self.fps.frame_duration_secs();
        self.instance.advance(dt)?;
        self.elapsed_secs += dt;
        Ok(())
    }

    /// Deformed positions of the current pose.
    pub fn sample(&mut self) -> VatResult<&[Vec3]> {
        if self.clip.is_none() {
            return Err(VatError::rig("sample requested before a clip was started"));
        }
        self.instance.sample_deformed_vertices(&mut self.scratch)?;
        let expected = self.instance.vertex_count();
        if self.scratch.len() != expected {
            return Err(VatError::rig(format!(
                "rig produced {} vertices, expected {expected}",
                self.scratch.len()
            )));
        }
        Ok(&self.scratch)
    }

    /// Restart `clip` and sample it `frame` capture steps in.
    pub fn sample_frame(&mut self, clip: &ClipDescriptor, frame: u32) -> VatResult<&[Vec3]> {
        self.start_clip(clip)?;
        self.prime()?;
        for _ in 0..frame {
            self.step()?;
        }
        self.sample()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rig/sampler.rs"]
mod tests;
