//! Pre-bake planning: which clips run, how many frames each encodes, and texture sizes.
//!
//! Planning never instantiates the rig, so it can be shown to the user before a bake starts.

use std::fmt;

use crate::{
    bake::sizing::{DimensionBounds, SizeOptimizer},
    config::spec::BakeSpec,
    foundation::{
        core::{BakeMode, Dimensions},
        error::{VatError, VatResult},
    },
    rig::source::{ClipDescriptor, RigSource},
};

/// Editor ticks per second assumed by [`BakePlan::estimated_bake_secs`].
const TICKS_PER_SECOND: f32 = 60.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ClipPlan {
    pub clip: ClipDescriptor,
    /// Frames the clip holds at the capture rate.
    pub clip_frames: u32,
    /// Frames advanced through, `[0, run_frames)`.
    pub run_frames: u32,
    /// First frame that is encoded; earlier frames are advanced but not written.
    pub first_encoded: u32,
    pub dims: Dimensions,
    /// Target layer (non-zero only for texture arrays).
    pub layer: u32,
}

impl ClipPlan {
    pub fn encoded_frames(&self) -> u32 {
        self.run_frames - self.first_encoded
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubObjectPlan {
    pub index: usize,
    pub name: String,
    pub vertex_count: usize,
    pub clips: Vec<ClipPlan>,
    /// Size of the shared texture in array mode (layers = clip count).
    pub array_dims: Option<Dimensions>,
}

impl SubObjectPlan {
    pub fn bounds(&self) -> Option<DimensionBounds> {
        DimensionBounds::from_dims(self.clips.iter().map(|c| c.dims))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BakePlan {
    pub rig_name: String,
    pub bake_mode: BakeMode,
    pub sub_objects: Vec<SubObjectPlan>,
    /// Selected clips that hold no whole frame at the capture rate.
    pub skipped_clips: Vec<String>,
    pub total_clip_secs: f32,
    pub total_frames: u32,
    pub estimated_bake_secs: f32,
}

/// Resolve the clip selection of `spec` against `rig`.
///
/// An empty selection means every clip; Single mode keeps only the first.
pub fn select_clips(rig: &dyn RigSource, spec: &BakeSpec) -> VatResult<Vec<ClipDescriptor>> {
    let mut selected: Vec<ClipDescriptor> = if spec.clips.is_empty() {
        rig.clips().to_vec()
    } else {
        spec.clips
            .iter()
            .map(|name| {
                rig.clip(name).cloned().ok_or_else(|| {
                    VatError::validation(format!("rig '{}' has no clip '{name}'", rig.name()))
                })
            })
            .collect::<VatResult<_>>()?
    };
    if selected.is_empty() {
        return Err(VatError::validation(format!(
            "rig '{}' has no clips to bake",
            rig.name()
        )));
    }
    if spec.bake_mode == BakeMode::Single {
        selected.truncate(1);
    }
    Ok(selected)
}

fn plan_clip(
    clip: &ClipDescriptor,
    vertex_count: usize,
    spec: &BakeSpec,
    optimizer: SizeOptimizer,
) -> VatResult<Option<ClipPlan>> {
    let clip_frames = clip.frame_count(spec.fps)?;
    let (run_frames, first_encoded) = match spec.bake_mode {
        BakeMode::Single => {
            let max = spec.max_frame.unwrap_or(clip_frames);
            if max > clip_frames {
                return Err(VatError::validation(format!(
                    "max_frame {max} exceeds the {clip_frames} frames of clip '{}'",
                    clip.name
                )));
            }
            if spec.min_frame >= max {
                return Err(VatError::validation(format!(
                    "min_frame {} must be < max_frame {max} for clip '{}'",
                    spec.min_frame, clip.name
                )));
            }
            (max, spec.min_frame)
        }
        BakeMode::AllIndividual | BakeMode::ArrayAll => (clip_frames, 0),
    };
    if run_frames == 0 {
        return Ok(None);
    }
    let dims = optimizer.compute(vertex_count, run_frames - first_encoded)?;
    Ok(Some(ClipPlan {
        clip: clip.clone(),
        clip_frames,
        run_frames,
        first_encoded,
        dims,
        layer: 0,
    }))
}

impl BakePlan {
    pub fn new(rig: &dyn RigSource, spec: &BakeSpec) -> VatResult<Self> {
        spec.validate()?;
        let clips = select_clips(rig, spec)?;
        let optimizer = SizeOptimizer::new(spec.power_of_two, spec.optimization_iterations);

        let mut skipped_clips = Vec::new();
        let mut sub_objects = Vec::with_capacity(rig.sub_object_count());
        for index in 0..rig.sub_object_count() {
            let name = rig
                .sub_object_name(index)
                .unwrap_or_else(|| rig.name())
                .to_string();
            let vertex_count = rig.sub_object_vertex_count(index).unwrap_or(0);

            let mut planned = Vec::with_capacity(clips.len());
            for clip in &clips {
                match plan_clip(clip, vertex_count, spec, optimizer)? {
                    Some(p) => planned.push(p),
                    None => {
                        if !skipped_clips.contains(&clip.name) {
                            tracing::warn!(clip = %clip.name, "clip is shorter than one frame, skipping");
                            skipped_clips.push(clip.name.clone());
                        }
                    }
                }
            }

            let array_dims = if spec.bake_mode == BakeMode::ArrayAll {
                for (layer, p) in planned.iter_mut().enumerate() {
                    p.layer = layer as u32;
                }
                DimensionBounds::from_dims(planned.iter().map(|c| c.dims))
                    .map(|b| b.max.with_layers(planned.len() as u32))
            } else {
                None
            };

            sub_objects.push(SubObjectPlan {
                index,
                name,
                vertex_count,
                clips: planned,
                array_dims,
            });
        }

        let total_clip_secs: f32 = clips.iter().map(|c| c.duration_secs).sum();
        Ok(Self {
            rig_name: rig.name().to_string(),
            bake_mode: spec.bake_mode,
            sub_objects,
            skipped_clips,
            total_clip_secs,
            total_frames: spec.fps.frames_in(total_clip_secs)?,
            estimated_bake_secs: total_clip_secs * spec.fps.get() as f32 / TICKS_PER_SECOND,
        })
    }

    pub fn animation_count(&self) -> usize {
        self.sub_objects
            .first()
            .map(|s| s.clips.len())
            .unwrap_or(0)
    }

    /// Min/max texture size across every sub-object and clip.
    pub fn bounds(&self) -> Option<DimensionBounds> {
        DimensionBounds::from_dims(
            self.sub_objects
                .iter()
                .flat_map(|s| s.clips.iter().map(|c| c.dims)),
        )
    }
}

impl fmt::Display for BakePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rig: {}", self.rig_name)?;
        writeln!(f, "Animations: {}", self.animation_count())?;
        writeln!(f, "Frames to bake: {}", self.total_frames)?;
        match (self.bake_mode, self.bounds()) {
            (_, None) => writeln!(f, "Result texture size: none")?,
            (BakeMode::Single, Some(b)) => writeln!(f, "Result texture size: {}", b.max)?,
            (_, Some(b)) => writeln!(
                f,
                "Result texture size: {} (min), {} (max)",
                b.min, b.max
            )?,
        }
        for sub in &self.sub_objects {
            writeln!(f, "  {} ({} vertices)", sub.name, sub.vertex_count)?;
            for c in &sub.clips {
                writeln!(
                    f,
                    "    {}: {} frames -> {}",
                    c.clip.name,
                    c.encoded_frames(),
                    c.dims
                )?;
            }
            if let Some(d) = sub.array_dims {
                writeln!(f, "    array: {d}")?;
            }
        }
        for name in &self.skipped_clips {
            writeln!(f, "Skipped (shorter than one frame): {name}")?;
        }
        write!(f, "Estimated bake time: {:.2} seconds", self.estimated_bake_secs)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bake/plan.rs"]
mod tests;
