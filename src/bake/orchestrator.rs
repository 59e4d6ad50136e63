//! Resumable bake of one rig sub-object.
//!
//! A [`BakeTask`] advances one slice per [`BakeTask::step`] call: the first slice opens the
//! destination, then every clip spends one slice priming the rig and one slice per frame sampled.
//! Callers interleave tasks by stepping them in turn (see [`crate::BakeScheduler`]).

use std::sync::Arc;

use crate::{
    bake::{
        encoder::VatEncoder,
        plan::{BakePlan, ClipPlan, SubObjectPlan},
    },
    config::spec::BakeSpec,
    diagnostics::conditions::{Condition, ConditionSet},
    foundation::{
        core::{BakeMode, ColorMode},
        error::{VatError, VatResult},
    },
    rig::{sampler::FrameSampler, source::RigSource},
    texture::{
        buffer::TextureBuffer,
        naming::BakeFileName,
        sink::{BakeOutput, SinkConfig, TextureSink},
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BakeState {
    Idle,
    /// Next slice plays clip `clip` from time 0 and evaluates the first pose.
    Priming { clip: usize },
    /// Next slice samples and encodes `frame` of `clip`, then advances one step.
    Sampling { clip: usize, frame: u32 },
    Finalizing,
    Done,
    Aborted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BakeProgress {
    pub clip_index: usize,
    pub clip_count: usize,
    pub frames_done: u64,
    pub frames_total: u64,
}

impl BakeProgress {
    pub fn fraction(&self) -> f32 {
        if self.frames_total == 0 {
            return 1.0;
        }
        self.frames_done as f32 / self.frames_total as f32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Pending(BakeProgress),
    Done,
    /// The destination declined the bake; nothing was allocated or sampled.
    Aborted,
}

impl StepOutcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

struct Running {
    sampler: Option<FrameSampler>,
    encoder: VatEncoder,
    buffer: Option<TextureBuffer>,
}

/// Bake of every planned clip of one sub-object.
pub struct BakeTask {
    rig: Arc<dyn RigSource>,
    plan: SubObjectPlan,
    bake_mode: BakeMode,
    color_mode: ColorMode,
    spec: BakeSpec,
    state: BakeState,
    running: Option<Running>,
    conditions: ConditionSet,
    frames_done: u64,
    outputs_written: usize,
}

impl BakeTask {
    /// Plan a bake of sub-object `sub_object`. Nothing is instantiated until the first step.
    pub fn new(rig: Arc<dyn RigSource>, sub_object: usize, spec: BakeSpec) -> VatResult<Self> {
        let plan = BakePlan::new(rig.as_ref(), &spec)?;
        let sub = plan
            .sub_objects
            .into_iter()
            .nth(sub_object)
            .ok_or_else(|| {
                VatError::validation(format!(
                    "rig '{}' has no sub-object {sub_object}",
                    rig.name()
                ))
            })?;
        Self::from_plan(rig, sub, spec)
    }

    /// One task per sub-object of `rig`.
    pub fn for_each_sub_object(rig: Arc<dyn RigSource>, spec: &BakeSpec) -> VatResult<Vec<Self>> {
        let plan = BakePlan::new(rig.as_ref(), spec)?;
        plan.sub_objects
            .into_iter()
            .map(|sub| Self::from_plan(Arc::clone(&rig), sub, spec.clone()))
            .collect()
    }

    fn from_plan(rig: Arc<dyn RigSource>, plan: SubObjectPlan, spec: BakeSpec) -> VatResult<Self> {
        if plan.clips.is_empty() {
            return Err(VatError::validation(format!(
                "nothing to bake for '{}': every selected clip is shorter than one frame",
                plan.name
            )));
        }
        Ok(Self {
            rig,
            bake_mode: spec.bake_mode,
            color_mode: spec.color_mode,
            plan,
            spec,
            state: BakeState::Idle,
            running: None,
            conditions: ConditionSet::new(),
            frames_done: 0,
            outputs_written: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.plan.name
    }

    pub fn state(&self) -> BakeState {
        self.state
    }

    pub fn plan(&self) -> &SubObjectPlan {
        &self.plan
    }

    pub fn conditions(&self) -> &ConditionSet {
        &self.conditions
    }

    pub fn range_violation(&self) -> bool {
        self.conditions.has(Condition::PixelOutOfRange)
    }

    pub fn outputs_written(&self) -> usize {
        self.outputs_written
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, BakeState::Done | BakeState::Aborted)
    }

    fn frames_total(&self) -> u64 {
        self.plan
            .clips
            .iter()
            .map(|c| u64::from(c.run_frames))
            .sum()
    }

    fn progress(&self, clip_index: usize) -> BakeProgress {
        BakeProgress {
            clip_index,
            clip_count: self.plan.clips.len(),
            frames_done: self.frames_done,
            frames_total: self.frames_total(),
        }
    }

    fn expected_outputs(&self) -> usize {
        match self.bake_mode {
            BakeMode::ArrayAll => 1,
            BakeMode::Single | BakeMode::AllIndividual => self.plan.clips.len(),
        }
    }

    /// Run one slice of the bake.
    ///
    /// After an error the task is left `Aborted`; later calls return [`StepOutcome::Aborted`].
    pub fn step(&mut self, sink: &mut dyn TextureSink) -> VatResult<StepOutcome> {
        let result = self.step_inner(sink);
        if result.is_err() {
            tracing::debug!(task = %self.plan.name, "bake failed, aborting task");
            self.state = BakeState::Aborted;
            self.running = None;
        }
        result
    }

    fn step_inner(&mut self, sink: &mut dyn TextureSink) -> VatResult<StepOutcome> {
        match self.state {
            BakeState::Idle => self.open(sink),
            BakeState::Priming { clip } => self.prime(clip),
            BakeState::Sampling { clip, frame } => self.sample(sink, clip, frame),
            BakeState::Finalizing => self.finalize(sink),
            BakeState::Done => Ok(StepOutcome::Done),
            BakeState::Aborted => Ok(StepOutcome::Aborted),
        }
    }

    /// Step until the task leaves the pending states.
    #[tracing::instrument(skip(self, sink), fields(task = %self.plan.name))]
    pub fn run_to_completion(&mut self, sink: &mut dyn TextureSink) -> VatResult<StepOutcome> {
        loop {
            let outcome = self.step(sink)?;
            if !outcome.is_pending() {
                return Ok(outcome);
            }
        }
    }

    fn open(&mut self, sink: &mut dyn TextureSink) -> VatResult<StepOutcome> {
        let cfg = SinkConfig {
            rig_name: self.plan.name.clone(),
            color_mode: self.color_mode,
            bake_mode: self.bake_mode,
            expected_outputs: self.expected_outputs(),
        };
        if !sink.begin(&cfg)? {
            tracing::warn!(task = %self.plan.name, "destination declined, bake cancelled");
            self.state = BakeState::Aborted;
            return Ok(StepOutcome::Aborted);
        }

        let buffer = match self.plan.array_dims {
            Some(dims) => Some(TextureBuffer::new(dims)?),
            None => None,
        };
        self.running = Some(Running {
            sampler: None,
            encoder: VatEncoder::new(self.plan.vertex_count, self.spec.scaler)?,
            buffer,
        });

        tracing::debug!(task = %self.plan.name, clips = self.plan.clips.len(), "bake started");
        self.state = BakeState::Priming { clip: 0 };
        Ok(StepOutcome::Pending(self.progress(0)))
    }

    fn running(&mut self) -> VatResult<&mut Running> {
        self.running
            .as_mut()
            .ok_or_else(|| VatError::rig("bake task is not running"))
    }

    fn prime(&mut self, clip: usize) -> VatResult<StepOutcome> {
        let plan = self.plan.clips[clip].clone();
        let array = self.plan.array_dims.is_some();

        // every clip runs on a fresh instance
        let instance = self.rig.instantiate(self.plan.index)?;
        if instance.vertex_count() != self.plan.vertex_count {
            return Err(VatError::rig(format!(
                "instance of '{}' has {} vertices, planned for {}",
                self.plan.name,
                instance.vertex_count(),
                self.plan.vertex_count
            )));
        }
        let mut sampler = FrameSampler::new(instance, self.spec.fps);
        sampler.start_clip(&plan.clip)?;
        sampler.prime()?;

        let running = self.running()?;
        if !array {
            running.buffer = Some(TextureBuffer::new(plan.dims)?);
        }
        running.sampler = Some(sampler);

        tracing::debug!(
            clip = %plan.clip.name,
            frames = plan.run_frames,
            dims = %plan.dims,
            "clip primed"
        );
        self.state = BakeState::Sampling { clip, frame: 0 };
        Ok(StepOutcome::Pending(self.progress(clip)))
    }

    fn sample(
        &mut self,
        sink: &mut dyn TextureSink,
        clip: usize,
        frame: u32,
    ) -> VatResult<StepOutcome> {
        let plan = &self.plan.clips[clip];
        let (first_encoded, run_frames, layer) = (plan.first_encoded, plan.run_frames, plan.layer);

        let running = self
            .running
            .as_mut()
            .ok_or_else(|| VatError::rig("bake task is not running"))?;
        let sampler = running
            .sampler
            .as_mut()
            .ok_or_else(|| VatError::rig("clip was not primed"))?;
        if frame >= first_encoded {
            let buffer = running
                .buffer
                .as_mut()
                .ok_or_else(|| VatError::encode("no texture allocated for clip"))?;
            let vertices = sampler.sample()?;
            running
                .encoder
                .encode_frame(buffer, layer, frame - first_encoded, vertices)?;
        }
        sampler.step()?;
        let violated = running.encoder.range_violation();
        self.conditions.set(Condition::PixelOutOfRange, violated);
        self.frames_done += 1;

        let next = frame + 1;
        self.state = if next < run_frames {
            BakeState::Sampling { clip, frame: next }
        } else {
            self.finish_clip(sink, clip)?;
            if clip + 1 < self.plan.clips.len() {
                BakeState::Priming { clip: clip + 1 }
            } else {
                BakeState::Finalizing
            }
        };
        Ok(StepOutcome::Pending(self.progress(clip)))
    }

    fn output_name(&self, plan: &ClipPlan) -> BakeFileName {
        BakeFileName::for_clip(
            &self.plan.name,
            &plan.clip.name,
            self.plan.vertex_count,
            plan.encoded_frames(),
            plan.dims,
            self.color_mode.extension(),
        )
    }

    fn finish_clip(&mut self, sink: &mut dyn TextureSink, clip: usize) -> VatResult<()> {
        if self.plan.array_dims.is_some() {
            return Ok(());
        }
        let plan = &self.plan.clips[clip];
        let name = self.output_name(plan);
        let layer_names = vec![plan.clip.name.clone()];
        let range_violation = self.range_violation();
        let texture = self
            .running()?
            .buffer
            .take()
            .ok_or_else(|| VatError::encode("no texture allocated for clip"))?;

        tracing::info!(file = %name, "clip baked");
        sink.write(BakeOutput {
            name,
            texture,
            color_mode: self.color_mode,
            layer_names,
            range_violation,
        })?;
        self.outputs_written += 1;
        Ok(())
    }

    fn finalize(&mut self, sink: &mut dyn TextureSink) -> VatResult<StepOutcome> {
        if let Some(dims) = self.plan.array_dims {
            let max_frames = self
                .plan
                .clips
                .iter()
                .map(ClipPlan::encoded_frames)
                .max()
                .unwrap_or(0);
            let name = BakeFileName::for_array(
                &self.plan.name,
                self.plan.vertex_count,
                max_frames,
                dims,
                "exr",
            );
            let layer_names = self.plan.clips.iter().map(|c| c.clip.name.clone()).collect();
            let range_violation = self.range_violation();
            let texture = self
                .running()?
                .buffer
                .take()
                .ok_or_else(|| VatError::encode("no texture allocated for array"))?;

            tracing::info!(file = %name, "array baked");
            sink.write(BakeOutput {
                name,
                texture,
                color_mode: self.color_mode,
                layer_names,
                range_violation,
            })?;
            self.outputs_written += 1;
        }

        sink.end()?;
        self.running = None;
        self.state = BakeState::Done;
        tracing::debug!(task = %self.plan.name, outputs = self.outputs_written, "bake finished");
        Ok(StepOutcome::Done)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bake/orchestrator.rs"]
mod tests;
