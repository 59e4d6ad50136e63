use std::{collections::BTreeMap, path::Path, sync::Arc};

use anyhow::Context as _;

use crate::{
    foundation::{
        core::Vec3,
        error::{VatError, VatResult},
    },
    rig::source::{ClipDescriptor, RigInstance, RigSource},
};

/// JSON document describing a keyframed pose rig.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PoseRigDoc {
    pub name: String,
    #[serde(default = "default_true")]
    pub has_animator: bool,
    #[serde(default = "default_true")]
    pub has_controller: bool,
    #[serde(default)]
    pub clips: Vec<ClipDescriptor>,
    #[serde(default)]
    pub sub_objects: Vec<PoseSubObject>,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PoseSubObject {
    pub name: String,
    pub rest: Vec<Vec3>,
    /// Keyed by clip name. Clips without a track hold the rest pose.
    #[serde(default)]
    pub tracks: BTreeMap<String, PoseTrack>,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct PoseTrack {
    #[serde(default)]
    pub wrap: WrapMode,
    pub keys: Vec<PoseKey>, // sorted by time
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PoseKey {
    pub time: f32, // seconds from clip start
    pub positions: Vec<Vec3>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    /// Hold the last pose once the clip has ended.
    #[default]
    Clamp,
    /// Wrap time by the clip duration.
    Loop,
}

impl PoseTrack {
    fn pose_at(&self, time: f32, out: &mut Vec<Vec3>) {
        out.clear();
        let Some(first) = self.keys.first() else {
            return;
        };

        let idx = self.keys.partition_point(|k| k.time <= time);
        if idx == 0 {
            out.extend_from_slice(&first.positions);
            return;
        }
        if idx >= self.keys.len() {
            out.extend_from_slice(&self.keys[self.keys.len() - 1].positions);
            return;
        }

        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let span = b.time - a.time;
        if span <= 0.0 {
            out.extend_from_slice(&a.positions);
            return;
        }
        let t = (time - a.time) / span;
        out.extend(
            a.positions
                .iter()
                .zip(&b.positions)
                .map(|(pa, pb)| pa.lerp(*pb, t)),
        );
    }
}

/// Keyframed full-pose rig, the bundled [`RigSource`] used by the CLI and tests.
#[derive(Clone, Debug)]
pub struct PoseRig {
    name: String,
    has_animator: bool,
    has_controller: bool,
    clips: Vec<ClipDescriptor>,
    sub_objects: Vec<Arc<PoseSubObject>>,
}

impl PoseRig {
    pub fn from_doc(doc: PoseRigDoc) -> VatResult<Self> {
        for (i, clip) in doc.clips.iter().enumerate() {
            if !clip.duration_secs.is_finite() || clip.duration_secs < 0.0 {
                return Err(VatError::validation(format!(
                    "clip '{}' has invalid duration {}",
                    clip.name, clip.duration_secs
                )));
            }
            if doc.clips[..i].iter().any(|c| c.name == clip.name) {
                return Err(VatError::validation(format!(
                    "duplicate clip name '{}'",
                    clip.name
                )));
            }
        }

        for sub in &doc.sub_objects {
            let vc = sub.rest.len();
            for (clip_name, track) in &sub.tracks {
                if !doc.clips.iter().any(|c| &c.name == clip_name) {
                    return Err(VatError::validation(format!(
                        "sub-object '{}' has a track for unknown clip '{clip_name}'",
                        sub.name
                    )));
                }
                if !track.keys.windows(2).all(|w| w[0].time <= w[1].time) {
                    return Err(VatError::validation(format!(
                        "track '{clip_name}' on '{}' must be sorted by time",
                        sub.name
                    )));
                }
                if let Some(k) = track.keys.iter().find(|k| k.positions.len() != vc) {
                    return Err(VatError::validation(format!(
                        "pose at {}s of '{clip_name}' on '{}' has {} vertices, rest pose has {vc}",
                        k.time,
                        sub.name,
                        k.positions.len()
                    )));
                }
            }
        }

        Ok(Self {
            name: doc.name,
            has_animator: doc.has_animator,
            has_controller: doc.has_controller,
            clips: doc.clips,
            sub_objects: doc.sub_objects.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn from_json_str(s: &str) -> VatResult<Self> {
        let doc: PoseRigDoc =
            serde_json::from_str(s).map_err(|e| VatError::serde(format!("pose rig: {e}")))?;
        Self::from_doc(doc)
    }

    pub fn from_json_path(path: &Path) -> VatResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read pose rig '{}'", path.display()))?;
        Self::from_json_str(&s)
    }
}

impl RigSource for PoseRig {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_animator(&self) -> bool {
        self.has_animator
    }

    fn has_controller(&self) -> bool {
        self.has_controller
    }

    fn clips(&self) -> &[ClipDescriptor] {
        &self.clips
    }

    fn sub_object_count(&self) -> usize {
        self.sub_objects.len()
    }

    fn sub_object_name(&self, index: usize) -> Option<&str> {
        self.sub_objects.get(index).map(|s| s.name.as_str())
    }

    fn sub_object_vertex_count(&self, index: usize) -> Option<usize> {
        self.sub_objects.get(index).map(|s| s.rest.len())
    }

    fn instantiate(&self, sub_object: usize) -> VatResult<Box<dyn RigInstance>> {
        let sub = self.sub_objects.get(sub_object).ok_or_else(|| {
            VatError::rig(format!(
                "rig '{}' has no sub-object {sub_object}",
                self.name
            ))
        })?;
        Ok(Box::new(PoseRigInstance {
            sub: Arc::clone(sub),
            clips: self.clips.clone(),
            playing: None,
            time_secs: 0.0,
        }))
    }
}

struct PoseRigInstance {
    sub: Arc<PoseSubObject>,
    clips: Vec<ClipDescriptor>,
    playing: Option<usize>,
    time_secs: f32,
}

impl PoseRigInstance {
    fn local_time(&self, clip: &ClipDescriptor, track: &PoseTrack) -> f32 {
        let d = clip.duration_secs;
        match track.wrap {
            WrapMode::Clamp => self.time_secs.clamp(0.0, d),
            WrapMode::Loop if d > 0.0 => self.time_secs.rem_euclid(d),
            WrapMode::Loop => 0.0,
        }
    }
}

impl RigInstance for PoseRigInstance {
    fn vertex_count(&self) -> usize {
        self.sub.rest.len()
    }

    fn play(&mut self, clip: &str, layer: i32, normalized_time: f32) -> VatResult<()> {
        if layer != 0 {
            return Err(VatError::rig(format!(
                "pose rigs only have a base layer, got layer {layer}"
            )));
        }
        let idx = self
            .clips
            .iter()
            .position(|c| c.name == clip)
            .ok_or_else(|| VatError::rig(format!("unknown clip '{clip}'")))?;
        self.playing = Some(idx);
        self.time_secs = normalized_time * self.clips[idx].duration_secs;
        Ok(())
    }

    fn advance(&mut self, delta_secs: f32) -> VatResult<()> {
        if !delta_secs.is_finite() || delta_secs < 0.0 {
            return Err(VatError::rig(format!("invalid time step {delta_secs}")));
        }
        self.time_secs += delta_secs;
        Ok(())
    }

    fn sample_deformed_vertices(&mut self, out: &mut Vec<Vec3>) -> VatResult<()> {
        let track = self
            .playing
            .and_then(|i| self.sub.tracks.get(&self.clips[i].name).map(|t| (i, t)));
        match track {
            Some((i, track)) if !track.keys.is_empty() => {
                let t = self.local_time(&self.clips[i], track);
                track.pose_at(t, out);
            }
            _ => {
                out.clear();
                out.extend_from_slice(&self.sub.rest);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rig/pose_rig.rs"]
mod tests;
