use std::path::Path;

use anyhow::Context as _;

use crate::foundation::{
    core::{BakeMode, ColorMode, Fps},
    error::{VatError, VatResult},
};

/// Upper bound for [`BakeSpec::optimization_iterations`].
pub const MAX_OPTIMIZATION_ITERATIONS: u8 = 8;

/// Parameters of one bake job. Immutable once a bake has started.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BakeSpec {
    pub fps: Fps,
    /// Uniform multiplier applied to positions before the `+0.5` offset.
    pub scaler: f32,
    pub color_mode: ColorMode,
    pub bake_mode: BakeMode,
    /// Clips to bake, by name. Empty selects every clip on the rig. Single mode uses the first.
    pub clips: Vec<String>,
    /// First encoded frame (Single mode).
    pub min_frame: u32,
    /// Exclusive end frame (Single mode). `None` means the clip's frame count.
    pub max_frame: Option<u32>,
    pub power_of_two: bool,
    pub optimization_iterations: u8,
}

impl Default for BakeSpec {
    fn default() -> Self {
        Self {
            fps: Fps::default(),
            scaler: 1.0,
            color_mode: ColorMode::Hdr,
            bake_mode: BakeMode::AllIndividual,
            clips: Vec::new(),
            min_frame: 0,
            max_frame: None,
            power_of_two: false,
            optimization_iterations: 4,
        }
    }
}

impl BakeSpec {
    pub fn validate(&self) -> VatResult<()> {
        if !self.scaler.is_finite() || self.scaler <= 0.0 {
            return Err(VatError::validation(format!(
                "scaler must be finite and > 0, got {}",
                self.scaler
            )));
        }
        if self.optimization_iterations > MAX_OPTIMIZATION_ITERATIONS {
            return Err(VatError::validation(format!(
                "optimization_iterations must be in 0..={MAX_OPTIMIZATION_ITERATIONS}, got {}",
                self.optimization_iterations
            )));
        }
        if self.bake_mode == BakeMode::Single
            && let Some(max) = self.max_frame
            && self.min_frame >= max
        {
            return Err(VatError::validation(format!(
                "min_frame ({}) must be < max_frame ({max})",
                self.min_frame
            )));
        }
        Ok(())
    }

    pub fn from_json_str(s: &str) -> VatResult<Self> {
        let spec: Self =
            serde_json::from_str(s).map_err(|e| VatError::serde(format!("bake spec: {e}")))?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn from_json_path(path: &Path) -> VatResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read bake spec '{}'", path.display()))?;
        Self::from_json_str(&s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/spec.rs"]
mod tests;
