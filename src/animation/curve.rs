use std::path::Path;

use anyhow::Context as _;

use crate::{
    animation::ease::Ease,
    foundation::core::Vec3,
    foundation::error::{VatError, VatResult},
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurveKey {
    pub time: f32, // normalized, expected in [0,1]
    pub value: f32,
    #[serde(default)]
    pub ease: Ease, // ease applied toward next key
}

impl CurveKey {
    pub fn new(time: f32, value: f32) -> Self {
        Self {
            time,
            value,
            ease: Ease::Linear,
        }
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    fn in_range(&self) -> bool {
        (0.0..=1.0).contains(&self.time)
    }
}

/// Scalar curve over normalized time.
///
/// Only keys with `time` in `[0,1]` take part in evaluation; a curve with no usable key
/// evaluates to `0.0`. Before the first key and after the last one the boundary value holds.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Curve {
    pub keys: Vec<CurveKey>, // sorted by time
}

impl Curve {
    pub fn new(keys: Vec<CurveKey>) -> VatResult<Self> {
        let curve = Self { keys };
        curve.validate()?;
        Ok(curve)
    }

    /// Two keys `(0,0)` and `(1,0)`.
    pub fn flat() -> Self {
        Self {
            keys: vec![CurveKey::new(0.0, 0.0), CurveKey::new(1.0, 0.0)],
        }
    }

    pub fn linear(from: f32, to: f32) -> Self {
        Self {
            keys: vec![CurveKey::new(0.0, from), CurveKey::new(1.0, to)],
        }
    }

    pub fn constant(value: f32) -> Self {
        Self {
            keys: vec![CurveKey::new(0.0, value)],
        }
    }

    pub fn validate(&self) -> VatResult<()> {
        if self
            .keys
            .iter()
            .any(|k| !k.time.is_finite() || !k.value.is_finite())
        {
            return Err(VatError::validation("curve keys must be finite"));
        }
        if !self.keys.windows(2).all(|w| w[0].time <= w[1].time) {
            return Err(VatError::validation("curve keys must be sorted by time"));
        }
        Ok(())
    }

    /// True when at least one key lies outside `[0,1]` and is therefore ignored.
    pub fn has_out_of_range_keys(&self) -> bool {
        self.keys.iter().any(|k| !k.in_range())
    }

    fn usable_keys(&self) -> &[CurveKey] {
        let start = self.keys.partition_point(|k| k.time < 0.0);
        let end = self.keys.partition_point(|k| k.time <= 1.0);
        if start >= end {
            return &[];
        }
        &self.keys[start..end]
    }

    pub fn evaluate(&self, t: f32) -> f32 {
        let keys = self.usable_keys();
        let Some(first) = keys.first() else {
            return 0.0;
        };

        let idx = keys.partition_point(|k| k.time <= t);
        if idx == 0 {
            return first.value;
        }
        if idx >= keys.len() {
            return keys[keys.len() - 1].value;
        }

        let a = &keys[idx - 1];
        let b = &keys[idx];
        let span = b.time - a.time;
        if span <= 0.0 {
            return a.value;
        }

        let te = a.ease.apply((t - a.time) / span);
        a.value + (b.value - a.value) * te
    }
}

/// One curve per axis.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AxisCurves {
    pub x: Curve,
    pub y: Curve,
    pub z: Curve,
}

impl AxisCurves {
    pub fn evaluate(&self, t: f32) -> Vec3 {
        Vec3::new(self.x.evaluate(t), self.y.evaluate(t), self.z.evaluate(t))
    }

    fn iter(&self) -> impl Iterator<Item = &Curve> {
        [&self.x, &self.y, &self.z].into_iter()
    }

    fn reset(&mut self) {
        self.x = Curve::flat();
        self.y = Curve::flat();
        self.z = Curve::flat();
    }
}

/// Nine curves driving the post-bake texture transform.
///
/// Rotation is Euler degrees; scale is an offset from `1.0`, so all-zero curves are the identity.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TransformCurves {
    pub translation: AxisCurves,
    pub rotation: AxisCurves,
    pub scale: AxisCurves,
}

/// Evaluated transform for one time sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformSample {
    pub translation: Vec3,
    pub rotation_deg: Vec3,
    pub scale_offset: Vec3,
}

impl TransformCurves {
    pub fn from_json_path(path: &Path) -> VatResult<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("read transform curves '{}'", path.display()))?;
        let curves: Self = serde_json::from_slice(&data)
            .map_err(|e| VatError::serde(format!("transform curves: {e}")))?;
        curves.validate()?;
        Ok(curves)
    }

    /// Set every curve back to the flat `(0,0),(1,0)` pair.
    pub fn reset(&mut self) {
        self.translation.reset();
        self.rotation.reset();
        self.scale.reset();
    }

    pub fn curves(&self) -> impl Iterator<Item = &Curve> {
        self.translation
            .iter()
            .chain(self.rotation.iter())
            .chain(self.scale.iter())
    }

    pub fn validate(&self) -> VatResult<()> {
        self.curves().try_for_each(Curve::validate)
    }

    pub fn has_out_of_range_keys(&self) -> bool {
        self.curves().any(Curve::has_out_of_range_keys)
    }

    pub fn sample(&self, t: f32) -> TransformSample {
        TransformSample {
            translation: self.translation.evaluate(t),
            rotation_deg: self.rotation.evaluate(t),
            scale_offset: self.scale.evaluate(t),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/curve.rs"]
mod tests;
