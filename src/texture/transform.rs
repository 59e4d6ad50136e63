//! Curve-driven affine transform of an already baked texture.
//!
//! Time runs along columns: column `f` is evaluated at `percent = f / height`. The encoder packs
//! vertices along rows, so this axis is not the encoder's fast axis. Each pixel is translated,
//! rotated and scaled by `1 + curve` relative to `pivot`; alpha is never touched.

use glam::EulerRot;

use crate::{
    animation::curve::{TransformCurves, TransformSample},
    diagnostics::conditions::{Condition, ConditionSet},
    foundation::{
        core::{Quat, Vec3},
        error::VatResult,
    },
    texture::buffer::{Rgba, TextureBuffer},
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Color-space point the rotation and scale act around.
    pub pivot: Vec3,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self { pivot: Vec3::ZERO }
    }
}

/// Rotation of `rotation_deg` (x, y, z Euler degrees) applied as z, then x, then y.
pub fn euler_degrees(rotation_deg: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        rotation_deg.y.to_radians(),
        rotation_deg.x.to_radians(),
        rotation_deg.z.to_radians(),
    )
}

#[derive(Clone, Copy, Debug)]
struct ColumnTransform {
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,
}

impl ColumnTransform {
    fn new(sample: TransformSample) -> Self {
        Self {
            translation: sample.translation,
            rotation: euler_degrees(sample.rotation_deg),
            scale: sample.scale_offset + Vec3::ONE,
        }
    }

    fn apply(&self, px: Rgba, pivot: Vec3) -> Rgba {
        let p = Vec3::new(px[0], px[1], px[2]) - pivot;
        let p = (self.rotation * (p + self.translation)) * self.scale + pivot;
        [p.x, p.y, p.z, px[3]]
    }
}

/// Apply `curves` to every layer of `input`, returning a new buffer.
///
/// Raises [`Condition::CurveOutOfRange`] when a curve has keys outside `[0,1]` (they are ignored)
/// and [`Condition::PixelOutOfRange`] when a result channel leaves `[0,1]`.
#[tracing::instrument(skip(input, curves, conditions), fields(dims = %input.dims()))]
pub fn transform_texture(
    input: &TextureBuffer,
    curves: &TransformCurves,
    options: TransformOptions,
    conditions: &mut ConditionSet,
) -> VatResult<TextureBuffer> {
    curves.validate()?;
    conditions.set(Condition::CurveOutOfRange, curves.has_out_of_range_keys());

    let width = input.width();
    let height = input.height() as f32;
    let columns: Vec<ColumnTransform> = (0..width)
        .map(|f| ColumnTransform::new(curves.sample(f as f32 / height)))
        .collect();

    let mut out = input.clone();
    for layer in 0..out.layers() {
        let Some(pixels) = out.layer_mut(layer) else {
            continue;
        };
        for (i, px) in pixels.iter_mut().enumerate() {
            let column = &columns[i % width as usize];
            *px = column.apply(*px, options.pivot);
        }
    }

    let out_of_range = out.has_out_of_range();
    if out_of_range {
        tracing::warn!("transformed texture has channels outside [0,1]");
    }
    conditions.set(Condition::PixelOutOfRange, out_of_range);
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/texture/transform.rs"]
mod tests;
