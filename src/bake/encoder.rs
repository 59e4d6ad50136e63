use crate::{
    foundation::{
        core::Vec3,
        error::{VatError, VatResult},
    },
    texture::buffer::{Rgba, TextureBuffer},
};

/// Offset that maps model-space `[-0.5, 0.5]` onto color `[0, 1]`.
pub const ENCODE_OFFSET: f32 = 0.5;

/// Encoded color of one vertex position. Alpha is the constant weight `1.0`.
pub fn encode_position(position: Vec3, scaler: f32) -> Rgba {
    let p = position * scaler + Vec3::splat(ENCODE_OFFSET);
    [p.x, p.y, p.z, 1.0]
}

/// Inverse of [`encode_position`].
pub fn decode_position(px: Rgba, scaler: f32) -> Vec3 {
    (Vec3::new(px[0], px[1], px[2]) - Vec3::splat(ENCODE_OFFSET)) / scaler
}

/// `(x, y)` of vertex `vertex` in frame `frame` for a texture `width` pixels wide.
///
/// Frames are packed back to back along rows; a frame may straddle two rows.
pub fn pixel_coords(vertex_count: usize, width: u32, frame: u32, vertex: usize) -> (u64, u64) {
    let index = u64::from(frame) * vertex_count as u64 + vertex as u64;
    let w = u64::from(width);
    (index % w, index / w)
}

/// Packs sampled frames into one layer of a [`TextureBuffer`] and tracks range violations.
///
/// The violation flag is sticky for the lifetime of the encoder: once any channel of any frame
/// leaves `[0,1]` it stays set. Values are always written unclamped.
#[derive(Debug)]
pub struct VatEncoder {
    vertex_count: usize,
    scaler: f32,
    range_violation: bool,
}

impl VatEncoder {
    pub fn new(vertex_count: usize, scaler: f32) -> VatResult<Self> {
        if vertex_count == 0 {
            return Err(VatError::validation("encoder needs at least one vertex"));
        }
        if !scaler.is_finite() || scaler <= 0.0 {
            return Err(VatError::validation(format!(
                "scaler must be finite and > 0, got {scaler}"
            )));
        }
        Ok(Self {
            vertex_count,
            scaler,
            range_violation: false,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn scaler(&self) -> f32 {
        self.scaler
    }

    pub fn range_violation(&self) -> bool {
        self.range_violation
    }

    /// Write `vertices` as frame `frame_index` of `layer`. Returns the sticky violation flag.
    pub fn encode_frame(
        &mut self,
        buffer: &mut TextureBuffer,
        layer: u32,
        frame_index: u32,
        vertices: &[Vec3],
    ) -> VatResult<bool> {
        if vertices.len() != self.vertex_count {
            return Err(VatError::rig(format!(
                "frame {frame_index} has {} vertices, expected {}",
                vertices.len(),
                self.vertex_count
            )));
        }

        let width = buffer.width();
        let end = (u64::from(frame_index) + 1) * self.vertex_count as u64;
        let capacity = buffer.dims().layer_pixels();
        if end > capacity {
            return Err(VatError::encode(format!(
                "frame {frame_index} needs {end} pixels but layer holds {capacity} ({})",
                buffer.dims()
            )));
        }
        let pixels = buffer.layer_mut(layer).ok_or_else(|| {
            VatError::encode(format!("layer {layer} does not exist in the texture"))
        })?;

        let mut violated = false;
        for (j, v) in vertices.iter().enumerate() {
            let px = encode_position(*v, self.scaler);
            violated |= px[..3].iter().any(|c| !(0.0..=1.0).contains(c));
            let (x, y) = pixel_coords(self.vertex_count, width, frame_index, j);
            pixels[(y * u64::from(width) + x) as usize] = px;
        }

        if violated && !self.range_violation {
            tracing::warn!(frame = frame_index, "encoded position outside [0,1]");
        }
        self.range_violation |= violated;
        Ok(self.range_violation)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bake/encoder.rs"]
mod tests;
