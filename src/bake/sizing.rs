//! Texture sizing for baked clips.
//!
//! Without power-of-two optimization a clip maps to a `vertexCount x frameCount` texture. With it,
//! the search starts from the smallest power-of-two square around `sqrt(vertexCount * frameCount)`
//! and repeatedly trades width for height while the texture still covers every pixel.

use crate::foundation::{
    core::Dimensions,
    error::{VatError, VatResult},
};

/// Largest texture side most GPU pipelines accept; bigger results are logged, not rejected.
pub const MAX_RECOMMENDED_SIDE: u32 = 16_384;

/// Smallest power of two `>= n` (1 for `n == 0`).
pub fn next_power_of_two(n: u64) -> u64 {
    n.max(1).next_power_of_two()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeOptimizer {
    pub power_of_two: bool,
    pub iterations: u8,
}

impl SizeOptimizer {
    pub fn new(power_of_two: bool, iterations: u8) -> Self {
        Self {
            power_of_two,
            iterations,
        }
    }

    /// Dimensions for one clip of `frame_count` frames over `vertex_count` vertices.
    pub fn compute(self, vertex_count: usize, frame_count: u32) -> VatResult<Dimensions> {
        compute_dimensions(vertex_count, frame_count, self.power_of_two, self.iterations)
    }
}

pub fn compute_dimensions(
    vertex_count: usize,
    frame_count: u32,
    power_of_two: bool,
    iterations: u8,
) -> VatResult<Dimensions> {
    if vertex_count == 0 || frame_count == 0 {
        return Err(VatError::validation(format!(
            "cannot size a texture for {vertex_count} vertices x {frame_count} frames"
        )));
    }
    let vc = u32::try_from(vertex_count).map_err(|_| {
        VatError::validation(format!("vertex count {vertex_count} exceeds texture limits"))
    })?;

    let dims = if power_of_two {
        optimized_pot(u64::from(vc) * u64::from(frame_count), iterations)?
    } else {
        Dimensions::new(vc, frame_count, 1)?
    };

    if dims.width > MAX_RECOMMENDED_SIDE || dims.height > MAX_RECOMMENDED_SIDE {
        tracing::warn!(
            width = dims.width,
            height = dims.height,
            "texture exceeds {MAX_RECOMMENDED_SIDE} px on one side"
        );
    }
    Ok(dims)
}

fn optimized_pot(pixel_count: u64, iterations: u8) -> VatResult<Dimensions> {
    let overflow =
        || VatError::validation(format!("{pixel_count} pixels exceed power-of-two texture limits"));
    let area = |w: u64, h: u64| w.checked_mul(h).ok_or_else(overflow);
    let double = |v: u64| v.checked_mul(2).ok_or_else(overflow);

    let seed = next_power_of_two(pixel_count.isqrt());
    let mut w = seed;
    let mut h = seed;
    // floor(sqrt) can land one power below the needed square.
    while area(w, h)? < pixel_count {
        h = double(h)?;
    }

    for _ in 0..iterations {
        if w > 1 && area(w, h)? / 2 >= pixel_count {
            w /= 2;
        }
        if w > 1 && area(w / 2, double(h)?)? >= pixel_count {
            w /= 2;
            h = double(h)?;
        }
    }

    let to_u32 = |v: u64| {
        u32::try_from(v).map_err(|_| VatError::validation(format!("texture side {v} overflows")))
    };
    Dimensions::new(to_u32(w)?, to_u32(h)?, 1)
}

/// Running min/max over the per-clip dimensions of a bake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DimensionBounds {
    pub min: Dimensions,
    pub max: Dimensions,
}

impl DimensionBounds {
    pub fn from_dims<I>(dims: I) -> Option<Self>
    where
        I: IntoIterator<Item = Dimensions>,
    {
        let mut it = dims.into_iter();
        let first = it.next()?;
        Some(it.fold(
            Self {
                min: first,
                max: first,
            },
            |acc, d| Self {
                min: acc.min.min_extent(d),
                max: acc.max.max_extent(d),
            },
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bake/sizing.rs"]
mod tests;
