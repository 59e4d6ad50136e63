use std::fmt;

use crate::foundation::error::{VatError, VatResult};

pub use glam::{Quat, Vec2, Vec3};

/// Highest capture rate accepted by [`Fps::new`].
pub const MAX_FPS: u32 = 120;

/// Capture rate in whole frames per second (1..=120).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Fps(u32);

impl Fps {
    pub fn new(fps: u32) -> VatResult<Self> {
        if fps == 0 || fps > MAX_FPS {
            return Err(VatError::validation(format!(
                "frames per second must be in 1..={MAX_FPS}, got {fps}"
            )));
        }
        Ok(Self(fps))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Fixed resampling step, `1 / fps` seconds.
    pub fn frame_duration_secs(self) -> f32 {
        1.0 / self.0 as f32
    }

    /// Whole frames captured from a clip of `secs` seconds (truncating).
    pub fn frames_in(self, secs: f32) -> VatResult<u32> {
        if !secs.is_finite() || secs <= 0.0 {
            return Ok(0);
        }
        let frames = (secs * self.0 as f32).floor();
        if frames >= u32::MAX as f32 {
            return Err(VatError::validation(format!(
                "{secs}s at {} fps exceeds the frame limit",
                self.0
            )));
        }
        Ok(frames as u32)
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self(24)
    }
}

impl TryFrom<u32> for Fps {
    type Error = VatError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Fps> for u32 {
    fn from(value: Fps) -> Self {
        value.0
    }
}

/// Texture dimensions in pixels. `layers > 1` only for texture arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
    pub layers: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32, layers: u32) -> VatResult<Self> {
        if width == 0 || height == 0 || layers == 0 {
            return Err(VatError::validation(format!(
                "dimensions must be >= 1, got {width}x{height}x{layers}"
            )));
        }
        Ok(Self {
            width,
            height,
            layers,
        })
    }

    /// Pixels in one layer.
    pub fn layer_pixels(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Pixels across all layers.
    pub fn capacity(self) -> u64 {
        self.layer_pixels() * u64::from(self.layers)
    }

    /// Component-wise maximum of width and height; layers are kept from `self`.
    pub fn max_extent(self, other: Self) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
            layers: self.layers,
        }
    }

    /// Component-wise minimum of width and height; layers are kept from `self`.
    pub fn min_extent(self, other: Self) -> Self {
        Self {
            width: self.width.min(other.width),
            height: self.height.min(other.height),
            layers: self.layers,
        }
    }

    pub fn with_layers(self, layers: u32) -> Self {
        Self { layers, ..self }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.layers > 1 {
            write!(f, "{}x{}x{}", self.width, self.height, self.layers)
        } else {
            write!(f, "{}x{}", self.width, self.height)
        }
    }
}

/// Output precision class. LDR exports clamp to `[0,1]` when written; HDR keeps raw floats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ColorMode {
    #[serde(rename = "LDR", alias = "ldr")]
    Ldr,
    #[default]
    #[serde(rename = "HDR", alias = "hdr")]
    Hdr,
}

impl ColorMode {
    /// File extension for a single (non-array) texture in this mode.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Ldr => "png",
            Self::Hdr => "exr",
        }
    }

    /// Infer the mode from an image file extension (`png` is LDR, everything else HDR).
    pub fn from_extension(ext: &str) -> Self {
        if ext.eq_ignore_ascii_case("png") {
            Self::Ldr
        } else {
            Self::Hdr
        }
    }
}

/// How clips map onto output textures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BakeMode {
    /// One clip, optionally a `[min_frame, max_frame)` sub-range.
    Single,
    /// One texture per clip.
    #[default]
    AllIndividual,
    /// One texture array, one layer per clip.
    ArrayAll,
}

/// Mesh UV channel, `0..=7`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct UvChannel(u8);

impl UvChannel {
    pub const COUNT: usize = 8;

    pub fn new(channel: u8) -> VatResult<Self> {
        if usize::from(channel) >= Self::COUNT {
            return Err(VatError::validation(format!(
                "uv channel must be in 0..=7, got {channel}"
            )));
        }
        Ok(Self(channel))
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl Default for UvChannel {
    fn default() -> Self {
        Self(1)
    }
}

impl TryFrom<u8> for UvChannel {
    type Error = VatError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UvChannel> for u8 {
    fn from(value: UvChannel) -> Self {
        value.0
    }
}

impl fmt::Display for UvChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UV{}", self.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
