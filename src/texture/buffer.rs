use crate::foundation::{
    core::Dimensions,
    error::{VatError, VatResult},
};

/// One RGBA pixel. For baked textures `R,G,B` hold an encoded position and `A` a weight.
pub type Rgba = [f32; 4];

/// Transparent black, the value every pixel holds before encoding.
pub const CLEAR: Rgba = [0.0; 4];

/// Layered grid of float RGBA pixels, row-major per layer, `y = 0` first.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureBuffer {
    dims: Dimensions,
    pixels: Vec<Rgba>,
}

impl TextureBuffer {
    /// Allocate a cleared buffer.
    pub fn new(dims: Dimensions) -> VatResult<Self> {
        let dims = Dimensions::new(dims.width, dims.height, dims.layers)?;
        let len = usize::try_from(dims.capacity()).map_err(|_| {
            VatError::validation(format!("texture {dims} is too large to allocate"))
        })?;
        Ok(Self {
            dims,
            pixels: vec![CLEAR; len],
        })
    }

    pub fn from_pixels(dims: Dimensions, pixels: Vec<Rgba>) -> VatResult<Self> {
        let dims = Dimensions::new(dims.width, dims.height, dims.layers)?;
        if pixels.len() as u64 != dims.capacity() {
            return Err(VatError::validation(format!(
                "texture {dims} needs {} pixels, got {}",
                dims.capacity(),
                pixels.len()
            )));
        }
        Ok(Self { dims, pixels })
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn width(&self) -> u32 {
        self.dims.width
    }

    pub fn height(&self) -> u32 {
        self.dims.height
    }

    pub fn layers(&self) -> u32 {
        self.dims.layers
    }

    pub fn clear(&mut self) {
        self.pixels.fill(CLEAR);
    }

    fn offset(&self, x: u32, y: u32, layer: u32) -> Option<usize> {
        if x >= self.dims.width || y >= self.dims.height || layer >= self.dims.layers {
            return None;
        }
        let per_layer = self.dims.layer_pixels() as usize;
        Some(layer as usize * per_layer + y as usize * self.dims.width as usize + x as usize)
    }

    pub fn get(&self, x: u32, y: u32, layer: u32) -> Option<Rgba> {
        self.offset(x, y, layer).map(|i| self.pixels[i])
    }

    pub fn set(&mut self, x: u32, y: u32, layer: u32, px: Rgba) -> VatResult<()> {
        let i = self.offset(x, y, layer).ok_or_else(|| {
            VatError::encode(format!(
                "pixel ({x},{y}) layer {layer} is outside {}",
                self.dims
            ))
        })?;
        self.pixels[i] = px;
        Ok(())
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn layer(&self, layer: u32) -> Option<&[Rgba]> {
        if layer >= self.dims.layers {
            return None;
        }
        let n = self.dims.layer_pixels() as usize;
        let start = layer as usize * n;
        Some(&self.pixels[start..start + n])
    }

    pub fn layer_mut(&mut self, layer: u32) -> Option<&mut [Rgba]> {
        if layer >= self.dims.layers {
            return None;
        }
        let n = self.dims.layer_pixels() as usize;
        let start = layer as usize * n;
        Some(&mut self.pixels[start..start + n])
    }

    /// True when any RGB channel lies outside `[0,1]`. Alpha is not inspected.
    pub fn has_out_of_range(&self) -> bool {
        self.pixels
            .iter()
            .any(|p| p[..3].iter().any(|c| !(0.0..=1.0).contains(c)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/texture/buffer.rs"]
mod tests;
