//! PNG and OpenEXR serialization of [`TextureBuffer`]s.

use std::path::Path;

use anyhow::Context as _;
use exr::prelude::Text;

use crate::{
    foundation::{
        core::{ColorMode, Dimensions},
        error::{VatError, VatResult},
    },
    texture::buffer::{Rgba, TextureBuffer},
};

/// Float width of EXR channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ExrPrecision {
    #[default]
    Full,
    Half,
}

fn to_u8(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn clamp_rgba(px: Rgba) -> Rgba {
    px.map(|c| c.clamp(0.0, 1.0))
}

/// 8-bit RGBA bytes of one layer, every channel clamped to `[0,1]`.
pub fn layer_rgba8(buffer: &TextureBuffer, layer: u32) -> VatResult<Vec<u8>> {
    let pixels = buffer
        .layer(layer)
        .ok_or_else(|| VatError::export(format!("layer {layer} does not exist")))?;
    Ok(pixels.iter().flat_map(|px| px.map(to_u8)).collect())
}

#[tracing::instrument(skip(buffer), fields(dims = %buffer.dims()))]
pub fn write_png(path: &Path, buffer: &TextureBuffer, layer: u32) -> VatResult<()> {
    let data = layer_rgba8(buffer, layer)?;
    image::save_buffer_with_format(
        path,
        &data,
        buffer.width(),
        buffer.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn exr_layer_name(names: &[String], index: usize) -> Text {
    names
        .get(index)
        .and_then(|n| Text::new_or_none(n.as_str()))
        .or_else(|| Text::new_or_none(format!("layer{index}")))
        .unwrap_or_else(|| Text::from("layer"))
}

/// Write every layer of `buffer` as one OpenEXR file, one named image layer per texture layer.
///
/// `clamp` limits all channels to `[0,1]`, the behavior for LDR texture arrays.
#[tracing::instrument(skip(buffer, layer_names), fields(dims = %buffer.dims()))]
pub fn write_exr(
    path: &Path,
    buffer: &TextureBuffer,
    layer_names: &[String],
    precision: ExrPrecision,
    clamp: bool,
) -> VatResult<()> {
    use exr::prelude::*;

    let size = (buffer.width() as usize, buffer.height() as usize);
    let width = size.0;
    let pixel = move |pixels: &[Rgba], x: usize, y: usize| {
        let px = pixels[y * width + x];
        if clamp { clamp_rgba(px) } else { px }
    };

    let mut layers_f32 = Vec::new();
    let mut layers_f16 = Vec::new();
    for l in 0..buffer.layers() {
        let pixels = buffer
            .layer(l)
            .ok_or_else(|| VatError::export(format!("layer {l} does not exist")))?;
        let attributes = LayerAttributes::named(exr_layer_name(layer_names, l as usize));
        match precision {
            ExrPrecision::Full => layers_f32.push(Layer::new(
                size,
                attributes,
                Encoding::FAST_LOSSLESS,
                SpecificChannels::rgba(move |Vec2(x, y)| {
                    let [r, g, b, a] = pixel(pixels, x, y);
                    (r, g, b, a)
                }),
            )),
            ExrPrecision::Half => layers_f16.push(Layer::new(
                size,
                attributes,
                Encoding::FAST_LOSSLESS,
                SpecificChannels::rgba(move |Vec2(x, y)| {
                    let [r, g, b, a] = pixel(pixels, x, y).map(half::f16::from_f32);
                    (r, g, b, a)
                }),
            )),
        }
    }

    let attributes = ImageAttributes::new(IntegerBounds::from_dimensions(size));
    let result = match precision {
        ExrPrecision::Full => Image::from_layers(attributes, layers_f32).write().to_file(path),
        ExrPrecision::Half => Image::from_layers(attributes, layers_f16).write().to_file(path),
    };
    result.map_err(|e| VatError::export(format!("write exr '{}': {e}", path.display())))
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

/// Write `buffer` in the format named by the extension of `path`.
///
/// `.png` takes a single layer and is always 8-bit; any other extension is OpenEXR, clamped to
/// `[0,1]` when `color_mode` is LDR.
pub fn write_texture(
    path: &Path,
    buffer: &TextureBuffer,
    color_mode: ColorMode,
    layer_names: &[String],
    precision: ExrPrecision,
) -> VatResult<()> {
    if is_png(path) {
        if buffer.layers() != 1 {
            return Err(VatError::export(format!(
                "png '{}' holds one layer, texture has {}",
                path.display(),
                buffer.layers()
            )));
        }
        return write_png(path, buffer, 0);
    }
    let clamp = color_mode == ColorMode::Ldr;
    write_exr(path, buffer, layer_names, precision, clamp)
}

/// Texture read back from disk, with EXR layer names when present.
#[derive(Clone, Debug)]
pub struct LoadedTexture {
    pub buffer: TextureBuffer,
    pub color_mode: ColorMode,
    pub layer_names: Vec<String>,
}

/// Read a PNG or OpenEXR texture. PNG is 8-bit and yields an LDR buffer.
#[tracing::instrument]
pub fn load_texture(path: &Path) -> VatResult<LoadedTexture> {
    let is_exr = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("exr"));
    if is_exr { load_exr(path) } else { load_png(path) }
}

fn load_png(path: &Path) -> VatResult<LoadedTexture> {
    let img = image::open(path)
        .with_context(|| format!("open image '{}'", path.display()))?
        .to_rgba32f();
    let dims = Dimensions::new(img.width(), img.height(), 1)?;
    let pixels = img.pixels().map(|p| p.0).collect();
    Ok(LoadedTexture {
        buffer: TextureBuffer::from_pixels(dims, pixels)?,
        color_mode: ColorMode::Ldr,
        layer_names: Vec::new(),
    })
}

struct ExrPixels {
    width: usize,
    pixels: Vec<Rgba>,
}

fn load_exr(path: &Path) -> VatResult<LoadedTexture> {
    use exr::prelude::*;

    let image = read()
        .no_deep_data()
        .largest_resolution_level()
        .rgba_channels(
            |resolution, _channels: &RgbaChannels| ExrPixels {
                width: resolution.width(),
                pixels: vec![[0.0; 4]; resolution.width() * resolution.height()],
            },
            |storage: &mut ExrPixels, position, (r, g, b, a): (f32, f32, f32, f32)| {
                let i = position.y() * storage.width + position.x();
                storage.pixels[i] = [r, g, b, a];
            },
        )
        .all_layers()
        .all_attributes()
        .from_file(path)
        .map_err(|e| VatError::export(format!("read exr '{}': {e}", path.display())))?;

    let first = image
        .layer_data
        .first()
        .ok_or_else(|| VatError::export(format!("exr '{}' has no layers", path.display())))?;
    let (w, h) = (first.size.width(), first.size.height());

    let mut pixels = Vec::with_capacity(w * h * image.layer_data.len());
    let mut layer_names = Vec::with_capacity(image.layer_data.len());
    for (i, layer) in image.layer_data.iter().enumerate() {
        if layer.size.width() != w || layer.size.height() != h {
            return Err(VatError::export(format!(
                "exr '{}' layer {i} is {}x{}, expected {w}x{h}",
                path.display(),
                layer.size.width(),
                layer.size.height()
            )));
        }
        layer_names.push(
            layer
                .attributes
                .layer_name
                .as_ref()
                .map(|t| t.to_string())
                .unwrap_or_else(|| format!("layer{i}")),
        );
        pixels.extend_from_slice(&layer.channel_data.pixels.pixels);
    }

    let to_u32 = |v: usize| {
        u32::try_from(v).map_err(|_| VatError::export(format!("exr dimension {v} overflows")))
    };
    let dims = Dimensions::new(to_u32(w)?, to_u32(h)?, to_u32(layer_names.len())?)?;
    Ok(LoadedTexture {
        buffer: TextureBuffer::from_pixels(dims, pixels)?,
        color_mode: ColorMode::Hdr,
        layer_names,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/texture/codec.rs"]
mod tests;
