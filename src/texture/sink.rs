use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    foundation::{
        core::{BakeMode, ColorMode},
        error::{VatError, VatResult},
    },
    texture::{
        buffer::TextureBuffer,
        codec::{ExrPrecision, write_texture},
        naming::BakeFileName,
    },
};

/// Information handed to a [`TextureSink`] before a bake touches the rig.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Rig (or sub-object) name; outputs are grouped under it.
    pub rig_name: String,
    pub color_mode: ColorMode,
    pub bake_mode: BakeMode,
    /// Number of [`BakeOutput`]s that will follow.
    pub expected_outputs: usize,
}

/// One finished texture, handed over whole.
#[derive(Debug, Clone)]
pub struct BakeOutput {
    pub name: BakeFileName,
    pub texture: TextureBuffer,
    pub color_mode: ColorMode,
    /// Clip name per layer.
    pub layer_names: Vec<String>,
    /// Whether any encoded channel fell outside `[0,1]`.
    pub range_violation: bool,
}

/// Destination for baked textures.
///
/// `begin` runs before any allocation; returning `Ok(false)` declines the bake, which then ends
/// as cancelled without calling `write` or `end`.
pub trait TextureSink: Send {
    fn begin(&mut self, cfg: &SinkConfig) -> VatResult<bool>;
    fn write(&mut self, output: BakeOutput) -> VatResult<()>;
    fn end(&mut self) -> VatResult<()>;
}

/// In-memory sink for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemorySink {
    decline: bool,
    cfg: Option<SinkConfig>,
    outputs: Vec<BakeOutput>,
    finished: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that refuses every bake.
    pub fn declining() -> Self {
        Self {
            decline: true,
            ..Self::default()
        }
    }

    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    pub fn outputs(&self) -> &[BakeOutput] {
        &self.outputs
    }

    pub fn into_outputs(self) -> Vec<BakeOutput> {
        self.outputs
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl TextureSink for InMemorySink {
    fn begin(&mut self, cfg: &SinkConfig) -> VatResult<bool> {
        self.cfg = Some(cfg.clone());
        self.outputs.clear();
        self.finished = false;
        Ok(!self.decline)
    }

    fn write(&mut self, output: BakeOutput) -> VatResult<()> {
        self.outputs.push(output);
        Ok(())
    }

    fn end(&mut self) -> VatResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Writes each output to `{root}/{rig_name}/{file name}`.
///
/// Built from an optional root so "no destination chosen" maps directly onto a declined bake.
#[derive(Debug)]
pub struct DirectorySink {
    root: Option<PathBuf>,
    precision: ExrPrecision,
    dir: Option<PathBuf>,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_selection(Some(root.into()))
    }

    pub fn from_selection(root: Option<PathBuf>) -> Self {
        Self {
            root,
            precision: ExrPrecision::Full,
            dir: None,
            written: Vec::new(),
        }
    }

    pub fn with_precision(mut self, precision: ExrPrecision) -> Self {
        self.precision = precision;
        self
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl TextureSink for DirectorySink {
    fn begin(&mut self, cfg: &SinkConfig) -> VatResult<bool> {
        let Some(root) = &self.root else {
            return Ok(false);
        };
        let dir = root.join(&cfg.rig_name);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create output dir '{}'", dir.display()))?;
        self.dir = Some(dir);
        Ok(true)
    }

    fn write(&mut self, output: BakeOutput) -> VatResult<()> {
        let dir = self
            .dir
            .as_ref()
            .ok_or_else(|| VatError::export("write called before begin"))?;
        let path = dir.join(output.name.to_string());
        write_texture(
            &path,
            &output.texture,
            output.color_mode,
            &output.layer_names,
            self.precision,
        )?;
        tracing::info!(path = %path.display(), "wrote texture");
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> VatResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/texture/sink.rs"]
mod tests;
