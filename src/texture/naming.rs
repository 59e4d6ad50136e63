use std::fmt;

use crate::foundation::{
    core::Dimensions,
    error::{VatError, VatResult},
};

/// Clip segment used for texture-array files.
pub const ARRAY_SEGMENT: &str = "array";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BakeTarget {
    Clip(String),
    Array,
    StaticMesh,
}

/// Output file name of a baked texture.
///
/// - clip: `{rig}@{clip} v{vertices} f{frames} s{w}x{h}.{ext}`
/// - array: `{rig}@array v{vertices} f{maxFrames} s{w}x{h} l{layers}.{ext}`
/// - static mesh: `{mesh} v{vertices} s{w}x{h}.{ext}`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BakeFileName {
    pub rig: String,
    pub target: BakeTarget,
    pub vertex_count: usize,
    pub frame_count: u32,
    pub dims: Dimensions,
    pub extension: String,
}

fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

impl BakeFileName {
    pub fn for_clip(
        rig: &str,
        clip: &str,
        vertex_count: usize,
        frame_count: u32,
        dims: Dimensions,
        extension: &str,
    ) -> Self {
        Self {
            rig: sanitize(rig),
            target: BakeTarget::Clip(sanitize(clip)),
            vertex_count,
            frame_count,
            dims: dims.with_layers(1),
            extension: extension.to_string(),
        }
    }

    pub fn for_array(
        rig: &str,
        vertex_count: usize,
        max_frame_count: u32,
        dims: Dimensions,
        extension: &str,
    ) -> Self {
        Self {
            rig: sanitize(rig),
            target: BakeTarget::Array,
            vertex_count,
            frame_count: max_frame_count,
            dims,
            extension: extension.to_string(),
        }
    }

    pub fn for_static_mesh(
        mesh: &str,
        vertex_count: usize,
        dims: Dimensions,
        extension: &str,
    ) -> Self {
        Self {
            rig: sanitize(mesh),
            target: BakeTarget::StaticMesh,
            vertex_count,
            frame_count: 1,
            dims: dims.with_layers(1),
            extension: extension.to_string(),
        }
    }

    /// Parse a file name produced by [`fmt::Display`]. Directory components are not accepted.
    pub fn parse(name: &str) -> VatResult<Self> {
        let bad = |why: &str| {
            VatError::validation(format!("'{name}' is not a baked texture name: {why}"))
        };

        let (stem, extension) = name.rsplit_once('.').ok_or_else(|| bad("no extension"))?;
        let mut tokens: Vec<&str> = stem.split(' ').collect();

        let number = |tok: Option<&&str>, prefix: char| -> Option<u64> {
            tok.and_then(|t| t.strip_prefix(prefix))
                .and_then(|t| t.parse().ok())
        };

        let layers = match number(tokens.last(), 'l') {
            Some(l) => {
                tokens.pop();
                Some(l)
            }
            None => None,
        };

        let size = tokens
            .pop()
            .and_then(|t| t.strip_prefix('s'))
            .and_then(|t| t.split_once('x'))
            .and_then(|(w, h)| Some((w.parse::<u32>().ok()?, h.parse::<u32>().ok()?)))
            .ok_or_else(|| bad("missing s{w}x{h}"))?;

        let frames = match number(tokens.last(), 'f') {
            Some(f) => {
                tokens.pop();
                Some(f)
            }
            None => None,
        };

        let vertex_count = number(tokens.last(), 'v').ok_or_else(|| bad("missing v{count}"))?;
        tokens.pop();

        let head = tokens.join(" ");
        if head.is_empty() {
            return Err(bad("missing name"));
        }

        let to_u32 = |v: u64| u32::try_from(v).map_err(|_| bad("number out of range"));
        let dims = Dimensions::new(size.0, size.1, to_u32(layers.unwrap_or(1))?)?;
        let vertex_count = usize::try_from(vertex_count).map_err(|_| bad("number out of range"))?;

        let (rig, target, frame_count) = match (head.split_once('@'), frames) {
            (Some((rig, clip)), Some(f)) => {
                let target = if clip == ARRAY_SEGMENT && layers.is_some() {
                    BakeTarget::Array
                } else {
                    BakeTarget::Clip(clip.to_string())
                };
                (rig.to_string(), target, to_u32(f)?)
            }
            (None, None) => (head.clone(), BakeTarget::StaticMesh, 1),
            (Some(_), None) => return Err(bad("missing f{frames}")),
            (None, Some(_)) => return Err(bad("missing '@' before the clip name")),
        };

        Ok(Self {
            rig,
            target,
            vertex_count,
            frame_count,
            dims,
            extension: extension.to_string(),
        })
    }
}

impl fmt::Display for BakeFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = (self.dims.width, self.dims.height);
        match &self.target {
            BakeTarget::Clip(clip) => write!(
                f,
                "{}@{clip} v{} f{} s{w}x{h}.{}",
                self.rig, self.vertex_count, self.frame_count, self.extension
            ),
            BakeTarget::Array => write!(
                f,
                "{}@{ARRAY_SEGMENT} v{} f{} s{w}x{h} l{}.{}",
                self.rig, self.vertex_count, self.frame_count, self.dims.layers, self.extension
            ),
            BakeTarget::StaticMesh => write!(
                f,
                "{} v{} s{w}x{h}.{}",
                self.rig, self.vertex_count, self.extension
            ),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/texture/naming.rs"]
mod tests;
