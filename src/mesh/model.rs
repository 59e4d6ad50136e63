use std::{collections::BTreeMap, path::Path};

use anyhow::Context as _;

use crate::foundation::{
    core::{UvChannel, Vec2, Vec3},
    error::{VatError, VatResult},
};

/// Triangle mesh as exchanged with the CLI: positions plus optional normals and up to eight UV
/// channels keyed by channel index.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Mesh {
    pub name: String,
    pub positions: Vec<Vec3>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub normals: Vec<Vec3>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indices: Vec<u32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub uvs: BTreeMap<u8, Vec<Vec2>>,
}

impl Mesh {
    pub fn new(name: impl Into<String>, positions: Vec<Vec3>) -> Self {
        Self {
            name: name.into(),
            positions,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> VatResult<Self> {
        let mesh: Self =
            serde_json::from_str(json).map_err(|e| VatError::serde(format!("mesh: {e}")))?;
        mesh.validate()?;
        Ok(mesh)
    }

    pub fn from_json_path(path: &Path) -> VatResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read mesh '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> VatResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| VatError::serde(format!("mesh: {e}")))
    }

    pub fn write_json_path(&self, path: &Path) -> VatResult<()> {
        let json = self.to_json_string()?;
        std::fs::write(path, json).with_context(|| format!("write mesh '{}'", path.display()))?;
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// UVs of `channel`; empty when the channel holds no data.
    pub fn uv(&self, channel: UvChannel) -> &[Vec2] {
        self.uvs
            .get(&u8::from(channel))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn set_uv(&mut self, channel: UvChannel, uvs: Vec<Vec2>) {
        if uvs.is_empty() {
            self.uvs.remove(&u8::from(channel));
        } else {
            self.uvs.insert(u8::from(channel), uvs);
        }
    }

    pub fn validate(&self) -> VatResult<()> {
        let vc = self.vertex_count();
        if self.positions.iter().any(|p| !p.is_finite()) {
            return Err(VatError::validation(format!(
                "mesh '{}' has non-finite positions",
                self.name
            )));
        }
        if !self.normals.is_empty() && self.normals.len() != vc {
            return Err(VatError::validation(format!(
                "mesh '{}' has {} normals for {vc} vertices",
                self.name,
                self.normals.len()
            )));
        }
        for (&channel, uvs) in &self.uvs {
            UvChannel::new(channel)?;
            if uvs.len() != vc {
                return Err(VatError::validation(format!(
                    "mesh '{}' UV{channel} has {} entries for {vc} vertices",
                    self.name,
                    uvs.len()
                )));
            }
        }
        if self.indices.len() % 3 != 0 {
            return Err(VatError::validation(format!(
                "mesh '{}' index count {} is not a multiple of 3",
                self.name,
                self.indices.len()
            )));
        }
        if let Some(bad) = self.indices.iter().find(|&&i| i as usize >= vc) {
            return Err(VatError::validation(format!(
                "mesh '{}' index {bad} out of range for {vc} vertices",
                self.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mesh/model.rs"]
mod tests;
