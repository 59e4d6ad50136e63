//! Companion UV layout for baked textures.
//!
//! Vertex `i` is stored at texel index `i` of every frame, so a shader finds its column by reading
//! `u` from the generated channel. `v` is left as it was.

use crate::{
    diagnostics::conditions::{Condition, ConditionSet},
    foundation::{
        core::{UvChannel, Vec2},
        error::{VatError, VatResult},
    },
    mesh::model::Mesh,
};

/// Per-vertex UVs for `vertex_count` vertices.
///
/// `combine == false` gives `u = i`; `combine == true` gives `u = existing[i].u + i`. `v` comes
/// from `existing` when present and is `0` otherwise.
pub fn assign_uvs(vertex_count: usize, existing: &[Vec2], combine: bool) -> VatResult<Vec<Vec2>> {
    if !existing.is_empty() && existing.len() != vertex_count {
        return Err(VatError::validation(format!(
            "existing UVs have {} entries for {vertex_count} vertices",
            existing.len()
        )));
    }

    Ok((0..vertex_count)
        .map(|i| {
            let prev = existing.get(i).copied().unwrap_or(Vec2::ZERO);
            let u = if combine { prev.x + i as f32 } else { i as f32 };
            Vec2::new(u, prev.y)
        })
        .collect())
}

/// Clone `mesh` with positions scaled by `scale` and the index layout written into `channel`.
///
/// Normals, indices and the other channels are preserved. Raises
/// [`Condition::UvAlreadyExists`] when `channel` already held data.
#[tracing::instrument(skip(mesh, conditions), fields(mesh = %mesh.name))]
pub fn build_uv_mesh(
    mesh: &Mesh,
    channel: UvChannel,
    combine: bool,
    scale: f32,
    conditions: &mut ConditionSet,
) -> VatResult<Mesh> {
    if !scale.is_finite() {
        return Err(VatError::validation(format!(
            "mesh scale must be finite, got {scale}"
        )));
    }
    mesh.validate()?;

    let existing = mesh.uv(channel);
    conditions.set(Condition::UvAlreadyExists, !existing.is_empty());

    let uvs = assign_uvs(mesh.vertex_count(), existing, combine)?;

    let mut out = mesh.clone();
    out.name = format!("{} UV", mesh.name);
    for p in &mut out.positions {
        *p *= scale;
    }
    out.set_uv(channel, uvs);

    tracing::debug!(%channel, combine, vertices = out.vertex_count(), "uv mesh built");
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/mesh/uv.rs"]
mod tests;
