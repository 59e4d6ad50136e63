use crate::{
    bake::{encoder::VatEncoder, sizing::SizeOptimizer},
    diagnostics::conditions::{Condition, ConditionSet},
    foundation::{
        core::{ColorMode, Dimensions},
        error::{VatError, VatResult},
    },
    mesh::model::Mesh,
    texture::{buffer::TextureBuffer, naming::BakeFileName, sink::BakeOutput},
};

/// Power-of-two dimensions holding one frame of `vertex_count` vertices.
pub fn static_mesh_dimensions(vertex_count: usize) -> VatResult<Dimensions> {
    SizeOptimizer::new(true, 0).compute(vertex_count, 1)
}

/// Bake the rest pose of `mesh` as a single frame.
#[tracing::instrument(skip(mesh, conditions), fields(mesh = %mesh.name))]
pub fn bake_static_mesh(
    mesh: &Mesh,
    scaler: f32,
    color_mode: ColorMode,
    conditions: &mut ConditionSet,
) -> VatResult<BakeOutput> {
    mesh.validate()?;
    if mesh.positions.is_empty() {
        conditions.set(Condition::MissingMesh, true);
        return Err(VatError::validation(format!(
            "mesh '{}' has no vertices",
            mesh.name
        )));
    }
    conditions.set(Condition::MissingMesh, false);

    let vc = mesh.vertex_count();
    let dims = static_mesh_dimensions(vc)?;
    let mut texture = TextureBuffer::new(dims)?;
    let mut encoder = VatEncoder::new(vc, scaler)?;
    let range_violation = encoder.encode_frame(&mut texture, 0, 0, &mesh.positions)?;
    conditions.set(Condition::PixelOutOfRange, range_violation);

    let name = BakeFileName::for_static_mesh(&mesh.name, vc, dims, color_mode.extension());
    tracing::debug!(%name, "static mesh baked");
    Ok(BakeOutput {
        name,
        texture,
        color_mode,
        layer_names: vec![mesh.name.clone()],
        range_violation,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/mesh/static_bake.rs"]
mod tests;
