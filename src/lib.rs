//! vatbake bakes vertex animation textures.
//!
//! Every frame of an animated mesh is sampled at a fixed rate and its vertex positions are written
//! as RGB texels, vertex after vertex and frame after frame. The crate is organized around a
//! resumable bake:
//!
//! - Load a rig ([`PoseRig`] or any [`RigSource`]) and a [`BakeSpec`]
//! - Check it with [`check_bake_preconditions`] and inspect the [`BakePlan`]
//! - Drive one [`BakeTask`] per sub-object, alone or through a [`BakeScheduler`], into a
//!   [`TextureSink`]
//!
//! Companion tools build the UV mesh that reads the texture back ([`build_uv_mesh`]), bake a
//! static mesh ([`bake_static_mesh`]) and reshape a baked texture over time
//! ([`transform_texture`]).
#![forbid(unsafe_code)]

/// Keyframed curves.
pub mod animation;
/// Sizing, encoding and bake orchestration.
pub mod bake;
/// Bake configuration.
pub mod config;
/// Advisory conditions.
pub mod diagnostics;
/// Core value types and errors.
pub mod foundation;
/// Mesh documents, UV layout and static bakes.
pub mod mesh;
/// Rig traits, the pose rig and frame sampling.
pub mod rig;
/// Texture buffers, naming, codecs, sinks and the transformer.
pub mod texture;

pub use crate::foundation::core::{
    BakeMode, ColorMode, Dimensions, Fps, Quat, UvChannel, Vec2, Vec3,
};
pub use crate::foundation::error::{VatError, VatResult};

pub use crate::animation::curve::{AxisCurves, Curve, CurveKey, TransformCurves};
pub use crate::animation::ease::Ease;
pub use crate::bake::encoder::{VatEncoder, decode_position, encode_position};
pub use crate::bake::orchestrator::{BakeProgress, BakeState, BakeTask, StepOutcome};
pub use crate::bake::plan::BakePlan;
pub use crate::bake::scheduler::{BakeResult, BakeScheduler};
pub use crate::bake::sizing::SizeOptimizer;
pub use crate::config::spec::BakeSpec;
pub use crate::diagnostics::conditions::{
    Condition, ConditionSet, Severity, check_bake_preconditions,
};
pub use crate::mesh::model::Mesh;
pub use crate::mesh::static_bake::bake_static_mesh;
pub use crate::mesh::uv::{assign_uvs, build_uv_mesh};
pub use crate::rig::pose_rig::PoseRig;
pub use crate::rig::sampler::FrameSampler;
pub use crate::rig::source::{ClipDescriptor, RigInstance, RigSource};
pub use crate::texture::buffer::TextureBuffer;
pub use crate::texture::codec::{ExrPrecision, LoadedTexture, load_texture, write_texture};
pub use crate::texture::naming::BakeFileName;
pub use crate::texture::sink::{BakeOutput, DirectorySink, InMemorySink, SinkConfig, TextureSink};
pub use crate::texture::transform::{TransformOptions, transform_texture};
