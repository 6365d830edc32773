//! ashen_engine
//!
//! Rendering core of a small game engine: maps on-disk asset descriptors to
//! GPU resource handles, uploads each distinct asset to the backend exactly
//! once, and defers all draw submission to a per-frame queue flushed in a
//! single pass. Window creation, asset decoding, physics and game logic are
//! external collaborators; the crate consumes pre-decoded buffers through
//! [`data::AssetSource`] and an already-current GL context through
//! [`opengl::GlBackend`].
//!
//! Modules
//! - `backend`: the `RenderBackend` trait separating the core from the
//!   graphics API
//! - `data`: decoded CPU-side asset data and the asset-source seam
//! - `error`: crate error taxonomy
//! - `handles`: opaque GPU resource handles (mesh, model, texture, shader,
//!   program)
//! - `opengl`: glow-based OpenGL backend
//! - `renderer`: draw queue, frame renderer and draw commands
//! - `resources`: path-keyed resource caches and program registry
//! - `transform`: translation/rotation/scale transforms
//! - `uniform`: typed uniform binding

pub mod backend;
pub mod data;
pub mod error;
pub mod handles;
pub mod opengl;
pub mod renderer;
pub mod resources;
pub mod transform;
pub mod uniform;

mod pipeline;

#[cfg(test)]
mod mock;

pub use backend::RenderBackend;
pub use data::{
    AssetSource, MeshData, ModelData, ShaderData, ShaderStage, TextureData, TextureRef,
    TextureRole, Vertex,
};
pub use error::{Error, ResourceKind, Result};
pub use handles::{MeshHandle, ModelHandle, ShaderHandle, ShaderProgramHandle, TextureHandle};
pub use opengl::GlBackend;
pub use renderer::{DrawCommand, EntityId, Renderer, MAX_TEXTURE_UNITS};
pub use transform::Transform;
pub use uniform::UniformBinder;
