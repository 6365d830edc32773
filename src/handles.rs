use crate::backend::{MeshBuffers, RenderBackend};
use crate::data::TextureRole;
use crate::transform::Transform;

/// Backend texture id plus its material role. The id is shared by every mesh
/// referencing the same normalized path; the role is mutable metadata.
#[derive(Debug)]
pub struct TextureHandle<B: RenderBackend + ?Sized> {
    pub id: B::Texture,
    pub role: TextureRole,
}

/// Backend buffer triple for one mesh, its index count, its offset within the
/// parent model and the textures it binds. Owned by the `ModelHandle` that
/// created it; nothing is unloaded mid-run.
#[derive(Debug)]
pub struct MeshHandle<B: RenderBackend + ?Sized> {
    pub buffers: MeshBuffers<B>,
    pub num_indices: i32,
    pub transform: Transform,
    pub textures: Vec<TextureHandle<B>>,
}

/// Ordered meshes of one model, keyed in the cache by its source path.
#[derive(Debug)]
pub struct ModelHandle<B: RenderBackend + ?Sized> {
    pub meshes: Vec<MeshHandle<B>>,
}

/// A compiled single-stage shader, keyed by path, immutable after creation.
#[derive(Debug)]
pub struct ShaderHandle<B: RenderBackend + ?Sized> {
    pub id: B::Shader,
    pub stage: crate::data::ShaderStage,
}

/// A linked program, keyed by logical name rather than path.
#[derive(Debug)]
pub struct ShaderProgramHandle<B: RenderBackend + ?Sized> {
    pub id: B::Program,
}

// Handle types are generic over the backend, so the derived impls would put a
// `B: Clone`/`B: Copy` bound on the backend itself. Written out by hand to
// bound only the associated object types, which are always `Copy`.

impl<B: RenderBackend + ?Sized> Clone for TextureHandle<B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: RenderBackend + ?Sized> Copy for TextureHandle<B> {}

impl<B: RenderBackend + ?Sized> Clone for MeshHandle<B> {
    fn clone(&self) -> Self {
        Self {
            buffers: self.buffers,
            num_indices: self.num_indices,
            transform: self.transform,
            textures: self.textures.clone(),
        }
    }
}

impl<B: RenderBackend + ?Sized> Clone for ModelHandle<B> {
    fn clone(&self) -> Self {
        Self {
            meshes: self.meshes.clone(),
        }
    }
}

impl<B: RenderBackend + ?Sized> Clone for ShaderHandle<B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: RenderBackend + ?Sized> Copy for ShaderHandle<B> {}

impl<B: RenderBackend + ?Sized> Clone for ShaderProgramHandle<B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: RenderBackend + ?Sized> Copy for ShaderProgramHandle<B> {}
