use std::path::{Path, PathBuf};

use bytemuck::{Pod, Zeroable};

use crate::error::Result;
use crate::transform::Transform;

/// One interleaved vertex as it is uploaded to the backend. The attribute
/// slots are fixed: 0 = position, 1 = normal, 2 = UV, 3 = tangent,
/// 4 = bitangent.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

/// Material role of a texture. Not part of the cache identity; the cache may
/// relabel a shared texture when a later mesh requests a different role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureRole {
    Diffuse,
    Specular,
    Normal,
    Height,
}

impl TextureRole {
    pub const COUNT: usize = 4;

    /// Prefix of the sampler uniforms this role binds to, e.g. the second
    /// diffuse texture of a mesh becomes `texture_diffuse2`.
    pub fn uniform_prefix(&self) -> &'static str {
        match self {
            TextureRole::Diffuse => "texture_diffuse",
            TextureRole::Specular => "texture_specular",
            TextureRole::Normal => "texture_normal",
            TextureRole::Height => "texture_height",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            TextureRole::Diffuse => 0,
            TextureRole::Specular => 1,
            TextureRole::Normal => 2,
            TextureRole::Height => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// Reference from a mesh to a texture, by path, under a given role.
#[derive(Debug, Clone)]
pub struct TextureRef {
    pub path: PathBuf,
    pub role: TextureRole,
}

/// Decoded mesh: interleaved vertices, triangle-list indices, the textures it
/// samples and its offset relative to the owning model's origin.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub textures: Vec<TextureRef>,
    pub transform: Transform,
}

#[derive(Debug, Clone)]
pub struct ModelData {
    pub path: PathBuf,
    pub meshes: Vec<MeshData>,
}

/// Decoded RGBA8 image.
#[derive(Debug, Clone)]
pub struct TextureData {
    pub path: PathBuf,
    pub role: TextureRole,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Shader source text for a single stage.
#[derive(Debug, Clone)]
pub struct ShaderData {
    pub path: PathBuf,
    pub stage: ShaderStage,
    pub source: String,
}

/// Hands the renderer pre-decoded asset data on a cache miss. File I/O and
/// format parsing live behind this trait, outside the rendering core.
pub trait AssetSource {
    fn model(&self, path: &Path) -> Result<ModelData>;
    fn texture(&self, path: &Path) -> Result<TextureData>;
    fn shader(&self, path: &Path) -> Result<ShaderData>;
}
