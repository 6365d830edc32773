use cgmath::{Matrix4, Vector3, Vector4};

use crate::data::{ShaderStage, Vertex};

/// Seam between the rendering core and the graphics API.
///
/// The creation methods return the backend's diagnostic text on failure; the
/// upload pipeline wraps that into crate errors. The state methods mirror the
/// global GL state machine (active program, active texture unit, bound vertex
/// array); everything here runs on the one render thread, so implementations
/// take `&self` and need no synchronization.
pub trait RenderBackend {
    type Buffer: Copy + std::fmt::Debug;
    type VertexArray: Copy + std::fmt::Debug + PartialEq;
    type Texture: Copy + std::fmt::Debug + PartialEq;
    type Shader: Copy + std::fmt::Debug;
    type Program: Copy + std::fmt::Debug + PartialEq;

    // Resource creation.
    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<Self::Shader, String>;
    fn link_program(&self, stages: &[Self::Shader]) -> Result<Self::Program, String>;
    fn upload_mesh(&self, vertices: &[Vertex], indices: &[u32]) -> Result<MeshBuffers<Self>, String>;
    fn upload_texture(&self, width: u32, height: u32, pixels: &[u8]) -> Result<Self::Texture, String>;

    // Draw state.
    fn use_program(&self, program: Self::Program);
    fn set_texture_unit(&self, unit: u32);
    fn bind_texture(&self, texture: Self::Texture);
    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>);
    fn draw_indexed(&self, num_indices: i32);

    // Uniforms. A name the program does not use is a silent no-op.
    fn set_uniform_bool(&self, program: Self::Program, name: &str, value: bool);
    fn set_uniform_int(&self, program: Self::Program, name: &str, value: i32);
    fn set_uniform_float(&self, program: Self::Program, name: &str, value: f32);
    fn set_uniform_vec3(&self, program: Self::Program, name: &str, value: Vector3<f32>);
    fn set_uniform_mat4(&self, program: Self::Program, name: &str, value: Matrix4<f32>);
    fn set_uniform_mat4_array(&self, program: Self::Program, name: &str, value: &[Matrix4<f32>]);

    // Frame housekeeping. Buffer swapping stays with the owning window loop.
    fn clear_screen(&self, color: Vector4<f32>);
    fn set_viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn window_size(&self) -> (u32, u32);
}

/// The vertex-array/vertex-buffer/index-buffer triple backing one mesh.
#[derive(Debug)]
pub struct MeshBuffers<B: RenderBackend + ?Sized> {
    pub vertex_array: B::VertexArray,
    pub vertex_buffer: B::Buffer,
    pub index_buffer: B::Buffer,
}

impl<B: RenderBackend + ?Sized> Clone for MeshBuffers<B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: RenderBackend + ?Sized> Copy for MeshBuffers<B> {}
