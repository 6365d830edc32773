//! Test doubles: a backend that records every call instead of touching a GL
//! context, and an in-memory asset source.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use cgmath::{Matrix4, Vector3, Vector4};

use crate::backend::{MeshBuffers, RenderBackend};
use crate::data::{AssetSource, ModelData, ShaderData, ShaderStage, TextureData, Vertex};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec3([f32; 3]),
    Mat4([f32; 16]),
    Mat4Array(Vec<[f32; 16]>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    UseProgram(u32),
    SetTextureUnit(u32),
    BindTexture(u32),
    BindVertexArray(Option<u32>),
    DrawIndexed(i32),
    Uniform {
        program: u32,
        name: String,
        value: UniformValue,
    },
    ClearScreen([f32; 4]),
    SetViewport(i32, i32, i32, i32),
}

/// Records draw state mutations in order and counts successful uploads, so
/// tests can assert both the at-most-once cache discipline and the exact
/// binding sequence of a frame.
#[derive(Debug)]
pub(crate) struct MockBackend {
    next_id: Cell<u32>,
    pub(crate) calls: RefCell<Vec<Call>>,
    pub(crate) mesh_uploads: Cell<usize>,
    pub(crate) texture_uploads: Cell<usize>,
    pub(crate) shader_compiles: Cell<usize>,
    pub(crate) program_links: Cell<usize>,
    pub(crate) fail_next_link: Cell<bool>,
}

impl MockBackend {
    pub(crate) fn new() -> Self {
        Self {
            next_id: Cell::new(1),
            calls: RefCell::new(Vec::new()),
            mesh_uploads: Cell::new(0),
            texture_uploads: Cell::new(0),
            shader_compiles: Cell::new(0),
            program_links: Cell::new(0),
            fail_next_link: Cell::new(false),
        }
    }

    fn fresh_id(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn record_uniform(&self, program: u32, name: &str, value: UniformValue) {
        self.record(Call::Uniform {
            program,
            name: name.to_owned(),
            value,
        });
    }

    /// Index counts of every indexed draw, in issue order.
    pub(crate) fn draw_calls(&self) -> Vec<i32> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::DrawIndexed(count) => Some(*count),
                _ => None,
            })
            .collect()
    }

    /// Last value written to the named uniform, across all programs.
    pub(crate) fn uniform(&self, wanted: &str) -> Option<UniformValue> {
        self.calls
            .borrow()
            .iter()
            .rev()
            .find_map(|call| match call {
                Call::Uniform { name, value, .. } if name == wanted => Some(value.clone()),
                _ => None,
            })
    }
}

impl RenderBackend for MockBackend {
    type Buffer = u32;
    type VertexArray = u32;
    type Texture = u32;
    type Shader = u32;
    type Program = u32;

    fn compile_shader(&self, _stage: ShaderStage, source: &str) -> std::result::Result<u32, String> {
        if source.contains("#error") {
            return Err("0:1(1): error: unexpected token".to_owned());
        }
        self.shader_compiles.set(self.shader_compiles.get() + 1);
        Ok(self.fresh_id())
    }

    fn link_program(&self, _stages: &[u32]) -> std::result::Result<u32, String> {
        if self.fail_next_link.take() {
            return Err("error: undefined reference in stage".to_owned());
        }
        self.program_links.set(self.program_links.get() + 1);
        Ok(self.fresh_id())
    }

    fn upload_mesh(
        &self,
        _vertices: &[Vertex],
        _indices: &[u32],
    ) -> std::result::Result<MeshBuffers<Self>, String> {
        self.mesh_uploads.set(self.mesh_uploads.get() + 1);
        Ok(MeshBuffers {
            vertex_array: self.fresh_id(),
            vertex_buffer: self.fresh_id(),
            index_buffer: self.fresh_id(),
        })
    }

    fn upload_texture(
        &self,
        _width: u32,
        _height: u32,
        _pixels: &[u8],
    ) -> std::result::Result<u32, String> {
        self.texture_uploads.set(self.texture_uploads.get() + 1);
        Ok(self.fresh_id())
    }

    fn use_program(&self, program: u32) {
        self.record(Call::UseProgram(program));
    }

    fn set_texture_unit(&self, unit: u32) {
        self.record(Call::SetTextureUnit(unit));
    }

    fn bind_texture(&self, texture: u32) {
        self.record(Call::BindTexture(texture));
    }

    fn bind_vertex_array(&self, vertex_array: Option<u32>) {
        self.record(Call::BindVertexArray(vertex_array));
    }

    fn draw_indexed(&self, num_indices: i32) {
        self.record(Call::DrawIndexed(num_indices));
    }

    fn set_uniform_bool(&self, program: u32, name: &str, value: bool) {
        self.record_uniform(program, name, UniformValue::Bool(value));
    }

    fn set_uniform_int(&self, program: u32, name: &str, value: i32) {
        self.record_uniform(program, name, UniformValue::Int(value));
    }

    fn set_uniform_float(&self, program: u32, name: &str, value: f32) {
        self.record_uniform(program, name, UniformValue::Float(value));
    }

    fn set_uniform_vec3(&self, program: u32, name: &str, value: Vector3<f32>) {
        self.record_uniform(program, name, UniformValue::Vec3(value.into()));
    }

    fn set_uniform_mat4(&self, program: u32, name: &str, value: Matrix4<f32>) {
        self.record_uniform(program, name, UniformValue::Mat4(*value.as_ref()));
    }

    fn set_uniform_mat4_array(&self, program: u32, name: &str, value: &[Matrix4<f32>]) {
        let matrices = value.iter().map(|matrix| *matrix.as_ref()).collect();
        self.record_uniform(program, name, UniformValue::Mat4Array(matrices));
    }

    fn clear_screen(&self, color: Vector4<f32>) {
        self.record(Call::ClearScreen(color.into()));
    }

    fn set_viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Call::SetViewport(x, y, width, height));
    }

    fn window_size(&self) -> (u32, u32) {
        (1280, 720)
    }
}

/// Asset source backed by maps, keyed by the exact path it was seeded with.
#[derive(Default)]
pub(crate) struct MemorySource {
    models: HashMap<PathBuf, ModelData>,
    textures: HashMap<PathBuf, TextureData>,
    shaders: HashMap<PathBuf, ShaderData>,
}

impl MemorySource {
    pub(crate) fn add_model(&mut self, model: ModelData) {
        self.models.insert(model.path.clone(), model);
    }

    pub(crate) fn add_texture(&mut self, texture: TextureData) {
        self.textures.insert(texture.path.clone(), texture);
    }

    pub(crate) fn add_shader(&mut self, shader: ShaderData) {
        self.shaders.insert(shader.path.clone(), shader);
    }
}

impl AssetSource for MemorySource {
    fn model(&self, path: &Path) -> Result<ModelData> {
        self.models.get(path).cloned().ok_or(Error::MissingAsset {
            path: path.to_owned(),
        })
    }

    fn texture(&self, path: &Path) -> Result<TextureData> {
        self.textures.get(path).cloned().ok_or(Error::MissingAsset {
            path: path.to_owned(),
        })
    }

    fn shader(&self, path: &Path) -> Result<ShaderData> {
        self.shaders.get(path).cloned().ok_or(Error::MissingAsset {
            path: path.to_owned(),
        })
    }
}

pub(crate) mod fixtures {
    use std::path::PathBuf;

    use super::*;
    use crate::data::{MeshData, TextureRef, TextureRole};
    use crate::transform::Transform;

    fn vertex(x: f32, y: f32, z: f32) -> Vertex {
        Vertex {
            position: [x, y, z],
            normal: [0.0, 0.0, 1.0],
            uv: [0.0, 0.0],
            tangent: [1.0, 0.0, 0.0],
            bitangent: [0.0, 1.0, 0.0],
        }
    }

    fn triangle_mesh(textures: Vec<TextureRef>) -> MeshData {
        MeshData {
            vertices: vec![
                vertex(0.0, 0.0, 0.0),
                vertex(1.0, 0.0, 0.0),
                vertex(0.0, 1.0, 0.0),
            ],
            indices: vec![0, 1, 2],
            textures,
            transform: Transform::default(),
        }
    }

    /// One-triangle model with a single diffuse texture next to it, e.g.
    /// `model/box.obj` samples `model/box.png`.
    pub(crate) fn triangle_model(path: &str) -> ModelData {
        let path = PathBuf::from(path);
        let texture = TextureRef {
            path: path.with_extension("png"),
            role: TextureRole::Diffuse,
        };
        ModelData {
            meshes: vec![triangle_mesh(vec![texture])],
            path,
        }
    }

    /// One-triangle model without textures.
    pub(crate) fn flat_model(path: &str) -> ModelData {
        ModelData {
            path: PathBuf::from(path),
            meshes: vec![triangle_mesh(Vec::new())],
        }
    }

    /// A model whose only mesh has no geometry at all.
    pub(crate) fn model_with_empty_mesh(path: &str) -> ModelData {
        ModelData {
            path: PathBuf::from(path),
            meshes: vec![MeshData {
                vertices: Vec::new(),
                indices: Vec::new(),
                textures: Vec::new(),
                transform: Transform::default(),
            }],
        }
    }

    pub(crate) fn texture(path: &str, role: TextureRole) -> TextureData {
        TextureData {
            path: PathBuf::from(path),
            role,
            width: 2,
            height: 2,
            pixels: vec![255; 16],
        }
    }

    pub(crate) fn shader(path: &str, stage: ShaderStage) -> ShaderData {
        ShaderData {
            path: PathBuf::from(path),
            stage,
            source: "#version 330 core\nvoid main() {}\n".to_owned(),
        }
    }

    pub(crate) fn broken_shader(path: &str) -> ShaderData {
        ShaderData {
            path: PathBuf::from(path),
            stage: ShaderStage::Fragment,
            source: "#version 330 core\n#error deliberately broken\n".to_owned(),
        }
    }
}
