use cgmath::{Matrix4, Vector3};

use crate::backend::RenderBackend;
use crate::handles::ShaderProgramHandle;

/// Typed setters for one program's uniforms. The location is resolved by
/// name on every call; a name the linked program does not use resolves to
/// the backend's no-op location and the call does nothing, since shader
/// variants legitimately omit uniforms.
pub struct UniformBinder<'a, B: RenderBackend> {
    backend: &'a B,
    program: ShaderProgramHandle<B>,
}

impl<'a, B: RenderBackend> UniformBinder<'a, B> {
    pub fn new(backend: &'a B, program: ShaderProgramHandle<B>) -> Self {
        Self { backend, program }
    }

    pub fn set_bool(&self, name: &str, value: bool) {
        self.backend.set_uniform_bool(self.program.id, name, value);
    }

    pub fn set_int(&self, name: &str, value: i32) {
        self.backend.set_uniform_int(self.program.id, name, value);
    }

    pub fn set_float(&self, name: &str, value: f32) {
        self.backend.set_uniform_float(self.program.id, name, value);
    }

    pub fn set_vec3(&self, name: &str, value: Vector3<f32>) {
        self.backend.set_uniform_vec3(self.program.id, name, value);
    }

    pub fn set_mat4(&self, name: &str, value: Matrix4<f32>) {
        self.backend.set_uniform_mat4(self.program.id, name, value);
    }

    /// Matrix palette upload, e.g. the per-draw bone matrices of a skinned
    /// mesh.
    pub fn set_mat4_array(&self, name: &str, value: &[Matrix4<f32>]) {
        self.backend
            .set_uniform_mat4_array(self.program.id, name, value);
    }
}
