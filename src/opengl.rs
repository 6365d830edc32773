use std::cell::Cell;

use cgmath::{Matrix4, Vector3, Vector4};
use glow::HasContext;

use crate::backend::{MeshBuffers, RenderBackend};
use crate::data::{ShaderStage, Vertex};

#[derive(Debug, Clone, Copy)]
struct Layout {
    index: u32,
    size: i32,
    offset: i32,
}

// Fixed interleaved layout of `Vertex`: position, normal, UV, tangent,
// bitangent, all f32.
const VERTEX_STRIDE: i32 = std::mem::size_of::<Vertex>() as i32;
const VERTEX_LAYOUT: [Layout; 5] = [
    Layout { index: 0, size: 3, offset: 0 },
    Layout { index: 1, size: 3, offset: 12 },
    Layout { index: 2, size: 2, offset: 24 },
    Layout { index: 3, size: 3, offset: 32 },
    Layout { index: 4, size: 3, offset: 44 },
];

fn shader_stage_type(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

/// OpenGL backend over an already-current [`glow::Context`]. Window and
/// context creation belong to the owning event loop, which reports the
/// framebuffer size here on resize.
pub struct GlBackend {
    context: glow::Context,
    window_size: Cell<(u32, u32)>,
}

impl GlBackend {
    pub fn new(context: glow::Context, width: u32, height: u32) -> Self {
        unsafe {
            context.enable(glow::DEPTH_TEST);
            context.depth_func(glow::LESS);
        }

        Self {
            context,
            window_size: Cell::new((width, height)),
        }
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.window_size.set((width, height));
    }

    fn uniform_location(
        &self,
        program: glow::NativeProgram,
        name: &str,
    ) -> Option<glow::NativeUniformLocation> {
        // None maps to GL's -1 location: setting an unused uniform is a no-op.
        unsafe { self.context.get_uniform_location(program, name) }
    }
}

impl RenderBackend for GlBackend {
    type Buffer = glow::NativeBuffer;
    type VertexArray = glow::NativeVertexArray;
    type Texture = glow::NativeTexture;
    type Shader = glow::NativeShader;
    type Program = glow::NativeProgram;

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<Self::Shader, String> {
        unsafe {
            let shader = self.context.create_shader(shader_stage_type(stage))?;
            self.context.shader_source(shader, source);
            self.context.compile_shader(shader);

            if !self.context.get_shader_compile_status(shader) {
                let log = self.context.get_shader_info_log(shader);
                self.context.delete_shader(shader);
                return Err(log);
            }

            Ok(shader)
        }
    }

    fn link_program(&self, stages: &[Self::Shader]) -> Result<Self::Program, String> {
        unsafe {
            let program = self.context.create_program()?;

            for &stage in stages {
                self.context.attach_shader(program, stage);
            }
            self.context.link_program(program);

            if !self.context.get_program_link_status(program) {
                let log = self.context.get_program_info_log(program);
                self.context.delete_program(program);
                return Err(log);
            }

            Ok(program)
        }
    }

    fn upload_mesh(
        &self,
        vertices: &[Vertex],
        indices: &[u32],
    ) -> Result<MeshBuffers<Self>, String> {
        unsafe {
            let vertex_array = self.context.create_vertex_array()?;
            self.context.bind_vertex_array(Some(vertex_array));

            let vertex_buffer = self.context.create_buffer()?;
            self.context.bind_buffer(glow::ARRAY_BUFFER, Some(vertex_buffer));
            self.context.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vertices),
                glow::STATIC_DRAW,
            );

            let index_buffer = self.context.create_buffer()?;
            self.context
                .bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(index_buffer));
            self.context.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(indices),
                glow::STATIC_DRAW,
            );

            for layout in VERTEX_LAYOUT {
                self.context.vertex_attrib_pointer_f32(
                    layout.index,
                    layout.size,
                    glow::FLOAT,
                    false,
                    VERTEX_STRIDE,
                    layout.offset,
                );
                self.context.enable_vertex_attrib_array(layout.index);
            }

            self.context.bind_vertex_array(None);

            Ok(MeshBuffers {
                vertex_array,
                vertex_buffer,
                index_buffer,
            })
        }
    }

    fn upload_texture(&self, width: u32, height: u32, pixels: &[u8]) -> Result<Self::Texture, String> {
        unsafe {
            let texture = self.context.create_texture()?;
            self.context.bind_texture(glow::TEXTURE_2D, Some(texture));

            self.context
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            self.context
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            self.context.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR_MIPMAP_LINEAR as i32,
            );
            self.context.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );

            self.context.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels)),
            );

            self.context.generate_mipmap(glow::TEXTURE_2D);

            Ok(texture)
        }
    }

    fn use_program(&self, program: Self::Program) {
        unsafe {
            self.context.use_program(Some(program));
        }
    }

    fn set_texture_unit(&self, unit: u32) {
        unsafe {
            self.context.active_texture(glow::TEXTURE0 + unit);
        }
    }

    fn bind_texture(&self, texture: Self::Texture) {
        unsafe {
            self.context.bind_texture(glow::TEXTURE_2D, Some(texture));
        }
    }

    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>) {
        unsafe {
            self.context.bind_vertex_array(vertex_array);
        }
    }

    fn draw_indexed(&self, num_indices: i32) {
        unsafe {
            self.context
                .draw_elements(glow::TRIANGLES, num_indices, glow::UNSIGNED_INT, 0);
        }
    }

    fn set_uniform_bool(&self, program: Self::Program, name: &str, value: bool) {
        self.set_uniform_int(program, name, value as i32);
    }

    fn set_uniform_int(&self, program: Self::Program, name: &str, value: i32) {
        if let Some(location) = self.uniform_location(program, name) {
            unsafe {
                self.context.uniform_1_i32(Some(&location), value);
            }
        }
    }

    fn set_uniform_float(&self, program: Self::Program, name: &str, value: f32) {
        if let Some(location) = self.uniform_location(program, name) {
            unsafe {
                self.context.uniform_1_f32(Some(&location), value);
            }
        }
    }

    fn set_uniform_vec3(&self, program: Self::Program, name: &str, value: Vector3<f32>) {
        if let Some(location) = self.uniform_location(program, name) {
            let value: &[f32; 3] = value.as_ref();
            unsafe {
                self.context.uniform_3_f32_slice(Some(&location), value);
            }
        }
    }

    fn set_uniform_mat4(&self, program: Self::Program, name: &str, value: Matrix4<f32>) {
        if let Some(location) = self.uniform_location(program, name) {
            let value: &[f32; 16] = value.as_ref();
            unsafe {
                self.context
                    .uniform_matrix_4_f32_slice(Some(&location), false, value);
            }
        }
    }

    fn set_uniform_mat4_array(&self, program: Self::Program, name: &str, value: &[Matrix4<f32>]) {
        if let Some(location) = self.uniform_location(program, name) {
            let mut flattened = Vec::with_capacity(value.len() * 16);
            for matrix in value {
                let cells: &[f32; 16] = matrix.as_ref();
                flattened.extend_from_slice(cells);
            }
            unsafe {
                self.context
                    .uniform_matrix_4_f32_slice(Some(&location), false, &flattened);
            }
        }
    }

    fn clear_screen(&self, color: Vector4<f32>) {
        unsafe {
            self.context.clear_color(color.x, color.y, color.z, color.w);
            self.context
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn set_viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe {
            self.context.viewport(x, y, width, height);
        }
    }

    fn window_size(&self) -> (u32, u32) {
        self.window_size.get()
    }
}
