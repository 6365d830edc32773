//! Per-frame draw queue and the pass that drains it. Game systems queue draw
//! commands during the update phase; the owning loop calls [`Renderer::draw`]
//! once per frame on the same thread, which replays every command in
//! insertion order and leaves the backend's binding state in a known
//! configuration between draws.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use cgmath::Vector4;
use log::warn;

use crate::backend::RenderBackend;
use crate::data::{AssetSource, ModelData, ShaderData, TextureData, TextureRole};
use crate::error::{Error, Result};
use crate::handles::{ModelHandle, ShaderHandle, ShaderProgramHandle, TextureHandle};
use crate::resources::ResourceCache;
use crate::transform::Transform;
use crate::uniform::UniformBinder;

/// Texture units one draw may bind. Meshes beyond this fail the command
/// instead of silently overflowing the unit range.
pub const MAX_TEXTURE_UNITS: usize = 16;

/// Entity that queued a draw, carried through for picking and debug overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

/// One queued request to draw a model. Lives for a single frame.
#[derive(Debug, Clone)]
pub struct DrawCommand {
    pub model_path: PathBuf,
    pub program_name: String,
    pub transform: Transform,
    pub entity: Option<EntityId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FramePhase {
    Idle,
    Accepting,
    Draining,
}

/// Owns the backend, the asset source and the resource caches, and drives the
/// per-frame draw pass. All collaborators are injected; there is no global
/// registry.
pub struct Renderer<B: RenderBackend, S: AssetSource> {
    backend: B,
    assets: S,
    resources: ResourceCache<B>,
    queue: VecDeque<DrawCommand>,
    phase: FramePhase,
}

impl<B: RenderBackend, S: AssetSource> Renderer<B, S> {
    pub fn new(backend: B, assets: S) -> Self {
        Self {
            backend,
            assets,
            resources: ResourceCache::new(),
            queue: VecDeque::new(),
            phase: FramePhase::Idle,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Queues a draw for this frame. Callers get no ordering promise beyond
    /// "drawn in call order".
    pub fn queue_draw(&mut self, command: DrawCommand) {
        self.phase = FramePhase::Accepting;
        self.queue.push_back(command);
    }

    /// Drains the queue, drawing every command in insertion order, and
    /// returns how many commands were drawn. A command whose resources fail
    /// to resolve is logged and skipped; its object is simply absent from the
    /// frame. Only re-entrant draining fails the whole call.
    pub fn draw(&mut self) -> Result<usize> {
        if self.phase == FramePhase::Draining {
            return Err(Error::DrawInProgress);
        }
        self.phase = FramePhase::Draining;

        let commands = std::mem::take(&mut self.queue);
        let mut drawn = 0;

        for command in &commands {
            match self.draw_queued(command) {
                Ok(()) => drawn += 1,
                Err(error) => warn!(
                    "skipping draw of '{}': {error}",
                    command.model_path.display()
                ),
            }
        }

        self.phase = FramePhase::Idle;

        Ok(drawn)
    }

    /// Resolves and draws one model immediately, outside the queue.
    pub fn draw_model(
        &mut self,
        model_path: &Path,
        program_name: &str,
        transform: &Transform,
    ) -> Result<()> {
        let program = self.resources.get_shader_program(program_name)?;
        let model = self
            .resources
            .get_model(&self.backend, &self.assets, model_path)?;

        draw_model(&self.backend, model_path, model, program, transform)
    }

    fn draw_queued(&mut self, command: &DrawCommand) -> Result<()> {
        // A cache miss here uploads synchronously and can stall the frame;
        // that is the accepted cost of lazy creation, not a defect.
        let program = self.resources.get_shader_program(&command.program_name)?;
        let model = self
            .resources
            .get_model(&self.backend, &self.assets, &command.model_path)?;

        draw_model(
            &self.backend,
            &command.model_path,
            model,
            program,
            &command.transform,
        )
    }

    /// Typed uniform access for a linked program, e.g. to set view and
    /// projection matrices or a bone palette before the frame is drawn.
    pub fn uniforms(&self, program: ShaderProgramHandle<B>) -> UniformBinder<'_, B> {
        UniformBinder::new(&self.backend, program)
    }

    // Resource management, forwarded to the caches with the backend and
    // asset source this renderer owns.

    pub fn get_model(&mut self, path: &Path) -> Result<&ModelHandle<B>> {
        self.resources.get_model(&self.backend, &self.assets, path)
    }

    pub fn get_texture(&mut self, path: &Path) -> Result<TextureHandle<B>> {
        self.resources.get_texture(&self.backend, &self.assets, path)
    }

    pub fn get_shader(&mut self, path: &Path) -> Result<ShaderHandle<B>> {
        self.resources.get_shader(&self.backend, &self.assets, path)
    }

    pub fn get_shader_program(&self, name: &str) -> Result<ShaderProgramHandle<B>> {
        self.resources.get_shader_program(name)
    }

    pub fn load_model(&mut self, data: &ModelData) -> Result<&ModelHandle<B>> {
        self.resources.load_model(&self.backend, &self.assets, data)
    }

    pub fn load_texture(&mut self, data: &TextureData) -> Result<TextureHandle<B>> {
        self.resources.load_texture(&self.backend, data)
    }

    pub fn load_shader(&mut self, data: &ShaderData) -> Result<ShaderHandle<B>> {
        self.resources.load_shader(&self.backend, data)
    }

    pub fn link_shaders(
        &mut self,
        name: &str,
        stage_paths: &[&Path],
    ) -> Result<ShaderProgramHandle<B>> {
        self.resources
            .link_shaders(&self.backend, &self.assets, name, stage_paths)
    }

    // Frame housekeeping, forwarded to the backend.

    pub fn clear_screen(&self, color: Vector4<f32>) {
        self.backend.clear_screen(color);
    }

    pub fn set_viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.backend.set_viewport(x, y, width, height);
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.backend.window_size()
    }
}

/// Issues one backend draw per mesh. Validates the whole model before
/// touching any backend state so a malformed asset never half-draws.
fn draw_model<B: RenderBackend>(
    backend: &B,
    path: &Path,
    model: &ModelHandle<B>,
    program: ShaderProgramHandle<B>,
    transform: &Transform,
) -> Result<()> {
    if model.meshes.is_empty() {
        return Err(Error::EmptyDrawable {
            path: path.to_owned(),
        });
    }

    for mesh in &model.meshes {
        if mesh.num_indices <= 0 {
            return Err(Error::EmptyDrawable {
                path: path.to_owned(),
            });
        }
        if mesh.textures.len() > MAX_TEXTURE_UNITS {
            return Err(Error::TooManyTextures {
                path: path.to_owned(),
                count: mesh.textures.len(),
                max: MAX_TEXTURE_UNITS,
            });
        }
    }

    backend.use_program(program.id);
    let uniforms = UniformBinder::new(backend, program);

    for mesh in &model.meshes {
        // Samplers are named by role plus 1-based instance within that role:
        // the second diffuse texture binds to `texture_diffuse2`.
        let mut role_counts = [0u32; TextureRole::COUNT];

        for (unit, texture) in mesh.textures.iter().enumerate() {
            backend.set_texture_unit(unit as u32);

            role_counts[texture.role.index()] += 1;
            let name = format!(
                "{}{}",
                texture.role.uniform_prefix(),
                role_counts[texture.role.index()]
            );
            uniforms.set_int(&name, unit as i32);

            backend.bind_texture(texture.id);
        }

        // World transform first, then the mesh's offset within the model.
        uniforms.set_mat4("model", transform.matrix() * mesh.transform.matrix());

        backend.bind_vertex_array(Some(mesh.buffers.vertex_array));
        backend.draw_indexed(mesh.num_indices);
        backend.bind_vertex_array(None);

        // Leave unit 0 active so the next draw starts from known state.
        backend.set_texture_unit(0);
    }

    Ok(())
}
