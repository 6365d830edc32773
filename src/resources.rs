//! Path-keyed stores for every resource kind. Each store is a memoizing
//! factory: `get_*` returns the resident entry or uploads exactly once,
//! `load_*`/`link_shaders` reject duplicates so callers choose idempotence
//! explicitly. All caches live for the whole process; nothing is unloaded.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use crate::backend::RenderBackend;
use crate::data::{AssetSource, ModelData, ShaderData, TextureData, TextureRole};
use crate::error::{Error, ResourceKind, Result};
use crate::handles::{ModelHandle, ShaderHandle, ShaderProgramHandle, TextureHandle};
use crate::pipeline;

/// Lexically normalizes a path so that `a/./b` and `a/../b` collide with
/// `a/b` and `b`. Purely textual; the filesystem is never consulted.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                // `..` above the root stays at the root.
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                Some(Component::ParentDir) | None => normalized.push(".."),
                _ => {
                    normalized.pop();
                }
            },
            other => normalized.push(other),
        }
    }

    normalized
}

pub struct ResourceCache<B: RenderBackend> {
    models: HashMap<PathBuf, ModelHandle<B>>,
    textures: HashMap<PathBuf, TextureHandle<B>>,
    shaders: HashMap<PathBuf, ShaderHandle<B>>,
    programs: HashMap<String, ShaderProgramHandle<B>>,
}

impl<B: RenderBackend> ResourceCache<B> {
    pub fn new() -> Self {
        Self {
            models: HashMap::new(),
            textures: HashMap::new(),
            shaders: HashMap::new(),
            programs: HashMap::new(),
        }
    }

    /// Returns the model for `path`, pulling decoded data from `source` and
    /// uploading it on first request. A failed upload inserts nothing, so a
    /// later request retries from scratch.
    pub fn get_model(
        &mut self,
        backend: &B,
        source: &dyn AssetSource,
        path: &Path,
    ) -> Result<&ModelHandle<B>> {
        let key = normalize(path);

        if !self.models.contains_key(&key) {
            let data = source.model(path)?;
            let handle = self.upload_model(backend, source, &data)?;
            self.models.insert(key.clone(), handle);
        }

        Ok(&self.models[&key])
    }

    pub fn get_texture(
        &mut self,
        backend: &B,
        source: &dyn AssetSource,
        path: &Path,
    ) -> Result<TextureHandle<B>> {
        self.texture_with_role(backend, source, path, None)
    }

    pub fn get_shader(
        &mut self,
        backend: &B,
        source: &dyn AssetSource,
        path: &Path,
    ) -> Result<ShaderHandle<B>> {
        let key = normalize(path);

        if let Some(shader) = self.shaders.get(&key) {
            return Ok(*shader);
        }

        let data = source.shader(path)?;
        let handle = pipeline::compile_shader(backend, &data)?;
        self.shaders.insert(key, handle);

        Ok(handle)
    }

    /// Lookup only. Programs require an explicit, ordered set of stages and
    /// are never created from a miss.
    pub fn get_shader_program(&self, name: &str) -> Result<ShaderProgramHandle<B>> {
        self.programs
            .get(name)
            .copied()
            .ok_or_else(|| Error::ProgramNotLinked {
                name: name.to_owned(),
            })
    }

    /// Explicit load of an already-decoded model, e.g. one generated at
    /// runtime rather than read from disk. Fails if the path is resident.
    pub fn load_model(
        &mut self,
        backend: &B,
        source: &dyn AssetSource,
        data: &ModelData,
    ) -> Result<&ModelHandle<B>> {
        let key = normalize(&data.path);

        if self.models.contains_key(&key) {
            return Err(Error::AlreadyLoaded {
                kind: ResourceKind::Model,
                key: data.path.display().to_string(),
            });
        }

        let handle = self.upload_model(backend, source, data)?;
        self.models.insert(key.clone(), handle);

        Ok(&self.models[&key])
    }

    pub fn load_texture(&mut self, backend: &B, data: &TextureData) -> Result<TextureHandle<B>> {
        let key = normalize(&data.path);

        if self.textures.contains_key(&key) {
            return Err(Error::AlreadyLoaded {
                kind: ResourceKind::Texture,
                key: data.path.display().to_string(),
            });
        }

        let handle = pipeline::upload_texture(backend, data)?;
        self.textures.insert(key, handle);

        Ok(handle)
    }

    pub fn load_shader(&mut self, backend: &B, data: &ShaderData) -> Result<ShaderHandle<B>> {
        let key = normalize(&data.path);

        if self.shaders.contains_key(&key) {
            return Err(Error::AlreadyLoaded {
                kind: ResourceKind::Shader,
                key: data.path.display().to_string(),
            });
        }

        let handle = pipeline::compile_shader(backend, data)?;
        self.shaders.insert(key, handle);

        Ok(handle)
    }

    /// Registers the program `name` from an ordered list of shader stage
    /// paths, compiling stages on miss. Must run during initialization,
    /// before any draw command references the name.
    pub fn link_shaders(
        &mut self,
        backend: &B,
        source: &dyn AssetSource,
        name: &str,
        stage_paths: &[&Path],
    ) -> Result<ShaderProgramHandle<B>> {
        if self.programs.contains_key(name) {
            return Err(Error::AlreadyLoaded {
                kind: ResourceKind::ShaderProgram,
                key: name.to_owned(),
            });
        }

        let mut stages = Vec::with_capacity(stage_paths.len());
        for path in stage_paths {
            stages.push(self.get_shader(backend, source, path)?.id);
        }

        let program = pipeline::link_program(backend, name, &stages)?;
        self.programs.insert(name.to_owned(), program);

        Ok(program)
    }

    /// Uploads every mesh of a model and resolves its textures. Built fully
    /// before insertion: a failure part-way leaves no model entry behind.
    fn upload_model(
        &mut self,
        backend: &B,
        source: &dyn AssetSource,
        data: &ModelData,
    ) -> Result<ModelHandle<B>> {
        let mut meshes = Vec::with_capacity(data.meshes.len());

        for mesh in &data.meshes {
            let mut handle = pipeline::upload_mesh(backend, &data.path, mesh)?;

            for texture in &mesh.textures {
                handle.textures.push(self.texture_with_role(
                    backend,
                    source,
                    &texture.path,
                    Some(texture.role),
                )?);
            }

            meshes.push(handle);
        }

        Ok(ModelHandle { meshes })
    }

    /// One backend texture per normalized path, shared between meshes. When a
    /// mesh requests a resident texture under a different role, the stored
    /// role is overwritten in place; the image identity stays the same.
    fn texture_with_role(
        &mut self,
        backend: &B,
        source: &dyn AssetSource,
        path: &Path,
        requested: Option<TextureRole>,
    ) -> Result<TextureHandle<B>> {
        let key = normalize(path);

        if let Some(entry) = self.textures.get_mut(&key) {
            if let Some(role) = requested {
                entry.role = role;
            }
            return Ok(*entry);
        }

        let data = source.texture(path)?;
        let mut handle = pipeline::upload_texture(backend, &data)?;
        if let Some(role) = requested {
            handle.role = role;
        }
        self.textures.insert(key, handle);

        Ok(handle)
    }
}

impl<B: RenderBackend> Default for ResourceCache<B> {
    fn default() -> Self {
        Self::new()
    }
}
