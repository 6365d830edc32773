//! Upload pipeline: the only code that crosses into the backend to create
//! resources. Each function validates the decoded data, performs the backend
//! call and wraps the backend's diagnostics into crate errors. A failure
//! aborts the requesting call only; the cache is left without an entry.

use std::path::Path;

use log::{debug, info};

use crate::backend::RenderBackend;
use crate::data::{MeshData, ShaderData, TextureData};
use crate::error::{Error, Result};
use crate::handles::{MeshHandle, ShaderHandle, ShaderProgramHandle, TextureHandle};

pub(crate) fn compile_shader<B: RenderBackend>(
    backend: &B,
    shader: &ShaderData,
) -> Result<ShaderHandle<B>> {
    let id = backend
        .compile_shader(shader.stage, &shader.source)
        .map_err(|log| Error::ShaderCompile {
            path: shader.path.clone(),
            log,
        })?;

    debug!("shader '{}' compiled", shader.path.display());

    Ok(ShaderHandle {
        id,
        stage: shader.stage,
    })
}

pub(crate) fn link_program<B: RenderBackend>(
    backend: &B,
    name: &str,
    stages: &[B::Shader],
) -> Result<ShaderProgramHandle<B>> {
    let id = backend
        .link_program(stages)
        .map_err(|log| Error::ProgramLink {
            name: name.to_owned(),
            log,
        })?;

    info!("shader program '{name}' linked");

    Ok(ShaderProgramHandle { id })
}

/// Uploads vertex and index buffers into a fresh vertex array. Textures are
/// resolved separately by the cache and attached by the caller.
pub(crate) fn upload_mesh<B: RenderBackend>(
    backend: &B,
    model_path: &Path,
    mesh: &MeshData,
) -> Result<MeshHandle<B>> {
    if mesh.vertices.is_empty() || mesh.indices.is_empty() {
        return Err(Error::EmptyDrawable {
            path: model_path.to_owned(),
        });
    }

    let buffers = backend
        .upload_mesh(&mesh.vertices, &mesh.indices)
        .map_err(Error::Backend)?;

    Ok(MeshHandle {
        buffers,
        num_indices: mesh.indices.len() as i32,
        transform: mesh.transform,
        textures: Vec::new(),
    })
}

pub(crate) fn upload_texture<B: RenderBackend>(
    backend: &B,
    texture: &TextureData,
) -> Result<TextureHandle<B>> {
    let id = backend
        .upload_texture(texture.width, texture.height, &texture.pixels)
        .map_err(Error::Backend)?;

    debug!("texture '{}' uploaded", texture.path.display());

    Ok(TextureHandle {
        id,
        role: texture.role,
    })
}
