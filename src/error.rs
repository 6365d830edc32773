use std::path::PathBuf;

use thiserror::Error;

/// Which cache a duplicate explicit load collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Model,
    Texture,
    Shader,
    ShaderProgram,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResourceKind::Model => "model",
            ResourceKind::Texture => "texture",
            ResourceKind::Shader => "shader",
            ResourceKind::ShaderProgram => "shader program",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// Explicit `load_*`/`link_shaders` call against a key that is already
    /// resident. The existing entry is left untouched.
    #[error("{kind} '{key}' already loaded")]
    AlreadyLoaded { kind: ResourceKind, key: String },

    /// A draw or uniform request named a shader program that was never
    /// registered via `link_shaders`. Programs are not lazily created.
    #[error("shader program '{name}' is not linked")]
    ProgramNotLinked { name: String },

    /// The backend rejected a shader stage; `log` holds its info log.
    #[error("shader '{path}' failed to compile: {log}", path = .path.display())]
    ShaderCompile { path: PathBuf, log: String },

    /// The backend rejected a program link; `log` holds its info log.
    #[error("shader program '{name}' failed to link: {log}")]
    ProgramLink { name: String, log: String },

    /// A model with no meshes, or a mesh with no vertices or indices.
    /// Indicates an upstream asset-loading bug.
    #[error("model '{path}' has nothing to draw", path = .path.display())]
    EmptyDrawable { path: PathBuf },

    /// `draw` was called while a draw pass was already draining the queue.
    #[error("draw already in progress")]
    DrawInProgress,

    /// A mesh binds more textures than there are texture units.
    #[error(
        "mesh in '{path}' binds {count} textures, at most {max} supported",
        path = .path.display()
    )]
    TooManyTextures {
        path: PathBuf,
        count: usize,
        max: usize,
    },

    /// The asset source has no decoded data for the requested path.
    #[error("no decoded asset available for '{path}'", path = .path.display())]
    MissingAsset { path: PathBuf },

    /// The backend failed to allocate an object (buffer, texture, ...).
    #[error("backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, Error>;
