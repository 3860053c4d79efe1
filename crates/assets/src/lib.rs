//! Mesh assets: CPU mesh data, procedural shapes, Wavefront OBJ import.
//!
//! Meshes are registered in a content-addressed [`MeshStore`]. The renderer
//! consumes meshes by handle, never by raw file paths.
//!
//! # Layout
//! Files resolve as `root/mesh_dir/name`; see [`AssetManager`].

pub mod manager;
pub mod mesh;
pub mod obj;
pub mod shapes;
pub mod store;

pub use manager::AssetManager;
pub use mesh::{LineMesh, LineVertex, MeshData, Vertex};
pub use store::{LineHandle, MeshHandle, MeshStore};

use std::path::PathBuf;

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("mesh contains no faces")]
    Empty,
    #[error("asset not found: {}", .0.display())]
    NotFound(PathBuf),
}
