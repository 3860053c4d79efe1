use crate::AssetError;
use crate::mesh::MeshData;
use crate::obj;
use gimbal_common::AssetConfig;
use std::path::{Path, PathBuf};

/// Resolves asset names against the on-disk layout `root/mesh_dir/name`.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetManager {
    root: PathBuf,
    mesh_dir: PathBuf,
}

impl AssetManager {
    pub fn new(root: impl Into<PathBuf>, mesh_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mesh_dir: mesh_dir.into(),
        }
    }

    pub fn from_config(config: &AssetConfig) -> Self {
        Self::new(&config.root, &config.meshes)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn mesh_path(&self, name: &str) -> PathBuf {
        self.root.join(&self.mesh_dir).join(name)
    }

    /// Load every object in the named mesh file as a single mesh.
    pub fn load_mesh_merged(&self, name: &str) -> Result<MeshData, AssetError> {
        obj::load_merged(self.mesh_path(name))
    }

    /// Load the named mesh, or log a warning and use `fallback` instead.
    pub fn load_mesh_or(&self, name: &str, fallback: impl FnOnce() -> MeshData) -> MeshData {
        match self.load_mesh_merged(name) {
            Ok(mesh) => {
                tracing::info!(
                    "loaded mesh {name} ({} triangles)",
                    mesh.triangle_count()
                );
                mesh
            }
            Err(e) => {
                tracing::warn!("mesh {name} unavailable ({e}), using procedural fallback");
                fallback()
            }
        }
    }
}

impl Default for AssetManager {
    fn default() -> Self {
        Self::from_config(&AssetConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes;

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    #[test]
    fn paths_follow_layout() {
        let assets = AssetManager::default();
        assert_eq!(
            assets.mesh_path("ring.obj"),
            PathBuf::from("Assets/Meshes/ring.obj")
        );
    }

    #[test]
    fn loads_from_mesh_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("Meshes")).unwrap();
        std::fs::write(dir.path().join("Meshes/tri.obj"), TRIANGLE).unwrap();

        let assets = AssetManager::new(dir.path(), "Meshes");
        let mesh = assets.load_mesh_merged("tri.obj").unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn missing_mesh_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let assets = AssetManager::new(dir.path(), "Meshes");
        assert!(matches!(
            assets.load_mesh_merged("ring.obj"),
            Err(AssetError::NotFound(_))
        ));
        let mesh = assets.load_mesh_or("ring.obj", shapes::cube);
        assert_eq!(mesh, shapes::cube());
    }

    #[test]
    fn broken_mesh_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.obj"), "v 0 0\n").unwrap();
        let assets = AssetManager::new(dir.path(), "");
        let mesh = assets.load_mesh_or("bad.obj", shapes::screen_quad);
        assert_eq!(mesh.triangle_count(), 2);
    }
}
