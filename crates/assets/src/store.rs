use crate::mesh::{LineMesh, MeshData};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Content hash of a triangle mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub u64);

/// Content hash of a line mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineHandle(pub u64);

/// Content-addressed registry of CPU meshes.
///
/// Registering identical data twice returns the same handle, so geometry
/// shared between scene objects is stored and uploaded once.
#[derive(Debug, Clone, Default)]
pub struct MeshStore {
    meshes: BTreeMap<MeshHandle, MeshData>,
    lines: BTreeMap<LineHandle, LineMesh>,
}

impl MeshStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mesh(&mut self, mesh: MeshData) -> MeshHandle {
        let handle = MeshHandle(mesh_hash(&mesh));
        self.meshes.entry(handle).or_insert(mesh);
        handle
    }

    pub fn add_lines(&mut self, lines: LineMesh) -> LineHandle {
        let handle = LineHandle(line_hash(&lines));
        self.lines.entry(handle).or_insert(lines);
        handle
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&MeshData> {
        self.meshes.get(&handle)
    }

    pub fn lines(&self, handle: LineHandle) -> Option<&LineMesh> {
        self.lines.get(&handle)
    }

    pub fn meshes(&self) -> impl Iterator<Item = (MeshHandle, &MeshData)> {
        self.meshes.iter().map(|(h, m)| (*h, m))
    }

    pub fn line_meshes(&self) -> impl Iterator<Item = (LineHandle, &LineMesh)> {
        self.lines.iter().map(|(h, l)| (*h, l))
    }

    pub fn len(&self) -> usize {
        self.meshes.len() + self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty() && self.lines.is_empty()
    }
}

fn digest_u64(hasher: Sha256) -> u64 {
    let result = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&result[..8]);
    u64::from_le_bytes(bytes)
}

fn mesh_hash(mesh: &MeshData) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(b"mesh");
    for v in &mesh.vertices {
        for c in v.position.to_array().into_iter().chain(v.normal.to_array()) {
            hasher.update(c.to_le_bytes());
        }
    }
    for i in &mesh.indices {
        hasher.update(i.to_le_bytes());
    }
    digest_u64(hasher)
}

fn line_hash(lines: &LineMesh) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(b"lines");
    for v in &lines.vertices {
        for c in v.position.to_array().into_iter().chain(v.color.to_array()) {
            hasher.update(c.to_le_bytes());
        }
    }
    digest_u64(hasher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes;

    #[test]
    fn identical_meshes_share_a_handle() {
        let mut store = MeshStore::new();
        let a = store.add_mesh(shapes::torus(5.0, 0.35, 48, 12));
        let b = store.add_mesh(shapes::torus(5.0, 0.35, 48, 12));
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn distinct_meshes_get_distinct_handles() {
        let mut store = MeshStore::new();
        let cube = store.add_mesh(shapes::cube());
        let quad = store.add_mesh(shapes::screen_quad());
        assert_ne!(cube, quad);
        assert_eq!(store.mesh(quad).map(MeshData::triangle_count), Some(2));
    }

    #[test]
    fn lines_are_stored_separately() {
        let mut store = MeshStore::new();
        let frame = store.add_lines(shapes::coordinate_frame());
        store.add_mesh(shapes::cube());
        assert_eq!(store.len(), 2);
        assert_eq!(store.lines(frame).map(LineMesh::segment_count), Some(3));
        assert_eq!(store.line_meshes().count(), 1);
        assert!(store.mesh(MeshHandle(frame.0)).is_none());
    }
}
