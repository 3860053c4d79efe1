use glam::Vec3;

/// Mesh vertex: position and normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

/// CPU-side triangle mesh with `u32` indices, counter-clockwise front faces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Axis-aligned bounds as (min, max), or `None` for a mesh without vertices.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), v| {
            (lo.min(v.position), hi.max(v.position))
        }))
    }

    /// Append `other`, offsetting its indices past this mesh's vertices.
    pub fn merge(&mut self, other: &MeshData) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + offset));
    }

    /// Give every triangle its own three vertices with the face normal.
    ///
    /// Produces flat shading; degenerate triangles get an up-facing normal.
    pub fn calculate_normals_per_face(&mut self) {
        let mut vertices = Vec::with_capacity(self.indices.len());
        for tri in self.indices.chunks_exact(3) {
            let a = self.vertices[tri[0] as usize].position;
            let b = self.vertices[tri[1] as usize].position;
            let c = self.vertices[tri[2] as usize].position;
            let normal = flat_normal(a, b, c);
            vertices.extend([a, b, c].map(|p| Vertex::new(p, normal)));
        }
        self.indices = (0..vertices.len() as u32).collect();
        self.vertices = vertices;
    }
}

/// Colored line-list vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineVertex {
    pub position: Vec3,
    pub color: Vec3,
}

/// Line list: every two vertices form one segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineMesh {
    pub vertices: Vec<LineVertex>,
}

impl LineMesh {
    pub fn push_segment(&mut self, from: Vec3, to: Vec3, color: Vec3) {
        self.vertices.push(LineVertex {
            position: from,
            color,
        });
        self.vertices.push(LineVertex {
            position: to,
            color,
        });
    }

    pub fn segment_count(&self) -> usize {
        self.vertices.len() / 2
    }
}

/// Normal of the counter-clockwise triangle `a, b, c`; up for degenerate ones.
pub(crate) fn flat_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).try_normalize().unwrap_or(Vec3::Y)
}
