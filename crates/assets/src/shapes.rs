//! Procedural meshes. All triangle meshes wind counter-clockwise seen from
//! outside.

use crate::mesh::{LineMesh, MeshData, Vertex};
use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

/// Unit cube centered at the origin, 24 vertices so every face has its own normal.
pub fn cube() -> MeshData {
    let p = 0.5_f32;
    let face = |n: Vec3, corners: [[f32; 3]; 4]| corners.map(|c| Vertex::new(Vec3::from(c), n));
    #[rustfmt::skip]
    let faces = [
        face(Vec3::Z, [[-p, -p,  p], [ p, -p,  p], [ p,  p,  p], [-p,  p,  p]]),
        face(Vec3::NEG_Z, [[ p, -p, -p], [-p, -p, -p], [-p,  p, -p], [ p,  p, -p]]),
        face(Vec3::X, [[ p, -p,  p], [ p, -p, -p], [ p,  p, -p], [ p,  p,  p]]),
        face(Vec3::NEG_X, [[-p, -p, -p], [-p, -p,  p], [-p,  p,  p], [-p,  p, -p]]),
        face(Vec3::Y, [[-p,  p,  p], [ p,  p,  p], [ p,  p, -p], [-p,  p, -p]]),
        face(Vec3::NEG_Y, [[-p, -p, -p], [ p, -p, -p], [ p, -p,  p], [-p, -p,  p]]),
    ];
    let vertices: Vec<Vertex> = faces.into_iter().flatten().collect();
    let indices = (0..6u32)
        .flat_map(|f| {
            let b = f * 4;
            [b, b + 1, b + 2, b + 2, b + 3, b]
        })
        .collect();
    MeshData::new(vertices, indices)
}

/// UV sphere of radius 1.
pub fn sphere(segments: u32, rings: u32) -> MeshData {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
    let mut indices = Vec::with_capacity((segments * rings * 6) as usize);

    for ring in 0..=rings {
        let phi = PI * ring as f32 / rings as f32;
        let (ring_radius, y) = phi.sin_cos();
        for seg in 0..=segments {
            let theta = TAU * seg as f32 / segments as f32;
            let (sin_t, cos_t) = theta.sin_cos();
            let n = Vec3::new(ring_radius * cos_t, y, ring_radius * sin_t);
            vertices.push(Vertex::new(n, n));
        }
    }

    for ring in 0..rings {
        for seg in 0..segments {
            let current = ring * (segments + 1) + seg;
            let next = current + segments + 1;
            indices.extend_from_slice(&[current, current + 1, next]);
            indices.extend_from_slice(&[current + 1, next + 1, next]);
        }
    }

    MeshData::new(vertices, indices)
}

/// Flat plane on XZ, centered at the origin, facing +Y.
pub fn plane(size: Vec2) -> MeshData {
    let h = size * 0.5;
    let vertices = [
        Vec3::new(-h.x, 0.0, -h.y),
        Vec3::new(h.x, 0.0, -h.y),
        Vec3::new(h.x, 0.0, h.y),
        Vec3::new(-h.x, 0.0, h.y),
    ]
    .map(|p| Vertex::new(p, Vec3::Y))
    .to_vec();
    MeshData::new(vertices, vec![0, 2, 1, 0, 3, 2])
}

/// Torus lying in the XZ plane, spinning symmetrically about Y.
pub fn torus(major_radius: f32, minor_radius: f32, segments: u32, sides: u32) -> MeshData {
    let segments = segments.max(3);
    let sides = sides.max(3);
    let mut vertices = Vec::with_capacity(((segments + 1) * (sides + 1)) as usize);
    let mut indices = Vec::with_capacity((segments * sides * 6) as usize);

    for i in 0..=segments {
        let (sin_u, cos_u) = (TAU * i as f32 / segments as f32).sin_cos();
        for j in 0..=sides {
            let (sin_v, cos_v) = (TAU * j as f32 / sides as f32).sin_cos();
            let normal = Vec3::new(cos_v * cos_u, sin_v, cos_v * sin_u);
            let center = Vec3::new(major_radius * cos_u, 0.0, major_radius * sin_u);
            vertices.push(Vertex::new(center + normal * minor_radius, normal));
        }
    }

    let stride = sides + 1;
    for i in 0..segments {
        for j in 0..sides {
            let a = i * stride + j;
            let b = (i + 1) * stride + j;
            let c = b + 1;
            let d = a + 1;
            indices.extend_from_slice(&[a, c, b, a, d, c]);
        }
    }

    MeshData::new(vertices, indices)
}

/// Full-screen quad in normalized device coordinates at z = 0.
pub fn screen_quad() -> MeshData {
    let vertices = [
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(-1.0, 1.0, 0.0),
    ]
    .map(|p| Vertex::new(p, Vec3::Z))
    .to_vec();
    MeshData::new(vertices, vec![0, 1, 2, 0, 2, 3])
}

/// Unit-length X, Y, Z axes colored red, green, blue.
pub fn coordinate_frame() -> LineMesh {
    let mut lines = LineMesh::default();
    lines.push_segment(Vec3::ZERO, Vec3::X, Vec3::X);
    lines.push_segment(Vec3::ZERO, Vec3::Y, Vec3::Y);
    lines.push_segment(Vec3::ZERO, Vec3::Z, Vec3::Z);
    lines
}

/// Stand-in orbiter used when the shuttle OBJ is not on disk.
///
/// Modelled Z-up with the nose along +Y, about 26 units long, matching the
/// scale the scene applies to the real asset.
pub fn shuttle() -> MeshData {
    let mut b = FacetBuilder::default();

    // Fuselage box.
    let (x, z) = (2.0, 2.0);
    let (tail, front) = (-12.0, 8.0);
    let ring_at = |y: f32| {
        [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
            .map(|(sx, sz)| Vec3::new(sx * x, y, sz * z))
    };
    let inside = Vec3::new(0.0, (tail + front) * 0.5, 0.0);
    let back = ring_at(tail);
    let nose = ring_at(front);
    for i in 0..4 {
        let j = (i + 1) % 4;
        b.quad_outward(back[i], back[j], nose[j], nose[i], inside);
    }
    b.quad_outward(back[0], back[1], back[2], back[3], inside);

    // Nose cone on the front face.
    let apex = Vec3::new(0.0, 14.0, 0.0);
    let nose_inside = Vec3::new(0.0, front + 1.0, 0.0);
    for i in 0..4 {
        b.tri_outward(nose[i], nose[(i + 1) % 4], apex, nose_inside);
    }

    // Delta wings and tail fin are thin plates, visible from both sides.
    for side in [-1.0, 1.0] {
        b.double_sided(
            Vec3::new(side * x, 4.0, -1.5),
            Vec3::new(side * 11.0, tail, -1.5),
            Vec3::new(side * x, tail, -1.5),
        );
    }
    b.double_sided(
        Vec3::new(0.0, -4.0, z),
        Vec3::new(0.0, tail, z),
        Vec3::new(0.0, tail, 9.0),
    );

    b.finish()
}

/// Accumulates flat-shaded triangles.
#[derive(Default)]
struct FacetBuilder {
    mesh: MeshData,
}

impl FacetBuilder {
    fn tri(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let base = self.mesh.vertices.len() as u32;
        self.mesh
            .vertices
            .extend([a, b, c].map(|p| Vertex::new(p, Vec3::ZERO)));
        self.mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    /// Emit the triangle wound so its normal points away from `inside`.
    fn tri_outward(&mut self, a: Vec3, b: Vec3, c: Vec3, inside: Vec3) {
        let normal = (b - a).cross(c - a);
        let centroid = (a + b + c) / 3.0;
        if normal.dot(centroid - inside) >= 0.0 {
            self.tri(a, b, c);
        } else {
            self.tri(a, c, b);
        }
    }

    fn quad_outward(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3, inside: Vec3) {
        self.tri_outward(a, b, c, inside);
        self.tri_outward(a, c, d, inside);
    }

    fn double_sided(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        self.tri(a, b, c);
        self.tri(a, c, b);
    }

    fn finish(mut self) -> MeshData {
        self.mesh.calculate_normals_per_face();
        self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every triangle's geometric normal agrees with its stored vertex normals.
    fn winding_matches_normals(mesh: &MeshData) -> bool {
        mesh.indices.chunks_exact(3).all(|t| {
            let [a, b, c] = [t[0], t[1], t[2]].map(|i| mesh.vertices[i as usize]);
            let face = (b.position - a.position).cross(c.position - a.position);
            face.length_squared() < 1e-12 || face.dot(a.normal + b.normal + c.normal) > 0.0
        })
    }

    #[test]
    fn cube_counts_and_winding() {
        let mesh = cube();
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(winding_matches_normals(&mesh));
    }

    #[test]
    fn sphere_is_unit_and_outward() {
        let mesh = sphere(16, 8);
        assert!(mesh.vertices.iter().all(|v| (v.position.length() - 1.0).abs() < 1e-5));
        assert!(winding_matches_normals(&mesh));
    }

    #[test]
    fn plane_faces_up() {
        let mesh = plane(Vec2::splat(100.0));
        assert!(winding_matches_normals(&mesh));
        let (lo, hi) = mesh.bounds().unwrap();
        assert_eq!(lo, Vec3::new(-50.0, 0.0, -50.0));
        assert_eq!(hi, Vec3::new(50.0, 0.0, 50.0));
    }

    #[test]
    fn torus_lies_in_xz() {
        let mesh = torus(5.0, 0.5, 32, 8);
        let (lo, hi) = mesh.bounds().unwrap();
        assert!((hi.x - 5.5).abs() < 1e-4 && (lo.x + 5.5).abs() < 1e-4);
        assert!((hi.y - 0.5).abs() < 1e-4);
        assert!(winding_matches_normals(&mesh));
    }

    #[test]
    fn screen_quad_covers_ndc() {
        let mesh = screen_quad();
        assert_eq!(
            mesh.bounds(),
            Some((Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0)))
        );
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn frame_has_three_colored_axes() {
        let frame = coordinate_frame();
        assert_eq!(frame.segment_count(), 3);
        assert_eq!(frame.vertices[1].position, Vec3::X);
        assert_eq!(frame.vertices[3].color, Vec3::Y);
    }

    #[test]
    fn shuttle_fallback_is_closed_enough_to_render() {
        let mesh = shuttle();
        assert!(!mesh.is_empty());
        assert!(winding_matches_normals(&mesh));
        let (lo, hi) = mesh.bounds().unwrap();
        assert_eq!(hi.y, 14.0);
        assert_eq!(lo.y, -12.0);
        assert_eq!(hi.z, 9.0);
    }
}
