//! Wavefront OBJ import.
//!
//! Supports the subset real exporters emit for static meshes: `v`, `vn`, `vt`
//! and polygonal `f` records. Objects, groups, smoothing groups and material
//! references are accepted and ignored; every object is merged into a single
//! mesh.

use crate::AssetError;
use crate::mesh::{MeshData, Vertex, flat_normal};
use glam::Vec3;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

/// Parse an OBJ stream into one merged mesh.
///
/// Triangles with a corner lacking a normal get their own flat-shaded
/// vertices; triangles with authored normals keep them.
pub fn parse(reader: impl BufRead) -> Result<MeshData, AssetError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut texcoords = 0usize;

    let mut mesh = MeshData::default();
    // (position, normal) index pair to emitted vertex index.
    let mut dedup: HashMap<(usize, usize), u32> = HashMap::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line?;
        let line = line.split('#').next().unwrap_or("").trim();
        let mut parts = line.split_whitespace();
        let Some(tag) = parts.next() else {
            continue;
        };

        match tag {
            "v" => positions.push(parse_vec3(parts, line_no)?),
            "vn" => normals.push(parse_vec3(parts, line_no)?),
            "vt" => texcoords += 1,
            "f" => {
                let mut corners = Vec::with_capacity(4);
                for token in parts {
                    let (p, t, n) = parse_corner(token, line_no)?;
                    let p = resolve(p, positions.len(), "position", line_no)?;
                    if let Some(t) = t {
                        resolve(t, texcoords, "texture coordinate", line_no)?;
                    }
                    let n = n
                        .map(|n| resolve(n, normals.len(), "normal", line_no))
                        .transpose()?;
                    corners.push((p, n));
                }
                if corners.len() < 3 {
                    return Err(parse_error(line_no, "face needs at least three vertices"));
                }
                // Fan triangulation; convex polygons only.
                for i in 1..corners.len() - 1 {
                    let tri = [corners[0], corners[i], corners[i + 1]];
                    if let [(pa, Some(na)), (pb, Some(nb)), (pc, Some(nc))] = tri {
                        for key in [(pa, na), (pb, nb), (pc, nc)] {
                            let next = mesh.vertices.len() as u32;
                            let index = *dedup.entry(key).or_insert_with(|| {
                                mesh.vertices
                                    .push(Vertex::new(positions[key.0], normals[key.1]));
                                next
                            });
                            mesh.indices.push(index);
                        }
                    } else {
                        let [a, b, c] = tri.map(|(p, _)| positions[p]);
                        let normal = flat_normal(a, b, c);
                        let base = mesh.vertices.len() as u32;
                        mesh.vertices
                            .extend([a, b, c].map(|p| Vertex::new(p, normal)));
                        mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
                    }
                }
            }
            "o" | "g" | "s" | "usemtl" | "mtllib" | "l" | "p" => {}
            other => {
                tracing::trace!("obj line {line_no}: skipping '{other}' record");
            }
        }
    }

    if mesh.is_empty() {
        return Err(AssetError::Empty);
    }
    Ok(mesh)
}

/// Load every object in an OBJ file as one mesh.
pub fn load_merged(path: impl AsRef<Path>) -> Result<MeshData, AssetError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AssetError::NotFound(path.to_path_buf()),
        _ => AssetError::Io(e),
    })?;
    let mesh = parse(std::io::BufReader::new(file))?;
    tracing::debug!(
        "loaded {} ({} vertices, {} triangles)",
        path.display(),
        mesh.vertices.len(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

fn parse_error(line: usize, message: impl Into<String>) -> AssetError {
    AssetError::Parse {
        line,
        message: message.into(),
    }
}

fn parse_vec3<'a>(mut parts: impl Iterator<Item = &'a str>, line: usize) -> Result<Vec3, AssetError> {
    let mut next = || -> Result<f32, AssetError> {
        let token = parts
            .next()
            .ok_or_else(|| parse_error(line, "expected three components"))?;
        token
            .parse::<f32>()
            .map_err(|_| parse_error(line, format!("invalid number '{token}'")))
    };
    Ok(Vec3::new(next()?, next()?, next()?))
}

type Corner = (i64, Option<i64>, Option<i64>);

/// Split `v`, `v/vt`, `v//vn` or `v/vt/vn` into raw (possibly negative) indices.
fn parse_corner(token: &str, line: usize) -> Result<Corner, AssetError> {
    let mut fields = token.split('/');
    let index = |field: Option<&str>| -> Result<Option<i64>, AssetError> {
        match field {
            None | Some("") => Ok(None),
            Some(s) => s
                .parse::<i64>()
                .map(Some)
                .map_err(|_| parse_error(line, format!("invalid index '{s}'"))),
        }
    };
    let position = index(fields.next())?
        .ok_or_else(|| parse_error(line, format!("face corner '{token}' has no position")))?;
    let texcoord = index(fields.next())?;
    let normal = index(fields.next())?;
    Ok((position, texcoord, normal))
}

/// Convert a 1-based or negative (relative) OBJ index into a 0-based one.
fn resolve(raw: i64, count: usize, what: &str, line: usize) -> Result<usize, AssetError> {
    let resolved = match raw {
        0 => None,
        r if r > 0 => Some(r as usize - 1),
        r => (count as i64).checked_add(r).filter(|i| *i >= 0).map(|i| i as usize),
    };
    resolved
        .filter(|i| *i < count)
        .ok_or_else(|| parse_error(line, format!("{what} index {raw} out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    const QUAD: &str = "\
# a unit quad
o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1 4//1
";

    #[test]
    fn quad_is_fan_triangulated() {
        let mesh = parse(Cursor::new(QUAD)).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert!(mesh.vertices.iter().all(|v| v.normal == Vec3::Z));
    }

    #[test]
    fn objects_are_merged() {
        let text = "\
o a
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
o b
v 0 0 1
v 1 0 1
v 0 1 1
f 4 5 6
";
        let mesh = parse(Cursor::new(text)).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        // No normals in the file: flat normals computed from winding.
        assert!(mesh.vertices.iter().all(|v| v.normal == Vec3::Z));
    }

    #[test]
    fn negative_indices_and_texcoords() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vn 0 0 1
f -3/1/1 -2/1/1 -1/1/1
";
        let mesh = parse(Cursor::new(text)).unwrap();
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices[2].position, Vec3::Y);
    }

    #[test]
    fn shared_corners_are_deduplicated() {
        let text = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3
f 1 3 4
";
        let mesh = parse(Cursor::new(text)).unwrap();
        // Flat normals unshare again: two triangles, six vertices.
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn authored_normals_survive_faces_without_them() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 0 0 1
v 1 0 1
v 0 1 1
vn 0 0.7071 0.7071
f 1//1 2//1 3//1
f 4 5 6
";
        let mesh = parse(Cursor::new(text)).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        let authored = Vec3::new(0.0, 0.7071, 0.7071);
        for &i in &mesh.indices[..3] {
            assert!(mesh.vertices[i as usize].normal.abs_diff_eq(authored, 1e-6));
        }
        for &i in &mesh.indices[3..] {
            assert_eq!(mesh.vertices[i as usize].normal, Vec3::Z);
        }
    }

    #[test]
    fn out_of_range_index_reports_line() {
        let text = "v 0 0 0\nv 1 0 0\nf 1 2 3\n";
        match parse(Cursor::new(text)) {
            Err(AssetError::Parse { line, message }) => {
                assert_eq!(line, 3);
                assert!(message.contains("out of range"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bad_number_is_parse_error() {
        let err = parse(Cursor::new("v 0 x 0\n")).unwrap_err();
        assert!(matches!(err, AssetError::Parse { line: 1, .. }));
    }

    #[test]
    fn degenerate_face_is_rejected() {
        let err = parse(Cursor::new("v 0 0 0\nv 1 0 0\nf 1 2\n")).unwrap_err();
        assert!(matches!(err, AssetError::Parse { line: 3, .. }));
    }

    #[test]
    fn empty_file_is_empty_error() {
        let err = parse(Cursor::new("# nothing\nv 0 0 0\n")).unwrap_err();
        assert!(matches!(err, AssetError::Empty));
    }

    #[test]
    fn load_from_disk() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(QUAD.as_bytes()).unwrap();
        let mesh = load_merged(tmp.path()).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_merged("/nonexistent/ring.obj").unwrap_err();
        assert!(matches!(err, AssetError::NotFound(_)));
    }
}
