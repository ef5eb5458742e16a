//! Wavefront OBJ loading (positions, texture coordinates and faces only)
//!
//! Recognised records: `v x y z`, `vt u v`, `f ...` with corners written as
//! `v`, `v/vt`, `v/vt/vn` or `v//vn`. Indices are 1-based; negative indices
//! count back from the end. Faces with more than three corners are split into
//! a triangle fan. Everything else (normals, groups, materials) is skipped.

use std::fs;
use std::path::Path;

use crate::rasterizer::{Face, Vec2, Vec3};
use super::{Mesh, SceneError};

/// One face corner: vertex index and optional texcoord index (both 0-based)
#[derive(Debug, Clone, Copy)]
struct Corner {
    vertex: usize,
    texcoord: Option<usize>,
}

fn obj_error(line: usize, message: impl Into<String>) -> SceneError {
    SceneError::Obj { line, message: message.into() }
}

/// Resolve a 1-based (or negative, relative) OBJ index against `count` items
fn resolve_index(token: &str, count: usize, line: usize) -> Result<usize, SceneError> {
    let raw: i64 = token
        .parse()
        .map_err(|_| obj_error(line, format!("bad index '{}'", token)))?;

    let resolved = match raw {
        0 => return Err(obj_error(line, "index 0 is not valid")),
        r if r > 0 => r - 1,
        r => count as i64 + r,
    };

    if resolved < 0 || resolved >= count as i64 {
        return Err(obj_error(
            line,
            format!("index {} out of range ({} defined)", raw, count),
        ));
    }
    Ok(resolved as usize)
}

fn parse_floats<const N: usize>(parts: &[&str], line: usize, what: &str) -> Result<[f32; N], SceneError> {
    if parts.len() < N {
        return Err(obj_error(line, format!("{} needs {} components", what, N)));
    }
    let mut out = [0.0; N];
    for (slot, token) in out.iter_mut().zip(parts) {
        *slot = token
            .parse()
            .map_err(|_| obj_error(line, format!("bad number '{}' in {}", token, what)))?;
    }
    Ok(out)
}

fn parse_corner(token: &str, vertex_count: usize, texcoord_count: usize, line: usize) -> Result<Corner, SceneError> {
    let mut fields = token.split('/');
    let vertex = match fields.next() {
        Some(v) if !v.is_empty() => resolve_index(v, vertex_count, line)?,
        _ => return Err(obj_error(line, format!("missing vertex index in '{}'", token))),
    };
    let texcoord = match fields.next() {
        Some(t) if !t.is_empty() => Some(resolve_index(t, texcoord_count, line)?),
        _ => None,
    };
    Ok(Corner { vertex, texcoord })
}

/// Parse OBJ text into a mesh. Faces get the default white base color.
pub fn parse_obj(source: &str) -> Result<Mesh, SceneError> {
    let mut vertices: Vec<Vec3> = Vec::new();
    let mut texcoords: Vec<Vec2> = Vec::new();
    let mut faces: Vec<Face> = Vec::new();

    for (i, raw_line) in source.lines().enumerate() {
        let line = i + 1;
        let content = raw_line.split('#').next().unwrap_or("").trim();
        let mut parts = content.split_whitespace();
        let Some(keyword) = parts.next() else { continue };
        let args: Vec<&str> = parts.collect();

        match keyword {
            "v" => {
                let [x, y, z] = parse_floats::<3>(&args, line, "vertex")?;
                vertices.push(Vec3::new(x, y, z));
            }
            "vt" => {
                let [u, v] = parse_floats::<2>(&args, line, "texture coordinate")?;
                texcoords.push(Vec2::new(u, v));
            }
            "f" => {
                if args.len() < 3 {
                    return Err(obj_error(line, "face needs at least 3 corners"));
                }
                let corners = args
                    .iter()
                    .map(|token| parse_corner(token, vertices.len(), texcoords.len(), line))
                    .collect::<Result<Vec<_>, _>>()?;

                let uv = |c: &Corner| c.texcoord.map_or(Vec2::new(0.0, 0.0), |t| texcoords[t]);
                for k in 1..corners.len() - 1 {
                    let (a, b, c) = (&corners[0], &corners[k], &corners[k + 1]);
                    faces.push(Face::new(a.vertex, b.vertex, c.vertex, [uv(a), uv(b), uv(c)]));
                }
            }
            _ => {}
        }
    }

    let mesh = Mesh::new(vertices, faces);
    mesh.validate()?;
    Ok(mesh)
}

/// Load an OBJ file; the mesh is named after the file stem
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, SceneError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let mut mesh = parse_obj(&contents)?;
    mesh.name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    log::info!(
        "loaded {}: {} vertices, {} faces",
        path.display(),
        mesh.vertices.len(),
        mesh.faces.len()
    );
    Ok(mesh)
}
