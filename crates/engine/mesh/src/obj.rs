//! OBJ text loading

use crate::error::{MeshError, Result};
use crate::mesh::Mesh;
use glam::Vec3;
use std::io::Cursor;

/// Parse OBJ text into a single triangle mesh
///
/// Polygons are triangulated and all objects/groups are merged. Material
/// libraries are ignored. Vertices that no face references are dropped.
pub fn parse_obj(text: &str) -> Result<Mesh> {
    let options = tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };

    let mut reader = Cursor::new(text.as_bytes());
    let (models, _materials) = tobj::load_obj_buf(&mut reader, &options, |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })?;

    let mut mesh = Mesh::default();
    for model in &models {
        let base = mesh.positions.len() as u32;
        let positions = &model.mesh.positions;
        if positions.len() % 3 != 0 {
            return Err(MeshError::InvalidFace(format!(
                "model '{}' has {} position components",
                model.name,
                positions.len()
            )));
        }
        mesh.positions.extend(
            positions
                .chunks_exact(3)
                .map(|p| Vec3::new(p[0], p[1], p[2])),
        );

        let indices = model.mesh.indices.chunks_exact(3);
        if !indices.remainder().is_empty() {
            return Err(MeshError::InvalidFace(format!(
                "model '{}' has {} indices, not a whole number of triangles",
                model.name,
                model.mesh.indices.len()
            )));
        }
        mesh.faces
            .extend(indices.map(|f| [base + f[0], base + f[1], base + f[2]]));
    }

    mesh.validate()?;
    tracing::debug!(
        "parsed OBJ: {} models, {} vertices, {} faces",
        models.len(),
        mesh.vertex_count(),
        mesh.face_count()
    );
    Ok(mesh)
}

/// Pull the vertex and face lines out of free-form text
///
/// Language models wrap meshes in prose or code fences; this keeps only
/// `v` and `f` records. Returns `None` when no vertex line is present.
pub fn extract_obj_text(text: &str) -> Option<String> {
    let mut out = String::new();
    let mut has_vertex = false;

    for line in text.lines() {
        let line = line.trim();
        if line.starts_with("v ") {
            has_vertex = true;
        } else if !line.starts_with("f ") {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }

    has_vertex.then_some(out)
}
