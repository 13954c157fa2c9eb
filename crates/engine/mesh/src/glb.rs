//! Binary glTF (GLB) export and import for vertex-colored meshes
//!
//! # File Format
//!
//! ```text
//! [Header: 12 bytes]
//!   Magic: 'glTF' (0x46546C67)
//!   Version: 2
//!   Total length: 4 bytes (little-endian)
//!
//! [JSON chunk]
//!   Length: 4 bytes, type 'JSON' (0x4E4F534A), padded with spaces
//!
//! [BIN chunk]
//!   Length: 4 bytes, type 'BIN\0' (0x004E4942), padded with zeros
//!   POSITION (VEC3 f32) | COLOR_0 (VEC4 f32) | indices (u32)
//! ```

use crate::error::{MeshError, Result};
use crate::mesh::{ColoredMesh, Mesh};
use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// 'glTF' in little-endian
pub const GLB_MAGIC: u32 = 0x4654_6C67;
/// Container version written and accepted
pub const GLB_VERSION: u32 = 2;
/// JSON chunk type
pub const CHUNK_JSON: u32 = 0x4E4F_534A;
/// Binary chunk type
pub const CHUNK_BIN: u32 = 0x004E_4942;

const HEADER_SIZE: usize = 12;
const CHUNK_HEADER_SIZE: usize = 8;

const COMPONENT_UNSIGNED_BYTE: u32 = 5121;
const COMPONENT_UNSIGNED_SHORT: u32 = 5123;
const COMPONENT_UNSIGNED_INT: u32 = 5125;
const COMPONENT_FLOAT: u32 = 5126;

const TARGET_ARRAY_BUFFER: u32 = 34962;
const TARGET_ELEMENT_ARRAY_BUFFER: u32 = 34963;

const MODE_POINTS: u32 = 0;
const MODE_TRIANGLES: u32 = 4;

const GENERATOR: &str = concat!("meshchat-mesh ", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    asset: Asset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scene: Option<usize>,
    #[serde(default)]
    scenes: Vec<Scene>,
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    meshes: Vec<MeshDef>,
    #[serde(default)]
    accessors: Vec<Accessor>,
    #[serde(default)]
    buffer_views: Vec<BufferView>,
    #[serde(default)]
    buffers: Vec<Buffer>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Asset {
    version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    generator: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Scene {
    #[serde(default)]
    nodes: Vec<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Node {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mesh: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MeshDef {
    primitives: Vec<Primitive>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Primitive {
    attributes: BTreeMap<String, usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    indices: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mode: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Accessor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    buffer_view: Option<usize>,
    #[serde(default)]
    byte_offset: usize,
    component_type: u32,
    #[serde(default)]
    normalized: bool,
    count: usize,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<Vec<f32>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BufferView {
    buffer: usize,
    #[serde(default)]
    byte_offset: usize,
    byte_length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    byte_stride: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Buffer {
    byte_length: usize,
}

/// Serialize a colored mesh to GLB bytes
pub fn write_glb(colored: &ColoredMesh) -> Result<Vec<u8>> {
    colored.validate()?;
    let mesh = &colored.mesh;

    let mut bin = Vec::with_capacity(
        mesh.positions.len() * (12 + 16) + mesh.faces.len() * 12,
    );
    for p in &mesh.positions {
        push_f32s(&mut bin, &p.to_array());
    }
    let positions_len = bin.len();
    for c in &colored.colors {
        push_f32s(&mut bin, &c.to_array());
    }
    let colors_len = bin.len() - positions_len;
    for face in &mesh.faces {
        for index in face {
            bin.extend_from_slice(&index.to_le_bytes());
        }
    }
    let indices_len = bin.len() - positions_len - colors_len;

    let (lo, hi) = mesh.bounds()?;
    let mut attributes = BTreeMap::new();
    attributes.insert("POSITION".to_string(), 0);
    attributes.insert("COLOR_0".to_string(), 1);

    let mut buffer_views = vec![
        BufferView {
            buffer: 0,
            byte_offset: 0,
            byte_length: positions_len,
            byte_stride: None,
            target: Some(TARGET_ARRAY_BUFFER),
        },
        BufferView {
            buffer: 0,
            byte_offset: positions_len,
            byte_length: colors_len,
            byte_stride: None,
            target: Some(TARGET_ARRAY_BUFFER),
        },
    ];
    let mut accessors = vec![
        Accessor {
            buffer_view: Some(0),
            byte_offset: 0,
            component_type: COMPONENT_FLOAT,
            normalized: false,
            count: mesh.positions.len(),
            kind: "VEC3".to_string(),
            min: Some(lo.to_array().to_vec()),
            max: Some(hi.to_array().to_vec()),
        },
        Accessor {
            buffer_view: Some(1),
            byte_offset: 0,
            component_type: COMPONENT_FLOAT,
            normalized: false,
            count: colored.colors.len(),
            kind: "VEC4".to_string(),
            min: None,
            max: None,
        },
    ];

    // glTF forbids zero-length buffer views, so a face-less mesh is
    // written as a point primitive without indices
    let (indices, mode) = if mesh.faces.is_empty() {
        (None, MODE_POINTS)
    } else {
        buffer_views.push(BufferView {
            buffer: 0,
            byte_offset: positions_len + colors_len,
            byte_length: indices_len,
            byte_stride: None,
            target: Some(TARGET_ELEMENT_ARRAY_BUFFER),
        });
        accessors.push(Accessor {
            buffer_view: Some(2),
            byte_offset: 0,
            component_type: COMPONENT_UNSIGNED_INT,
            normalized: false,
            count: mesh.faces.len() * 3,
            kind: "SCALAR".to_string(),
            min: None,
            max: None,
        });
        (Some(2), MODE_TRIANGLES)
    };

    let document = Document {
        asset: Asset {
            version: "2.0".to_string(),
            generator: Some(GENERATOR.to_string()),
        },
        scene: Some(0),
        scenes: vec![Scene { nodes: vec![0] }],
        nodes: vec![Node { mesh: Some(0) }],
        meshes: vec![MeshDef {
            primitives: vec![Primitive {
                attributes,
                indices,
                mode: Some(mode),
            }],
        }],
        accessors,
        buffer_views,
        buffers: vec![Buffer {
            byte_length: bin.len(),
        }],
    };

    let out = assemble(&document, bin)?;
    tracing::debug!(
        "wrote GLB: {} vertices, {} faces, {} bytes",
        mesh.vertex_count(),
        mesh.face_count(),
        out.len()
    );
    Ok(out)
}

/// Frame a document and its binary buffer as GLB chunks
fn assemble(document: &Document, mut bin: Vec<u8>) -> Result<Vec<u8>> {
    let mut json = serde_json::to_vec(document)?;
    pad_to_four(&mut json, b' ');
    pad_to_four(&mut bin, 0);

    let total = HEADER_SIZE + CHUNK_HEADER_SIZE + json.len() + CHUNK_HEADER_SIZE + bin.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    out.extend_from_slice(&GLB_VERSION.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    out.extend_from_slice(&json);
    out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
    out.extend_from_slice(&bin);
    Ok(out)
}

/// Parse GLB bytes holding a single vertex-colored mesh primitive
///
/// Reads the first primitive of the first mesh. Colors may be stored as
/// floats or normalized unsigned integers, as RGB or RGBA.
pub fn read_glb(bytes: &[u8]) -> Result<ColoredMesh> {
    let (document, bin) = split_chunks(bytes)?;

    let primitive = document
        .meshes
        .first()
        .and_then(|m| m.primitives.first())
        .ok_or_else(|| MeshError::InvalidGlb("no mesh primitive".to_string()))?;

    let position_index = *primitive
        .attributes
        .get("POSITION")
        .ok_or_else(|| MeshError::InvalidGlb("primitive has no POSITION".to_string()))?;
    let positions: Vec<Vec3> = read_floats(&document, bin, position_index, &["VEC3"])?
        .chunks_exact(3)
        .map(Vec3::from_slice)
        .collect();

    let colors = match primitive.attributes.get("COLOR_0") {
        Some(&index) => {
            let accessor = accessor(&document, index)?;
            let width = component_width(&accessor.kind)?;
            read_floats(&document, bin, index, &["VEC3", "VEC4"])?
                .chunks_exact(width)
                .map(|c| {
                    if width == 4 {
                        Vec4::from_slice(c)
                    } else {
                        Vec4::new(c[0], c[1], c[2], 1.0)
                    }
                })
                .collect()
        }
        None => vec![Vec4::ONE; positions.len()],
    };

    let faces = match (primitive.mode.unwrap_or(MODE_TRIANGLES), primitive.indices) {
        (MODE_TRIANGLES, Some(index)) => {
            let indices = read_indices(&document, bin, index)?;
            if indices.len() % 3 != 0 {
                return Err(MeshError::InvalidFace(format!(
                    "{} indices is not a whole number of triangles",
                    indices.len()
                )));
            }
            indices.chunks_exact(3).map(|f| [f[0], f[1], f[2]]).collect()
        }
        (MODE_TRIANGLES, None) => {
            if positions.len() % 3 != 0 {
                return Err(MeshError::InvalidFace(format!(
                    "{} unindexed vertices is not a whole number of triangles",
                    positions.len()
                )));
            }
            (0..positions.len() as u32 / 3)
                .map(|t| [3 * t, 3 * t + 1, 3 * t + 2])
                .collect()
        }
        (MODE_POINTS, _) => Vec::new(),
        (mode, _) => {
            return Err(MeshError::InvalidGlb(format!(
                "unsupported primitive mode {}",
                mode
            )))
        }
    };

    ColoredMesh::new(Mesh::new(positions, faces)?, colors)
}

/// Write a colored mesh to a `.glb` file
pub fn export_glb(path: impl AsRef<Path>, colored: &ColoredMesh) -> Result<()> {
    let bytes = write_glb(colored)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Read a colored mesh from a `.glb` file
pub fn load_glb(path: impl AsRef<Path>) -> Result<ColoredMesh> {
    let bytes = std::fs::read(path)?;
    read_glb(&bytes)
}

fn split_chunks(bytes: &[u8]) -> Result<(Document, &[u8])> {
    let magic = read_u32_le(bytes, 0)?;
    if magic != GLB_MAGIC {
        return Err(MeshError::InvalidMagic {
            expected: GLB_MAGIC,
            found: magic,
        });
    }
    let version = read_u32_le(bytes, 4)?;
    if version != GLB_VERSION {
        return Err(MeshError::UnsupportedVersion(version));
    }
    let total = read_u32_le(bytes, 8)? as usize;
    if total > bytes.len() {
        return Err(MeshError::TruncatedData {
            expected_bytes: total,
            available_bytes: bytes.len(),
        });
    }
    let bytes = &bytes[..total];

    let mut json: Option<&[u8]> = None;
    let mut bin: &[u8] = &[];
    let mut offset = HEADER_SIZE;
    while offset < bytes.len() {
        let length = read_u32_le(bytes, offset)? as usize;
        let kind = read_u32_le(bytes, offset + 4)?;
        let start = offset + CHUNK_HEADER_SIZE;
        let data = slice(bytes, start, length)?;
        match kind {
            CHUNK_JSON if json.is_none() => json = Some(data),
            CHUNK_BIN if bin.is_empty() => bin = data,
            _ => {}
        }
        offset = start + length;
    }

    let json = json.ok_or_else(|| MeshError::InvalidGlb("missing JSON chunk".to_string()))?;
    let document: Document = serde_json::from_slice(json)?;
    if !document.asset.version.starts_with("2.") {
        return Err(MeshError::InvalidGlb(format!(
            "asset version {}",
            document.asset.version
        )));
    }
    Ok((document, bin))
}

fn accessor(document: &Document, index: usize) -> Result<&Accessor> {
    document
        .accessors
        .get(index)
        .ok_or_else(|| MeshError::InvalidGlb(format!("accessor {} does not exist", index)))
}

fn component_width(kind: &str) -> Result<usize> {
    match kind {
        "SCALAR" => Ok(1),
        "VEC2" => Ok(2),
        "VEC3" => Ok(3),
        "VEC4" => Ok(4),
        other => Err(MeshError::InvalidGlb(format!(
            "unsupported accessor type {}",
            other
        ))),
    }
}

fn component_size(component_type: u32) -> Result<usize> {
    match component_type {
        COMPONENT_UNSIGNED_BYTE => Ok(1),
        COMPONENT_UNSIGNED_SHORT => Ok(2),
        COMPONENT_UNSIGNED_INT | COMPONENT_FLOAT => Ok(4),
        other => Err(MeshError::InvalidGlb(format!(
            "unsupported component type {}",
            other
        ))),
    }
}

/// Resolve an accessor to its buffer view bytes and per-element offsets
fn element_offsets<'a>(
    document: &Document,
    bin: &'a [u8],
    index: usize,
) -> Result<(&'a [u8], Vec<usize>)> {
    let accessor = accessor(document, index)?;
    let view_index = accessor
        .buffer_view
        .ok_or_else(|| MeshError::InvalidGlb(format!("accessor {} has no buffer view", index)))?;
    let view = document
        .buffer_views
        .get(view_index)
        .ok_or_else(|| MeshError::InvalidGlb(format!("buffer view {} does not exist", view_index)))?;
    if view.buffer != 0 {
        return Err(MeshError::InvalidGlb(
            "only the embedded binary buffer is supported".to_string(),
        ));
    }

    let data = slice(bin, view.byte_offset, view.byte_length)?;
    let element_size =
        component_size(accessor.component_type)? * component_width(&accessor.kind)?;
    let stride = view.byte_stride.unwrap_or(element_size);
    if stride < element_size {
        return Err(MeshError::InvalidGlb(format!(
            "accessor {} has stride {} below its element size {}",
            index, stride, element_size
        )));
    }
    if accessor.count == 0 {
        return Ok((data, Vec::new()));
    }

    // The last element must fit inside the view before anything is allocated
    let end = (accessor.count - 1)
        .checked_mul(stride)
        .and_then(|span| span.checked_add(accessor.byte_offset))
        .and_then(|last| last.checked_add(element_size));
    match end {
        Some(end) if end <= data.len() => {}
        _ => {
            return Err(MeshError::TruncatedData {
                expected_bytes: end.unwrap_or(usize::MAX),
                available_bytes: data.len(),
            })
        }
    }

    let offsets = (0..accessor.count)
        .map(|i| accessor.byte_offset + i * stride)
        .collect();
    Ok((data, offsets))
}

fn read_floats(
    document: &Document,
    bin: &[u8],
    index: usize,
    kinds: &[&str],
) -> Result<Vec<f32>> {
    let accessor = accessor(document, index)?;
    if !kinds.contains(&accessor.kind.as_str()) {
        return Err(MeshError::InvalidGlb(format!(
            "accessor {} has type {}, expected one of {:?}",
            index, accessor.kind, kinds
        )));
    }
    let width = component_width(&accessor.kind)?;
    let size = component_size(accessor.component_type)?;
    let (data, offsets) = element_offsets(document, bin, index)?;

    let mut out = Vec::with_capacity(offsets.len() * width);
    for base in offsets {
        for c in 0..width {
            let at = base + c * size;
            let value = match accessor.component_type {
                COMPONENT_FLOAT => f32::from_bits(read_u32_le(data, at)?),
                COMPONENT_UNSIGNED_BYTE if accessor.normalized => {
                    slice(data, at, 1)?[0] as f32 / 255.0
                }
                COMPONENT_UNSIGNED_SHORT if accessor.normalized => {
                    read_u16_le(data, at)? as f32 / 65535.0
                }
                other => {
                    return Err(MeshError::InvalidGlb(format!(
                        "accessor {} has non-float component type {}",
                        index, other
                    )))
                }
            };
            out.push(value);
        }
    }
    Ok(out)
}

fn read_indices(document: &Document, bin: &[u8], index: usize) -> Result<Vec<u32>> {
    let accessor = accessor(document, index)?;
    if accessor.kind != "SCALAR" {
        return Err(MeshError::InvalidGlb(format!(
            "index accessor has type {}",
            accessor.kind
        )));
    }
    let (data, offsets) = element_offsets(document, bin, index)?;

    offsets
        .into_iter()
        .map(|at| match accessor.component_type {
            COMPONENT_UNSIGNED_BYTE => Ok(slice(data, at, 1)?[0] as u32),
            COMPONENT_UNSIGNED_SHORT => Ok(read_u16_le(data, at)? as u32),
            COMPONENT_UNSIGNED_INT => read_u32_le(data, at),
            other => Err(MeshError::InvalidGlb(format!(
                "unsupported index component type {}",
                other
            ))),
        })
        .collect()
}

fn slice(data: &[u8], offset: usize, length: usize) -> Result<&[u8]> {
    let end = offset
        .checked_add(length)
        .filter(|&end| end <= data.len())
        .ok_or(MeshError::TruncatedData {
            expected_bytes: offset.saturating_add(length),
            available_bytes: data.len(),
        })?;
    Ok(&data[offset..end])
}

fn read_u16_le(data: &[u8], offset: usize) -> Result<u16> {
    let b = slice(data, offset, 2)?;
    Ok(u16::from_le_bytes([b[0], b[1]]))
}

fn read_u32_le(data: &[u8], offset: usize) -> Result<u32> {
    let b = slice(data, offset, 4)?;
    Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

fn push_f32s(buf: &mut Vec<u8>, values: &[f32]) {
    for v in values {
        buf.extend_from_slice(&v.to_le_bytes());
    }
}

fn pad_to_four(buf: &mut Vec<u8>, fill: u8) {
    while buf.len() % 4 != 0 {
        buf.push(fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::apply_gradient;
    use crate::Axis;

    fn tetrahedron() -> ColoredMesh {
        let mesh = Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(0.0, 2.0, 0.0),
            ],
            vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]],
        )
        .unwrap();
        apply_gradient(mesh, Axis::Y).unwrap()
    }

    #[test]
    fn test_header_and_alignment() {
        let bytes = write_glb(&tetrahedron()).unwrap();

        assert_eq!(&bytes[0..4], b"glTF");
        assert_eq!(read_u32_le(&bytes, 4).unwrap(), 2);
        assert_eq!(read_u32_le(&bytes, 8).unwrap() as usize, bytes.len());
        assert_eq!(bytes.len() % 4, 0);

        let json_len = read_u32_le(&bytes, 12).unwrap() as usize;
        assert_eq!(json_len % 4, 0);
        assert_eq!(&bytes[16..20], b"JSON");
        assert_eq!(&bytes[20 + json_len + 4..20 + json_len + 8], b"BIN\0");
    }

    #[test]
    fn test_json_describes_colored_triangles() {
        let bytes = write_glb(&tetrahedron()).unwrap();
        let (document, bin) = split_chunks(&bytes).unwrap();

        let primitive = &document.meshes[0].primitives[0];
        assert_eq!(primitive.mode, Some(MODE_TRIANGLES));
        assert_eq!(primitive.attributes["POSITION"], 0);
        assert_eq!(primitive.attributes["COLOR_0"], 1);

        let positions = &document.accessors[0];
        assert_eq!(positions.min, Some(vec![0.0, 0.0, 0.0]));
        assert_eq!(positions.max, Some(vec![1.0, 2.0, 1.0]));
        assert_eq!(document.accessors[1].kind, "VEC4");
        assert_eq!(document.accessors[2].count, 12);
        assert_eq!(document.buffers[0].byte_length, bin.len());
    }

    #[test]
    fn test_read_back_preserves_mesh_and_colors() {
        let original = tetrahedron();
        let decoded = read_glb(&write_glb(&original).unwrap()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_faceless_mesh_written_as_points() {
        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::Y], Vec::new()).unwrap();
        let colored = apply_gradient(mesh, Axis::Y).unwrap();

        let decoded = read_glb(&write_glb(&colored).unwrap()).unwrap();
        assert_eq!(decoded.mesh.vertex_count(), 2);
        assert_eq!(decoded.mesh.face_count(), 0);
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut bytes = write_glb(&tetrahedron()).unwrap();
        bytes[0] = b'x';
        assert!(matches!(
            read_glb(&bytes),
            Err(MeshError::InvalidMagic { .. })
        ));
    }

    #[test]
    fn test_rejects_truncated_file() {
        let bytes = write_glb(&tetrahedron()).unwrap();
        assert!(matches!(
            read_glb(&bytes[..bytes.len() - 8]),
            Err(MeshError::TruncatedData { .. })
        ));
        assert!(matches!(
            read_glb(&bytes[..6]),
            Err(MeshError::TruncatedData { .. })
        ));
    }

    /// Re-encode a valid file after editing its JSON document
    fn edited(edit: impl FnOnce(&mut Document)) -> Vec<u8> {
        let bytes = write_glb(&tetrahedron()).unwrap();
        let (mut document, bin) = split_chunks(&bytes).unwrap();
        let bin = bin.to_vec();
        edit(&mut document);
        assemble(&document, bin).unwrap()
    }

    #[test]
    fn test_rejects_accessor_offset_overflow() {
        let bytes = edited(|document| document.accessors[0].byte_offset = usize::MAX);
        assert!(matches!(
            read_glb(&bytes),
            Err(MeshError::TruncatedData { .. })
        ));
    }

    #[test]
    fn test_rejects_huge_accessor_count() {
        let bytes = edited(|document| document.accessors[0].count = 1 << 62);
        assert!(matches!(
            read_glb(&bytes),
            Err(MeshError::TruncatedData { .. })
        ));

        let bytes = edited(|document| document.accessors[2].count = usize::MAX);
        assert!(matches!(
            read_glb(&bytes),
            Err(MeshError::TruncatedData { .. })
        ));
    }

    #[test]
    fn test_rejects_stride_below_element_size() {
        let bytes = edited(|document| {
            document.buffer_views[0].byte_stride = Some(0);
            document.accessors[0].count = 1 << 40;
        });
        assert!(matches!(read_glb(&bytes), Err(MeshError::InvalidGlb(_))));
    }

    #[test]
    fn test_rejects_other_versions() {
        let mut bytes = write_glb(&tetrahedron()).unwrap();
        bytes[4] = 1;
        assert!(matches!(
            read_glb(&bytes),
            Err(MeshError::UnsupportedVersion(1))
        ));
    }
}
