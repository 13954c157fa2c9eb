//! Error types for mesh loading, coloring and export

use crate::Axis;
use thiserror::Error;

/// Mesh processing error types
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("OBJ parse error: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("Mesh has no vertices")]
    EmptyMesh,

    #[error("Vertex {index} has a non-finite coordinate")]
    NonFiniteVertex { index: usize },

    #[error("Degenerate mesh: every vertex has {axis} = {value}, cannot build a gradient")]
    DegenerateExtent { axis: Axis, value: f32 },

    #[error("Face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("Invalid face data: {0}")]
    InvalidFace(String),

    #[error("Expected {expected} vertex colors, found {found}")]
    ColorCountMismatch { expected: usize, found: usize },

    #[error("Invalid GLB magic number: expected 0x{expected:08X}, found 0x{found:08X}")]
    InvalidMagic { expected: u32, found: u32 },

    #[error("Unsupported glTF version: {0}")]
    UnsupportedVersion(u32),

    #[error("Truncated data: expected {expected_bytes} bytes, only {available_bytes} available")]
    TruncatedData {
        expected_bytes: usize,
        available_bytes: usize,
    },

    #[error("Invalid GLB: {0}")]
    InvalidGlb(String),

    #[error("glTF JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for mesh operations
pub type Result<T> = std::result::Result<T, MeshError>;
