//! Mesh coloring and export for meshchat
//!
//! Turns OBJ text (as produced by mesh-generating language models) into a
//! binary glTF file whose vertices are colored along one axis, from blue at
//! the lowest coordinate to red at the highest.
//!
//! ## Pipeline
//!
//! ```text
//! OBJ text
//!     ↓ obj::parse_obj()
//! Mesh (positions + triangles)
//!     ↓ gradient::apply_gradient()
//! ColoredMesh (RGBA per vertex)
//!     ↓ glb::write_glb()
//! GLB bytes
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use meshchat_mesh::{colorize_obj, read_glb, Axis};
//!
//! let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
//! let glb = colorize_obj(obj, Axis::Y).unwrap();
//!
//! let mesh = read_glb(&glb).unwrap();
//! assert_eq!(mesh.mesh.face_count(), 1);
//! ```

pub mod error;
pub mod glb;
pub mod gradient;
pub mod mesh;
pub mod obj;

pub use error::{MeshError, Result};
pub use glb::{export_glb, load_glb, read_glb, write_glb};
pub use gradient::{apply_gradient, gradient_color, normalized_coordinates, HIGH_COLOR, LOW_COLOR};
pub use mesh::{Axis, ColoredMesh, Mesh};
pub use obj::{extract_obj_text, parse_obj};

/// Parse OBJ text, color it along `axis` and encode it as GLB
pub fn colorize_obj(text: &str, axis: Axis) -> Result<Vec<u8>> {
    let mesh = parse_obj(text)?;
    let colored = apply_gradient(mesh, axis)?;
    write_glb(&colored)
}
