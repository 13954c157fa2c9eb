//! Triangle meshes and per-vertex colors

use crate::error::{MeshError, Result};
use glam::{Vec3, Vec4};
use std::fmt;
use std::str::FromStr;

/// Coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    /// Pick this axis' component of a point
    pub fn component(self, point: Vec3) -> f32 {
        match self {
            Axis::X => point.x,
            Axis::Y => point.y,
            Axis::Z => point.z,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            other => Err(format!("Unknown axis '{}', expected x, y or z", other)),
        }
    }
}

/// Indexed triangle mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions
    pub positions: Vec<Vec3>,
    /// Triangles as indices into `positions`
    pub faces: Vec<[u32; 3]>,
}

impl Mesh {
    /// Build a mesh, checking that every face index is in range
    pub fn new(positions: Vec<Vec3>, faces: Vec<[u32; 3]>) -> Result<Self> {
        let mesh = Self { positions, faces };
        mesh.validate()?;
        Ok(mesh)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Check that the mesh has vertices and that faces stay in range
    pub fn validate(&self) -> Result<()> {
        if self.positions.is_empty() {
            return Err(MeshError::EmptyMesh);
        }
        let vertex_count = self.positions.len();
        for (face, indices) in self.faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Smallest and largest coordinate along `axis`
    pub fn extent(&self, axis: Axis) -> Result<(f32, f32)> {
        if self.positions.is_empty() {
            return Err(MeshError::EmptyMesh);
        }
        Ok(self
            .positions
            .iter()
            .map(|p| axis.component(*p))
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), c| {
                (lo.min(c), hi.max(c))
            }))
    }

    /// Axis-aligned bounding box as (min, max)
    pub fn bounds(&self) -> Result<(Vec3, Vec3)> {
        if self.positions.is_empty() {
            return Err(MeshError::EmptyMesh);
        }
        Ok(self.positions.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        ))
    }
}

/// Mesh with one RGBA color per vertex
#[derive(Debug, Clone, PartialEq)]
pub struct ColoredMesh {
    pub mesh: Mesh,
    /// RGBA in `[0, 1]`, parallel to `mesh.positions`
    pub colors: Vec<Vec4>,
}

impl ColoredMesh {
    pub fn new(mesh: Mesh, colors: Vec<Vec4>) -> Result<Self> {
        let colored = Self { mesh, colors };
        colored.validate()?;
        Ok(colored)
    }

    pub fn validate(&self) -> Result<()> {
        self.mesh.validate()?;
        if self.colors.len() != self.mesh.positions.len() {
            return Err(MeshError::ColorCountMismatch {
                expected: self.mesh.positions.len(),
                found: self.colors.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        Mesh::new(
            vec![Vec3::ZERO, Vec3::new(1.0, 5.0, 0.0), Vec3::new(0.0, 10.0, -2.0)],
            vec![[0, 1, 2]],
        )
        .unwrap()
    }

    #[test]
    fn test_extent_per_axis() {
        let mesh = triangle();
        assert_eq!(mesh.extent(Axis::Y).unwrap(), (0.0, 10.0));
        assert_eq!(mesh.extent(Axis::Z).unwrap(), (-2.0, 0.0));
        assert_eq!(
            mesh.bounds().unwrap(),
            (Vec3::new(0.0, 0.0, -2.0), Vec3::new(1.0, 10.0, 0.0))
        );
    }

    #[test]
    fn test_out_of_range_face_rejected() {
        let result = Mesh::new(vec![Vec3::ZERO], vec![[0, 0, 3]]);
        assert!(matches!(
            result,
            Err(MeshError::IndexOutOfRange {
                face: 0,
                index: 3,
                vertex_count: 1
            })
        ));
    }

    #[test]
    fn test_empty_mesh_rejected() {
        assert!(matches!(
            Mesh::new(Vec::new(), Vec::new()),
            Err(MeshError::EmptyMesh)
        ));
        assert!(matches!(
            Mesh::default().extent(Axis::Y),
            Err(MeshError::EmptyMesh)
        ));
    }

    #[test]
    fn test_color_count_must_match() {
        let result = ColoredMesh::new(triangle(), vec![Vec4::ONE]);
        assert!(matches!(
            result,
            Err(MeshError::ColorCountMismatch {
                expected: 3,
                found: 1
            })
        ));
    }

    #[test]
    fn test_axis_parse() {
        assert_eq!("Y".parse::<Axis>().unwrap(), Axis::Y);
        assert_eq!(" z ".parse::<Axis>().unwrap(), Axis::Z);
        assert!("w".parse::<Axis>().is_err());
        assert_eq!(Axis::default(), Axis::Y);
        assert_eq!(Axis::X.to_string(), "x");
    }
}
