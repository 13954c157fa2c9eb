//! Per-vertex color gradients along one axis

use crate::error::{MeshError, Result};
use crate::mesh::{Axis, ColoredMesh, Mesh};
use glam::Vec4;

/// Color of the lowest vertex (opaque blue)
pub const LOW_COLOR: Vec4 = Vec4::new(0.0, 0.0, 1.0, 1.0);

/// Color of the highest vertex (opaque red)
pub const HIGH_COLOR: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);

/// Map a normalized coordinate to `(t, 0, 1 - t, 1)`
pub fn gradient_color(t: f32) -> Vec4 {
    LOW_COLOR.lerp(HIGH_COLOR, t)
}

/// Normalize every vertex coordinate on `axis` into `[0, 1]`
///
/// Fails instead of dividing by zero when all vertices share the same
/// coordinate, and rejects NaN or infinite positions.
pub fn normalized_coordinates(mesh: &Mesh, axis: Axis) -> Result<Vec<f32>> {
    if mesh.positions.is_empty() {
        return Err(MeshError::EmptyMesh);
    }
    if let Some(index) = mesh.positions.iter().position(|p| !p.is_finite()) {
        return Err(MeshError::NonFiniteVertex { index });
    }

    let (min, max) = mesh.extent(axis)?;
    if max <= min {
        return Err(MeshError::DegenerateExtent { axis, value: min });
    }

    // f64 keeps the span finite even for coordinates near f32::MAX
    let (min, span) = (min as f64, max as f64 - min as f64);
    Ok(mesh
        .positions
        .iter()
        .map(|p| ((axis.component(*p) as f64 - min) / span).clamp(0.0, 1.0) as f32)
        .collect())
}

/// Color each vertex from blue (lowest) to red (highest) along `axis`
pub fn apply_gradient(mesh: Mesh, axis: Axis) -> Result<ColoredMesh> {
    let colors = normalized_coordinates(&mesh, axis)?
        .into_iter()
        .map(gradient_color)
        .collect();
    ColoredMesh::new(mesh, colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn column(ys: &[f32]) -> Mesh {
        let positions = ys.iter().map(|&y| Vec3::new(0.0, y, 0.0)).collect();
        Mesh::new(positions, Vec::new()).unwrap()
    }

    #[test]
    fn test_normalized_heights() {
        let mesh = column(&[0.0, 5.0, 10.0]);
        assert_eq!(
            normalized_coordinates(&mesh, Axis::Y).unwrap(),
            vec![0.0, 0.5, 1.0]
        );
    }

    #[test]
    fn test_blue_to_red_colors() {
        let colored = apply_gradient(column(&[0.0, 5.0, 10.0]), Axis::Y).unwrap();
        assert_eq!(
            colored.colors,
            vec![
                Vec4::new(0.0, 0.0, 1.0, 1.0),
                Vec4::new(0.5, 0.0, 0.5, 1.0),
                Vec4::new(1.0, 0.0, 0.0, 1.0),
            ]
        );
    }

    #[test]
    fn test_order_does_not_matter() {
        let colored = apply_gradient(column(&[10.0, -10.0, 0.0]), Axis::Y).unwrap();
        assert_eq!(colored.colors[0], HIGH_COLOR);
        assert_eq!(colored.colors[1], LOW_COLOR);
        assert_eq!(colored.colors[2], gradient_color(0.5));
    }

    #[test]
    fn test_flat_mesh_is_degenerate() {
        let result = apply_gradient(column(&[2.5, 2.5, 2.5]), Axis::Y);
        assert!(matches!(
            result,
            Err(MeshError::DegenerateExtent { axis: Axis::Y, value }) if value == 2.5
        ));
    }

    #[test]
    fn test_single_vertex_is_degenerate() {
        assert!(matches!(
            normalized_coordinates(&column(&[1.0]), Axis::Y),
            Err(MeshError::DegenerateExtent { .. })
        ));
    }

    #[test]
    fn test_flat_on_y_but_not_on_x() {
        let mesh = Mesh::new(
            vec![Vec3::new(0.0, 1.0, 0.0), Vec3::new(4.0, 1.0, 0.0)],
            Vec::new(),
        )
        .unwrap();
        assert!(apply_gradient(mesh.clone(), Axis::Y).is_err());
        let colored = apply_gradient(mesh, Axis::X).unwrap();
        assert_eq!(colored.colors, vec![LOW_COLOR, HIGH_COLOR]);
    }

    #[test]
    fn test_nan_vertex_rejected() {
        let mesh = column(&[0.0, f32::NAN, 1.0]);
        assert!(matches!(
            normalized_coordinates(&mesh, Axis::Y),
            Err(MeshError::NonFiniteVertex { index: 1 })
        ));
    }

    #[test]
    fn test_extreme_coordinates_stay_finite() {
        let mesh = column(&[-f32::MAX, 0.0, f32::MAX]);
        let t = normalized_coordinates(&mesh, Axis::Y).unwrap();
        assert_eq!(t, vec![0.0, 0.5, 1.0]);
    }
}
