/*!
A 2-D [Delaunay triangulation](https://en.wikipedia.org/wiki/Delaunay_triangulation)
library built around an incremental advancing-front algorithm and a
corner-table mesh representation.

Given a finite set of planar points (at least 3, no two coincident, not all
collinear), [`Mesh::new`] produces a triangulation in which every triangle's
circumscribed circle contains no other input point in its interior, and
exposes a topology ([`Corner`]) that permits O(1) navigation between adjacent
corners of adjacent triangles.

# Example

```rust
use advancing_front_mesh::Mesh;

let points = vec![
    (0.0, 0.0),
    (1.0, 0.0),
    (1.0, 1.0),
    (0.0, 1.0),
    (0.5, 0.5),
];

let mesh = Mesh::new_from_tuples(&points).expect("a valid triangulation exists");
assert_eq!(mesh.triangles().count(), 4);
assert_eq!(mesh.edges().len(), 8);
```
*/

mod builder;
pub mod geom;
mod mesh;

pub use geom::{intersect_line_circle, intersect_lines, Circle, Line, Side, Vec2};
pub use mesh::{Corner, Edge, Triangle, TriangleId, Vertex, VertexId};

use thiserror::Error;

/// Failure modes surfaced synchronously from mesh and geometry construction.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Fewer than 3 input points, a duplicate point, or all input points
    /// collinear (the first triangle's circumcenter would be undefined).
    #[error("invalid triangulation input: {0}")]
    InvalidInput(String),

    /// Attempted to build a [`Line`] from two equal points.
    #[error("cannot construct a Line from two equal points: {0:?}")]
    ConstructOfDegenerateLine(Vec2),

    /// Attempted to build a mesh [`Edge`] from a vertex paired with itself.
    #[error("cannot construct a mesh Edge from a vertex and itself")]
    ConstructOfDegenerateEdge,
}

pub use mesh::Mesh;

impl Mesh {
    /// Triangulate `points`. Fails with [`MeshError::InvalidInput`] if fewer
    /// than 3 distinct points are given, if any two points coincide exactly,
    /// or if all points are collinear.
    pub fn new(points: &[Vec2]) -> Result<Mesh, MeshError> {
        validate(points)?;
        builder::build(points.to_vec())
    }

    /// Convenience constructor accepting raw `(x, y)` pairs.
    pub fn new_from_tuples(points: &[(f64, f64)]) -> Result<Mesh, MeshError> {
        let points: Vec<Vec2> = points.iter().map(|&(x, y)| Vec2::new(x, y)).collect();
        Mesh::new(&points)
    }
}

fn validate(points: &[Vec2]) -> Result<(), MeshError> {
    if points.len() < 3 {
        return Err(MeshError::InvalidInput(format!(
            "at least 3 points are required, got {}",
            points.len()
        )));
    }

    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            if points[i] == points[j] {
                return Err(MeshError::InvalidInput(format!(
                    "duplicate point at indices {i} and {j}: {:?}",
                    points[i]
                )));
            }
        }
    }

    let p0 = points[0];
    let dir = points[1..]
        .iter()
        .map(|&p| p - p0)
        .find(|v| v.mag() > 0.0)
        .expect("at least one distinct point, checked above");

    let collinear = points
        .iter()
        .all(|&p| (p - p0).x * dir.y - (p - p0).y * dir.x == 0.0);

    if collinear {
        return Err(MeshError::InvalidInput(
            "all input points are collinear".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_fewer_than_3_points() {
        let err = Mesh::new_from_tuples(&[(0.0, 0.0), (1.0, 0.0)]).unwrap_err();
        assert!(matches!(err, MeshError::InvalidInput(_)));
    }

    #[test]
    fn rejects_duplicate_points() {
        let err = Mesh::new_from_tuples(&[(0.0, 0.0), (1.0, 0.0), (1.0, 0.0)]).unwrap_err();
        assert!(matches!(err, MeshError::InvalidInput(_)));
    }

    #[test]
    fn rejects_collinear_points() {
        let err = Mesh::new_from_tuples(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]).unwrap_err();
        assert!(matches!(err, MeshError::InvalidInput(_)));
    }

    #[test]
    fn s6_unit_square_plus_center() {
        let points = [
            (0.0, 0.0),
            (1.0, 0.0),
            (0.0, 1.0),
            (1.0, 1.0),
            (0.5, 0.5),
        ];
        let mesh = Mesh::new_from_tuples(&points).unwrap();

        assert_eq!(mesh.triangles().count(), 4);
        assert_eq!(mesh.edges().len(), 8);

        let center_vertex = mesh
            .vertices()
            .find(|v| (v.loc() - Vec2::new(0.5, 0.5)).mag() < 1e-9)
            .unwrap();

        for t in mesh.triangles() {
            assert!(t.vertices().iter().any(|v| *v == center_vertex));
        }

        let start = center_vertex.corner();
        let mut c = start;
        let mut seen = 0;
        loop {
            seen += 1;
            c = c.swing(false);
            if c == start {
                break;
            }
            assert!(seen <= 4, "center fan should close within 4 swings");
        }
        assert_eq!(seen, 4);
    }

    #[test]
    fn minimal_triangle() {
        let points = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)];
        let mesh = Mesh::new_from_tuples(&points).unwrap();
        assert_eq!(mesh.triangles().count(), 1);
        assert_eq!(mesh.edges().len(), 3);

        let t = mesh.triangles().next().unwrap();
        let c0 = t.corner(0);
        assert_eq!(c0.next().next().next(), c0);
        assert_eq!(c0.prev(), c0.next().next());

        // All three corners are on the hull: swinging without `sup` hits
        // the boundary immediately.
        for c in t.corners() {
            assert_eq!(c.swing(false), c);
            assert_eq!(c.unswing(false), c);
            // but following the super-link always resolves to a real corner
            let _ = c.swing(true);
            let _ = c.unswing(true);
        }
    }
}
