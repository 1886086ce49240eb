//! Convex planar polygons, the faces every `Solid` is made of.

use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use crate::solid::plane::Plane;
use crate::solid::vertex::Vertex;
use nalgebra::{Point3, Vector3};

/// A convex polygon with its cached supporting plane.
///
/// Winding is counter-clockwise seen from the front, so `plane.normal`
/// points out of the solid the polygon bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Vertex>,
    pub plane: Plane,
}

impl Polygon {
    /// Create a polygon, computing its plane from the vertices.
    pub fn new(vertices: Vec<Vertex>) -> Self {
        let plane = Plane::from_vertices(&vertices);
        Polygon { vertices, plane }
    }

    /// Create a polygon that keeps an already known plane.
    pub const fn with_plane(vertices: Vec<Vertex>, plane: Plane) -> Self {
        Polygon { vertices, plane }
    }

    /// Create a polygon from bare points; vertex normals are the face normal.
    pub fn from_points(points: &[Point3<Real>]) -> Self {
        let mut polygon = Polygon::new(
            points
                .iter()
                .map(|p| Vertex::new(*p, Vector3::zeros()))
                .collect(),
        );
        polygon.set_new_normal();
        polygon
    }

    /// Reverse winding and flip the plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        for v in &mut self.vertices {
            v.flip();
        }
        self.plane.flip();
    }

    /// Recompute the plane and write its normal into every vertex.
    pub fn set_new_normal(&mut self) {
        self.plane = Plane::from_vertices(&self.vertices);
        let normal = self.plane.normal();
        for v in &mut self.vertices {
            v.normal = normal;
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
        let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
        for v in &self.vertices {
            mins = mins.inf(&v.pos);
            maxs = maxs.sup(&v.pos);
        }
        Aabb::new(mins, maxs)
    }

    pub fn centroid(&self) -> Point3<Real> {
        let sum = self
            .vertices
            .iter()
            .fold(Vector3::zeros(), |acc, v| acc + v.pos.coords);
        Point3::from(sum / self.vertices.len().max(1) as Real)
    }

    /// Iterator over consecutive vertex pairs, closing back to the first.
    pub fn edges(&self) -> impl Iterator<Item = (&Vertex, &Vertex)> {
        self.vertices
            .iter()
            .zip(self.vertices.iter().cycle().skip(1))
    }

    /// Fan triangulation; valid because every polygon is convex.
    pub fn triangulate(&self) -> Vec<[Vertex; 3]> {
        if self.vertices.len() < 3 {
            return Vec::new();
        }
        let anchor = self.vertices[0];
        self.vertices
            .windows(2)
            .skip(1)
            .map(|pair| [anchor, pair[0], pair[1]])
            .collect()
    }
}
