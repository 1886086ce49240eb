//! Oriented planes and the polygon splitting used by the BSP tree.

use crate::float_types::{Real, tolerance};
use crate::solid::polygon::Polygon;
use crate::solid::vertex::Vertex;
use nalgebra::{Point3, Vector3};

// Classification bits, combined with `|` over the vertices of a polygon.
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// An oriented plane `normal · p = w` with a unit `normal`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub normal: Vector3<Real>,
    pub w: Real,
}

impl Plane {
    /// Create a plane from a (not necessarily unit) normal and a point on it.
    pub fn from_normal_and_point(normal: Vector3<Real>, point: &Point3<Real>) -> Self {
        let normal = normal.normalize();
        Plane {
            w: normal.dot(&point.coords),
            normal,
        }
    }

    /// The XY plane (`z = 0`), normal +Z.
    pub fn xy() -> Self {
        Plane {
            normal: Vector3::z(),
            w: 0.0,
        }
    }

    /// Plane of a convex vertex loop.
    ///
    /// Uses Newell's method, which stays well conditioned when the first three
    /// vertices happen to be (nearly) collinear, as they often are after
    /// repeated BSP splits.
    pub fn from_vertices(vertices: &[Vertex]) -> Self {
        let normal = vertices
            .iter()
            .zip(vertices.iter().cycle().skip(1))
            .fold(Vector3::zeros(), |acc, (curr, next)| {
                acc + Vector3::new(
                    (curr.pos.y - next.pos.y) * (curr.pos.z + next.pos.z),
                    (curr.pos.z - next.pos.z) * (curr.pos.x + next.pos.x),
                    (curr.pos.x - next.pos.x) * (curr.pos.y + next.pos.y),
                )
            });

        if normal.norm_squared() < Real::EPSILON * Real::EPSILON || vertices.is_empty() {
            return Plane::xy();
        }

        let centroid = vertices
            .iter()
            .fold(Vector3::zeros(), |acc, v| acc + v.pos.coords)
            / vertices.len() as Real;
        Plane::from_normal_and_point(normal, &Point3::from(centroid))
    }

    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    pub const fn offset(&self) -> Real {
        self.w
    }

    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    pub fn flipped(&self) -> Self {
        Plane {
            normal: -self.normal,
            w: -self.w,
        }
    }

    /// Signed distance of `point` from the plane (positive in front).
    #[inline]
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Classify a point as `FRONT`, `BACK` or `COPLANAR`.
    #[inline]
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let t = self.signed_distance(point);
        if t < -tolerance() {
            BACK
        } else if t > tolerance() {
            FRONT
        } else {
            COPLANAR
        }
    }

    /// Same supporting plane and same orientation, within tolerance.
    pub fn coincides_with(&self, other: &Plane) -> bool {
        (self.normal - other.normal).norm() < tolerance() && (self.w - other.w).abs() < tolerance()
    }

    /// Splits `polygon` by this plane, returning four buckets:
    /// `(coplanar_front, coplanar_back, front, back)`.
    #[allow(clippy::type_complexity)]
    pub fn split_polygon(
        &self,
        polygon: &Polygon,
    ) -> (Vec<Polygon>, Vec<Polygon>, Vec<Polygon>, Vec<Polygon>) {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();

        let types: Vec<i8> = polygon
            .vertices
            .iter()
            .map(|v| self.orient_point(&v.pos))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            },
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let count = polygon.vertices.len();
                let mut split_front = Vec::with_capacity(count + 1);
                let mut split_back = Vec::with_capacity(count + 1);

                for i in 0..count {
                    let j = (i + 1) % count;
                    let (type_i, type_j) = (types[i], types[j]);
                    let vertex_i = &polygon.vertices[i];
                    let vertex_j = &polygon.vertices[j];

                    if type_i != BACK {
                        split_front.push(*vertex_i);
                    }
                    if type_i != FRONT {
                        split_back.push(*vertex_i);
                    }

                    if (type_i | type_j) == SPANNING {
                        let denom = self.normal.dot(&(vertex_j.pos - vertex_i.pos));
                        if denom.abs() > Real::EPSILON {
                            let t = (self.w - self.normal.dot(&vertex_i.pos.coords)) / denom;
                            let vertex_new = vertex_i.interpolate(vertex_j, t);
                            split_front.push(vertex_new);
                            split_back.push(vertex_new);
                        }
                    }
                }

                // keep the parent plane; recomputing it from split vertices drifts
                if split_front.len() >= 3 {
                    front.push(Polygon::with_plane(split_front, polygon.plane.clone()));
                }
                if split_back.len() >= 3 {
                    back.push(Polygon::with_plane(split_back, polygon.plane.clone()));
                }
            },
        }

        (coplanar_front, coplanar_back, front, back)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::from_points(&[
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(-1.0, 1.0, 0.0),
        ])
    }

    #[test]
    fn newell_plane_of_square() {
        let plane = square().plane;
        assert!((plane.normal - Vector3::z()).norm() < 1e-12);
        assert!(plane.w.abs() < 1e-12);
    }

    #[test]
    fn split_square_through_middle() {
        let splitter = Plane::from_normal_and_point(Vector3::x(), &Point3::origin());
        let (cf, cb, front, back) = splitter.split_polygon(&square());
        assert!(cf.is_empty() && cb.is_empty());
        assert_eq!(front.len(), 1);
        assert_eq!(back.len(), 1);
        assert!(front[0].vertices.iter().all(|v| v.pos.x >= -1e-12));
        assert!(back[0].vertices.iter().all(|v| v.pos.x <= 1e-12));
    }

    #[test]
    fn coplanar_polygons_sorted_by_orientation() {
        let (cf, cb, _, _) = Plane::xy().split_polygon(&square());
        assert_eq!((cf.len(), cb.len()), (1, 0));
        let (cf, cb, _, _) = Plane::xy().flipped().split_polygon(&square());
        assert_eq!((cf.len(), cb.len()), (0, 1));
    }
}
