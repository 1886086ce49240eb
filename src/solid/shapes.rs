//! Primitive solids: boxes and planar profiles extruded into prisms.

use crate::errors::{MagazineError, MagazineResult};
use crate::float_types::{Real, tolerance};
use crate::solid::Solid;
use crate::solid::polygon::Polygon;
use geo::{Coord, LineString, Polygon as GeoPolygon, TriangulateEarcut};
use nalgebra::{Point3, Vector3};

/// A sketching plane: 2D profile coordinates `(u, v)` map to
/// `origin + u * x_dir + v * y_dir`, and extrusion runs along `normal`.
///
/// `y_dir` is `normal × x_dir`, so `(x_dir, y_dir, normal)` is right-handed.
#[derive(Debug, Clone, PartialEq)]
pub struct Workplane {
    pub origin: Point3<Real>,
    pub x_dir: Vector3<Real>,
    pub normal: Vector3<Real>,
}

impl Workplane {
    pub fn new(origin: Point3<Real>, x_dir: Vector3<Real>, normal: Vector3<Real>) -> Self {
        Workplane {
            origin,
            x_dir: x_dir.normalize(),
            normal: normal.normalize(),
        }
    }

    /// The XY plane through the origin, extruding along +Z.
    pub fn xy() -> Self {
        Workplane::new(Point3::origin(), Vector3::x(), Vector3::z())
    }

    /// The XZ plane at `Y = y`: local `u` is +X, local `v` is +Z and the
    /// extrusion direction is -Y.
    pub fn xz_at(y: Real) -> Self {
        Workplane::new(Point3::new(0.0, y, 0.0), Vector3::x(), -Vector3::y())
    }

    pub fn y_dir(&self) -> Vector3<Real> {
        self.normal.cross(&self.x_dir)
    }

    #[inline]
    pub fn to_world(&self, [u, v]: [Real; 2]) -> Point3<Real> {
        self.origin + self.x_dir * u + self.y_dir() * v
    }
}

/// Drop consecutive duplicates, including a repeated closing point.
fn dedup_ring(points: &[[Real; 2]]) -> Vec<[Real; 2]> {
    let tol = tolerance();
    let same = |a: &[Real; 2], b: &[Real; 2]| (a[0] - b[0]).abs() < tol && (a[1] - b[1]).abs() < tol;

    let mut ring: Vec<[Real; 2]> = Vec::with_capacity(points.len());
    for p in points {
        if ring.last().is_none_or(|last| !same(last, p)) {
            ring.push(*p);
        }
    }
    while ring.len() > 1 && same(&ring[0], &ring[ring.len() - 1]) {
        ring.pop();
    }
    ring
}

/// Twice the signed area (shoelace); positive for counter-clockwise rings.
fn signed_area2(ring: &[[Real; 2]]) -> Real {
    ring.iter()
        .zip(ring.iter().cycle().skip(1))
        .map(|(a, b)| a[0] * b[1] - b[0] * a[1])
        .sum()
}

/// Ear-cut a simple ring into counter-clockwise triangles.
fn triangulate_ring(ring: &[[Real; 2]]) -> Vec<[[Real; 2]; 3]> {
    let exterior: Vec<Coord<Real>> = ring.iter().map(|&[x, y]| Coord { x, y }).collect();
    let polygon = GeoPolygon::new(LineString::new(exterior), vec![]);
    let raw = polygon.earcut_triangles_raw();
    let vertices = raw.vertices;

    raw.triangle_indices
        .chunks_exact(3)
        .filter_map(|tri| {
            let a = [vertices[2 * tri[0]], vertices[2 * tri[0] + 1]];
            let mut b = [vertices[2 * tri[1]], vertices[2 * tri[1] + 1]];
            let mut c = [vertices[2 * tri[2]], vertices[2 * tri[2] + 1]];
            let area2 = signed_area2(&[a, b, c]);
            if area2.abs() < Real::EPSILON {
                return None;
            }
            if area2 < 0.0 {
                std::mem::swap(&mut b, &mut c);
            }
            Some([a, b, c])
        })
        .collect()
}

impl Solid {
    /// Axis-aligned box of size `width × length × height`, centred on the origin.
    pub fn cuboid(width: Real, length: Real, height: Real) -> Solid {
        Solid::cuboid_at([0.0, 0.0, 0.0], [width, length, height])
    }

    /// Axis-aligned box of `size` centred on `center`.
    pub fn cuboid_at(center: [Real; 3], size: [Real; 3]) -> Solid {
        let [cx, cy, cz] = center;
        let [hx, hy, hz] = size.map(|s| s * 0.5);
        let corner = |ix: i8, iy: i8, iz: i8| {
            Point3::new(
                cx + hx * Real::from(ix),
                cy + hy * Real::from(iy),
                cz + hz * Real::from(iz),
            )
        };

        // each face listed counter-clockwise seen from outside
        let faces: [[(i8, i8, i8); 4]; 6] = [
            [(-1, -1, -1), (-1, -1, 1), (-1, 1, 1), (-1, 1, -1)], // -X
            [(1, -1, -1), (1, 1, -1), (1, 1, 1), (1, -1, 1)],     // +X
            [(-1, -1, -1), (1, -1, -1), (1, -1, 1), (-1, -1, 1)], // -Y
            [(-1, 1, -1), (-1, 1, 1), (1, 1, 1), (1, 1, -1)],     // +Y
            [(-1, -1, -1), (-1, 1, -1), (1, 1, -1), (1, -1, -1)], // -Z
            [(-1, -1, 1), (1, -1, 1), (1, 1, 1), (-1, 1, 1)],     // +Z
        ];

        let polygons: Vec<Polygon> = faces
            .iter()
            .map(|face| {
                let pts = face.map(|(ix, iy, iz)| corner(ix, iy, iz));
                Polygon::from_points(&pts)
            })
            .collect();

        Solid::from_polygons(&polygons)
    }

    /// Extrude a closed profile drawn in the XY plane along +Z, from `z = 0`
    /// to `z = height`.
    pub fn extrude_profile(points: &[[Real; 2]], height: Real) -> MagazineResult<Solid> {
        Solid::extrude(&Workplane::xy(), points, height)
    }

    /// Extrude a closed, simple profile drawn on `workplane` by `length`
    /// along the workplane normal.
    ///
    /// Profiles may be given in either winding; a repeated closing point is
    /// ignored. Caps are ear-cut into triangles, sides are quads, so every
    /// face stays convex for the BSP booleans.
    pub fn extrude(workplane: &Workplane, points: &[[Real; 2]], length: Real) -> MagazineResult<Solid> {
        let mut ring = dedup_ring(points);
        if ring.len() < 3 {
            return Err(MagazineError::construction(format!(
                "extrusion profile needs at least 3 distinct points, got {}",
                ring.len()
            )));
        }
        if length.abs() < tolerance() {
            return Err(MagazineError::construction("extrusion length is zero"));
        }
        let area2 = signed_area2(&ring);
        if area2.abs() < tolerance() {
            return Err(MagazineError::construction("extrusion profile has zero area"));
        }
        if area2 < 0.0 {
            ring.reverse();
        }

        let offset = workplane.normal * length;
        let bottom: Vec<Point3<Real>> = ring.iter().map(|p| workplane.to_world(*p)).collect();
        let top: Vec<Point3<Real>> = bottom.iter().map(|p| p + offset).collect();

        let mut polygons = Vec::with_capacity(ring.len() + 2 * ring.len());
        for [a, b, c] in triangulate_ring(&ring) {
            let (a, b, c) = (workplane.to_world(a), workplane.to_world(b), workplane.to_world(c));
            polygons.push(Polygon::from_points(&[a, c, b]));
            polygons.push(Polygon::from_points(&[a + offset, b + offset, c + offset]));
        }
        for i in 0..ring.len() {
            let j = (i + 1) % ring.len();
            polygons.push(Polygon::from_points(&[bottom[i], bottom[j], top[j], top[i]]));
        }

        // a negative length mirrors the prism inside out
        let solid = Solid::from_polygons(&polygons);
        if length < 0.0 {
            return Ok(crate::traits::SolidOps::inverse(&solid));
        }
        Ok(solid)
    }
}
