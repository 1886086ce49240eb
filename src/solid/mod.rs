//! `Solid` struct and implementations of the `SolidOps` trait for `Solid`.
//!
//! This is the solid-modelling kernel the part builders call into: convex
//! planar polygons combined with BSP-tree booleans, plus the feature-edge
//! queries and chamfers needed for cosmetic finishing.

use crate::float_types::{
    Real,
    parry3d::bounding_volume::{Aabb, BoundingVolume},
};
use crate::traits::SolidOps;
use nalgebra::{Matrix4, Point3};
use std::sync::OnceLock;

pub mod bsp;
pub mod chamfer;
pub mod edges;
pub mod plane;
pub mod polygon;
pub mod shapes;
pub mod vertex;

pub use bsp::Node;
pub use chamfer::chamfer;
pub use edges::{Axis, Edge, EdgeFace, EdgeFilter, FaceSelector, Sign, nearest_edge, select_edges};
pub use plane::Plane;
pub use polygon::Polygon;
pub use shapes::Workplane;
pub use vertex::Vertex;

#[derive(Clone, Debug)]
pub struct Solid {
    /// Convex, outward-facing boundary polygons
    pub polygons: Vec<Polygon>,

    /// Lazily calculated AABB that spans `polygons`.
    pub bounding_box: OnceLock<Aabb>,
}

impl Solid {
    /// Build a Solid from an existing polygon list
    pub fn from_polygons(polygons: &[Polygon]) -> Self {
        let mut solid = Solid::new();
        solid.polygons = polygons.to_vec();
        solid
    }

    /// A compound of several solids: polygons are concatenated, no boolean
    /// is evaluated, so touching or overlapping parts stay separate shells.
    pub fn merge(parts: &[Solid]) -> Self {
        let polygons = parts
            .iter()
            .flat_map(|part| part.polygons.iter().cloned())
            .collect();
        Solid {
            polygons,
            bounding_box: OnceLock::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Split polygons into (may_touch, cannot_touch) using bounding‑box tests
    fn partition_polys(polys: &[Polygon], other_bb: &Aabb) -> (Vec<Polygon>, Vec<Polygon>) {
        let grown = other_bb.loosened(crate::float_types::tolerance());
        polys
            .iter()
            .cloned()
            .partition(|p| p.bounding_box().intersects(&grown))
    }

    /// Partition both operands for a boolean. When either side has nothing
    /// near the other, the partial trees could not tell "disjoint" from
    /// "enclosed", so every polygon takes part in the clipping.
    #[allow(clippy::type_complexity)]
    fn partition_pair(
        &self,
        other: &Solid,
    ) -> ((Vec<Polygon>, Vec<Polygon>), (Vec<Polygon>, Vec<Polygon>)) {
        let a = Self::partition_polys(&self.polygons, &other.bounding_box());
        let b = Self::partition_polys(&other.polygons, &self.bounding_box());
        if a.0.is_empty() || b.0.is_empty() {
            return (
                (self.polygons.clone(), Vec::new()),
                (other.polygons.clone(), Vec::new()),
            );
        }
        (a, b)
    }

    /// Enclosed volume by the divergence theorem over the fan triangles.
    pub fn volume(&self) -> Real {
        self.polygons
            .iter()
            .flat_map(Polygon::triangulate)
            .map(|[a, b, c]| a.pos.coords.dot(&b.pos.coords.cross(&c.pos.coords)) / 6.0)
            .sum()
    }
}

impl SolidOps for Solid {
    /// Returns a new empty Solid
    fn new() -> Self {
        Solid {
            polygons: Vec::new(),
            bounding_box: OnceLock::new(),
        }
    }

    /// Return a new Solid representing union of the two Solids.
    ///
    /// ```text
    /// let c = a.union(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |       +----+
    ///     +----+--+    |       +----+       |
    ///          |   b   |            |   c   |
    ///          |       |            |       |
    ///          +-------+            +-------+
    /// ```
    fn union(&self, other: &Solid) -> Solid {
        // avoid splitting obvious non‑intersecting faces
        let ((a_clip, a_passthru), (b_clip, b_passthru)) = self.partition_pair(other);

        let mut a = Node::from_polygons(&a_clip);
        let mut b = Node::from_polygons(&b_clip);

        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());

        let mut final_polys = a.all_polygons();
        final_polys.extend(a_passthru);
        final_polys.extend(b_passthru);

        Solid::from_polygons(&final_polys)
    }

    /// Return a new Solid representing the difference of the two Solids.
    ///
    /// ```text
    /// let c = a.difference(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |    +--+
    ///     +----+--+    |       +----+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn difference(&self, other: &Solid) -> Solid {
        let ((a_clip, a_passthru), (b_clip, _b_passthru)) = self.partition_pair(other);

        let mut a = Node::from_polygons(&a_clip);
        let mut b = Node::from_polygons(&b_clip);

        a.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());
        a.invert();

        let mut final_polys = a.all_polygons();
        final_polys.extend(a_passthru);

        Solid::from_polygons(&final_polys)
    }

    /// Return a new Solid representing the intersection of the two Solids.
    fn intersection(&self, other: &Solid) -> Solid {
        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);

        a.invert();
        b.clip_to(&a);
        b.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        a.build(&b.all_polygons());
        a.invert();

        Solid::from_polygons(&a.all_polygons())
    }

    /// Apply an arbitrary affine 3D transform (as a 4x4 matrix).
    fn transform(&self, mat: &Matrix4<Real>) -> Solid {
        let mut solid = self.clone();

        // faces are flat, so vertex normals are simply re-derived from the
        // transformed winding
        for poly in &mut solid.polygons {
            for vert in &mut poly.vertices {
                vert.pos = mat.transform_point(&vert.pos);
            }
            poly.set_new_normal();
        }

        solid.invalidate_bounding_box();
        solid
    }

    /// Returns a [`parry3d::bounding_volume::Aabb`] indicating the 3D bounds of all `polygons`.
    fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);

            for poly in &self.polygons {
                for v in &poly.vertices {
                    mins = mins.inf(&v.pos);
                    maxs = maxs.sup(&v.pos);
                }
            }

            // no polygons: a trivial AABB at origin
            if mins.x > maxs.x {
                return Aabb::new(Point3::origin(), Point3::origin());
            }
            Aabb::new(mins, maxs)
        })
    }

    /// Invalidates object's cached bounding box.
    fn invalidate_bounding_box(&mut self) {
        self.bounding_box = OnceLock::new();
    }

    /// Invert this Solid (flip inside vs. outside)
    fn inverse(&self) -> Solid {
        let mut solid = self.clone();
        for p in &mut solid.polygons {
            p.flip();
        }
        solid
    }
}
