//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use nalgebra::Point3;
use pcb_magazine::{
    float_types::Real,
    solid::{Polygon, Solid},
};
use std::path::PathBuf;

/// Returns the approximate bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]`
/// for a set of polygons.
pub fn bounding_box(polygons: &[Polygon]) -> [Real; 6] {
    let mut mins = [Real::MAX; 3];
    let mut maxs = [Real::MIN; 3];
    for poly in polygons {
        for v in &poly.vertices {
            for axis in 0..3 {
                mins[axis] = mins[axis].min(v.pos[axis]);
                maxs[axis] = maxs[axis].max(v.pos[axis]);
            }
        }
    }
    [mins[0], mins[1], mins[2], maxs[0], maxs[1], maxs[2]]
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Helper to make a simple Polygon in 3D with given vertices.
pub fn make_polygon_3d(points: &[[Real; 3]]) -> Polygon {
    let pts: Vec<Point3<Real>> = points.iter().map(|p| Point3::new(p[0], p[1], p[2])).collect();
    Polygon::from_points(&pts)
}

/// Volume of `solid` on each side of the plane `axis = 0`, as `(negative, positive)`.
pub fn half_volumes(solid: &Solid, axis: usize) -> (Real, Real) {
    use pcb_magazine::SolidOps;

    let bb = solid.bounding_box();
    let span = (bb.maxs - bb.mins).norm() + 10.0;
    let mut center = [0.0; 3];
    let mut size = [2.0 * span; 3];
    size[axis] = span;

    center[axis] = -span / 2.0;
    let negative = solid.intersection(&Solid::cuboid_at(center, size)).volume();
    center[axis] = span / 2.0;
    let positive = solid.intersection(&Solid::cuboid_at(center, size)).volume();
    (negative, positive)
}

/// A fresh scratch directory under the system temp dir.
pub fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pcb-magazine-{test}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}
