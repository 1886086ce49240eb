//! Symmetric-setback chamfers on straight convex edges.
//!
//! Each edge is bevelled by subtracting a triangular prism that spans exactly
//! the edge. The prism's cross-section has one corner on each adjacent face,
//! `distance` away from the edge, and its apex just outside both faces so no
//! cutter face lies flush with the solid's own faces.

use crate::errors::{MagazineError, MagazineResult};
use crate::float_types::{Real, tolerance};
use crate::solid::Solid;
use crate::solid::edges::{Edge, EdgeFace};
use crate::solid::shapes::Workplane;
use crate::traits::SolidOps;
use nalgebra::{Point3, Vector3};
use tracing::debug;

/// True when `point` lies on a polygon of `solid` that sits on `face`'s plane.
fn face_contains(solid: &Solid, face: &EdgeFace, point: &Point3<Real>) -> bool {
    let tol = tolerance();
    solid
        .polygons
        .iter()
        .filter(|poly| poly.plane.coincides_with(&face.plane))
        .any(|poly| {
            poly.edges().all(|(a, b)| {
                (b.pos - a.pos).cross(&(point - a.pos)).dot(&poly.plane.normal) >= -tol
            })
        })
}

/// The prism removed to chamfer `edge` by `distance`.
fn chamfer_cutter(solid: &Solid, edge: &Edge, distance: Real) -> MagazineResult<Solid> {
    if !edge.is_convex() {
        return Err(MagazineError::construction(format!(
            "cannot chamfer concave edge {:?} -> {:?}",
            edge.start, edge.end
        )));
    }

    let [f1, f2] = &edge.faces;
    let mid = edge.midpoint();
    for face in [f1, f2] {
        if !face_contains(solid, face, &(mid + face.tangent * distance)) {
            return Err(MagazineError::construction(format!(
                "chamfer distance {distance} exceeds the face adjacent to edge {:?} -> {:?}",
                edge.start, edge.end
            )));
        }
    }

    let axis = edge.direction();
    let plane = Workplane::new(edge.start, f1.tangent, axis);
    let (u, v) = (plane.x_dir, plane.y_dir());
    let local = |w: Vector3<Real>| [w.dot(&u), w.dot(&v)];

    let outward: Vector3<Real> = (f1.plane.normal + f2.plane.normal) * (distance * 0.5);
    let profile = [
        local(f1.tangent * distance),
        local(f2.tangent * distance),
        local(outward),
    ];

    Solid::extrude(&plane, &profile, edge.length())
}

/// Chamfer every edge in `edges` by `distance`.
///
/// Edges are taken as given; they are usually selected once on `solid`
/// before any of them is cut. An empty edge list is an error.
pub fn chamfer(solid: &Solid, edges: &[Edge], distance: Real) -> MagazineResult<Solid> {
    if !distance.is_finite() || distance <= 0.0 {
        return Err(MagazineError::ParameterRange {
            name: "chamfer distance",
            value: distance,
            requirement: "must be positive",
        });
    }
    if edges.is_empty() {
        return Err(MagazineError::EmptySelection {
            what: "edges to chamfer".to_string(),
        });
    }

    let mut result = solid.clone();
    for edge in edges {
        let cutter = chamfer_cutter(solid, edge, distance)?;
        result = result.difference(&cutter);
        debug!(
            start = ?edge.start,
            end = ?edge.end,
            distance,
            "chamfered edge"
        );
    }

    if result.is_empty() {
        return Err(MagazineError::construction("chamfer removed the whole solid"));
    }
    Ok(result)
}

impl Solid {
    /// Method form of [`chamfer`].
    pub fn chamfer(&self, edges: &[Edge], distance: Real) -> MagazineResult<Solid> {
        chamfer(self, edges, distance)
    }
}
