//! Feature-edge extraction and the selectors used to pick edges for chamfering.
//!
//! A polygon soup coming out of the BSP booleans has no explicit topology and
//! is full of T-junctions, so a feature edge is recovered geometrically: all
//! polygon sides lying on one supporting line are grouped, the parameter
//! intervals covered by each adjacent face are merged, and wherever two
//! non-parallel faces both cover the line an [`Edge`] exists.
//!
//! Selection is then a pure function of the solid, a face predicate and a
//! target point.

use crate::errors::{MagazineError, MagazineResult};
use crate::float_types::{Real, parry3d::bounding_volume::Aabb, tolerance};
use crate::solid::Solid;
use crate::solid::plane::Plane;
use crate::traits::SolidOps;
use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};

/// Cosine above which two unit vectors count as parallel.
const PARALLEL_COS: Real = 1.0 - 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn unit(self) -> Vector3<Real> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Positive,
    Negative,
}

/// Which faces an edge must border.
#[derive(Debug, Clone, PartialEq)]
pub enum FaceSelector {
    /// Every face.
    Any,
    /// The outermost face(s) facing along an axis: `Extreme(Axis::Z, Sign::Positive)`
    /// is the top face, `Extreme(Axis::X, Sign::Negative)` the leftmost.
    Extreme(Axis, Sign),
    /// Faces lying on this oriented plane.
    Plane(Plane),
}

/// Restriction on the edge itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeFilter {
    Any,
    /// Edge direction within the parallel tolerance of an axis.
    ParallelTo(Axis),
}

/// One of the two faces meeting at an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeFace {
    /// Outward-oriented plane of the face.
    pub plane: Plane,
    /// Unit vector lying in the face, perpendicular to the edge, pointing
    /// from the edge into the face.
    pub tangent: Vector3<Real>,
}

/// A straight feature edge between two non-parallel faces.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub start: Point3<Real>,
    pub end: Point3<Real>,
    pub faces: [EdgeFace; 2],
}

impl Edge {
    pub fn midpoint(&self) -> Point3<Real> {
        Point3::from((self.start.coords + self.end.coords) * 0.5)
    }

    pub fn length(&self) -> Real {
        (self.end - self.start).norm()
    }

    /// Unit direction from `start` to `end`.
    pub fn direction(&self) -> Vector3<Real> {
        (self.end - self.start).normalize()
    }

    /// Euclidean distance from `point` to the closest point of the segment.
    pub fn distance_to(&self, point: &Point3<Real>) -> Real {
        let seg = self.end - self.start;
        let len2 = seg.norm_squared();
        if len2 < Real::EPSILON {
            return (point - self.start).norm();
        }
        let t = ((point - self.start).dot(&seg) / len2).clamp(0.0, 1.0);
        (point - (self.start + seg * t)).norm()
    }

    pub fn is_parallel_to(&self, axis: Axis) -> bool {
        self.direction().dot(&axis.unit()).abs() > PARALLEL_COS
    }

    /// Material lies inside the wedge spanned by the two face tangents.
    pub fn is_convex(&self) -> bool {
        let [a, b] = &self.faces;
        a.tangent.dot(&b.plane.normal) < 0.0 && b.tangent.dot(&a.plane.normal) < 0.0
    }
}

impl FaceSelector {
    fn matches(&self, plane: &Plane, bbox: &Aabb) -> bool {
        let tol = tolerance();
        match self {
            FaceSelector::Any => true,
            FaceSelector::Extreme(axis, Sign::Positive) => {
                plane.normal.dot(&axis.unit()) > PARALLEL_COS
                    && (plane.w - bbox.maxs[axis.index()]).abs() < tol
            },
            FaceSelector::Extreme(axis, Sign::Negative) => {
                plane.normal.dot(&-axis.unit()) > PARALLEL_COS
                    && (-plane.w - bbox.mins[axis.index()]).abs() < tol
            },
            FaceSelector::Plane(target) => target.coincides_with(plane),
        }
    }
}

impl EdgeFilter {
    fn matches(&self, edge: &Edge) -> bool {
        match self {
            EdgeFilter::Any => true,
            EdgeFilter::ParallelTo(axis) => edge.is_parallel_to(*axis),
        }
    }
}

/// Coverage of one supporting line by one face side.
struct FaceCoverage {
    face: EdgeFace,
    intervals: Vec<(Real, Real)>,
}

/// All polygon sides lying on one supporting line.
struct LineGroup {
    dir: Vector3<Real>,
    anchor: Point3<Real>,
    faces: Vec<FaceCoverage>,
}

/// Flip `dir` so its first non-negligible component is positive.
fn canonical_direction(dir: Vector3<Real>) -> Vector3<Real> {
    for c in dir.iter() {
        if c.abs() > 1e-9 {
            return if *c < 0.0 { -dir } else { dir };
        }
    }
    dir
}

fn quantize(value: Real, step: Real) -> i64 {
    (value / step).round() as i64
}

fn merge_intervals(mut intervals: Vec<(Real, Real)>) -> Vec<(Real, Real)> {
    let tol = tolerance();
    intervals.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut merged: Vec<(Real, Real)> = Vec::with_capacity(intervals.len());
    for (lo, hi) in intervals {
        match merged.last_mut() {
            Some(last) if lo <= last.1 + tol => last.1 = last.1.max(hi),
            _ => merged.push((lo, hi)),
        }
    }
    merged
}

fn intersect_intervals(a: &[(Real, Real)], b: &[(Real, Real)]) -> Vec<(Real, Real)> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let lo = a[i].0.max(b[j].0);
        let hi = a[i].1.min(b[j].1);
        if hi - lo > 10.0 * tolerance() {
            out.push((lo, hi));
        }
        if a[i].1 < b[j].1 {
            i += 1;
        } else {
            j += 1;
        }
    }
    out
}

impl Solid {
    /// Reconstruct every maximal straight feature edge of this solid.
    ///
    /// The result is deterministic: edges come out in the order their
    /// supporting lines are first met while walking `polygons`.
    pub fn edges(&self) -> Vec<Edge> {
        let tol = tolerance();
        let dir_step = 1e-6;

        let mut index: HashMap<(i64, i64, i64, i64, i64, i64), usize> = HashMap::new();
        let mut groups: Vec<LineGroup> = Vec::new();

        for poly in &self.polygons {
            let centroid = poly.centroid();
            for (a, b) in poly.edges() {
                let seg = b.pos - a.pos;
                if seg.norm() < tol {
                    continue;
                }
                let dir = canonical_direction(seg.normalize());
                let anchor = a.pos - dir * a.pos.coords.dot(&dir);

                let key = (
                    quantize(dir.x, dir_step),
                    quantize(dir.y, dir_step),
                    quantize(dir.z, dir_step),
                    quantize(anchor.x, tol),
                    quantize(anchor.y, tol),
                    quantize(anchor.z, tol),
                );
                let slot = *index.entry(key).or_insert_with(|| {
                    groups.push(LineGroup {
                        dir,
                        anchor,
                        faces: Vec::new(),
                    });
                    groups.len() - 1
                });
                let group = &mut groups[slot];

                let mut tangent = poly.plane.normal.cross(&group.dir);
                if tangent.norm() < Real::EPSILON {
                    continue;
                }
                tangent.normalize_mut();
                if tangent.dot(&(centroid - a.pos)) < 0.0 {
                    tangent = -tangent;
                }

                let ta = a.pos.coords.dot(&group.dir);
                let tb = b.pos.coords.dot(&group.dir);
                let interval = (ta.min(tb), ta.max(tb));

                let existing = group.faces.iter_mut().find(|f| {
                    f.face.plane.coincides_with(&poly.plane)
                        && f.face.tangent.dot(&tangent) > PARALLEL_COS
                });
                match existing {
                    Some(coverage) => coverage.intervals.push(interval),
                    None => group.faces.push(FaceCoverage {
                        face: EdgeFace {
                            plane: poly.plane.clone(),
                            tangent,
                        },
                        intervals: vec![interval],
                    }),
                }
            }
        }

        let mut edges = Vec::new();
        for group in groups {
            let faces: Vec<(EdgeFace, Vec<(Real, Real)>)> = group
                .faces
                .into_iter()
                .map(|f| (f.face, merge_intervals(f.intervals)))
                .collect();

            for i in 0..faces.len() {
                for j in (i + 1)..faces.len() {
                    let (fa, ca) = &faces[i];
                    let (fb, cb) = &faces[j];
                    if fa.plane.normal.dot(&fb.plane.normal).abs() > PARALLEL_COS {
                        continue;
                    }
                    for (lo, hi) in intersect_intervals(ca, cb) {
                        edges.push(Edge {
                            start: group.anchor + group.dir * lo,
                            end: group.anchor + group.dir * hi,
                            faces: [fa.clone(), fb.clone()],
                        });
                    }
                }
            }
        }

        edges
    }
}

/// All feature edges bordering a face accepted by `faces` and passing `filter`.
pub fn select_edges(solid: &Solid, faces: &FaceSelector, filter: &EdgeFilter) -> Vec<Edge> {
    let bbox = solid.bounding_box();
    solid
        .edges()
        .into_iter()
        .filter(|edge| edge.faces.iter().any(|f| faces.matches(&f.plane, &bbox)))
        .filter(|edge| filter.matches(edge))
        .collect()
}

/// The selected edge closest to `target`.
///
/// Ties keep the first edge met, so the answer is stable across calls.
/// An empty candidate set is an error rather than a silent no-op.
pub fn nearest_edge(
    solid: &Solid,
    faces: &FaceSelector,
    filter: &EdgeFilter,
    target: &Point3<Real>,
) -> MagazineResult<Edge> {
    let candidates = select_edges(solid, faces, filter);
    let mut best: Option<(Real, Edge)> = None;
    for edge in candidates {
        let d = edge.distance_to(target);
        if best.as_ref().is_none_or(|(best_d, _)| d < *best_d - tolerance()) {
            best = Some((d, edge));
        }
    }
    best.map(|(_, edge)| edge)
        .ok_or_else(|| MagazineError::EmptySelection {
            what: format!("{faces:?} / {filter:?} near ({}, {}, {})", target.x, target.y, target.z),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_twelve_convex_edges() {
        let cube = Solid::cuboid(2.0, 2.0, 2.0);
        let edges = cube.edges();
        assert_eq!(edges.len(), 12);
        assert!(edges.iter().all(Edge::is_convex));
        assert!(edges.iter().all(|e| (e.length() - 2.0).abs() < 1e-9));
    }

    #[test]
    fn edges_survive_bsp_fragmentation() {
        // the union splits the top face into several pieces along x = 0
        let left = Solid::cuboid_at([-1.0, 0.0, 0.0], [2.0, 2.0, 2.0]);
        let right = Solid::cuboid_at([1.0, 0.0, 0.0], [2.0, 2.0, 2.0]);
        let bar = left.union(&right);

        let top_x_edges = select_edges(
            &bar,
            &FaceSelector::Extreme(Axis::Z, Sign::Positive),
            &EdgeFilter::ParallelTo(Axis::X),
        );
        assert_eq!(top_x_edges.len(), 2);
        for e in &top_x_edges {
            assert!((e.length() - 4.0).abs() < 1e-6, "edge length {}", e.length());
        }
    }

    #[test]
    fn extreme_face_selection_picks_outermost_faces() {
        let cube = Solid::cuboid(2.0, 4.0, 6.0);
        let vertical_on_plus_x = select_edges(
            &cube,
            &FaceSelector::Extreme(Axis::X, Sign::Positive),
            &EdgeFilter::ParallelTo(Axis::Z),
        );
        assert_eq!(vertical_on_plus_x.len(), 2);
        assert!(vertical_on_plus_x.iter().all(|e| (e.midpoint().x - 1.0).abs() < 1e-9));
    }

    #[test]
    fn nearest_edge_picks_closest_and_reports_empty() {
        let cube = Solid::cuboid(2.0, 2.0, 2.0);
        let top = FaceSelector::Extreme(Axis::Z, Sign::Positive);
        let edge = nearest_edge(&cube, &top, &EdgeFilter::Any, &Point3::new(0.0, 1.0, 1.0))
            .expect("edge on top face");
        assert!((edge.midpoint() - Point3::new(0.0, 1.0, 1.0)).norm() < 1e-9);

        let none = nearest_edge(
            &cube,
            &FaceSelector::Plane(Plane::from_normal_and_point(Vector3::z(), &Point3::new(0.0, 0.0, 5.0))),
            &EdgeFilter::Any,
            &Point3::origin(),
        );
        assert!(matches!(none, Err(MagazineError::EmptySelection { .. })));
    }
}
