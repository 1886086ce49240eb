//! Rail frame: the plate that holds one end of every PCB.
//!
//! The plate is centred on the origin with its thickness spanning
//! `±plate_thickness / 2`. A rectangular window is cut through it and a
//! slotted rail runs down each long edge of the window; connector notches
//! on the two short edges receive the bones.

use crate::config::FrameConfig;
use crate::errors::{MagazineError, MagazineResult};
use crate::float_types::{Real, tolerance};
use crate::solid::shapes::Workplane;
use crate::solid::{Axis, Edge, EdgeFilter, FaceSelector, Sign, Solid, chamfer, nearest_edge, select_edges};
use crate::traits::SolidOps;
use nalgebra::Point3;
use tracing::{debug, info};

/// How far a cutter reaches past a face it opens onto.
const CLEARANCE: Real = 0.5;

/// Relative overshoot of a cable wedge along its hypotenuse.
const WEDGE_OVERSHOOT: Real = 0.1;

/// Total Y extent of the slot field: `n` slots and `n + 1` noses.
pub fn active_height(n: usize, slot_width: Real, nose_width: Real) -> Real {
    n as Real * slot_width + (n + 1) as Real * nose_width
}

/// Window and plate sizes derived from the user parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameDimensions {
    pub inner_x: Real,
    pub inner_y: Real,
    pub outer_x: Real,
    pub outer_y: Real,
}

impl FrameDimensions {
    pub fn new(a: Real, c: Real, d: Real, n: usize, cfg: &FrameConfig) -> Self {
        let inner_x = a + cfg.len_extra;
        let inner_y = active_height(n, c, d);
        FrameDimensions {
            inner_x,
            inner_y,
            outer_x: inner_x + 2.0 * cfg.frame_wall_x,
            outer_y: inner_y + 2.0 * (cfg.frame_wall_y + cfg.top_bottom_margin),
        }
    }

    /// X centre of the right rail; the left one mirrors it.
    pub fn rail_x(&self, cfg: &FrameConfig) -> Real {
        self.inner_x / 2.0 - cfg.nose_depth / 2.0
    }
}

/// Y centres of the `n` slots, starting one nose above the window's lower edge.
pub fn slot_centers(c: Real, d: Real, n: usize, inner_y: Real) -> Vec<Real> {
    let y0 = -inner_y / 2.0 + d;
    (0..n)
        .map(|i| y0 + (i as Real + 0.5) * c + i as Real * d)
        .collect()
}

/// Centres of the four connector notches: top-left, top-right,
/// bottom-left, bottom-right.
pub fn connector_centers(dims: &FrameDimensions, cfg: &FrameConfig) -> [[Real; 2]; 4] {
    let x = dims.outer_x / 2.0 - cfg.connector_x_offset - cfg.connector_width / 2.0;
    let y = dims.outer_y / 2.0 - cfg.connector_height / 2.0;
    [[-x, y], [x, y], [-x, -y], [x, -y]]
}

/// Distance from `x = 0` to the innermost point reached by a connector
/// notch or its cable wedges. The cuts of the two halves stay apart only
/// while this is positive.
pub fn connector_margin(dims: &FrameDimensions, cfg: &FrameConfig) -> Real {
    let [_, [x, _], _, _] = connector_centers(dims, cfg);
    x - cfg.connector_width / 2.0 - cfg.cable_chamfer_x * (1.0 + WEDGE_OVERSHOOT)
}

/// Top edges of the eight cable-wedge slopes, two per connector, in the
/// order of [`connector_centers`] with the inner (`-X`) side first.
pub fn connector_top_edges(frame: &Solid, dims: &FrameDimensions, cfg: &FrameConfig) -> MagazineResult<Vec<Edge>> {
    let top = FaceSelector::Extreme(Axis::Z, Sign::Positive);
    let along_y = EdgeFilter::ParallelTo(Axis::Y);
    let half_w = cfg.connector_width / 2.0;
    let mut edges = Vec::with_capacity(8);
    for [x, y] in connector_centers(dims, cfg) {
        for x_edge in [x - half_w, x + half_w] {
            let target = Point3::new(x_edge, y, cfg.plate_thickness / 2.0);
            edges.push(nearest_edge(frame, &top, &along_y, &target)?);
        }
    }
    Ok(edges)
}

/// A finished frame fills exactly its plate envelope.
fn check_extents(frame: &Solid, dims: &FrameDimensions, cfg: &FrameConfig) -> MagazineResult<()> {
    let bb = frame.bounding_box();
    let half = [dims.outer_x / 2.0, dims.outer_y / 2.0, cfg.plate_thickness / 2.0];
    let tol = tolerance();
    for axis in 0..3 {
        if (bb.mins[axis] + half[axis]).abs() > tol || (bb.maxs[axis] - half[axis]).abs() > tol {
            return Err(MagazineError::construction(format!(
                "frame spans [{}, {}] along axis {axis}, expected ±{}",
                bb.mins[axis], bb.maxs[axis], half[axis]
            )));
        }
    }
    Ok(())
}

/// Y interval of a notch feature, stretched past the outer edge it opens onto.
fn notch_span(center_y: Real, half: Real) -> (Real, Real) {
    let lo = center_y - half - if center_y < 0.0 { CLEARANCE } else { 0.0 };
    let hi = center_y + half + if center_y > 0.0 { CLEARANCE } else { 0.0 };
    (lo, hi)
}

/// Triangular cable-entry relief on one vertical side of a connector notch.
///
/// In the XZ plane the cross-section is the right triangle with legs
/// `cable_chamfer_x` along `dir` from `x_edge` and `cable_chamfer_z` up from
/// the plate's lower face, stretched along its hypotenuse so it also clears
/// the open notch and the plate faces.
fn cable_wedge(x_edge: Real, center_y: Real, dir: Real, cfg: &FrameConfig) -> MagazineResult<Solid> {
    let half_t = cfg.plate_thickness / 2.0;
    let (leg_x, leg_z) = (cfg.cable_chamfer_x, cfg.cable_chamfer_z());
    let k = WEDGE_OVERSHOOT;

    let inner_x = x_edge - dir * leg_x * k;
    let bottom_z = -half_t - leg_z * k;
    let profile = [
        [x_edge + dir * leg_x * (1.0 + k), bottom_z],
        [inner_x, bottom_z],
        [inner_x, half_t + leg_z * k],
    ];

    let (lo, hi) = notch_span(center_y, cfg.connector_height / 2.0);
    Solid::extrude(&Workplane::xz_at(hi), &profile, hi - lo)
}

fn non_empty(solid: Solid, step: &str) -> MagazineResult<Solid> {
    if solid.is_empty() {
        return Err(MagazineError::construction(format!("frame became empty after {step}")));
    }
    Ok(solid)
}

/// Build one rail frame.
///
/// `a` is the PCB width, `c` the slot width, `d` the nose width and `n` the
/// slot count. Parameters are expected to be validated by the caller.
pub fn build_frame(a: Real, c: Real, d: Real, n: usize, cfg: &FrameConfig) -> MagazineResult<Solid> {
    let dims = FrameDimensions::new(a, c, d, n, cfg);
    let t = cfg.plate_thickness;
    debug!(?dims, "frame dimensions");

    // plate with the window cut clean through
    let plate = Solid::cuboid(dims.outer_x, dims.outer_y, t);
    let window = Solid::cuboid(dims.inner_x, dims.inner_y, t + 2.0 * CLEARANCE);
    let mut frame = non_empty(plate.difference(&window), "window cut")?;

    // rails flush against the window's long edges, slotted before they join
    let rail_x = dims.rail_x(cfg);
    let rails = Solid::cuboid_at([-rail_x, 0.0, 0.0], [cfg.nose_depth, dims.inner_y, t])
        .union(&Solid::cuboid_at([rail_x, 0.0, 0.0], [cfg.nose_depth, dims.inner_y, t]));

    let slot_ys = slot_centers(c, d, n, dims.inner_y);
    let slot_size = [cfg.nose_depth + CLEARANCE, c, t + cfg.slot_overcut];
    let slots: Vec<Solid> = slot_ys
        .iter()
        .flat_map(|&y| {
            [
                Solid::cuboid_at([-rail_x, y, 0.0], slot_size),
                Solid::cuboid_at([rail_x, y, 0.0], slot_size),
            ]
        })
        .collect();
    let rails = non_empty(rails.difference(&Solid::merge(&slots)), "slot cuts")?;
    debug!(slots = slot_ys.len(), "rails slotted");

    frame = non_empty(frame.union(&rails), "rail union")?;

    // connector notches, all four in one cut
    let centers = connector_centers(&dims, cfg);
    let notches: Vec<Solid> = centers
        .iter()
        .map(|&[x, y]| {
            let (lo, hi) = notch_span(y, cfg.connector_height / 2.0);
            Solid::cuboid_at(
                [x, (lo + hi) / 2.0, 0.0],
                [cfg.connector_width, hi - lo, 2.0 * (t + 1.0)],
            )
        })
        .collect();
    frame = non_empty(frame.difference(&Solid::merge(&notches)), "connector cut")?;

    // cable-entry wedges flanking every notch
    let half_w = cfg.connector_width / 2.0;
    let mut wedges = Vec::with_capacity(2 * centers.len());
    for &[x, y] in &centers {
        wedges.push(cable_wedge(x - half_w, y, -1.0, cfg)?);
        wedges.push(cable_wedge(x + half_w, y, 1.0, cfg)?);
    }
    frame = non_empty(frame.difference(&Solid::merge(&wedges)), "cable wedges")?;

    if cfg.connector_top_chamfer > 0.0 {
        let edges = connector_top_edges(&frame, &dims, cfg)?;
        frame = chamfer(&frame, &edges, cfg.connector_top_chamfer)?;
        debug!(edges = edges.len(), "connector top edges chamfered");
    }

    if cfg.outer_corner_chamfer > 0.0 {
        let along_z = EdgeFilter::ParallelTo(Axis::Z);
        let mut edges = select_edges(&frame, &FaceSelector::Extreme(Axis::X, Sign::Positive), &along_z);
        edges.extend(select_edges(&frame, &FaceSelector::Extreme(Axis::X, Sign::Negative), &along_z));
        frame = chamfer(&frame, &edges, cfg.outer_corner_chamfer)?;
        debug!(edges = edges.len(), "outer corners chamfered");
    }
    check_extents(&frame, &dims, cfg)?;

    info!(
        outer_x = dims.outer_x,
        outer_y = dims.outer_y,
        slots = n,
        polygons = frame.polygons.len(),
        "frame built"
    );
    Ok(frame)
}
