//! Assembly of two frames and four bones, and its realisation into one
//! compound solid.
//!
//! Composition only records where each part goes. Parts are shared by
//! reference, so the four bones point at a single solid; nothing is moved
//! until [`Assembly::realize`] applies each placement.

use crate::bone::build_bone;
use crate::config::MagazineConfig;
use crate::errors::MagazineResult;
use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use crate::frame::build_frame;
use crate::params::MagazineParams;
use crate::solid::{Plane, Solid};
use crate::traits::SolidOps;
use nalgebra::Vector3;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartRole {
    FrameBottom,
    FrameTop,
    Bone,
}

impl PartRole {
    pub const fn name(self) -> &'static str {
        match self {
            PartRole::FrameBottom => "frame-bottom",
            PartRole::FrameTop => "frame-top",
            PartRole::Bone => "bone",
        }
    }
}

/// A part and the rigid motion that puts it in place.
#[derive(Debug, Clone)]
pub struct Placement {
    pub role: PartRole,
    pub solid: Arc<Solid>,
    pub translation: Vector3<Real>,
    /// Rotation in degrees about X, Y and Z; applied Z first, then Y, then X.
    pub rotation: Vector3<Real>,
}

impl Placement {
    pub fn new(role: PartRole, solid: Arc<Solid>, translation: Vector3<Real>) -> Self {
        Placement {
            role,
            solid,
            translation,
            rotation: Vector3::zeros(),
        }
    }

    /// The part rotated, then translated, into assembly coordinates.
    pub fn realize(&self) -> Solid {
        let r = &self.rotation;
        self.solid
            .rotate_zyx(r.z, r.y, r.x)
            .translate_vector(self.translation)
    }
}

/// Ordered placements: bottom frame, top frame, then the four bones.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub placements: Vec<Placement>,
}

impl Assembly {
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Every part in assembly coordinates, in placement order.
    pub fn realize(&self) -> Vec<Solid> {
        self.placements.iter().map(Placement::realize).collect()
    }

    /// All realised parts merged into one compound; no boolean is evaluated.
    pub fn to_compound(&self) -> Solid {
        Solid::merge(&self.realize())
    }

    pub fn bounding_box(&self) -> Aabb {
        self.to_compound().bounding_box()
    }
}

/// Compose the magazine for span `params.b`.
///
/// The bottom frame's underside sits at `z = 0` and the mirrored top frame's
/// upper face at `z = b`. Bones stand upright at the four corners of the
/// bottom frame's bounding box, pulled `bone_x_inset` towards the centre in
/// X; the two at negative Y are pushed one bone thickness towards +Y.
pub fn build_assembly(params: &MagazineParams, config: &MagazineConfig) -> MagazineResult<Assembly> {
    let MagazineParams { a, b, c, d, n } = *params;
    let t = config.frame.plate_thickness;

    let frame_raw = build_frame(a, c, d, n, &config.frame)?;
    let frame_bottom = frame_raw.translate(0.0, 0.0, t / 2.0);
    let frame_top = frame_raw.mirror(Plane::xy()).translate(0.0, 0.0, b - t / 2.0);

    let bb = frame_bottom.bounding_box();
    let outer_x = bb.maxs.x - bb.mins.x;
    let outer_y = bb.maxs.y - bb.mins.y;
    debug!(outer_x, outer_y, "bottom frame footprint");

    // upright: the bone's length along Y becomes its height along Z
    let bone = Arc::new(build_bone(b, &config.bone)?.rotate(90.0, 0.0, 0.0));
    let zc = b / 2.0;

    let corners = [
        (outer_x / 2.0, outer_y / 2.0),
        (-outer_x / 2.0, outer_y / 2.0),
        (-outer_x / 2.0, -outer_y / 2.0),
        (outer_x / 2.0, -outer_y / 2.0),
    ];

    let inset = config.assembly.bone_x_inset;
    let mut placements = vec![
        Placement::new(PartRole::FrameBottom, Arc::new(frame_bottom), Vector3::zeros()),
        Placement::new(PartRole::FrameTop, Arc::new(frame_top), Vector3::zeros()),
    ];
    for (x, y) in corners {
        let x_in = if x > 0.0 { x - inset } else { x + inset };
        let y_in = if y < 0.0 { y + config.bone.thickness } else { y };
        placements.push(Placement::new(
            PartRole::Bone,
            Arc::clone(&bone),
            Vector3::new(x_in, y_in, zc),
        ));
    }

    info!(parts = placements.len(), span = b, "assembly composed");
    Ok(Assembly { placements })
}
