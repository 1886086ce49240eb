//! Dovetail bone: the upright connector joining the bottom and top frames.
//!
//! The outline is a 13-point polygon symmetric about `x = 0`, drawn in the
//! XY plane with its length along Y, and extruded along +Z. Each end is a
//! dovetail that widens from the neck at the shoulder to the tip.

use crate::config::BoneConfig;
use crate::errors::MagazineResult;
use crate::float_types::Real;
use crate::solid::{Axis, EdgeFilter, FaceSelector, Sign, Solid, chamfer, nearest_edge};
use nalgebra::Point3;
use tracing::{debug, info, warn};

/// Dovetail length actually used for a bone of tip-to-tip length `b`.
///
/// A length that is not positive, or that would reach the bone's middle,
/// is clamped to `max(0.1, min(0.45 * b / 2, l_dovetail))`.
pub fn effective_dovetail(b: Real, l_dovetail: Real) -> Real {
    let clamped = clamp_dovetail(b, l_dovetail);
    if clamped != l_dovetail {
        warn!(b, requested = l_dovetail, clamped, "dovetail length clamped");
    }
    clamped
}

fn clamp_dovetail(b: Real, l_dovetail: Real) -> Real {
    let half = b / 2.0;
    if l_dovetail <= 0.0 || l_dovetail >= half {
        return (0.45 * half).min(l_dovetail).max(0.1);
    }
    l_dovetail
}

/// Largest flank chamfer a bone of length `b` can carry.
///
/// Measured from a flank midpoint, the setback on the top and bottom faces
/// climbs `dx / flank` towards the tip edge per unit of distance and only
/// half the dovetail length is available; on the flank face it is bounded
/// by the extrusion height.
pub fn max_edge_chamfer(b: Real, cfg: &BoneConfig) -> Real {
    let l = clamp_dovetail(b, cfg.l_dovetail);
    let dx = (cfg.x_out - cfg.x_in).abs();
    let tip_limit = if dx > 0.0 {
        0.5 * l * dx.hypot(l) / dx
    } else {
        Real::INFINITY
    };
    tip_limit.min(cfg.thickness)
}

/// Outline points P1..P13; P13 repeats P1 to close the ring.
pub fn bone_profile(b: Real, cfg: &BoneConfig) -> [[Real; 2]; 13] {
    let y_outer = b / 2.0;
    let y_inner = y_outer - effective_dovetail(b, cfg.l_dovetail);
    let (x_out, x_mid, x_in) = (cfg.x_out, cfg.x_mid, cfg.x_in);

    [
        [x_out, y_outer],
        [-x_out, y_outer],
        [-x_in, y_inner],
        [-x_mid, y_inner],
        [-x_mid, -y_inner],
        [-x_in, -y_inner],
        [-x_out, -y_outer],
        [x_out, -y_outer],
        [x_in, -y_inner],
        [x_mid, -y_inner],
        [x_mid, y_inner],
        [x_in, y_inner],
        [x_out, y_outer],
    ]
}

/// Midpoints of the four dovetail flanks P2-P3, P6-P7, P8-P9 and P12-P13.
pub fn flank_midpoints(profile: &[[Real; 2]; 13]) -> [[Real; 2]; 4] {
    let mid = |i: usize, j: usize| {
        [
            (profile[i][0] + profile[j][0]) / 2.0,
            (profile[i][1] + profile[j][1]) / 2.0,
        ]
    };
    [mid(1, 2), mid(5, 6), mid(7, 8), mid(11, 12)]
}

/// Build one bone of tip-to-tip length `b`, lying in the XY plane and
/// spanning `z` in `[0, thickness]`.
pub fn build_bone(b: Real, cfg: &BoneConfig) -> MagazineResult<Solid> {
    let profile = bone_profile(b, cfg);
    let mut bone = Solid::extrude_profile(&profile, cfg.thickness)?;

    if cfg.edge_chamfer > 0.0 {
        let targets = flank_midpoints(&profile);
        let faces = [
            (FaceSelector::Extreme(Axis::Z, Sign::Positive), cfg.thickness),
            (FaceSelector::Extreme(Axis::Z, Sign::Negative), 0.0),
        ];

        let mut edges = Vec::with_capacity(8);
        for (face, z) in &faces {
            for [x, y] in targets {
                let edge = nearest_edge(&bone, face, &EdgeFilter::Any, &Point3::new(x, y, *z))?;
                debug!(target = ?[x, y, *z], start = ?edge.start, end = ?edge.end, "flank edge selected");
                edges.push(edge);
            }
        }
        bone = chamfer(&bone, &edges, cfg.edge_chamfer)?;
    }

    info!(b, thickness = cfg.thickness, polygons = bone.polygons.len(), "bone built");
    Ok(bone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_profile_extents() {
        let cfg = BoneConfig::default();
        let p = bone_profile(80.0, &cfg);
        assert_eq!(p[0], [7.0, 40.0]);
        assert_eq!(p[2], [-3.0, 32.0]);
        assert_eq!(p[0], p[12]);
    }

    #[test]
    fn clamp_only_fires_out_of_range() {
        assert_eq!(effective_dovetail(80.0, 8.0), 8.0);
        assert!((effective_dovetail(5.0, 8.0) - 1.125).abs() < 1e-12);
        assert_eq!(effective_dovetail(80.0, 0.0), 0.1);
        assert_eq!(effective_dovetail(80.0, -3.0), 0.1);
    }

    #[test]
    fn chamfer_capacity_shrinks_with_short_bones() {
        let cfg = BoneConfig::default();
        // 0.9 mm dovetail: 0.5 * 0.9 * hypot(4, 0.9) / 4
        let short = max_edge_chamfer(4.0, &cfg);
        assert!((short - 0.45 * 4.0_f64.hypot(0.9) / 4.0).abs() < 1e-12);
        assert!(short < cfg.edge_chamfer);
        assert!(max_edge_chamfer(5.0, &cfg) > cfg.edge_chamfer);
        // long bones are bounded by the extrusion height
        let thin = BoneConfig { thickness: 0.3, ..BoneConfig::default() };
        assert_eq!(max_edge_chamfer(120.0, &thin), 0.3);
    }

    #[test]
    fn profile_is_mirror_symmetric() {
        let cfg = BoneConfig::default();
        for b in [5.0, 40.0, 80.0, 250.0] {
            let p = bone_profile(b, &cfg);
            for pt in &p {
                let mirrored = [-pt[0], pt[1]];
                assert!(p.iter().any(|q| (q[0] - mirrored[0]).abs() < 1e-12 && (q[1] - mirrored[1]).abs() < 1e-12));
            }
        }
    }

    #[test]
    fn flank_midpoints_sit_between_shoulder_and_tip() {
        let cfg = BoneConfig::default();
        let mids = flank_midpoints(&bone_profile(80.0, &cfg));
        assert_eq!(mids[0], [-5.0, 36.0]);
        assert_eq!(mids[1], [-5.0, -36.0]);
        assert_eq!(mids[2], [5.0, -36.0]);
        assert_eq!(mids[3], [5.0, 36.0]);
    }
}
