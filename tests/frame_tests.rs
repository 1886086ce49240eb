mod support;

use pcb_magazine::{
    FrameConfig, MagazineConfig, MagazineParams, SolidOps,
    frame::{
        FrameDimensions, active_height, build_frame, connector_centers, connector_margin,
        connector_top_edges, slot_centers,
    },
    solid::Axis,
};

use crate::support::{approx_eq, half_volumes};

fn plain_config() -> FrameConfig {
    FrameConfig {
        outer_corner_chamfer: 0.0,
        connector_top_chamfer: 0.0,
        ..FrameConfig::default()
    }
}

#[test]
fn active_height_counts_slots_and_noses() {
    for (n, c, d) in [(1, 1.6, 10.0), (10, 1.6, 10.0), (3, 2.0, 4.5), (25, 0.8, 3.0)] {
        let expected = n as f64 * c + (n + 1) as f64 * d;
        assert!(approx_eq(active_height(n, c, d), expected, 1e-12));
    }
    assert!(approx_eq(active_height(10, 1.6, 10.0), 126.0, 1e-12));
}

#[test]
fn slot_centres_stay_inside_the_window() {
    let (c, d, n) = (1.6, 10.0, 10);
    let inner_y = active_height(n, c, d);
    let ys = slot_centers(c, d, n, inner_y);
    assert!(ys.iter().all(|y| y.abs() + c / 2.0 + d <= inner_y / 2.0 + 1e-9));
    // symmetric about y = 0
    for (lo, hi) in ys.iter().zip(ys.iter().rev()) {
        assert!(approx_eq(*lo, -*hi, 1e-9));
    }
}

#[test]
fn connector_centres_are_mirrored() {
    let cfg = FrameConfig::default();
    let dims = FrameDimensions::new(90.0, 1.6, 10.0, 10, &cfg);
    let [tl, tr, bl, br] = connector_centers(&dims, &cfg);
    assert!(approx_eq(tl[0], -tr[0], 1e-12));
    assert!(approx_eq(bl[0], -br[0], 1e-12));
    assert!(approx_eq(tl[1], -bl[1], 1e-12));
    assert!(approx_eq(tr[0], 43.5, 1e-12));
    assert!(approx_eq(tr[1], 72.5, 1e-12));
}

#[test]
fn stock_frame_extents() {
    let frame = build_frame(90.0, 1.6, 10.0, 10, &FrameConfig::default()).expect("frame");
    let bb = frame.bounding_box();
    assert!(approx_eq(bb.mins.x, -54.5, 1e-9));
    assert!(approx_eq(bb.maxs.x, 54.5, 1e-9));
    assert!(approx_eq(bb.mins.y, -75.0, 1e-9));
    assert!(approx_eq(bb.maxs.y, 75.0, 1e-9));
    assert!(approx_eq(bb.mins.z, -4.0, 1e-9));
    assert!(approx_eq(bb.maxs.z, 4.0, 1e-9));
}

#[test]
fn plain_frame_volume_accounts_for_every_cut() {
    let frame = build_frame(90.0, 1.6, 10.0, 10, &plain_config()).expect("frame");

    let plate = 109.0 * 150.0 * 8.0;
    let window = 95.0 * 126.0 * 8.0;
    let rails = 2.0 * 3.0 * 126.0 * 8.0;
    let slots = 2.0 * 10.0 * 3.0 * 1.6 * 8.0;
    let notches = 4.0 * 6.0 * 5.0 * 8.0;
    let wedges = 8.0 * (0.5 * 4.0 * 8.0) * 5.0;
    let expected = plate - window + rails - slots - notches - wedges;

    assert!(
        approx_eq(frame.volume(), expected, 1e-3),
        "volume {} expected {expected}",
        frame.volume()
    );
}

#[test]
fn cosmetic_chamfers_remove_a_little_material() {
    let plain = build_frame(90.0, 1.6, 10.0, 10, &plain_config()).expect("plain frame");
    let finished = build_frame(90.0, 1.6, 10.0, 10, &FrameConfig::default()).expect("frame");

    // four 2 mm corner bevels over the plate thickness
    let corners = 4.0 * 0.5 * 2.0 * 2.0 * 8.0;
    let removed = plain.volume() - finished.volume();
    assert!(removed > corners, "removed {removed}");
    assert!(removed < corners + 8.0, "removed {removed}");
}

#[test]
fn frame_is_symmetric_about_both_axes() {
    let frame = build_frame(60.0, 2.0, 6.0, 3, &FrameConfig::default()).expect("frame");
    let bb = frame.bounding_box();
    for axis in 0..2 {
        assert!(approx_eq(bb.mins[axis], -bb.maxs[axis], 1e-9));
        let (neg, pos) = half_volumes(&frame, axis);
        assert!(approx_eq(neg, pos, 1e-3), "axis {axis}: {neg} vs {pos}");
    }
}

#[test]
fn single_slot_frame_builds() {
    let frame = build_frame(40.0, 1.0, 5.0, 1, &FrameConfig::default()).expect("frame");
    let bb = frame.bounding_box();
    let dims = FrameDimensions::new(40.0, 1.0, 5.0, 1, &FrameConfig::default());
    assert!(approx_eq(dims.inner_y, 11.0, 1e-12));
    assert!(approx_eq(bb.maxs.y - bb.mins.y, dims.outer_y, 1e-9));
}

#[test]
fn builds_are_repeatable() {
    let cfg = FrameConfig::default();
    let first = build_frame(50.0, 1.6, 5.0, 2, &cfg).expect("frame");
    let second = build_frame(50.0, 1.6, 5.0, 2, &cfg).expect("frame");
    assert_eq!(first.polygons, second.polygons);
}

#[test]
fn connector_chamfers_target_the_wedge_tops() {
    let cfg = plain_config();
    let dims = FrameDimensions::new(90.0, 1.6, 10.0, 10, &cfg);
    let frame = build_frame(90.0, 1.6, 10.0, 10, &cfg).expect("frame");
    let edges = connector_top_edges(&frame, &dims, &cfg).expect("connector edges");
    assert_eq!(edges.len(), 8);

    let half_w = cfg.connector_width / 2.0;
    let half_t = cfg.plate_thickness / 2.0;
    let centers = connector_centers(&dims, &cfg);
    for (i, edge) in edges.iter().enumerate() {
        let [x0, y0] = centers[i / 2];
        let x = if i % 2 == 0 { x0 - half_w } else { x0 + half_w };
        assert!(edge.is_parallel_to(Axis::Y), "edge {i}: {edge:?}");
        for p in [edge.start, edge.end] {
            assert!(approx_eq(p.x, x, 1e-6), "edge {i} at x {} expected {x}", p.x);
            assert!(approx_eq(p.z, half_t, 1e-6), "edge {i} at z {}", p.z);
        }
        // the notch opens onto the outer edge, so the slope runs the connector height
        assert!(approx_eq(edge.midpoint().y, y0, 1e-6));
        assert!(approx_eq(edge.length(), cfg.connector_height, 1e-6));
        assert!(edge.is_convex());
    }
}

#[test]
fn overlapping_connectors_never_yield_a_frame() {
    let cfg = FrameConfig::default();
    for a in [1.0, 4.0] {
        let dims = FrameDimensions::new(a, 1.6, 10.0, 1, &cfg);
        assert!(connector_margin(&dims, &cfg) < 0.0);
        assert!(build_frame(a, 1.6, 10.0, 1, &cfg).is_err(), "a = {a}");

        let params = MagazineParams { a, n: 1, ..MagazineParams::default() };
        assert!(params.validate_frame(&MagazineConfig::default()).is_err());
    }
}

#[test]
fn finished_frames_fill_their_envelope() {
    let cfg = FrameConfig::default();
    for (a, c, d, n) in [(20.0, 1.6, 10.0, 1), (35.0, 1.0, 3.0, 4), (90.0, 2.4, 8.0, 6)] {
        let dims = FrameDimensions::new(a, c, d, n, &cfg);
        assert!(connector_margin(&dims, &cfg) > 0.0);
        let bb = build_frame(a, c, d, n, &cfg).expect("frame").bounding_box();
        assert!(approx_eq(bb.maxs.x, dims.outer_x / 2.0, 1e-6));
        assert!(approx_eq(bb.mins.y, -dims.outer_y / 2.0, 1e-6));
        assert!(approx_eq(bb.maxs.z, cfg.plate_thickness / 2.0, 1e-6));
    }
}
