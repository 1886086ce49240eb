//! ISO 10303-21 (STEP AP214) writer for faceted solids.
//!
//! Every body becomes a `FACETED_BREP` over one `CLOSED_SHELL`; each convex
//! polygon is a planar `FACE_SURFACE` bounded by a `POLY_LOOP`. Shared
//! vertices are written once.

use crate::float_types::Real;
use crate::solid::{Polygon, Solid};
use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};
use std::fmt::Write as _;

/// Entity writer handing out sequential `#id`s.
struct StepWriter {
    data: String,
    next_id: usize,
    points: HashMap<[u64; 3], usize>,
}

fn real(v: Real) -> String {
    // STEP reals need a decimal point; `-0.0` prints as plain zero
    let v = if v == 0.0 { 0.0 } else { v };
    format!("{v:.6}")
}

fn triple(v: [Real; 3]) -> String {
    format!("({},{},{})", real(v[0]), real(v[1]), real(v[2]))
}

impl StepWriter {
    fn new() -> Self {
        StepWriter {
            data: String::new(),
            next_id: 1,
            points: HashMap::new(),
        }
    }

    fn add(&mut self, entity: impl AsRef<str>) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        let _ = writeln!(self.data, "#{id} = {};", entity.as_ref());
        id
    }

    fn point(&mut self, p: &Point3<Real>) -> usize {
        let key = [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()];
        if let Some(&id) = self.points.get(&key) {
            return id;
        }
        let id = self.add(format!("CARTESIAN_POINT('',{})", triple([p.x, p.y, p.z])));
        self.points.insert(key, id);
        id
    }

    fn direction(&mut self, d: &Vector3<Real>) -> usize {
        self.add(format!("DIRECTION('',{})", triple([d.x, d.y, d.z])))
    }

    fn placement(&mut self, origin: &Point3<Real>, axis: &Vector3<Real>, x_dir: &Vector3<Real>) -> usize {
        let o = self.point(origin);
        let z = self.direction(axis);
        let x = self.direction(x_dir);
        self.add(format!("AXIS2_PLACEMENT_3D('',#{o},#{z},#{x})"))
    }

    fn face(&mut self, poly: &Polygon) -> Option<usize> {
        if poly.vertices.len() < 3 {
            return None;
        }
        let ids: Vec<String> = poly
            .vertices
            .iter()
            .map(|v| format!("#{}", self.point(&v.pos)))
            .collect();
        let looped = self.add(format!("POLY_LOOP('',({}))", ids.join(",")));
        let bound = self.add(format!("FACE_OUTER_BOUND('',#{looped},.T.)"));

        let origin = poly.vertices[0].pos;
        let normal = poly.plane.normal;
        let x_dir = (poly.vertices[1].pos - origin)
            .try_normalize(Real::EPSILON)
            .unwrap_or_else(|| normal.cross(&Vector3::x()).normalize());
        let frame = self.placement(&origin, &normal, &x_dir);
        let plane = self.add(format!("PLANE('',#{frame})"));
        Some(self.add(format!("FACE_SURFACE('',(#{bound}),#{plane},.T.)")))
    }

    fn body(&mut self, solid: &Solid) -> usize {
        let faces: Vec<String> = solid
            .polygons
            .iter()
            .filter_map(|p| self.face(p))
            .map(|id| format!("#{id}"))
            .collect();
        let shell = self.add(format!("CLOSED_SHELL('',({}))", faces.join(",")));
        self.add(format!("FACETED_BREP('',#{shell})"))
    }
}

/// Write `bodies` as one STEP product called `name`.
pub fn to_step(bodies: &[Solid], name: &str) -> String {
    let name = name.replace('\'', "''");
    let mut w = StepWriter::new();

    let app = w.add("APPLICATION_CONTEXT('mechanical design')");
    w.add(format!(
        "APPLICATION_PROTOCOL_DEFINITION('international standard','automotive_design',2000,#{app})"
    ));
    let mm = w.add("(LENGTH_UNIT() NAMED_UNIT(*) SI_UNIT(.MILLI.,.METRE.))");
    let rad = w.add("(NAMED_UNIT(*) PLANE_ANGLE_UNIT() SI_UNIT($,.RADIAN.))");
    let sr = w.add("(NAMED_UNIT(*) SI_UNIT($,.STERADIAN.) SOLID_ANGLE_UNIT())");
    let unc = w.add(format!(
        "UNCERTAINTY_MEASURE_WITH_UNIT(LENGTH_MEASURE(1.E-06),#{mm},'distance_accuracy_value','confusion')"
    ));
    let ctx = w.add(format!(
        "(GEOMETRIC_REPRESENTATION_CONTEXT(3) GLOBAL_UNCERTAINTY_ASSIGNED_CONTEXT((#{unc})) \
         GLOBAL_UNIT_ASSIGNED_CONTEXT((#{mm},#{rad},#{sr})) REPRESENTATION_CONTEXT('',''))"
    ));

    let origin = w.placement(&Point3::origin(), &Vector3::z(), &Vector3::x());
    let mut items = vec![format!("#{origin}")];
    for body in bodies.iter().filter(|b| !b.is_empty()) {
        items.push(format!("#{}", w.body(body)));
    }

    let product = w.add(format!("PRODUCT('{name}','{name}','',(#{app}))"));
    let formation = w.add(format!("PRODUCT_DEFINITION_FORMATION('','',#{product})"));
    let design = w.add(format!("DESIGN_CONTEXT('design',#{app},'design')"));
    let definition = w.add(format!("PRODUCT_DEFINITION('','',#{formation},#{design})"));
    let shape = w.add(format!(
        "FACETED_BREP_SHAPE_REPRESENTATION('',({}),#{ctx})",
        items.join(",")
    ));
    let pds = w.add(format!("PRODUCT_DEFINITION_SHAPE('','',#{definition})"));
    w.add(format!("SHAPE_DEFINITION_REPRESENTATION(#{pds},#{shape})"));

    let mut out = String::new();
    out.push_str("ISO-10303-21;\nHEADER;\n");
    out.push_str("FILE_DESCRIPTION(('STEP AP214'),'2;1');\n");
    let _ = writeln!(
        out,
        "FILE_NAME('{name}.step','1970-01-01T00:00:00',(''),(''),'pcb-magazine','pcb-magazine','');"
    );
    out.push_str("FILE_SCHEMA(('AUTOMOTIVE_DESIGN { 1 0 10303 214 1 1 1 1 }'));\nENDSEC;\nDATA;\n");
    out.push_str(&w.data);
    out.push_str("ENDSEC;\nEND-ISO-10303-21;\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_writes_six_faces_and_eight_points() {
        let cube = Solid::cuboid(2.0, 2.0, 2.0);
        let text = to_step(&[cube], "cube");
        assert!(text.starts_with("ISO-10303-21;"));
        assert!(text.trim_end().ends_with("END-ISO-10303-21;"));
        assert_eq!(text.matches("POLY_LOOP(").count(), 6);
        assert_eq!(text.matches("FACETED_BREP(").count(), 1);
        // eight corners plus the origin of the placement
        assert_eq!(text.matches("CARTESIAN_POINT(").count(), 9);
    }

    #[test]
    fn each_body_is_its_own_brep() {
        let a = Solid::cuboid(1.0, 1.0, 1.0);
        let b = Solid::cuboid_at([5.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let text = to_step(&[a, b], "pair");
        assert_eq!(text.matches("FACETED_BREP(").count(), 2);
        assert_eq!(text.matches("CLOSED_SHELL(").count(), 2);
    }

    #[test]
    fn negative_zero_is_normalised() {
        assert_eq!(real(-0.0), "0.000000");
        assert_eq!(real(-1.5), "-1.500000");
    }
}
