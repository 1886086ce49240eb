mod support;

use pcb_magazine::{
    Component, MagazineConfig, MagazineError, MagazineParams, Model, build,
    io::{ExportFormat, export_bytes, export_to_path},
    triangulated::Triangulated3D,
};

use crate::support::scratch_dir;

fn small_params() -> MagazineParams {
    MagazineParams {
        a: 40.0,
        b: 50.0,
        c: 1.6,
        d: 5.0,
        n: 2,
    }
}

fn bone_model() -> Model {
    build(Component::Bone, &small_params(), &MagazineConfig::default()).expect("bone")
}

#[cfg(feature = "stl-io")]
#[test]
fn binary_stl_has_one_record_per_triangle() {
    let model = bone_model();
    let triangles = model.to_solid().triangle_count();
    let bytes = export_bytes(&model, "bone", ExportFormat::Stl).expect("stl");
    assert_eq!(bytes.len(), 84 + 50 * triangles);
    let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]);
    assert_eq!(count as usize, triangles);
}

#[test]
fn ascii_stl_is_named_after_the_file() {
    let model = bone_model();
    let bytes = export_bytes(&model, "bone", ExportFormat::StlAscii).expect("ascii stl");
    let text = String::from_utf8(bytes).expect("utf-8");
    assert!(text.starts_with("solid bone\n"));
    assert!(text.ends_with("endsolid bone\n"));
    assert_eq!(text.matches("facet normal").count(), model.to_solid().triangle_count());
}

#[test]
fn step_keeps_assembly_parts_apart() {
    let model = build(Component::Assembly, &small_params(), &MagazineConfig::default()).expect("assembly");
    let bytes = export_bytes(&model, "magazine", ExportFormat::Step).expect("step");
    let text = String::from_utf8(bytes).expect("utf-8");
    assert!(text.starts_with("ISO-10303-21;"));
    assert_eq!(text.matches("FACETED_BREP(").count(), 6);
    assert!(text.contains("PRODUCT('magazine'"));
}

#[test]
fn export_creates_missing_directories() {
    let dir = scratch_dir("nested");
    let target = dir.join("out").join("deeper").join("bone.step");
    let written = export_to_path(&bone_model(), &target, ExportFormat::Step).expect("export");

    assert!(written.is_absolute());
    assert!(written.ends_with("out/deeper/bone.step"));
    let text = std::fs::read_to_string(&written).expect("read back");
    assert!(text.contains("FILE_NAME('bone.step'"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn export_is_repeatable() {
    let model = bone_model();
    let first = export_bytes(&model, "bone", ExportFormat::StlAscii).expect("first");
    let second = export_bytes(&bone_model(), "bone", ExportFormat::StlAscii).expect("second");
    assert_eq!(first, second);
}

#[test]
fn unknown_format_is_rejected() {
    let err = "obj".parse::<ExportFormat>().unwrap_err();
    assert!(matches!(err, MagazineError::UnsupportedFormat(ref f) if f == "obj"));
    assert!(err.to_string().contains("obj"));
}

#[test]
fn build_validates_before_constructing() {
    let config = MagazineConfig::default();
    let no_slots = MagazineParams { n: 0, ..small_params() };
    assert!(matches!(
        build(Component::Frame, &no_slots, &config),
        Err(MagazineError::ParameterRange { name: "n", .. })
    ));

    let flat = MagazineParams { b: 4.0, ..small_params() };
    assert!(matches!(
        build(Component::Assembly, &flat, &config),
        Err(MagazineError::ParameterRange { name: "b", .. })
    ));
    // too short to carry the flank chamfer
    assert!(matches!(
        build(Component::Bone, &flat, &config),
        Err(MagazineError::ParameterRange { name: "b", .. })
    ));
    let short = MagazineParams { b: 5.0, ..small_params() };
    assert!(build(Component::Bone, &short, &config).is_ok());

    let narrow = MagazineParams { a: 4.0, ..small_params() };
    assert!(matches!(
        build(Component::Frame, &narrow, &config),
        Err(MagazineError::ParameterRange { name: "a", .. })
    ));
}

#[test]
fn single_part_models_have_one_body() {
    let model = bone_model();
    assert_eq!(model.bodies().len(), 1);
    assert!(matches!(model, Model::Solid(_)));
}
