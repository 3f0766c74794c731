use meshweld::{
    diag::AttributeKind, load, parse::ParseError, Diagnostic, Error, LoadOptions, NormalMode,
    NormalSource,
};
use nalgebra::Vector3;

fn load_default(text: &str) -> meshweld::LoadedMesh {
    load(text, &LoadOptions::default()).unwrap()
}

/// A unit cube centered on the origin: 8 corners, 6 quads, outward winding, no normals.
const CUBE: &str = "\
# unit cube
v -0.5 -0.5 -0.5
v  0.5 -0.5 -0.5
v  0.5  0.5 -0.5
v -0.5  0.5 -0.5
v -0.5 -0.5  0.5
v  0.5 -0.5  0.5
v  0.5  0.5  0.5
v -0.5  0.5  0.5
f 1 4 3 2
f 5 6 7 8
f 1 2 6 5
f 4 8 7 3
f 1 5 8 4
f 2 3 7 6
";

#[test]
fn cube_gets_outward_unit_normals() {
    let loaded = load_default(CUBE);
    let mesh = &loaded.mesh;
    assert_eq!(loaded.normals, NormalSource::Synthesized);
    assert_eq!(mesh.triangle_count(), 12);
    assert_eq!(mesh.vertex_count(), 8);

    for v in 0..mesh.vertex_count() {
        let n = Vector3::from_column_slice(&mesh.normals()[v * 3..v * 3 + 3]);
        let outward = mesh.position(v).unwrap().coords;
        assert!((n.norm() - 1.0).abs() < 1e-5, "vertex {v}: |{n:?}| != 1");
        assert!(n.dot(&outward) > 0.0, "vertex {v}: {n:?} points inward");
        // each corner touches three faces, but not equally many triangles per face; the normal
        // still falls in the corner's own octant
        for axis in 0..3 {
            assert_eq!(n[axis].signum(), outward[axis].signum());
        }
    }
}

#[test]
fn shared_reference_welds_once() {
    let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
v 2 2 0
vt 0 0
vt 1 0
vt 0 1
vt 1 1
vt 0.5 0.5
vn 0 0 1
vn 0 0 1
vn 0 0 1
vn 0 0 1
vn 0 0 1
f 1/1/1 2/2/2 5/5/5
f 5/5/5 3/3/3 4/4/4
";
    let loaded = load_default(text);
    let mesh = &loaded.mesh;
    assert_eq!(mesh.vertex_count(), 5);
    let idx = mesh.indices();
    assert_eq!(idx[2], idx[3]);
    assert_eq!(loaded.normals, NormalSource::FromInput);
    assert!(loaded.diagnostics.is_empty());
}

#[test]
fn missing_uvs_default_to_zero() {
    let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n";
    let mesh = load_default(text).mesh;
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.uvs().len(), 6);
    assert!(mesh.uvs().iter().all(|&c| c == 0.0));
    assert_eq!(&mesh.normals()[0..3], &[0.0, 0.0, 1.0]);
}

#[test]
fn relative_reference_picks_latest_position() {
    let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
    let mesh = load_default(text).mesh;
    assert_eq!(mesh.position(2).unwrap(), nalgebra::point![0.0, 1.0, 0.0]);
}

#[test]
fn faces_may_reference_later_vertices() {
    let loaded = load_default("f 1 2 3\nv 0 0 0\nv 1 0 0\nv 0 1 0\n");
    let mesh = &loaded.mesh;
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.indices(), &[0, 1, 2]);
    assert_eq!(mesh.position(1).unwrap(), nalgebra::point![1.0, 0.0, 0.0]);
    assert!(loaded.diagnostics.is_empty());
}

#[test]
fn indices_stay_in_range() {
    let mesh = load_default(CUBE).mesh;
    let v = mesh.positions().len() / 3;
    assert!(mesh.indices().iter().all(|&i| (i as usize) < v));
    assert_eq!(mesh.uvs().len() / 2, v);
    assert_eq!(mesh.normals().len() / 3, v);
    assert!(mesh.validate().is_ok());
}

#[test]
fn recoverable_problems_are_collected() {
    let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
f 1/1 2/9 3/1
f 1 2
";
    let loaded = load_default(text);
    assert_eq!(loaded.mesh.triangle_count(), 1);
    assert_eq!(
        loaded.diagnostics,
        vec![
            Diagnostic::ShortFace { line: 6, count: 2 },
            Diagnostic::MissingAttribute {
                triangle: 0,
                attribute: AttributeKind::Texcoord,
                index: 8,
                count: 1
            },
        ]
    );
}

#[test]
fn source_normals_are_kept_in_auto_mode() {
    let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 1 0 0\nf 1//1 2//1 3//1\n";
    let loaded = load_default(text);
    assert_eq!(loaded.normals, NormalSource::FromInput);
    assert_eq!(&loaded.mesh.normals()[0..3], &[1.0, 0.0, 0.0]);

    let forced = load(
        text,
        &LoadOptions {
            normals: NormalMode::Always,
        },
    )
    .unwrap();
    assert_eq!(forced.normals, NormalSource::Synthesized);
    assert_eq!(&forced.mesh.normals()[0..3], &[0.0, 0.0, 1.0]);
}

#[test]
fn synthesis_can_be_disabled() {
    let loaded = load(
        CUBE,
        &LoadOptions {
            normals: NormalMode::Never,
        },
    )
    .unwrap();
    assert_eq!(loaded.normals, NormalSource::Absent);
    assert!(loaded.mesh.normals().iter().all(|&c| c == 0.0));
}

#[test]
fn faceless_input_is_an_empty_mesh() {
    let loaded = load_default("v 1 2 3\n");
    assert!(loaded.mesh.is_empty());
    assert_eq!(loaded.mesh.vertex_count(), 0);
    assert!(loaded.mesh.validate().is_ok());
}

#[test]
fn whole_input_failures_are_errors() {
    let opts = LoadOptions::default();
    assert!(matches!(
        load("", &opts),
        Err(Error::Parse(ParseError::EmptyInput))
    ));
    assert!(matches!(
        load("v 0 0 x\n", &opts),
        Err(Error::Parse(ParseError::InvalidNumber { line: 1, .. }))
    ));
    assert!(matches!(
        load("v 0 0 0\nf 1 1\n", &opts),
        Err(Error::Parse(ParseError::NoUsableFaces { rejected: 1 }))
    ));
}

#[test]
fn load_file_reports_io_errors() {
    let missing = std::env::temp_dir().join("meshweld-does-not-exist.obj");
    assert!(matches!(
        meshweld::load_file(&missing, &LoadOptions::default()),
        Err(Error::Io(_))
    ));
}
