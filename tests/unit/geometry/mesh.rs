use super::*;

fn unit_triangle() -> Mesh {
    Mesh::new(
        vec![Vec3::ZERO, Vec3::X, Vec3::new(0.0, 1.0, 2.0)],
        vec![[0, 1, 2]],
    )
    .unwrap()
}

#[test]
fn new_rejects_out_of_range_indices() {
    let err = Mesh::new(vec![Vec3::ZERO, Vec3::X], vec![[0, 1, 2]]).unwrap_err();
    assert!(err.to_string().contains("out of range"));
}

#[test]
fn new_rejects_non_finite_positions() {
    assert!(Mesh::from_positions(vec![Vec3::new(f32::NAN, 0.0, 0.0)]).is_err());
}

#[test]
fn positions_follow_placement() {
    let mesh = unit_triangle();
    let heights = |a: &Affine3A| -> Vec<f32> {
        mesh.placed_positions(a).iter().map(|p| p.z).collect()
    };
    assert_eq!(heights(&Affine3A::IDENTITY), vec![0.0, 0.0, 2.0]);

    let lifted = Affine3A::from_translation(Vec3::new(0.0, 0.0, 1.5));
    assert_eq!(heights(&lifted), vec![1.5, 1.5, 3.5]);
    assert_eq!(mesh.placed_positions(&lifted)[1], Vec3::new(1.0, 0.0, 1.5));
}

#[test]
fn json_mesh_document_parses() {
    let json = r#"{ "positions": [[0,0,0],[1,0,0],[0,1,0]], "triangles": [[0,1,2]] }"#;
    let mesh = Mesh::from_json_reader(json.as_bytes()).unwrap();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.triangles(), &[[0, 1, 2]]);

    let bad = r#"{ "positions": [[0,0,0]], "faces": [] }"#;
    assert!(matches!(
        Mesh::from_json_reader(bad.as_bytes()),
        Err(ViewgridError::Serde(_))
    ));
}

#[test]
fn obj_file_loads_and_triangulates() {
    let dir = std::path::PathBuf::from("target").join("unit_mesh_obj");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("quad.obj");
    std::fs::write(
        &path,
        "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 1\nf 1 2 3 4\n",
    )
    .unwrap();

    let mesh = Mesh::from_path(&path).unwrap();
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.triangles().len(), 2);
}

#[test]
fn from_path_rejects_unknown_extension() {
    assert!(Mesh::from_path("model.fbx").is_err());
}

#[test]
fn bounds_of_points() {
    assert_eq!(bounds(&[]), None);
    let (lo, hi) = bounds(unit_triangle().positions()).unwrap();
    assert_eq!(lo, Vec3::ZERO);
    assert_eq!(hi, Vec3::new(1.0, 1.0, 2.0));
}
