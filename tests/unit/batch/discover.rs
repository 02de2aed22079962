use super::*;

fn fresh_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_batch_discover").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn touch(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, b"").unwrap();
}

#[test]
fn render_angle_parses_file_names() {
    assert_eq!(render_angle("render_0.png"), Some(0));
    assert_eq!(render_angle("render_300.PNG"), Some(300));
    assert_eq!(render_angle("render_x.png"), None);
    assert_eq!(render_angle("shot_30.png"), None);
}

#[test]
fn render_image_filter_checks_prefix_and_extension() {
    assert!(is_render_image(Path::new("a/render_60.JPG")));
    assert!(!is_render_image(Path::new("a/render_60.tiff")));
    assert!(!is_render_image(Path::new("a/view_60.png")));
}

#[test]
fn images_are_ordered_by_angle() {
    let dir = fresh_dir("ordered");
    for name in ["render_300.png", "render_0.png", "render_60.png", "notes.txt"] {
        touch(&dir.join(name));
    }
    let names: Vec<_> = render_images(&dir)
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["render_0.png", "render_60.png", "render_300.png"]);
}

#[test]
fn discovers_flat_numbered_and_run_dirs() {
    let root = fresh_dir("layout");
    touch(&root.join("flat/render_0.png"));
    touch(&root.join("chair/0/render_0.png"));
    touch(&root.join("chair/1/render_0.png"));
    touch(&root.join("cloth/_run_2/render_0.png"));
    touch(&root.join("cloth/misc/render_0.png"));
    touch(&root.join("empty/0/readme.txt"));

    let found = discover_render_dirs(&root).unwrap();
    assert_eq!(
        found,
        vec![
            root.join("chair/0"),
            root.join("chair/1"),
            root.join("cloth/_run_2"),
            root.join("flat"),
        ]
    );
}

#[test]
fn composite_names_follow_directory_kind() {
    assert_eq!(
        composite_name(Path::new("out/chair/2")),
        "chair_rotation_2_composite.png"
    );
    assert_eq!(
        composite_name(Path::new("out/cloth/_run_4")),
        "cloth__run_4_composite.png"
    );
    assert_eq!(composite_name(Path::new("out/flat")), "flat_composite.png");
}
