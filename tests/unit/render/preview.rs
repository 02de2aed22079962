use super::*;
use crate::geometry::mesh::Mesh;
use crate::geometry::transform::Transform;

fn upright_square() -> Mesh {
    // Unit square in the XZ plane, facing the camera.
    Mesh::new(
        vec![
            Vec3::new(-0.5, 0.0, 0.0),
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(0.5, 0.0, 1.0),
            Vec3::new(-0.5, 0.0, 1.0),
        ],
        vec![[0, 1, 2], [0, 2, 3]],
    )
    .unwrap()
}

fn small_settings() -> RenderSettings {
    RenderSettings {
        width: 64,
        height: 48,
        samples: 1,
        transparent_background: true,
    }
}

fn opaque_count(r: &Raster) -> usize {
    r.data().chunks_exact(4).filter(|px| px[3] == 255).count()
}

#[test]
fn renders_centered_content_on_transparent_background() {
    let scene = SceneSession::new("square", upright_square());
    let mut renderer = PreviewRenderer::default();
    let out = renderer.render_view(&scene, &small_settings()).unwrap();

    assert_eq!((out.width(), out.height()), (64, 48));
    assert_eq!(out.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(out.pixel(32, 24).map(|p| p[3]), Some(255));
    assert!(opaque_count(&out) > 100);
}

#[test]
fn rendering_is_deterministic() {
    let mut scene = SceneSession::new("square", upright_square());
    scene.apply(Transform::rotation(Vec3::new(0.0, 0.0, 30.0)));
    let mut renderer = PreviewRenderer::default();
    let a = renderer.render_view(&scene, &small_settings()).unwrap();
    let b = renderer.render_view(&scene, &small_settings()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn edge_on_view_covers_fewer_pixels() {
    let mut scene = SceneSession::new("square", upright_square());
    let mut renderer = PreviewRenderer::default();
    let front = renderer.render_view(&scene, &small_settings()).unwrap();

    scene.apply(Transform::rotation(Vec3::new(0.0, 0.0, 80.0)));
    let side = renderer.render_view(&scene, &small_settings()).unwrap();
    assert!(opaque_count(&side) < opaque_count(&front));
}

#[test]
fn opaque_background_fills_the_frame() {
    let scene = SceneSession::new("square", upright_square());
    let settings = RenderSettings {
        transparent_background: false,
        ..small_settings()
    };
    let out = PreviewRenderer::default()
        .render_view(&scene, &settings)
        .unwrap();
    assert_eq!(out.pixel(0, 0), Some([255, 255, 255, 255]));
}

#[test]
fn point_cloud_draws_points() {
    let mesh = Mesh::from_positions(vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0)]).unwrap();
    let scene = SceneSession::new("pts", mesh);
    let out = PreviewRenderer::default()
        .render_view(&scene, &small_settings())
        .unwrap();
    assert_eq!(opaque_count(&out), 2);
}

#[test]
fn empty_mesh_and_zero_resolution_fail() {
    let scene = SceneSession::new("none", Mesh::from_positions(Vec::new()).unwrap());
    assert!(matches!(
        PreviewRenderer::default().render_view(&scene, &small_settings()),
        Err(ViewgridError::Render(_))
    ));

    let scene = SceneSession::new("square", upright_square());
    let settings = RenderSettings {
        width: 0,
        ..small_settings()
    };
    assert!(PreviewRenderer::default().render_view(&scene, &settings).is_err());
}
