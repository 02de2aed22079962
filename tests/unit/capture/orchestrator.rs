use super::*;
use crate::capture::sink::InMemoryViewSink;
use crate::foundation::core::Vec3;
use crate::geometry::mesh::Mesh;
use crate::raster::Raster;

fn tiny_settings() -> RenderSettings {
    RenderSettings {
        width: 4,
        height: 4,
        samples: 1,
        transparent_background: true,
    }
}

fn opts() -> CaptureOpts {
    CaptureOpts {
        ground: GroundAlignOpts::default(),
        render: tiny_settings(),
    }
}

fn column_mesh() -> Mesh {
    Mesh::from_positions(vec![
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(3.0, 1.0, 0.0),
        Vec3::new(2.0, 2.0, 5.0),
        Vec3::new(2.0, 3.0, 10.0),
    ])
    .unwrap()
}

#[test]
fn every_view_is_rendered_once_in_plan_order() {
    let plan = OrientationPlan::new(&[Vec3::ZERO, Vec3::new(90.0, 0.0, 0.0)], 90).unwrap();
    let mut scene = SceneSession::new("column", column_mesh());
    let mut sink = InMemoryViewSink::new();
    let mut calls = Vec::new();
    let mut renderer = |s: &SceneSession, r: &RenderSettings| {
        calls.push(*s.placement());
        Raster::transparent(r.width, r.height)
    };

    let summary = capture_asset(&mut scene, &plan, &opts(), &mut renderer, &mut sink).unwrap();

    assert_eq!(calls.len(), 8);
    assert_eq!(summary.succeeded.len(), 8);
    assert!(summary.is_complete());
    let accepted: Vec<ViewKey> = sink.accepted().iter().map(|(_, k)| *k).collect();
    let planned: Vec<ViewKey> = plan.views().iter().map(|v| v.key).collect();
    assert_eq!(accepted, planned);
    assert_eq!(scene.applied_count(), 8);
    assert_eq!(*scene.placement(), Transform::IDENTITY);
}

#[test]
fn placement_rests_second_lowest_vertex_on_ground_and_centers_xy() {
    let plan = OrientationPlan::new(&[Vec3::ZERO], 360).unwrap();
    let mut scene = SceneSession::new("column", column_mesh());
    let mut sink = InMemoryViewSink::new();
    let mut placed = Vec::new();
    let mut renderer = |s: &SceneSession, r: &RenderSettings| {
        placed = s.placed_positions();
        Raster::transparent(r.width, r.height)
    };

    let summary = capture_asset(&mut scene, &plan, &opts(), &mut renderer, &mut sink).unwrap();

    assert_eq!(summary.alignments[&0].pivot_height, 5.0);
    assert_eq!(placed[2].z, 0.0);
    assert_eq!(placed[0].z, -5.0);
    // x spans [1, 3] and y spans [1, 3]: center (2, 2) moves to the origin.
    assert_eq!(placed[0].x, -1.0);
    assert_eq!(placed[3].y, 1.0);
}

#[test]
fn spin_keeps_ground_alignment() {
    let plan = OrientationPlan::new(&[Vec3::ZERO], 90).unwrap();
    let mut scene = SceneSession::new("column", column_mesh());
    let mut sink = InMemoryViewSink::new();
    let mut pivots = Vec::new();
    let mut renderer = |s: &SceneSession, r: &RenderSettings| {
        pivots.push(s.placed_positions()[2]);
        Raster::transparent(r.width, r.height)
    };
    capture_asset(&mut scene, &plan, &opts(), &mut renderer, &mut sink).unwrap();

    assert_eq!(pivots.len(), 4);
    for p in pivots {
        assert!(p.z.abs() < 1e-5);
        // Vertex 2 sits at the horizontal center, so spinning never moves it.
        assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5);
    }
}

#[test]
fn render_failures_are_recorded_and_capture_continues() {
    let plan = OrientationPlan::new(&[Vec3::ZERO], 90).unwrap();
    let mut scene = SceneSession::new("column", column_mesh());
    let mut sink = InMemoryViewSink::new();
    let mut n = 0;
    let mut renderer = |_: &SceneSession, r: &RenderSettings| {
        n += 1;
        if n == 2 {
            return Err(ViewgridError::render("gpu lost"));
        }
        Raster::transparent(r.width, r.height)
    };

    let summary = capture_asset(&mut scene, &plan, &opts(), &mut renderer, &mut sink).unwrap();
    assert_eq!(summary.total(), 4);
    assert_eq!(summary.succeeded.len(), 3);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].key.angle_deg, 90);
    assert!(summary.failed[0].message.contains("gpu lost"));
    assert_eq!(sink.len(), 3);
}

#[test]
fn repeated_key_aborts_before_rendering() {
    let plan = OrientationPlan::new(&[Vec3::ZERO], 180).unwrap();
    let mut views = plan.views().to_vec();
    views.push(views[0]);
    let replay = OrientationPlan::from_views(views);

    let mut scene = SceneSession::new("column", column_mesh());
    let mut sink = InMemoryViewSink::new();
    let mut calls = 0;
    let mut renderer = |_: &SceneSession, r: &RenderSettings| {
        calls += 1;
        Raster::transparent(r.width, r.height)
    };

    let err = capture_asset(&mut scene, &replay, &opts(), &mut renderer, &mut sink).unwrap_err();
    assert!(matches!(err, ViewgridError::KeyCollision { .. }));
    assert_eq!(calls, 0);
    assert!(sink.is_empty());
}

#[test]
fn flat_mesh_falls_back_to_lowest_vertex() {
    let mesh = Mesh::from_positions(vec![Vec3::new(0.0, 0.0, 2.0), Vec3::new(1.0, 0.0, 2.0)])
        .unwrap();
    let plan = OrientationPlan::new(&[Vec3::ZERO], 360).unwrap();
    let mut scene = SceneSession::new("flat", mesh);
    let mut sink = InMemoryViewSink::new();
    let mut renderer =
        |_: &SceneSession, r: &RenderSettings| Raster::transparent(r.width, r.height);

    let summary = capture_asset(&mut scene, &plan, &opts(), &mut renderer, &mut sink).unwrap();
    let a = summary.alignments[&0];
    assert_eq!(a.pivot, crate::geometry::align::PivotRule::LowestFallback);
    assert_eq!(a.translation.z, -2.0);
}
