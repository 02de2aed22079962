use super::*;

fn keys(plan: &OrientationPlan) -> Vec<(usize, u32)> {
    plan.views()
        .iter()
        .map(|v| (v.key.orientation_index, v.key.angle_deg))
        .collect()
}

#[test]
fn two_orientations_at_90_degrees_give_eight_views_in_order() {
    let a = Vec3::ZERO;
    let b = Vec3::new(90.0, 0.0, 0.0);
    let plan = OrientationPlan::new(&[a, b], 90).unwrap();
    assert_eq!(plan.len(), 8);
    assert_eq!(
        keys(&plan),
        vec![
            (0, 0),
            (0, 90),
            (0, 180),
            (0, 270),
            (1, 0),
            (1, 90),
            (1, 180),
            (1, 270)
        ]
    );
    assert_eq!(plan.views()[5].base_rotation_deg, b);
    assert_eq!(
        plan.views()[5].transform.rotation_deg,
        Vec3::new(90.0, 0.0, 90.0)
    );
}

#[test]
fn planning_is_deterministic() {
    let bases = [Vec3::ZERO, Vec3::new(-90.0, 0.0, 0.0), Vec3::new(0.0, 90.0, 0.0)];
    assert_eq!(
        OrientationPlan::new(&bases, 60).unwrap(),
        OrientationPlan::new(&bases, 60).unwrap()
    );
}

#[test]
fn increment_of_360_or_more_yields_only_zero() {
    assert_eq!(rotation_steps(360).unwrap(), vec![0]);
    assert_eq!(rotation_steps(1000).unwrap(), vec![0]);
    let plan = OrientationPlan::new(&[Vec3::ZERO, Vec3::X], 720).unwrap();
    assert_eq!(keys(&plan), vec![(0, 0), (1, 0)]);
}

#[test]
fn non_dividing_increment_keeps_partial_last_interval() {
    assert_eq!(rotation_steps(100).unwrap(), vec![0, 100, 200, 300]);
    assert_eq!(rotation_steps(60).unwrap().len(), 6);
}

#[test]
fn zero_increment_is_rejected() {
    assert!(rotation_steps(0).is_err());
    assert!(OrientationPlan::new(&[Vec3::ZERO], 0).is_err());
}

#[test]
fn non_finite_orientation_is_rejected() {
    assert!(OrientationPlan::new(&[Vec3::new(f32::NAN, 0.0, 0.0)], 90).is_err());
}

#[test]
fn plan_json_replays_identically() {
    let plan = OrientationPlan::new(&[Vec3::ZERO, Vec3::new(0.0, 90.0, 0.0)], 120).unwrap();
    let json = serde_json::to_string(&plan).unwrap();
    let back = OrientationPlan::from_json_reader(json.as_bytes()).unwrap();
    assert_eq!(back, plan);
    assert_eq!(back.first_duplicate(), None);
}

#[test]
fn first_duplicate_reports_repeated_key() {
    let plan = OrientationPlan::new(&[Vec3::ZERO], 180).unwrap();
    let mut views = plan.views().to_vec();
    views.push(views[1]);
    let replay = OrientationPlan::from_views(views);
    assert_eq!(
        replay.first_duplicate(),
        Some(ViewKey {
            orientation_index: 0,
            angle_deg: 180
        })
    );
}

#[test]
fn view_key_display_and_order() {
    let a = ViewKey {
        orientation_index: 0,
        angle_deg: 300,
    };
    let b = ViewKey {
        orientation_index: 1,
        angle_deg: 0,
    };
    assert_eq!(a.to_string(), "0@300");
    assert!(a < b);
}
