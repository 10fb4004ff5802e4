use uuid::Uuid;

use super::*;

const VIEW: Viewport = Viewport { width: 412.0, height: 758.0 };

fn candidate(x: f64, y: f64, z: f64) -> HitCandidate {
    HitCandidate { id: Uuid::new_v4(), position: DVec3::new(x, y, z), scale: DVec3::ONE }
}

fn hit_id(screen: Point, candidates: &[HitCandidate]) -> Option<ObjectId> {
    hit_test(screen, candidates, &PerspectiveCamera::default(), VIEW, 0.5).map(|h| h.object_id)
}

// =============================================================
// pick_radius
// =============================================================

#[test]
fn radius_grows_with_scale() {
    let camera = PerspectiveCamera::default();
    let small = candidate(0.0, 0.0, 0.0);
    let big = HitCandidate { scale: DVec3::splat(2.0), ..small };
    let r1 = pick_radius(&camera, VIEW, &small, 0.5).unwrap();
    let r2 = pick_radius(&camera, VIEW, &big, 0.5).unwrap();
    assert!((r2 - 2.0 * r1).abs() < 1e-9);
}

#[test]
fn radius_shrinks_with_depth() {
    let camera = PerspectiveCamera::default();
    let near = pick_radius(&camera, VIEW, &candidate(0.0, 0.0, 0.0), 0.5).unwrap();
    let far = pick_radius(&camera, VIEW, &candidate(0.0, 0.0, -5.0), 0.5).unwrap();
    assert!(far < near);
}

#[test]
fn radius_is_none_behind_camera() {
    let camera = PerspectiveCamera::default();
    assert!(pick_radius(&camera, VIEW, &candidate(0.0, 0.0, 10.0), 0.5).is_none());
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn empty_scene_hits_nothing() {
    assert!(hit_id(Point::new(206.0, 379.0), &[]).is_none());
}

#[test]
fn center_tap_hits_object_at_origin() {
    let c = candidate(0.0, 0.0, 0.0);
    assert_eq!(hit_id(Point::new(206.0, 379.0), &[c]), Some(c.id));
}

#[test]
fn hit_reports_distance() {
    let c = candidate(0.0, 0.0, 0.0);
    let hit = hit_test(Point::new(216.0, 379.0), &[c], &PerspectiveCamera::default(), VIEW, 0.5).unwrap();
    assert!((hit.distance_px - 10.0).abs() < 1e-6);
}

#[test]
fn far_tap_misses() {
    let c = candidate(0.0, 0.0, 0.0);
    assert!(hit_id(Point::new(10.0, 10.0), &[c]).is_none());
}

#[test]
fn topmost_wins_when_overlapping() {
    let below = candidate(0.0, 0.0, 0.0);
    let above = candidate(0.1, 0.0, 0.0);
    assert_eq!(hit_id(Point::new(206.0, 379.0), &[below, above]), Some(above.id));
    assert_eq!(hit_id(Point::new(206.0, 379.0), &[above, below]), Some(below.id));
}

#[test]
fn object_behind_camera_is_skipped() {
    let behind = candidate(0.0, 0.0, 8.0);
    assert!(hit_id(Point::new(206.0, 379.0), &[behind]).is_none());
}

#[test]
fn empty_viewport_hits_nothing() {
    let c = candidate(0.0, 0.0, 0.0);
    let hit = hit_test(Point::new(0.0, 0.0), &[c], &PerspectiveCamera::default(), Viewport::default(), 0.5);
    assert!(hit.is_none());
}
