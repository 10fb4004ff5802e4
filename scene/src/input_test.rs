#![allow(clippy::float_cmp)]

use std::f64::consts::{FRAC_PI_2, PI};

use uuid::Uuid;

use super::*;

const EPSILON: f64 = 1e-9;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn pinch_at(a: Point, b: Point) -> PinchGesture {
    PinchGesture::begin(Uuid::new_v4(), (1, a), (2, b), DVec3::new(0.3, 0.2, 0.0), DVec3::ONE)
}

// =============================================================
// GestureIntent
// =============================================================

#[test]
fn intent_default_is_idle() {
    assert_eq!(GestureIntent::default(), GestureIntent::Idle);
}

#[test]
fn intent_names() {
    let cases = [
        (GestureIntent::Idle, "IDLE"),
        (GestureIntent::Drag, "DRAG"),
        (GestureIntent::Pinch, "PINCH"),
        (GestureIntent::Rotate, "ROTATE"),
        (GestureIntent::Tap, "TAP"),
        (GestureIntent::LongPress, "LONG_PRESS"),
        (GestureIntent::Swipe, "SWIPE"),
    ];
    for (intent, name) in cases {
        assert_eq!(intent.to_string(), name);
        assert_eq!(serde_json::to_string(&intent).unwrap(), format!("\"{name}\""));
    }
}

// =============================================================
// Helpers
// =============================================================

#[test]
fn pinch_metrics_distance_and_angle() {
    let (d, a) = pinch_metrics(pt(0.0, 0.0), pt(0.0, 10.0));
    assert_eq!(d, 10.0);
    assert!((a - FRAC_PI_2).abs() < EPSILON);
}

#[test]
fn wrap_angle_stays_in_half_open_range() {
    assert!((wrap_angle(3.0 * PI) - PI).abs() < EPSILON);
    assert!((wrap_angle(-PI) - PI).abs() < EPSILON);
    assert!((wrap_angle(0.5) - 0.5).abs() < EPSILON);
    assert!((wrap_angle(-0.5 - 2.0 * PI) + 0.5).abs() < EPSILON);
}

#[test]
fn clamp_scale_bounds_each_axis() {
    let s = clamp_scale(DVec3::new(0.1, 2.0, 9.0), 0.5, 5.0);
    assert_eq!(s, DVec3::new(0.5, 2.0, 5.0));
}

// =============================================================
// PinchGesture
// =============================================================

#[test]
fn pinch_begins_at_original_values() {
    let p = pinch_at(pt(0.0, 0.0), pt(20.0, 0.0));
    assert_eq!(p.start_distance, 20.0);
    assert_eq!(p.scale, DVec3::ONE);
    assert_eq!(p.rotation, p.orig_rotation);
    assert!(p.involves(1) && p.involves(2) && !p.involves(3));
}

#[test]
fn pinch_out_scales_up() {
    let mut p = pinch_at(pt(0.0, 0.0), pt(20.0, 0.0));
    let intent = p.update(pt(0.0, 0.0), pt(40.0, 0.0), 0.5, 5.0);
    assert_eq!(intent, GestureIntent::Pinch);
    assert!((p.scale.x - 2.0).abs() < EPSILON);
    assert_eq!(p.scale.x, p.scale.z);
}

#[test]
fn pinch_scale_is_clamped_high_and_low() {
    let mut p = pinch_at(pt(0.0, 0.0), pt(20.0, 0.0));
    p.update(pt(0.0, 0.0), pt(2000.0, 0.0), 0.5, 5.0);
    assert_eq!(p.scale, DVec3::splat(5.0));
    p.update(pt(0.0, 0.0), pt(1.0, 0.0), 0.5, 5.0);
    assert_eq!(p.scale, DVec3::splat(0.5));
}

#[test]
fn pinch_with_coincident_start_keeps_scale() {
    let mut p = pinch_at(pt(5.0, 5.0), pt(5.0, 5.0));
    p.update(pt(0.0, 0.0), pt(50.0, 0.0), 0.5, 5.0);
    assert_eq!(p.scale, DVec3::ONE);
}

#[test]
fn twist_changes_only_third_axis() {
    let mut p = pinch_at(pt(0.0, 0.0), pt(20.0, 0.0));
    let intent = p.update(pt(0.0, 0.0), pt(0.0, 20.0), 0.5, 5.0);
    assert_eq!(intent, GestureIntent::Rotate);
    assert_eq!(p.rotation.x, 0.3);
    assert_eq!(p.rotation.y, 0.2);
    // Clockwise on screen is a negative world twist.
    assert!((p.rotation.z + FRAC_PI_2).abs() < EPSILON);
    assert!((p.scale.x - 1.0).abs() < EPSILON);
}

// =============================================================
// InputState
// =============================================================

#[test]
fn input_state_default_is_idle() {
    assert_eq!(InputState::default(), InputState::Idle);
}

#[test]
fn target_id_reports_object_gestures() {
    let id = Uuid::new_v4();
    let pressed = InputState::Pressed { pointer: 1, target: PressTarget::Object(id), start: pt(0.0, 0.0) };
    assert_eq!(pressed.target_id(), Some(id));
    let background = InputState::Pressed { pointer: 1, target: PressTarget::Background, start: pt(0.0, 0.0) };
    assert_eq!(background.target_id(), None);
    assert_eq!(InputState::Swiping { pointer: 1 }.target_id(), None);
    assert_eq!(InputState::LongPressed { pointer: 1, id }.target_id(), Some(id));
}

#[test]
fn is_driven_by_matches_pointer() {
    let id = Uuid::new_v4();
    let state = InputState::Selecting { pointer: 7, id };
    assert!(state.is_driven_by(7));
    assert!(!state.is_driven_by(8));
    assert!(!InputState::Idle.is_driven_by(7));
    assert!(!InputState::Suppressed.is_driven_by(7));
}
