use super::*;

// =============================================================
// wake_delay_ms
// =============================================================

#[test]
fn wake_delay_rounds_up() {
    assert_eq!(wake_delay_ms(1800.0, 1000.0), 800);
    assert_eq!(wake_delay_ms(1800.4, 1000.0), 801);
}

#[test]
fn overdue_deadline_wakes_immediately() {
    assert_eq!(wake_delay_ms(900.0, 1000.0), 0);
    assert_eq!(wake_delay_ms(1000.0, 1000.0), 0);
}

#[test]
fn non_finite_deadline_wakes_immediately() {
    assert_eq!(wake_delay_ms(f64::NAN, 1000.0), 0);
    assert_eq!(wake_delay_ms(f64::INFINITY, 1000.0), 0);
}

#[test]
fn pointer_event_names_cover_gesture_lifecycle() {
    for name in ["pointerdown", "pointermove", "pointerup", "pointerleave", "pointercancel"] {
        assert!(POINTER_EVENTS.contains(&name));
    }
}

#[test]
fn surface_opts_out_of_browser_touch_gestures() {
    assert!(SURFACE_STYLE.contains(&("touch-action", "none")));
}
