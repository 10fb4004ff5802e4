//! Input model: gesture intents, pointers, and the gesture state machine.
//!
//! `GestureIntent` is the observable classification broadcast to the UI.
//! `InputState` is the active gesture tracked between pointer-down and the
//! last pointer-up, carrying the context needed to compute live feedback and
//! the final commit on release. Transitions live in [`crate::engine`].

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::f64::consts::{PI, TAU};
use std::fmt;

use glam::DVec3;
use serde::Serialize;

use crate::camera::Point;
use crate::doc::ObjectId;

/// Browser pointer id (`PointerEvent.pointerId`).
pub type PointerId = i32;

/// What the user is currently doing, for UI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GestureIntent {
    /// No interaction in progress.
    #[default]
    Idle,
    /// Moving the selected object.
    Drag,
    /// Two-finger scale on the selected object.
    Pinch,
    /// Two-finger twist dominating the scale change.
    Rotate,
    /// Tap on an object, or a placement.
    Tap,
    /// Press-and-hold reset.
    LongPress,
    /// One-finger drag across the background.
    Swipe,
}

impl GestureIntent {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Drag => "DRAG",
            Self::Pinch => "PINCH",
            Self::Rotate => "ROTATE",
            Self::Tap => "TAP",
            Self::LongPress => "LONG_PRESS",
            Self::Swipe => "SWIPE",
        }
    }
}

impl fmt::Display for GestureIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressTarget {
    Object(ObjectId),
    Background,
}

/// Distance and screen angle (radians, y down) between two touch points.
#[must_use]
pub fn pinch_metrics(a: Point, b: Point) -> (f64, f64) {
    (a.distance(b), (b.y - a.y).atan2(b.x - a.x))
}

/// Wrap an angle difference into `(-π, π]`.
#[must_use]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Clamp every scale component into `[min, max]`.
#[must_use]
pub fn clamp_scale(scale: DVec3, min: f64, max: f64) -> DVec3 {
    scale.clamp(DVec3::splat(min), DVec3::splat(max))
}

/// Context of an active two-finger gesture on a selected object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchGesture {
    pub id: ObjectId,
    pub first: PointerId,
    pub second: PointerId,
    /// Finger distance when the second finger landed.
    pub start_distance: f64,
    /// Finger angle when the second finger landed.
    pub start_angle: f64,
    /// Committed rotation at gesture start; only `z` changes.
    pub orig_rotation: DVec3,
    /// Committed scale at gesture start.
    pub orig_scale: DVec3,
    /// Latest rotation applied to the animated view.
    pub rotation: DVec3,
    /// Latest (clamped) scale applied to the animated view.
    pub scale: DVec3,
}

impl PinchGesture {
    /// Start a pinch between two touch points on object `id`.
    #[must_use]
    pub fn begin(
        id: ObjectId,
        (first, a): (PointerId, Point),
        (second, b): (PointerId, Point),
        orig_rotation: DVec3,
        orig_scale: DVec3,
    ) -> Self {
        let (start_distance, start_angle) = pinch_metrics(a, b);
        Self {
            id,
            first,
            second,
            start_distance,
            start_angle,
            orig_rotation,
            orig_scale,
            rotation: orig_rotation,
            scale: orig_scale,
        }
    }

    #[must_use]
    pub fn involves(&self, pointer: PointerId) -> bool {
        pointer == self.first || pointer == self.second
    }

    /// Recompute scale and twist for the current finger positions.
    ///
    /// Scale is clamped to `[min_scale, max_scale]`; only the twist axis of
    /// the rotation changes. Returns the intent to broadcast.
    pub fn update(&mut self, a: Point, b: Point, min_scale: f64, max_scale: f64) -> GestureIntent {
        let (distance, angle) = pinch_metrics(a, b);
        let factor = if self.start_distance > f64::EPSILON { distance / self.start_distance } else { 1.0 };
        self.scale = clamp_scale(self.orig_scale * factor, min_scale, max_scale);

        // Screen y points down, so a clockwise finger twist is a negative world twist.
        let twist_delta = -wrap_angle(angle - self.start_angle);
        self.rotation = DVec3::new(self.orig_rotation.x, self.orig_rotation.y, self.orig_rotation.z + twist_delta);

        if twist_delta.abs() > factor.max(f64::EPSILON).ln().abs() {
            GestureIntent::Rotate
        } else {
            GestureIntent::Pinch
        }
    }
}

/// Internal state for the gesture state machine.
///
/// Each active variant carries the context needed for live feedback and for
/// the commit on release.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// A pointer is down but has not moved past the threshold yet.
    Pressed {
        pointer: PointerId,
        target: PressTarget,
        /// Screen position of the pointer-down.
        start: Point,
    },
    /// First touch on an unselected object moved: it was selected, and the
    /// rest of this gesture is ignored.
    Selecting { pointer: PointerId, id: ObjectId },
    /// Moving the selected object with one finger.
    Dragging {
        pointer: PointerId,
        id: ObjectId,
        /// Screen position of the pointer-down; offsets are measured from here.
        start: Point,
        /// Committed position at drag start.
        origin: DVec3,
        /// Latest position applied to the animated view.
        last: DVec3,
    },
    /// One-finger drag over the background.
    Swiping { pointer: PointerId },
    /// Two-finger scale/twist on the selected object.
    Pinching(PinchGesture),
    /// The long-press fired; waiting for release.
    LongPressed { pointer: PointerId, id: ObjectId },
    /// An unsupported multi-touch was aborted; waiting for every pointer to lift.
    Suppressed,
}

impl InputState {
    /// Object this gesture is acting on, if any.
    #[must_use]
    pub fn target_id(&self) -> Option<ObjectId> {
        match *self {
            Self::Pressed { target: PressTarget::Object(id), .. }
            | Self::Selecting { id, .. }
            | Self::Dragging { id, .. }
            | Self::LongPressed { id, .. } => Some(id),
            Self::Pinching(ref pinch) => Some(pinch.id),
            Self::Pressed { target: PressTarget::Background, .. } | Self::Swiping { .. } | Self::Idle | Self::Suppressed => {
                None
            }
        }
    }

    /// Whether `pointer` is the one driving this single-pointer gesture.
    #[must_use]
    pub fn is_driven_by(&self, pointer: PointerId) -> bool {
        match *self {
            Self::Pressed { pointer: p, .. }
            | Self::Selecting { pointer: p, .. }
            | Self::Dragging { pointer: p, .. }
            | Self::Swiping { pointer: p }
            | Self::LongPressed { pointer: p, .. } => p == pointer,
            Self::Pinching(ref pinch) => pinch.involves(pointer),
            Self::Idle | Self::Suppressed => false,
        }
    }
}
