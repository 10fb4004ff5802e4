//! Animated view of placed objects.
//!
//! Each object has a transient `AnimatedTransform` that chases the committed
//! transform in [`crate::doc::DocStore`]. How it chases is behind the
//! [`Interpolate`] seam; the engine only supplies targets and reads the latest
//! value. Gestures that must track the finger exactly bypass interpolation by
//! writing both the current and target values.

#[cfg(test)]
#[path = "motion_test.rs"]
mod motion_test;

use glam::DVec3;

use crate::config::SceneConfig;
use crate::doc::{Rgb, SceneObject};
use crate::timer::Deferred;

/// Distance under which an interpolated value snaps onto its target.
const SETTLE_EPSILON: f64 = 1.0e-4;

/// Advances a value toward a target over one frame.
pub trait Interpolate {
    fn step(&self, current: DVec3, target: DVec3, dt_ms: f64) -> DVec3;
}

/// Frame-rate independent exponential approach with a fixed half-life.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoothing {
    pub half_life_ms: f64,
}

impl Interpolate for Smoothing {
    fn step(&self, current: DVec3, target: DVec3, dt_ms: f64) -> DVec3 {
        if dt_ms <= 0.0 {
            return current;
        }
        if self.half_life_ms <= 0.0 {
            return target;
        }
        let keep = 0.5_f64.powf(dt_ms / self.half_life_ms);
        let next = target + (current - target) * keep;
        if next.distance(target) < SETTLE_EPSILON { target } else { next }
    }
}

/// Jumps straight to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Snap;

impl Interpolate for Snap {
    fn step(&self, _current: DVec3, target: DVec3, _dt_ms: f64) -> DVec3 {
        target
    }
}

/// The animatable fields of an object. `color` holds channels in `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: DVec3,
    pub rotation: DVec3,
    pub scale: DVec3,
    pub color: DVec3,
}

impl Transform {
    #[must_use]
    pub fn from_object(obj: &SceneObject) -> Self {
        Self {
            position: obj.position,
            rotation: obj.rotation,
            scale: obj.scale,
            color: obj.color.to_vec3(),
        }
    }
}

/// Per-object animated view plus the transient tap pulse.
#[derive(Debug, Clone)]
pub struct AnimatedTransform {
    pub current: Transform,
    pub target: Transform,
    bounce: Deferred<()>,
}

impl AnimatedTransform {
    /// Start at rest on the object's committed transform.
    #[must_use]
    pub fn new(obj: &SceneObject) -> Self {
        let t = Transform::from_object(obj);
        Self { current: t, target: t, bounce: Deferred::new() }
    }

    /// Chase a new committed transform from wherever the view currently is.
    pub fn retarget(&mut self, target: Transform) {
        self.target = target;
    }

    /// Move the view without lag (finger tracking).
    pub fn set_position_immediate(&mut self, position: DVec3) {
        self.current.position = position;
        self.target.position = position;
    }

    /// Apply scale and rotation together without lag.
    pub fn set_rotation_scale_immediate(&mut self, rotation: DVec3, scale: DVec3) {
        self.current.rotation = rotation;
        self.target.rotation = rotation;
        self.current.scale = scale;
        self.target.scale = scale;
    }

    /// Play the tap pulse until `now_ms + duration_ms`. Restarting extends it.
    pub fn start_bounce(&mut self, now_ms: f64, duration_ms: f64) {
        self.bounce.schedule(now_ms, duration_ms, ());
    }

    #[must_use]
    pub fn is_bouncing(&self) -> bool {
        self.bounce.is_pending()
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.current == self.target && !self.is_bouncing()
    }

    /// Advance one frame.
    pub fn tick(&mut self, interp: &dyn Interpolate, now_ms: f64, dt_ms: f64) {
        if self.bounce.poll(now_ms).is_some() {
            log::debug!("tap pulse finished");
        }
        self.current.position = interp.step(self.current.position, self.target.position, dt_ms);
        self.current.rotation = interp.step(self.current.rotation, self.target.rotation, dt_ms);
        self.current.scale = interp.step(self.current.scale, self.target.scale, dt_ms);
        self.current.color = interp.step(self.current.color, self.target.color, dt_ms);
    }

    /// Displayed scale: the animated scale with selection emphasis and the tap pulse layered on top.
    #[must_use]
    pub fn display_scale(&self, selected: bool, config: &SceneConfig) -> DVec3 {
        let mut boost = 1.0;
        if selected {
            boost *= config.selected_scale_boost;
        }
        if self.is_bouncing() {
            boost *= config.bounce_scale_boost;
        }
        self.current.scale * boost
    }

    /// Displayed color: the highlight while selected, otherwise the animated color.
    #[must_use]
    pub fn display_color(&self, selected: bool, config: &SceneConfig) -> Rgb {
        if selected { config.highlight_color } else { Rgb::from_vec3(self.current.color) }
    }
}
