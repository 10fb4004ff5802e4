//! Scene camera and screen-space conversions.
//!
//! The scene is viewed through a fixed perspective camera. Screen space is CSS
//! pixels with a top-left origin; world space is right-handed with +Y up.
//! Projection goes world -> clip -> NDC -> pixels, and the inverse path
//! (screen rays) is used to place objects where the user tapped.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};

use crate::config::SceneConfig;
use crate::consts::{CAMERA_DISTANCE, CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR};

/// A point in screen space (CSS pixels, top-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other` in pixels.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero or negative. Nothing projects into an empty viewport.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    #[must_use]
    pub fn aspect(&self) -> f64 {
        self.width / self.height.max(1.0)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Integer screen coordinate as published through the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenCoord {
    pub x: i32,
    pub y: i32,
}

impl ScreenCoord {
    /// Reserved value meaning "no current selection".
    pub const SENTINEL: Self = Self { x: -1, y: -1 };

    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_sentinel(self) -> bool {
        self == Self::SENTINEL
    }
}

/// Perspective camera looking at `target` with +Y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub position: DVec3,
    pub target: DVec3,
    /// Vertical field of view in radians.
    pub fov_y_rad: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            position: DVec3::new(0.0, 0.0, CAMERA_DISTANCE),
            target: DVec3::ZERO,
            fov_y_rad: CAMERA_FOV_DEG.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }
}

impl PerspectiveCamera {
    /// Camera on the +Z axis looking at the origin, as configured.
    #[must_use]
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            position: DVec3::new(0.0, 0.0, config.camera_distance),
            target: DVec3::ZERO,
            fov_y_rad: config.camera_fov_deg.to_radians(),
            near: config.camera_near,
            far: config.camera_far,
        }
    }

    /// Combined view-projection matrix for the given viewport.
    #[must_use]
    pub fn view_projection(&self, viewport: Viewport) -> DMat4 {
        let view = DMat4::look_at_rh(self.position, self.target, DVec3::Y);
        let projection = DMat4::perspective_rh_gl(self.fov_y_rad, viewport.aspect(), self.near, self.far);
        projection * view
    }

    /// Project a world point to integer pixel coordinates (rounded to nearest).
    ///
    /// Returns `None` for an empty viewport, a point behind the camera, or a
    /// non-finite result.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn project(&self, world: DVec3, viewport: Viewport) -> Option<ScreenCoord> {
        let screen = self.project_precise(world, viewport)?;
        Some(ScreenCoord::new(screen.x.round() as i32, screen.y.round() as i32))
    }

    /// Project a world point to fractional pixel coordinates.
    #[must_use]
    pub fn project_precise(&self, world: DVec3, viewport: Viewport) -> Option<Point> {
        if viewport.is_empty() {
            return None;
        }
        let clip = self.view_projection(viewport) * world.extend(1.0);
        if clip.w <= f64::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if !ndc.is_finite() {
            return None;
        }
        // NDC up is screen down.
        Some(Point::new(
            (ndc.x * 0.5 + 0.5) * viewport.width,
            (-ndc.y * 0.5 + 0.5) * viewport.height,
        ))
    }

    /// World-space ray `(origin, direction)` through a screen point.
    #[must_use]
    pub fn screen_ray(&self, screen: Point, viewport: Viewport) -> Option<(DVec3, DVec3)> {
        if viewport.is_empty() {
            return None;
        }
        let inverse = self.view_projection(viewport).inverse();
        let ndc_x = (screen.x / viewport.width) * 2.0 - 1.0;
        let ndc_y = 1.0 - (screen.y / viewport.height) * 2.0;
        let near = inverse.project_point3(DVec3::new(ndc_x, ndc_y, -1.0));
        let far = inverse.project_point3(DVec3::new(ndc_x, ndc_y, 1.0));
        let direction = (far - near).normalize_or_zero();
        if direction == DVec3::ZERO || !near.is_finite() {
            return None;
        }
        Some((near, direction))
    }

    /// Intersect the ray through `screen` with the plane `z = plane_z`.
    #[must_use]
    pub fn screen_to_plane(&self, screen: Point, viewport: Viewport, plane_z: f64) -> Option<DVec3> {
        let (origin, direction) = self.screen_ray(screen, viewport)?;
        if direction.z.abs() <= 1.0e-9 {
            return None;
        }
        let t = (plane_z - origin.z) / direction.z;
        if t < 0.0 {
            return None;
        }
        let mut hit = origin + direction * t;
        hit.z = plane_z;
        Some(hit)
    }

    /// Pixel-to-world scale factor at the depth of `at`.
    ///
    /// This is `viewport_pixels / viewport_world_units` measured on the plane
    /// facing the camera through `at`. Returns `None` when `at` is not in
    /// front of the camera.
    #[must_use]
    pub fn pixels_per_world_unit(&self, viewport: Viewport, at: DVec3) -> Option<f64> {
        if viewport.is_empty() {
            return None;
        }
        let forward = (self.target - self.position).normalize_or_zero();
        let depth = (at - self.position).dot(forward);
        if depth <= f64::EPSILON {
            return None;
        }
        let world_height = 2.0 * depth * (self.fov_y_rad * 0.5).tan();
        let world_width = world_height * viewport.aspect();
        Some(viewport.width / world_width)
    }
}
