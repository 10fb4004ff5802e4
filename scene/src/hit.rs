#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use glam::DVec3;

use crate::camera::{PerspectiveCamera, Point, Viewport};
use crate::doc::ObjectId;

/// An object as currently drawn, for picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitCandidate {
    pub id: ObjectId,
    pub position: DVec3,
    pub scale: DVec3,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub object_id: ObjectId,
    /// Screen distance from the pointer to the object's projected center.
    pub distance_px: f64,
}

/// Screen-space pick radius of an object: its half extent at the object's depth.
#[must_use]
pub fn pick_radius(camera: &PerspectiveCamera, viewport: Viewport, candidate: &HitCandidate, half_extent: f64) -> Option<f64> {
    let ppu = camera.pixels_per_world_unit(viewport, candidate.position)?;
    Some(half_extent * candidate.scale.max_element() * ppu)
}

/// Find the object under `screen`.
///
/// `candidates` are in draw order, so the last match is the topmost and wins.
/// Objects behind the camera are never hit.
#[must_use]
pub fn hit_test(
    screen: Point,
    candidates: &[HitCandidate],
    camera: &PerspectiveCamera,
    viewport: Viewport,
    half_extent: f64,
) -> Option<Hit> {
    candidates.iter().rev().find_map(|c| {
        let center = camera.project_precise(c.position, viewport)?;
        let radius = pick_radius(camera, viewport, c, half_extent)?;
        let distance_px = center.distance(screen);
        (distance_px <= radius).then_some(Hit { object_id: c.id, distance_px })
    })
}
