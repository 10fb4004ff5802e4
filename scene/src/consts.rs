//! Shared numeric constants for the scene crate.

// ── Gestures ────────────────────────────────────────────────────

/// Hold duration before a press on an object becomes a long-press.
pub const LONG_PRESS_MS: f64 = 800.0;

/// How long a transient intent (tap, placement) stays visible before reverting to idle.
pub const INTENT_REVERT_MS: f64 = 500.0;

/// Pointer travel in screen pixels that turns a press into a drag and cancels a long-press.
pub const MOVE_THRESHOLD_PX: f64 = 2.0;

/// Duration of the cosmetic scale pulse played on tap.
pub const BOUNCE_MS: f64 = 180.0;

// ── Transform limits ────────────────────────────────────────────

/// Smallest uniform scale reachable by pinching.
pub const MIN_SCALE: f64 = 0.5;

/// Largest uniform scale reachable by pinching.
pub const MAX_SCALE: f64 = 5.0;

// ── Camera ──────────────────────────────────────────────────────

/// Vertical field of view of the scene camera, in degrees.
pub const CAMERA_FOV_DEG: f64 = 75.0;

/// Distance from the camera to the placement plane (z = 0).
pub const CAMERA_DISTANCE: f64 = 5.0;

pub const CAMERA_NEAR: f64 = 0.1;
pub const CAMERA_FAR: f64 = 1000.0;

// ── Objects ─────────────────────────────────────────────────────

/// Half the edge length of an unscaled object, in world units. Used as the hit radius.
pub const OBJECT_HALF_EXTENT: f64 = 0.5;

/// Scale multiplier layered on the selected object's displayed view.
pub const SELECTED_SCALE_BOOST: f64 = 1.1;

/// Scale multiplier applied while the tap pulse is playing.
pub const BOUNCE_SCALE_BOOST: f64 = 1.25;

/// Half-life of the displayed view's approach toward its committed target.
pub const SMOOTHING_HALF_LIFE_MS: f64 = 60.0;

/// Saturation and lightness for randomly hued placement colors.
pub const PLACEMENT_SATURATION: f64 = 0.7;
pub const PLACEMENT_LIGHTNESS: f64 = 0.55;

// ── Bridge ──────────────────────────────────────────────────────

/// DOM id of the text node read by the automation harness.
pub const BRIDGE_ELEMENT_ID: &str = "ar_coords_textview";

/// Text published when nothing is selected.
pub const BRIDGE_SENTINEL_TEXT: &str = "-";

// ── HUD ─────────────────────────────────────────────────────────

/// Number of entries kept by the HUD log feed.
pub const LOG_CAPACITY: usize = 3;
