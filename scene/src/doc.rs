//! Document model: placed objects, their colors, and the committed transform store.
//!
//! `DocStore` holds the authoritative (non-animated) transform of every placed
//! object. It is only mutated on placement, gesture commit, and deletion; the
//! animated view in [`crate::motion`] reads it as its target. Objects keep
//! their placement order, which is also the draw and hit-test order.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::fmt;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a placed object.
pub type ObjectId = Uuid;

/// A color string that is not `#RGB` or `#RRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex color: {0:?}")]
pub struct ColorParseError(pub String);

/// An sRGB display color. Serialized as lowercase `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255 };

    #[must_use]
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from hue (degrees), saturation and lightness (0..=1).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_hsl(hue_deg: f64, saturation: f64, lightness: f64) -> Self {
        let h = hue_deg.rem_euclid(360.0) / 60.0;
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);
        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h {
            h if h < 1.0 => (chroma, x, 0.0),
            h if h < 2.0 => (x, chroma, 0.0),
            h if h < 3.0 => (0.0, chroma, x),
            h if h < 4.0 => (0.0, x, chroma),
            h if h < 5.0 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma * 0.5;
        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::new(channel(r), channel(g), channel(b))
    }

    /// Parse `#RGB` or `#RRGGBB`.
    ///
    /// # Errors
    ///
    /// Returns `ColorParseError` for anything else.
    pub fn parse_hex(raw: &str) -> Result<Self, ColorParseError> {
        let invalid = || ColorParseError(raw.to_owned());
        let hex = raw.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            3 => Ok(Self::new(
                channel(&hex[0..1].repeat(2))?,
                channel(&hex[1..2].repeat(2))?,
                channel(&hex[2..3].repeat(2))?,
            )),
            6 => Ok(Self::new(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            _ => Err(invalid()),
        }
    }

    /// Channels as floats in `0.0..=255.0`, for interpolation.
    #[must_use]
    pub fn to_vec3(self) -> DVec3 {
        DVec3::new(f64::from(self.r), f64::from(self.g), f64::from(self.b))
    }

    /// Inverse of [`Rgb::to_vec3`], rounding and clamping each channel.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_vec3(v: DVec3) -> Self {
        let channel = |c: f64| c.round().clamp(0.0, 255.0) as u8;
        Self::new(channel(v.x), channel(v.y), channel(v.z))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

/// A placed object as committed in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    /// World-space center.
    pub position: DVec3,
    /// Euler angles in radians. Only `z` (the twist axis) is driven by gestures.
    pub rotation: DVec3,
    /// Per-axis scale, uniform in practice.
    pub scale: DVec3,
    pub color: Rgb,
}

impl SceneObject {
    /// A freshly placed object: unit scale, no rotation.
    #[must_use]
    pub fn new(id: ObjectId, position: DVec3, color: Rgb) -> Self {
        Self { id, position, rotation: DVec3::ZERO, scale: DVec3::ONE, color }
    }

    /// Rotation about the twist (third) axis.
    #[must_use]
    pub fn twist(&self) -> f64 {
        self.rotation.z
    }
}

/// Sparse update for a scene object. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<DVec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<DVec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<DVec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
}

impl PartialObject {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.rotation.is_none() && self.scale.is_none() && self.color.is_none()
    }
}

/// Committed transform store, in placement order.
#[derive(Debug, Default)]
pub struct DocStore {
    objects: Vec<SceneObject>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { objects: Vec::new() }
    }

    /// Append an object, or replace the existing object with the same `id` in place.
    pub fn insert(&mut self, obj: SceneObject) {
        match self.objects.iter_mut().find(|o| o.id == obj.id) {
            Some(existing) => *existing = obj,
            None => self.objects.push(obj),
        }
    }

    /// Remove an object by id, returning it if it was present.
    pub fn remove(&mut self, id: &ObjectId) -> Option<SceneObject> {
        let index = self.objects.iter().position(|o| o.id == *id)?;
        Some(self.objects.remove(index))
    }

    #[must_use]
    pub fn get(&self, id: &ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == *id)
    }

    #[must_use]
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// Merge the present fields of `partial` into the object. Returns false if the object doesn't exist.
    pub fn apply_partial(&mut self, id: &ObjectId, partial: &PartialObject) -> bool {
        let Some(obj) = self.objects.iter_mut().find(|o| o.id == *id) else {
            return false;
        };
        if let Some(position) = partial.position {
            obj.position = position;
        }
        if let Some(rotation) = partial.rotation {
            obj.rotation = rotation;
        }
        if let Some(scale) = partial.scale {
            obj.scale = scale;
        }
        if let Some(color) = partial.color {
            obj.color = color;
        }
        true
    }

    /// All objects in placement order.
    #[must_use]
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Number of objects currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the store contains no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
