#![allow(clippy::float_cmp)]

use glam::DVec3;
use uuid::Uuid;

use super::*;

fn make_object(x: f64) -> SceneObject {
    SceneObject::new(Uuid::new_v4(), DVec3::new(x, 0.0, 0.0), Rgb::new(10, 20, 30))
}

// =============================================================
// Rgb
// =============================================================

#[test]
fn rgb_display_is_lowercase_hex() {
    assert_eq!(Rgb::new(255, 8, 171).to_string(), "#ff08ab");
}

#[test]
fn rgb_parse_long_and_short_forms() {
    assert_eq!(Rgb::parse_hex("#FF08AB"), Ok(Rgb::new(255, 8, 171)));
    assert_eq!(Rgb::parse_hex("#fff"), Ok(Rgb::WHITE));
    assert_eq!(Rgb::parse_hex("  #000000 "), Ok(Rgb::new(0, 0, 0)));
}

#[test]
fn rgb_parse_rejects_garbage() {
    for raw in ["", "fff", "#ff", "#gggggg", "#12345", "#ééé"] {
        assert!(Rgb::parse_hex(raw).is_err(), "{raw} should not parse");
    }
}

#[test]
fn rgb_serde_uses_hex_string() {
    let json = serde_json::to_string(&Rgb::new(1, 2, 3)).unwrap();
    assert_eq!(json, "\"#010203\"");
    let back: Rgb = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Rgb::new(1, 2, 3));
    assert!(serde_json::from_str::<Rgb>("\"red\"").is_err());
}

#[test]
fn rgb_from_hsl_primaries() {
    assert_eq!(Rgb::from_hsl(0.0, 1.0, 0.5), Rgb::new(255, 0, 0));
    assert_eq!(Rgb::from_hsl(120.0, 1.0, 0.5), Rgb::new(0, 255, 0));
    assert_eq!(Rgb::from_hsl(240.0, 1.0, 0.5), Rgb::new(0, 0, 255));
    assert_eq!(Rgb::from_hsl(360.0, 1.0, 0.5), Rgb::new(255, 0, 0));
}

#[test]
fn rgb_from_hsl_greys() {
    assert_eq!(Rgb::from_hsl(200.0, 0.0, 1.0), Rgb::WHITE);
    assert_eq!(Rgb::from_hsl(200.0, 0.0, 0.0), Rgb::new(0, 0, 0));
}

#[test]
fn rgb_vec3_roundtrip() {
    let c = Rgb::new(12, 200, 99);
    assert_eq!(Rgb::from_vec3(c.to_vec3()), c);
    assert_eq!(Rgb::from_vec3(DVec3::new(-4.0, 300.0, 99.6)), Rgb::new(0, 255, 100));
}

// =============================================================
// SceneObject / PartialObject
// =============================================================

#[test]
fn new_object_has_unit_scale_and_no_rotation() {
    let obj = make_object(1.0);
    assert_eq!(obj.scale, DVec3::ONE);
    assert_eq!(obj.rotation, DVec3::ZERO);
    assert_eq!(obj.twist(), 0.0);
}

#[test]
fn partial_default_is_empty() {
    assert!(PartialObject::default().is_empty());
    let p = PartialObject { scale: Some(DVec3::splat(2.0)), ..Default::default() };
    assert!(!p.is_empty());
}

#[test]
fn partial_serialization_skips_absent_fields() {
    let p = PartialObject { position: Some(DVec3::new(1.0, 2.0, 3.0)), ..Default::default() };
    let json = serde_json::to_value(&p).unwrap();
    assert_eq!(json, serde_json::json!({ "position": [1.0, 2.0, 3.0] }));
}

// =============================================================
// DocStore
// =============================================================

#[test]
fn store_starts_empty() {
    let store = DocStore::new();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
}

#[test]
fn insert_appends_in_order() {
    let mut store = DocStore::new();
    let a = make_object(1.0);
    let b = make_object(2.0);
    store.insert(a.clone());
    store.insert(b.clone());
    let ids: Vec<_> = store.objects().iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![a.id, b.id]);
}

#[test]
fn insert_same_id_replaces_in_place() {
    let mut store = DocStore::new();
    let a = make_object(1.0);
    let b = make_object(2.0);
    store.insert(a.clone());
    store.insert(b.clone());
    let mut a2 = a.clone();
    a2.position = DVec3::new(9.0, 9.0, 9.0);
    store.insert(a2);
    assert_eq!(store.len(), 2);
    assert_eq!(store.objects()[0].position, DVec3::new(9.0, 9.0, 9.0));
}

#[test]
fn remove_returns_object() {
    let mut store = DocStore::new();
    let a = make_object(1.0);
    store.insert(a.clone());
    assert_eq!(store.remove(&a.id), Some(a.clone()));
    assert!(!store.contains(&a.id));
    assert!(store.remove(&a.id).is_none());
}

#[test]
fn apply_partial_merges_present_fields_only() {
    let mut store = DocStore::new();
    let a = make_object(1.0);
    store.insert(a.clone());
    let partial = PartialObject { scale: Some(DVec3::splat(3.0)), ..Default::default() };
    assert!(store.apply_partial(&a.id, &partial));
    let got = store.get(&a.id).unwrap();
    assert_eq!(got.scale, DVec3::splat(3.0));
    assert_eq!(got.position, a.position);
    assert_eq!(got.color, a.color);
}

#[test]
fn apply_partial_unknown_id_is_noop() {
    let mut store = DocStore::new();
    let a = make_object(1.0);
    store.insert(a.clone());
    let partial = PartialObject { position: Some(DVec3::ONE), ..Default::default() };
    assert!(!store.apply_partial(&Uuid::new_v4(), &partial));
    assert_eq!(store.get(&a.id), Some(&a));
}
