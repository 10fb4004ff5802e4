#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Defaults
// =============================================================

#[test]
fn defaults_match_gesture_contract() {
    let c = SceneConfig::default();
    assert_eq!(c.long_press_ms, 800.0);
    assert_eq!(c.intent_revert_ms, 500.0);
    assert_eq!(c.move_threshold_px, 2.0);
    assert_eq!((c.min_scale, c.max_scale), (0.5, 5.0));
    assert_eq!(c.log_capacity, 3);
    assert_eq!(c.bridge_element_id, "ar_coords_textview");
    assert!(!c.bypass_camera);
}

#[test]
fn defaults_validate() {
    assert!(SceneConfig::default().validate().is_ok());
}

// =============================================================
// from_pairs
// =============================================================

fn from(pairs: &[(&str, &str)]) -> Result<SceneConfig, ConfigError> {
    SceneConfig::from_pairs(pairs.iter().copied())
}

#[test]
fn no_pairs_is_default() {
    assert_eq!(from(&[]).unwrap(), SceneConfig::default());
}

#[test]
fn automation_flag_bypasses_camera() {
    let cases: [&[(&str, &str)]; 4] = [
        &[("automation", "")],
        &[("automation", "1")],
        &[("automation", "TRUE")],
        &[("x", "2"), ("nocamera", "yes")],
    ];
    for pairs in cases {
        assert!(from(pairs).unwrap().bypass_camera, "{pairs:?}");
    }
}

#[test]
fn explicit_false_flag_keeps_camera() {
    assert!(!from(&[("automation", "0")]).unwrap().bypass_camera);
    assert!(!from(&[("automation", "false")]).unwrap().bypass_camera);
}

#[test]
fn numeric_overrides_apply() {
    let c = from(&[("long_press_ms", "600"), ("min_scale", "0.25"), ("max_scale", "4"), ("seed", "42")]).unwrap();
    assert_eq!(c.long_press_ms, 600.0);
    assert_eq!(c.min_scale, 0.25);
    assert_eq!(c.max_scale, 4.0);
    assert_eq!(c.color_seed, 42);
}

#[test]
fn decoded_values_with_padding_apply() {
    // `?seed=+42+&automation=%74rue` as the browser decodes it.
    let c = from(&[("seed", " 42 "), ("automation", "true")]).unwrap();
    assert_eq!(c.color_seed, 42);
    assert!(c.bypass_camera);
}

#[test]
fn owned_pairs_are_accepted() {
    let pairs = vec![("max_scale".to_owned(), "3".to_owned())];
    assert_eq!(SceneConfig::from_pairs(pairs).unwrap().max_scale, 3.0);
}

#[test]
fn unknown_keys_are_ignored() {
    assert_eq!(from(&[("utm_source", "x"), ("debug", "")]).unwrap(), SceneConfig::default());
}

#[test]
fn malformed_number_is_rejected() {
    let err = from(&[("long_press_ms", "soon")]).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidNumber { ref key, .. } if key == "long_press_ms"));
    assert!(from(&[("max_scale", "inf")]).is_err());
    assert!(from(&[("seed", "-1")]).is_err());
    assert!(from(&[("seed", "%34%32")]).is_err());
}

#[test]
fn inverted_scale_range_is_rejected() {
    let err = from(&[("min_scale", "6")]).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidScaleRange { .. }));
    assert!(from(&[("min_scale", "0")]).is_err());
}

#[test]
fn error_messages_name_the_key() {
    let err = from(&[("min_scale", "abc")]).unwrap_err();
    assert!(err.to_string().contains("min_scale"));
}

// =============================================================
// from_json
// =============================================================

#[test]
fn json_missing_fields_take_defaults() {
    let c = SceneConfig::from_json(r##"{ "max_scale": 3.0, "highlight_color": "#00ff00" }"##).unwrap();
    assert_eq!(c.max_scale, 3.0);
    assert_eq!(c.highlight_color, Rgb::new(0, 255, 0));
    assert_eq!(c.long_press_ms, 800.0);
}

#[test]
fn json_malformed_is_rejected() {
    assert!(matches!(SceneConfig::from_json("{"), Err(ConfigError::Json(_))));
    assert!(matches!(SceneConfig::from_json(r#"{ "highlight_color": "blue" }"#), Err(ConfigError::Json(_))));
}

#[test]
fn json_invalid_range_is_rejected() {
    let err = SceneConfig::from_json(r#"{ "min_scale": 2.0, "max_scale": 1.0 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidScaleRange { .. }));
}

#[test]
fn json_roundtrip_preserves_config() {
    let c = SceneConfig { bypass_camera: true, ..SceneConfig::default() };
    let json = serde_json::to_string(&c).unwrap();
    assert_eq!(SceneConfig::from_json(&json).unwrap(), c);
}
