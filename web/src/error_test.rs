use super::*;

#[test]
fn config_error_is_prefixed() {
    let err = HostError::from(ConfigError::InvalidScaleRange { min: 6.0, max: 5.0 });
    assert!(err.to_string().starts_with("invalid scene config"));
    assert!(err.to_string().contains("min 6"));
}

#[test]
fn media_error_reads_as_notice() {
    let err = HostError::from(MediaError::PermissionDenied);
    assert_eq!(err.to_string(), "camera permission denied");
}

#[test]
fn dom_error_carries_message() {
    assert_eq!(HostError::Dom("boom".into()).to_string(), "dom call failed: boom");
}
