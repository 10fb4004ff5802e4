#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use scene::config::ConfigError;
use scene::session::MediaError;
use wasm_bindgen::JsValue;

/// Failures surfaced to JavaScript by the host.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("no browser window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("invalid scene config: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Media(#[from] MediaError),
    #[error("serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dom call failed: {0}")]
    Dom(String),
}

impl HostError {
    /// Wrap a thrown JS value.
    #[must_use]
    pub fn dom(value: &JsValue) -> Self {
        Self::Dom(describe(value))
    }
}

impl From<HostError> for JsValue {
    fn from(err: HostError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Best-effort text for a thrown JS value.
#[must_use]
pub fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
