//! # web
//!
//! Browser host for the `scene` engine. Wires DOM pointer events, the
//! animation-frame clock, and the rear camera stream to
//! [`scene::engine::EngineCore`], and exposes the coordinate bridge as a DOM
//! text node that an automation harness can poll.
//!
//! JavaScript constructs a [`scene_host::WebScene`] on the interaction
//! surface and calls `start` / `stop` around its lifetime.

pub mod bridge_dom;
pub mod error;
pub mod media;
pub mod scene_host;

use wasm_bindgen::prelude::*;

/// Module entry point: panic reporting and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("logger already initialized: {err}")));
    }
}
