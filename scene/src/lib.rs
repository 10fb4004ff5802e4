//! Gesture, projection, and coordinate-bridge engine for the AR placement scene.
//!
//! This crate is compiled to WebAssembly and driven by the `web` host. It owns
//! the interactive state of the scene: translating raw pointer events into
//! object transforms, keeping the authoritative transform store, animating the
//! displayed view toward it, and publishing the selected object's projected
//! screen position to an external text sink once per frame. The host is
//! responsible only for wiring DOM events, the frame clock, and the camera
//! stream to the engine.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Orchestrator: selection, placement, gestures, per-frame publish |
//! | [`doc`] | Object types and the committed transform store |
//! | [`camera`] | Perspective camera, world-to-screen projection, screen rays |
//! | [`input`] | Gesture intents and the gesture state machine types |
//! | [`hit`] | Hit-testing pointer positions against placed objects |
//! | [`motion`] | Animated view of each object and the interpolation seam |
//! | [`timer`] | Cancellable deferred actions (long-press, intent revert) |
//! | [`bridge`] | Coordinate bridge protocol and sinks |
//! | [`feed`] | Bounded, most-recent-first HUD log feed |
//! | [`session`] | Camera session lifecycle and media error taxonomy |
//! | [`config`] | Tunables, URL query overrides |
//! | [`consts`] | Shared numeric constants (thresholds, limits, defaults) |

pub mod bridge;
pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod feed;
pub mod hit;
pub mod input;
pub mod motion;
pub mod session;
pub mod timer;
