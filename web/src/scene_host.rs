//! `WebScene`: the JavaScript-facing host around `EngineCore`.
//!
//! ARCHITECTURE
//! ============
//! All state lives in one `Rc<Shared>`. DOM listeners, the animation-frame
//! loop, and timer wake-ups hold `Weak` references to it, so dropping the
//! `WebScene` (or calling `stop`) tears everything down. The engine is driven
//! with `performance.now()` as its clock; every handler re-arms a wake-up
//! timer at the engine's next deadline so a long-press fires on time even
//! when animation frames are throttled.

#[cfg(test)]
#[path = "scene_host_test.rs"]
mod scene_host_test;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use scene::camera::Point;
use scene::config::SceneConfig;
use scene::engine::{Action, EngineCore};
use scene::session::{Session, StartDecision};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, HtmlVideoElement, MediaStream, PointerEvent, UrlSearchParams, Window};

use crate::bridge_dom::DomTextSink;
use crate::error::{HostError, describe};
use crate::media;

const POINTER_EVENTS: [&str; 5] = ["pointerdown", "pointermove", "pointerup", "pointerleave", "pointercancel"];

/// Keeps the browser from claiming pans and pinches on the surface, which
/// would otherwise arrive as `pointercancel` mid-gesture.
const SURFACE_STYLE: [(&str, &str); 2] = [("touch-action", "none"), ("user-select", "none")];

type PointerListener = Closure<dyn FnMut(PointerEvent)>;

/// Milliseconds until `deadline_ms`, rounded up so the wake never lands early.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn wake_delay_ms(deadline_ms: f64, now_ms: f64) -> u32 {
    let delay = (deadline_ms - now_ms).ceil();
    if delay.is_finite() && delay > 0.0 { delay.min(f64::from(u32::MAX)) as u32 } else { 0 }
}

/// Percent-decoded `key=value` pairs of the page's query string.
fn query_pairs(window: &Window) -> Result<Vec<(String, String)>, HostError> {
    let search = window.location().search().map_err(|e| HostError::dom(&e))?;
    let params = UrlSearchParams::new_with_str(&search).map_err(|e| HostError::dom(&e))?;
    let Some(entries) = js_sys::try_iter(&params).map_err(|e| HostError::dom(&e))? else {
        return Ok(Vec::new());
    };
    let mut pairs = Vec::new();
    for entry in entries {
        let entry = js_sys::Array::from(&entry.map_err(|e| HostError::dom(&e))?);
        match (entry.get(0).as_string(), entry.get(1).as_string()) {
            (Some(key), Some(value)) => pairs.push((key, value)),
            _ => log::warn!("skipping malformed query entry: {}", describe(&entry)),
        }
    }
    Ok(pairs)
}

fn now_ms() -> f64 {
    web_sys::window().and_then(|w| w.performance()).map_or_else(js_sys::Date::now, |p| p.now())
}

struct Shared {
    window: Window,
    surface: HtmlElement,
    engine: RefCell<EngineCore>,
    session: RefCell<Session>,
    stream: RefCell<Option<MediaStream>>,
    video: RefCell<Option<HtmlVideoElement>>,
    frame_loop: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    frame_handle: Cell<Option<i32>>,
    armed_deadline: Cell<Option<f64>>,
    listeners: RefCell<Vec<(&'static str, PointerListener)>>,
    on_frame: RefCell<Option<js_sys::Function>>,
}

impl Shared {
    /// Log what the engine did and make sure its next deadline is covered.
    fn after(self: &Rc<Self>, actions: &[Action]) {
        for action in actions {
            match action {
                Action::RenderNeeded => {}
                Action::Logged(entry) => log::debug!("feed: {}", entry.message),
                other => log::debug!("{other:?}"),
            }
        }
        self.arm_wake();
    }

    fn arm_wake(self: &Rc<Self>) {
        let Some(deadline) = self.engine.borrow().next_deadline() else {
            self.armed_deadline.set(None);
            return;
        };
        if self.armed_deadline.get() == Some(deadline) {
            return;
        }
        self.armed_deadline.set(Some(deadline));
        let weak = Rc::downgrade(self);
        Timeout::new(wake_delay_ms(deadline, now_ms()), move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            if shared.armed_deadline.get() == Some(deadline) {
                shared.armed_deadline.set(None);
            }
            let actions = shared.engine.borrow_mut().poll_timers(now_ms());
            shared.after(&actions);
        })
        .forget();
    }

    fn dispatch(self: &Rc<Self>, event: &PointerEvent) {
        let pointer = event.pointer_id();
        let now = now_ms();
        let rect = self.surface.get_bounding_client_rect();
        let screen = Point::new(f64::from(event.client_x()) - rect.left(), f64::from(event.client_y()) - rect.top());

        let actions = {
            let mut engine = self.engine.borrow_mut();
            match event.type_().as_str() {
                "pointerdown" => {
                    if let Err(err) = self.surface.set_pointer_capture(pointer) {
                        log::debug!("pointer capture failed: {}", describe(&err));
                    }
                    engine.on_pointer_down(pointer, screen, now)
                }
                "pointermove" => engine.on_pointer_move(pointer, screen, now),
                "pointerup" => engine.on_pointer_up(pointer, screen, now),
                "pointerleave" => engine.on_pointer_leave(pointer, now),
                "pointercancel" => engine.on_pointer_cancel(pointer, now),
                other => {
                    log::warn!("unexpected event type {other}");
                    Vec::new()
                }
            }
        };
        event.prevent_default();
        self.after(&actions);
    }

    fn attach_listeners(self: &Rc<Self>) -> Result<(), HostError> {
        if !self.listeners.borrow().is_empty() {
            return Ok(());
        }
        let style = self.surface.style();
        for (property, value) in SURFACE_STYLE {
            style.set_property(property, value).map_err(|e| HostError::dom(&e))?;
        }
        for name in POINTER_EVENTS {
            let weak = Rc::downgrade(self);
            let listener = Closure::wrap(Box::new(move |event: PointerEvent| {
                if let Some(shared) = weak.upgrade() {
                    shared.dispatch(&event);
                }
            }) as Box<dyn FnMut(PointerEvent)>);
            self.surface
                .add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())
                .map_err(|e| HostError::dom(&e))?;
            self.listeners.borrow_mut().push((name, listener));
        }
        Ok(())
    }

    fn detach_listeners(&self) {
        for (name, listener) in self.listeners.borrow_mut().drain(..) {
            if let Err(err) = self.surface.remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref()) {
                log::warn!("failed to remove {name} listener: {}", describe(&err));
            }
        }
    }

    fn on_animation_frame(self: &Rc<Self>) {
        let actions = self.engine.borrow_mut().frame(now_ms());
        // The callback may call back into the scene; hold no borrows across it.
        let callback = self.on_frame.borrow().clone();
        if let Some(callback) = callback {
            let json = serde_json::to_string(&self.engine.borrow().render_list());
            match json {
                Ok(json) => {
                    if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                        log::error!("frame callback threw: {}", describe(&err));
                    }
                }
                Err(err) => log::error!("render list serialization failed: {err}"),
            }
        }
        self.after(&actions);
        self.request_frame();
    }

    fn start_frame_loop(self: &Rc<Self>) {
        if self.frame_loop.borrow().is_some() {
            return;
        }
        let weak: Weak<Self> = Rc::downgrade(self);
        let tick = Closure::wrap(Box::new(move |_ts: f64| {
            if let Some(shared) = weak.upgrade() {
                shared.on_animation_frame();
            }
        }) as Box<dyn FnMut(f64)>);
        *self.frame_loop.borrow_mut() = Some(tick);
        self.request_frame();
    }

    fn request_frame(&self) {
        let frame_loop = self.frame_loop.borrow();
        let Some(tick) = frame_loop.as_ref() else {
            return;
        };
        match self.window.request_animation_frame(tick.as_ref().unchecked_ref()) {
            Ok(handle) => self.frame_handle.set(Some(handle)),
            Err(err) => log::error!("requestAnimationFrame failed: {}", describe(&err)),
        }
    }

    fn stop_frame_loop(&self) {
        if let Some(handle) = self.frame_handle.take() {
            if let Err(err) = self.window.cancel_animation_frame(handle) {
                log::warn!("cancelAnimationFrame failed: {}", describe(&err));
            }
        }
        self.frame_loop.borrow_mut().take();
    }

    fn release_stream(&self) {
        if let Some(stream) = self.stream.borrow_mut().take() {
            media::release(&stream, self.video.borrow().as_ref());
        }
    }
}

/// Interactive AR scene bound to a DOM surface element.
#[wasm_bindgen]
pub struct WebScene {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl WebScene {
    /// Bind to `surface`. Reads overrides from the page's query string and
    /// attaches (or creates) the bridge element; it shows `-` immediately.
    ///
    /// # Errors
    ///
    /// Fails without a window/document, on an invalid query override, or if
    /// the bridge element cannot be created.
    #[wasm_bindgen(constructor)]
    pub fn new(surface: HtmlElement) -> Result<WebScene, JsValue> {
        let window = web_sys::window().ok_or(HostError::NoWindow)?;
        let document = window.document().ok_or(HostError::NoDocument)?;
        let config = SceneConfig::from_pairs(query_pairs(&window)?).map_err(HostError::from)?;
        let sink = DomTextSink::attach(&document, &config.bridge_element_id)?;

        let mut engine = EngineCore::new(config, Box::new(sink));
        engine.set_viewport(f64::from(surface.client_width()), f64::from(surface.client_height()));
        log::info!("scene ready ({}x{})", engine.viewport.width, engine.viewport.height);

        Ok(WebScene {
            shared: Rc::new(Shared {
                window,
                surface,
                engine: RefCell::new(engine),
                session: RefCell::new(Session::new()),
                stream: RefCell::new(None),
                video: RefCell::new(None),
                frame_loop: RefCell::new(None),
                frame_handle: Cell::new(None),
                armed_deadline: Cell::new(None),
                listeners: RefCell::new(Vec::new()),
                on_frame: RefCell::new(None),
            }),
        })
    }

    /// Start input handling and the frame loop, then acquire the camera into
    /// `video` unless the page was opened with a bypass flag. Calling again
    /// after a camera failure retries acquisition.
    ///
    /// # Errors
    ///
    /// Fails if the pointer listeners cannot be attached.
    pub fn start(&self, video: Option<HtmlVideoElement>) -> Result<(), JsValue> {
        self.shared.attach_listeners()?;
        self.shared.start_frame_loop();
        if video.is_some() {
            *self.shared.video.borrow_mut() = video;
        }

        let bypass = self.shared.engine.borrow().config.bypass_camera;
        let decision = self.shared.session.borrow_mut().start(bypass);
        match decision {
            StartDecision::RequestCamera => {
                let weak = Rc::downgrade(&self.shared);
                let window = self.shared.window.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let result = media::acquire_rear_camera(&window).await;
                    let Some(shared) = weak.upgrade() else {
                        if let Ok(stream) = result {
                            media::release(&stream, None);
                        }
                        return;
                    };
                    match result {
                        Ok(stream) => shared.on_stream(stream),
                        Err(err) => {
                            if let Some(notice) = shared.session.borrow_mut().on_media_failed(&err) {
                                log::warn!("{notice}");
                            }
                        }
                    }
                });
            }
            StartDecision::Bypassed => log::info!("automation mode: camera skipped"),
            StartDecision::AlreadyRunning => log::debug!("start ignored; session already running"),
        }
        Ok(())
    }

    /// Release the camera, detach listeners, and stop the frame loop.
    pub fn stop(&self) {
        if self.shared.session.borrow_mut().stop() {
            self.shared.release_stream();
        }
        self.shared.detach_listeners();
        self.shared.stop_frame_loop();
        log::info!("scene stopped");
    }

    /// Call `callback(renderListJson)` after every frame.
    pub fn set_frame_callback(&self, callback: Option<js_sys::Function>) {
        *self.shared.on_frame.borrow_mut() = callback;
    }

    // --- Direct entry points (tests and non-DOM drivers) ---

    pub fn pointer_down(&self, pointer: i32, x: f64, y: f64) {
        let actions = self.shared.engine.borrow_mut().on_pointer_down(pointer, Point::new(x, y), now_ms());
        self.shared.after(&actions);
    }

    pub fn pointer_move(&self, pointer: i32, x: f64, y: f64) {
        let actions = self.shared.engine.borrow_mut().on_pointer_move(pointer, Point::new(x, y), now_ms());
        self.shared.after(&actions);
    }

    pub fn pointer_up(&self, pointer: i32, x: f64, y: f64) {
        let actions = self.shared.engine.borrow_mut().on_pointer_up(pointer, Point::new(x, y), now_ms());
        self.shared.after(&actions);
    }

    pub fn pointer_leave(&self, pointer: i32) {
        let actions = self.shared.engine.borrow_mut().on_pointer_leave(pointer, now_ms());
        self.shared.after(&actions);
    }

    pub fn pointer_cancel(&self, pointer: i32) {
        let actions = self.shared.engine.borrow_mut().on_pointer_cancel(pointer, now_ms());
        self.shared.after(&actions);
    }

    /// Update the viewport after the surface was resized.
    pub fn resize(&self, width: f64, height: f64) {
        self.shared.engine.borrow_mut().set_viewport(width, height);
    }

    /// Place an object where the screen center meets the placement plane.
    /// Returns the new id, or `None` if the viewport is empty.
    pub fn place_at_center(&self) -> Option<String> {
        let (id, actions) = {
            let mut engine = self.shared.engine.borrow_mut();
            let center = engine.viewport.center();
            let position = engine.camera.screen_to_plane(center, engine.viewport, 0.0)?;
            engine.place(position, now_ms())
        };
        self.shared.after(&actions);
        Some(id.to_string())
    }

    pub fn delete_selected(&self) {
        let actions = self.shared.engine.borrow_mut().delete_selected(now_ms());
        self.shared.after(&actions);
    }

    // --- Queries ---

    /// Current draw records as JSON.
    ///
    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn render_list_json(&self) -> Result<String, JsValue> {
        Ok(serde_json::to_string(&self.shared.engine.borrow().render_list()).map_err(HostError::from)?)
    }

    /// HUD log entries, newest first, as JSON.
    ///
    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn log_feed_json(&self) -> Result<String, JsValue> {
        let engine = self.shared.engine.borrow();
        let entries: Vec<_> = engine.feed().entries().collect();
        Ok(serde_json::to_string(&entries).map_err(HostError::from)?)
    }

    pub fn intent(&self) -> String {
        self.shared.engine.borrow().intent().to_string()
    }

    pub fn selection(&self) -> Option<String> {
        self.shared.engine.borrow().selection().map(|id| id.to_string())
    }

    pub fn bridge_text(&self) -> String {
        self.shared.engine.borrow().bridge_text()
    }

    pub fn session_state(&self) -> String {
        self.shared.session.borrow().label().to_owned()
    }

    /// Whether the scene is running, with or without a camera.
    pub fn operational(&self) -> bool {
        self.shared.session.borrow().is_operational()
    }

    pub fn camera_active(&self) -> bool {
        self.shared.session.borrow().has_camera()
    }

    /// The fallback notice shown when the camera is unavailable.
    pub fn notice(&self) -> Option<String> {
        self.shared.session.borrow().notice().map(str::to_owned)
    }
}

impl Shared {
    fn on_stream(&self, stream: MediaStream) {
        if !self.session.borrow_mut().on_media_ready() {
            media::release(&stream, None);
            return;
        }
        if let Some(video) = self.video.borrow().as_ref() {
            if let Err(err) = media::attach(video, &stream) {
                log::warn!("camera preview failed: {err}");
            }
        }
        *self.stream.borrow_mut() = Some(stream);
        log::info!("camera active");
    }
}

impl Drop for WebScene {
    fn drop(&mut self) {
        self.stop();
    }
}
