use std::collections::HashMap;

use glam::DVec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use uuid::Uuid;

use crate::bridge::{Bridge, CoordinateSink};
use crate::camera::{PerspectiveCamera, Point, Viewport};
use crate::config::SceneConfig;
use crate::consts::{PLACEMENT_LIGHTNESS, PLACEMENT_SATURATION};
use crate::doc::{DocStore, ObjectId, PartialObject, Rgb, SceneObject};
use crate::feed::{LogEntry, LogFeed};
use crate::hit::{HitCandidate, hit_test};
use crate::input::{GestureIntent, InputState, PinchGesture, PointerId, PressTarget, clamp_scale};
use crate::motion::{AnimatedTransform, Interpolate, Smoothing, Transform};
use crate::timer::Deferred;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone)]
pub enum Action {
    IntentChanged(GestureIntent),
    SelectionChanged(Option<ObjectId>),
    ObjectPlaced(SceneObject),
    /// Fields written to the store by a gesture commit, reset, or update.
    ObjectCommitted { id: ObjectId, fields: PartialObject },
    ObjectDeleted { id: ObjectId },
    Logged(LogEntry),
    RenderNeeded,
}

/// One object as it should be drawn this frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderItem {
    pub id: ObjectId,
    pub position: DVec3,
    pub rotation: DVec3,
    /// Animated scale with selection emphasis and tap pulse applied.
    pub scale: DVec3,
    pub color: Rgb,
    pub selected: bool,
}

/// Core engine state: everything that doesn't depend on the browser.
///
/// Pointer handlers, placement, and deletion mutate state synchronously and
/// return the resulting [`Action`]s. Deferred work (long-press, intent revert)
/// and animation advance only when the host calls [`EngineCore::frame`] or
/// [`EngineCore::poll_timers`] with the current scene clock.
pub struct EngineCore {
    pub config: SceneConfig,
    pub camera: PerspectiveCamera,
    pub viewport: Viewport,
    pub doc: DocStore,
    pub input: InputState,
    selected: Option<ObjectId>,
    intent: GestureIntent,
    animated: HashMap<ObjectId, AnimatedTransform>,
    /// Screen position of every pointer currently down.
    pointers: HashMap<PointerId, Point>,
    long_press: Deferred<ObjectId>,
    intent_revert: Deferred<()>,
    feed: LogFeed,
    bridge: Bridge,
    interpolator: Box<dyn Interpolate>,
    rng: SmallRng,
    last_frame_ms: Option<f64>,
}

impl EngineCore {
    /// Create an engine publishing coordinates to `sink`. The sink is set to
    /// the sentinel immediately.
    #[must_use]
    pub fn new(config: SceneConfig, sink: Box<dyn CoordinateSink>) -> Self {
        let mut bridge = Bridge::new(sink);
        bridge.clear();
        Self {
            camera: PerspectiveCamera::from_config(&config),
            viewport: Viewport::default(),
            doc: DocStore::new(),
            input: InputState::default(),
            selected: None,
            intent: GestureIntent::Idle,
            animated: HashMap::new(),
            pointers: HashMap::new(),
            long_press: Deferred::new(),
            intent_revert: Deferred::new(),
            feed: LogFeed::new(config.log_capacity),
            bridge,
            interpolator: Box::new(Smoothing { half_life_ms: config.smoothing_half_life_ms }),
            rng: SmallRng::seed_from_u64(config.color_seed),
            last_frame_ms: None,
            config,
        }
    }

    /// Replace the animation interpolator.
    #[must_use]
    pub fn with_interpolator(mut self, interpolator: Box<dyn Interpolate>) -> Self {
        self.interpolator = interpolator;
        self
    }

    // --- Viewport ---

    /// Update viewport dimensions in CSS pixels.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.viewport = Viewport::new(width, height);
        vec![Action::RenderNeeded]
    }

    // --- Store operations ---

    /// Place a new object at `position`, select it, and flash the tap intent.
    pub fn place(&mut self, position: DVec3, now_ms: f64) -> (ObjectId, Vec<Action>) {
        let mut actions = Vec::new();
        let id = self.fresh_id();
        let hue = self.rng.random_range(0.0..360.0);
        let obj = SceneObject::new(id, position, Rgb::from_hsl(hue, PLACEMENT_SATURATION, PLACEMENT_LIGHTNESS));

        self.animated.insert(id, AnimatedTransform::new(&obj));
        self.doc.insert(obj.clone());
        actions.push(Action::ObjectPlaced(obj));

        self.flash_intent(GestureIntent::Tap, now_ms, &mut actions);
        self.log("Object placed", now_ms, &mut actions);
        self.set_selection(Some(id), &mut actions);
        actions.push(Action::RenderNeeded);
        (id, actions)
    }

    /// Merge `fields` into object `id`. Scale is clamped to the configured
    /// range. Unknown ids are ignored.
    pub fn update(&mut self, id: &ObjectId, mut fields: PartialObject) -> Vec<Action> {
        let mut actions = Vec::new();
        if !self.doc.contains(id) {
            log::debug!("update ignored for unknown object {id}");
            return actions;
        }
        fields.scale = fields.scale.map(|s| clamp_scale(s, self.config.min_scale, self.config.max_scale));
        self.commit(*id, fields, &mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Delete the selected object, if any.
    pub fn delete_selected(&mut self, now_ms: f64) -> Vec<Action> {
        match self.selected {
            Some(id) => self.delete(&id, now_ms),
            None => Vec::new(),
        }
    }

    /// Remove object `id`. Clears the selection (and the bridge) if it was
    /// selected, and aborts any gesture acting on it. Unknown ids are ignored.
    pub fn delete(&mut self, id: &ObjectId, now_ms: f64) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.doc.remove(id).is_none() {
            log::debug!("delete ignored for unknown object {id}");
            return actions;
        }
        self.animated.remove(id);
        if self.long_press.action() == Some(id) {
            self.long_press.cancel();
        }
        if self.input.target_id() == Some(*id) {
            self.input = if self.pointers.is_empty() { InputState::Idle } else { InputState::Suppressed };
            self.set_intent(GestureIntent::Idle, &mut actions);
        }
        actions.push(Action::ObjectDeleted { id: *id });
        if self.selected == Some(*id) {
            self.set_selection(None, &mut actions);
        }
        self.log("Object deleted", now_ms, &mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Select an object, or clear the selection with `None`. Unknown ids are ignored.
    pub fn select(&mut self, id: Option<ObjectId>) -> Vec<Action> {
        let mut actions = Vec::new();
        if id.is_some_and(|id| !self.doc.contains(&id)) {
            return actions;
        }
        self.set_selection(id, &mut actions);
        actions
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, pointer: PointerId, screen: Point, now_ms: f64) -> Vec<Action> {
        let mut actions = self.poll_timers(now_ms);
        self.pointers.insert(pointer, screen);

        match self.input {
            InputState::Idle => {
                let target = match self.pick(screen) {
                    Some(id) => {
                        if let Some(stale) = self.long_press.schedule(now_ms, self.config.long_press_ms, id) {
                            log::debug!("replaced stale long-press for {stale}");
                        }
                        PressTarget::Object(id)
                    }
                    None => PressTarget::Background,
                };
                self.input = InputState::Pressed { pointer, target, start: screen };
            }
            InputState::Pressed { pointer: first, target: PressTarget::Object(id), .. } if self.selected == Some(id) => {
                self.long_press.cancel();
                self.begin_pinch(id, first, pointer, &mut actions);
            }
            InputState::Dragging { pointer: first, id, last, .. } => {
                // Settle the drag so far before the pinch takes over.
                self.set_intent(GestureIntent::Pinch, &mut actions);
                self.commit(id, PartialObject { position: Some(last), ..Default::default() }, &mut actions);
                self.log("Object moved", now_ms, &mut actions);
                self.begin_pinch(id, first, pointer, &mut actions);
            }
            InputState::Pinching(_) | InputState::Suppressed => {}
            InputState::Pressed { .. }
            | InputState::Selecting { .. }
            | InputState::Swiping { .. }
            | InputState::LongPressed { .. } => {
                self.long_press.cancel();
                self.set_intent(GestureIntent::Idle, &mut actions);
                self.input = InputState::Suppressed;
            }
        }
        actions
    }

    pub fn on_pointer_move(&mut self, pointer: PointerId, screen: Point, now_ms: f64) -> Vec<Action> {
        let mut actions = self.poll_timers(now_ms);
        // Hover moves (no button down) are not part of any gesture.
        let Some(tracked) = self.pointers.get_mut(&pointer) else {
            return actions;
        };
        *tracked = screen;
        if !self.input.is_driven_by(pointer) {
            return actions;
        }

        match self.input {
            InputState::Pressed { target, start, .. } => {
                if start.distance(screen) <= self.config.move_threshold_px {
                    return actions;
                }
                self.long_press.cancel();
                match target {
                    PressTarget::Object(id) if self.selected == Some(id) => {
                        let origin = self.doc.get(&id).map_or(DVec3::ZERO, |o| o.position);
                        self.input = InputState::Dragging { pointer, id, start, origin, last: origin };
                        self.set_intent(GestureIntent::Drag, &mut actions);
                        self.drag_to(screen, &mut actions);
                    }
                    PressTarget::Object(id) => {
                        // First touch on an unselected object only selects it.
                        self.set_selection(Some(id), &mut actions);
                        self.input = InputState::Selecting { pointer, id };
                        actions.push(Action::RenderNeeded);
                    }
                    PressTarget::Background => {
                        self.input = InputState::Swiping { pointer };
                        self.set_intent(GestureIntent::Swipe, &mut actions);
                    }
                }
            }
            InputState::Dragging { .. } => {
                self.drag_to(screen, &mut actions);
            }
            InputState::Pinching(mut pinch) => {
                let (Some(&a), Some(&b)) = (self.pointers.get(&pinch.first), self.pointers.get(&pinch.second)) else {
                    return actions;
                };
                let intent = pinch.update(a, b, self.config.min_scale, self.config.max_scale);
                if let Some(anim) = self.animated.get_mut(&pinch.id) {
                    anim.set_rotation_scale_immediate(pinch.rotation, pinch.scale);
                }
                self.input = InputState::Pinching(pinch);
                self.set_intent(intent, &mut actions);
                actions.push(Action::RenderNeeded);
            }
            _ => {}
        }
        actions
    }

    pub fn on_pointer_up(&mut self, pointer: PointerId, screen: Point, now_ms: f64) -> Vec<Action> {
        self.end_pointer(pointer, Some(screen), now_ms)
    }

    /// The pointer left the surface. Ends its gesture like a release, but
    /// never counts as a tap.
    pub fn on_pointer_leave(&mut self, pointer: PointerId, now_ms: f64) -> Vec<Action> {
        self.end_pointer(pointer, None, now_ms)
    }

    /// The platform took the pointer away (scroll, palm rejection).
    pub fn on_pointer_cancel(&mut self, pointer: PointerId, now_ms: f64) -> Vec<Action> {
        self.end_pointer(pointer, None, now_ms)
    }

    // --- Frame ---

    /// Advance one rendered frame: fire due timers, step animations, and
    /// publish the selected object's projected position to the bridge.
    pub fn frame(&mut self, now_ms: f64) -> Vec<Action> {
        let dt_ms = self.last_frame_ms.map_or(0.0, |last| (now_ms - last).max(0.0));
        self.last_frame_ms = Some(now_ms);

        let mut actions = self.poll_timers(now_ms);
        for anim in self.animated.values_mut() {
            anim.tick(self.interpolator.as_ref(), now_ms, dt_ms);
        }

        let coord = self
            .selected
            .and_then(|id| self.animated.get(&id))
            .and_then(|anim| self.camera.project(anim.current.position, self.viewport));
        self.bridge.publish(coord);

        if self.animated.values().any(|anim| !anim.is_settled()) {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Fire any deferred action that is due at `now_ms`.
    pub fn poll_timers(&mut self, now_ms: f64) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.intent_revert.poll(now_ms).is_some() {
            self.set_intent(GestureIntent::Idle, &mut actions);
        }
        if let Some(id) = self.long_press.poll(now_ms) {
            self.fire_long_press(id, now_ms, &mut actions);
        }
        actions
    }

    /// Earliest time at which [`EngineCore::poll_timers`] has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<f64> {
        [self.long_press.deadline(), self.intent_revert.deadline()].into_iter().flatten().reduce(f64::min)
    }

    /// Draw records for every object, in placement order.
    #[must_use]
    pub fn render_list(&self) -> Vec<RenderItem> {
        self.doc
            .objects()
            .iter()
            .filter_map(|obj| {
                let anim = self.animated.get(&obj.id)?;
                let selected = self.selected == Some(obj.id);
                Some(RenderItem {
                    id: obj.id,
                    position: anim.current.position,
                    rotation: anim.current.rotation,
                    scale: anim.display_scale(selected, &self.config),
                    color: anim.display_color(selected, &self.config),
                    selected,
                })
            })
            .collect()
    }

    // --- Queries ---

    /// The currently selected object, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ObjectId> {
        self.selected
    }

    #[must_use]
    pub fn intent(&self) -> GestureIntent {
        self.intent
    }

    /// Look up a committed object by ID.
    #[must_use]
    pub fn object(&self, id: &ObjectId) -> Option<&SceneObject> {
        self.doc.get(id)
    }

    #[must_use]
    pub fn objects(&self) -> &[SceneObject] {
        self.doc.objects()
    }

    /// The animated view of an object.
    #[must_use]
    pub fn animated(&self, id: &ObjectId) -> Option<&AnimatedTransform> {
        self.animated.get(id)
    }

    #[must_use]
    pub fn feed(&self) -> &LogFeed {
        &self.feed
    }

    /// Text the bridge sink currently shows.
    #[must_use]
    pub fn bridge_text(&self) -> String {
        self.bridge.text()
    }

    /// Object with a long-press waiting to fire.
    #[must_use]
    pub fn pending_long_press(&self) -> Option<ObjectId> {
        self.long_press.action().copied()
    }

    // --- Internals ---

    fn fresh_id(&self) -> ObjectId {
        let mut id = Uuid::new_v4();
        while self.doc.contains(&id) {
            id = Uuid::new_v4();
        }
        id
    }

    /// Topmost object under `screen`, using the animated view.
    fn pick(&self, screen: Point) -> Option<ObjectId> {
        let candidates: Vec<HitCandidate> = self
            .doc
            .objects()
            .iter()
            .map(|obj| {
                let (position, scale) =
                    self.animated.get(&obj.id).map_or((obj.position, obj.scale), |a| (a.current.position, a.current.scale));
                HitCandidate { id: obj.id, position, scale }
            })
            .collect();
        hit_test(screen, &candidates, &self.camera, self.viewport, self.config.object_half_extent).map(|hit| hit.object_id)
    }

    fn set_intent(&mut self, intent: GestureIntent, actions: &mut Vec<Action>) {
        self.intent_revert.cancel();
        if self.intent != intent {
            log::debug!("intent {} -> {intent}", self.intent);
            self.intent = intent;
            actions.push(Action::IntentChanged(intent));
        }
    }

    /// Show `intent` briefly, then revert to idle.
    fn flash_intent(&mut self, intent: GestureIntent, now_ms: f64, actions: &mut Vec<Action>) {
        self.set_intent(intent, actions);
        self.intent_revert.schedule(now_ms, self.config.intent_revert_ms, ());
    }

    fn set_selection(&mut self, id: Option<ObjectId>, actions: &mut Vec<Action>) {
        if self.selected == id {
            return;
        }
        self.selected = id;
        if id.is_none() {
            self.bridge.clear();
        }
        actions.push(Action::SelectionChanged(id));
    }

    fn log(&mut self, message: &str, now_ms: f64, actions: &mut Vec<Action>) {
        let entry = self.feed.push(message, now_ms);
        actions.push(Action::Logged(entry));
    }

    /// Write `fields` to the store and point the animated view at the result.
    fn commit(&mut self, id: ObjectId, fields: PartialObject, actions: &mut Vec<Action>) {
        if !self.doc.apply_partial(&id, &fields) {
            return;
        }
        if let (Some(obj), Some(anim)) = (self.doc.get(&id), self.animated.get_mut(&id)) {
            anim.retarget(Transform::from_object(obj));
        }
        actions.push(Action::ObjectCommitted { id, fields });
    }

    fn begin_pinch(&mut self, id: ObjectId, first: PointerId, second: PointerId, actions: &mut Vec<Action>) {
        let (Some(obj), Some(&a), Some(&b)) = (self.doc.get(&id), self.pointers.get(&first), self.pointers.get(&second))
        else {
            self.input = InputState::Suppressed;
            return;
        };
        let pinch = PinchGesture::begin(id, (first, a), (second, b), obj.rotation, obj.scale);
        self.input = InputState::Pinching(pinch);
        self.set_intent(GestureIntent::Pinch, actions);
    }

    /// Move the dragged object so it stays under the finger.
    fn drag_to(&mut self, screen: Point, actions: &mut Vec<Action>) {
        let InputState::Dragging { pointer, id, start, origin, .. } = self.input else {
            return;
        };
        let Some(ppu) = self.camera.pixels_per_world_unit(self.viewport, origin) else {
            return;
        };
        // Screen y grows downward; world y grows upward.
        let offset = DVec3::new((screen.x - start.x) / ppu, -(screen.y - start.y) / ppu, 0.0);
        let last = origin + offset;
        if let Some(anim) = self.animated.get_mut(&id) {
            anim.set_position_immediate(last);
        }
        self.input = InputState::Dragging { pointer, id, start, origin, last };
        actions.push(Action::RenderNeeded);
    }

    /// Release of `pointer`. `screen` is `None` when the pointer was lost
    /// rather than lifted, in which case nothing counts as a tap.
    fn end_pointer(&mut self, pointer: PointerId, screen: Option<Point>, now_ms: f64) -> Vec<Action> {
        let mut actions = self.poll_timers(now_ms);
        if self.pointers.remove(&pointer).is_none() {
            return actions;
        }

        match self.input {
            _ if !self.input.is_driven_by(pointer) => {}
            InputState::Pressed { target, .. } => {
                self.long_press.cancel();
                self.input = InputState::Idle;
                match (target, screen) {
                    (PressTarget::Object(id), Some(_)) => self.tap_object(id, now_ms, &mut actions),
                    (PressTarget::Background, Some(at)) => self.tap_background(at, now_ms, &mut actions),
                    (_, None) => {}
                }
            }
            InputState::Dragging { id, last, .. } => {
                self.input = InputState::Idle;
                self.set_intent(GestureIntent::Idle, &mut actions);
                self.commit(id, PartialObject { position: Some(last), ..Default::default() }, &mut actions);
                self.log("Object moved", now_ms, &mut actions);
            }
            InputState::Pinching(pinch) => {
                self.input = InputState::Suppressed;
                self.set_intent(GestureIntent::Idle, &mut actions);
                let fields = PartialObject { rotation: Some(pinch.rotation), scale: Some(pinch.scale), ..Default::default() };
                self.commit(pinch.id, fields, &mut actions);
                self.log("Object resized", now_ms, &mut actions);
            }
            InputState::Selecting { .. } | InputState::Swiping { .. } | InputState::LongPressed { .. } => {
                self.input = InputState::Idle;
                self.set_intent(GestureIntent::Idle, &mut actions);
            }
            InputState::Idle | InputState::Suppressed => {}
        }

        if self.input == InputState::Suppressed && self.pointers.is_empty() {
            self.input = InputState::Idle;
        }
        actions
    }

    fn tap_object(&mut self, id: ObjectId, now_ms: f64, actions: &mut Vec<Action>) {
        self.set_selection(Some(id), actions);
        self.flash_intent(GestureIntent::Tap, now_ms, actions);
        if let Some(anim) = self.animated.get_mut(&id) {
            anim.start_bounce(now_ms, self.config.bounce_ms);
        }
        actions.push(Action::RenderNeeded);
    }

    /// Background tap: deselect, or place a new object when nothing is selected.
    fn tap_background(&mut self, screen: Point, now_ms: f64, actions: &mut Vec<Action>) {
        if self.selected.is_some() {
            self.set_selection(None, actions);
            actions.push(Action::RenderNeeded);
            return;
        }
        match self.camera.screen_to_plane(screen, self.viewport, 0.0) {
            Some(position) => {
                let (_, placed) = self.place(position, now_ms);
                actions.extend(placed);
            }
            None => log::debug!("background tap at ({}, {}) misses the placement plane", screen.x, screen.y),
        }
    }

    fn fire_long_press(&mut self, id: ObjectId, now_ms: f64, actions: &mut Vec<Action>) {
        let InputState::Pressed { pointer, target: PressTarget::Object(pressed), .. } = self.input else {
            return;
        };
        if pressed != id {
            return;
        }
        self.input = InputState::LongPressed { pointer, id };
        self.set_intent(GestureIntent::LongPress, actions);
        if let Some(anim) = self.animated.get_mut(&id) {
            anim.set_rotation_scale_immediate(DVec3::ZERO, DVec3::ONE);
        }
        let reset = PartialObject { rotation: Some(DVec3::ZERO), scale: Some(DVec3::ONE), ..Default::default() };
        self.commit(id, reset, actions);
        self.log("Object reset", now_ms, actions);
    }
}
