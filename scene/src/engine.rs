use rand::Rng;

use crate::config::InteractionConfig;
use crate::doc::{Token, TokenDoc, TokenKey, TokenPatch};
use crate::drag::TokenDrag;
use crate::geometry::{Rect, Vector};
use crate::gestures::{self, ContextMenuGuard, LongPress, PanGesture};
use crate::grid::GridSpec;
use crate::hit::{self, Role};
use crate::input::{Button, InputState, Key, Modifiers, WheelInput};
use crate::render::{self, RenderFrame};
use crate::selection::{MarqueeMode, Selection};
use crate::viewport::Viewport;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RenderNeeded,
    SelectionChanged,
    /// A token's committed position; already applied to the local document.
    TokenMoved { key: TokenKey, position: Vector },
    /// A token removal; already applied to the local document.
    TokenRemoved { key: TokenKey },
    /// A transient marker at a world point.
    PingRequested { world: Vector, at_ms: f64 },
    /// Route all pointer events to the scene until `ReleasePointer`.
    CapturePointer,
    ReleasePointer,
}

/// Scene session state: everything the interaction engine owns for one scene.
///
/// Every handler is synchronous and returns the side effects as [`Action`]s.
pub struct EngineCore {
    doc: TokenDoc,
    grid: GridSpec,
    role: Role,
    config: InteractionConfig,
    viewport: Viewport,
    selection: Selection,
    drag: TokenDrag,
    input: InputState,
    long_press: LongPress,
    context_menu: ContextMenuGuard,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(InteractionConfig::default(), Role::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: InteractionConfig, role: Role) -> Self {
        Self {
            doc: TokenDoc::new(),
            grid: GridSpec::default(),
            role,
            config,
            viewport: Viewport::new(config.zoom),
            selection: Selection::new(),
            drag: TokenDrag::new(),
            input: InputState::Idle,
            long_press: LongPress::default(),
            context_menu: ContextMenuGuard::default(),
        }
    }

    // --- Data inputs ---

    /// Switch to a new scene: fresh viewport, empty selection, no gesture.
    ///
    /// A gesture still in progress is terminated against the outgoing
    /// document first, so a drag commits its positions and the pointer is
    /// released. Those actions belong to the previous scene.
    pub fn enter_scene(&mut self, grid: GridSpec, tokens: Vec<Token>) -> Vec<Action> {
        // The suppression window is cleared below; the timestamp is moot.
        let mut actions = self.terminate_gesture(0.0);
        if !self.selection.is_empty() {
            actions.push(Action::SelectionChanged);
        }
        self.grid = grid.sanitized();
        self.viewport.reset();
        self.selection.reset();
        self.drag.reset();
        self.input = InputState::Idle;
        self.long_press.cancel();
        self.context_menu.clear();
        self.doc.load_snapshot(tokens);
        tracing::debug!(tokens = self.doc.len(), cell_size = self.grid.cell_size, "scene entered");
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Replace the document with a store snapshot, keeping the viewport.
    pub fn load_snapshot(&mut self, tokens: Vec<Token>) -> Vec<Action> {
        self.doc.load_snapshot(tokens);
        self.after_doc_change(true)
    }

    /// Apply a store broadcast: token created.
    pub fn apply_create(&mut self, token: Token) -> Vec<Action> {
        self.doc.insert(token);
        self.after_doc_change(true)
    }

    /// Apply a store broadcast: token updated. An echo of a value the
    /// document already holds produces no actions.
    pub fn apply_update(&mut self, key: &TokenKey, patch: &TokenPatch) -> Vec<Action> {
        let changed = self.doc.apply_patch(key, patch);
        self.after_doc_change(changed)
    }

    /// Apply a store broadcast: token deleted.
    pub fn apply_delete(&mut self, key: &TokenKey) -> Vec<Action> {
        let changed = self.doc.remove(key).is_some();
        self.after_doc_change(changed)
    }

    /// Change who is looking; players lose hidden tokens from the selection.
    pub fn set_role(&mut self, role: Role) -> Vec<Action> {
        self.role = role;
        self.after_doc_change(true)
    }

    // --- Selection commands ---

    /// Replace the selection with the given keys (those the role cannot see
    /// are dropped).
    pub fn select<I>(&mut self, keys: I) -> Vec<Action>
    where
        I: IntoIterator<Item = TokenKey>,
    {
        let doc = &self.doc;
        let role = self.role;
        let visible = keys.into_iter().filter(|key| doc.get(key).is_some_and(|t| role.can_see(t)));
        if self.selection.set_selected(visible) { selection_changed() } else { Vec::new() }
    }

    /// Reduce the selection to one random member.
    pub fn pick_random_selected<R>(&mut self, rng: &mut R) -> Vec<Action>
    where
        R: Rng + ?Sized,
    {
        let before = self.selection.len();
        match self.selection.pick_random(rng) {
            Some(_) if before > 1 => selection_changed(),
            _ => Vec::new(),
        }
    }

    // --- Input events ---

    /// Pointer pressed. Any gesture still in progress is terminated first.
    pub fn on_pointer_down(&mut self, screen_pt: Vector, button: Button, modifiers: Modifiers, now_ms: f64) -> Vec<Action> {
        let mut actions = self.terminate_gesture(now_ms);
        match button {
            Button::Primary => self.primary_down(screen_pt, modifiers, now_ms, &mut actions),
            Button::Middle => actions.push(self.ping_at(screen_pt, now_ms)),
            Button::Secondary => {
                self.input = InputState::PanPending(PanGesture::new(screen_pt));
                actions.push(Action::CapturePointer);
            }
        }
        actions
    }

    /// Pointer pressed on a token's drag handle. Selects only that token
    /// and arms a drag exactly like a press on the token body, without the
    /// long-press ping. Unknown or unseen keys leave the state untouched.
    pub fn on_handle_down(&mut self, key: TokenKey, screen_pt: Vector, now_ms: f64) -> Vec<Action> {
        if !self.doc.get(&key).is_some_and(|token| self.role.can_see(token)) {
            return Vec::new();
        }
        let mut actions = self.terminate_gesture(now_ms);
        if self.selection.set_selected([key]) {
            actions.push(Action::SelectionChanged);
        }
        self.input = InputState::PressingToken { key, start_screen: screen_pt, collapse_on_release: false };
        actions.push(Action::CapturePointer);
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn on_pointer_move(&mut self, screen_pt: Vector) -> Vec<Action> {
        if self.long_press.track(screen_pt, self.config.long_press_slop_px) {
            tracing::trace!("long press cancelled by pointer travel");
        }

        let mut actions = Vec::new();
        match self.input {
            InputState::Idle => {}
            InputState::Marquee => {
                if self.selection.update_marquee(screen_pt) {
                    actions.push(Action::RenderNeeded);
                }
            }
            InputState::PressingToken { start_screen, .. } => {
                if (screen_pt - start_screen).magnitude() > self.config.drag_threshold_px {
                    self.long_press.cancel();
                    self.drag.begin(start_screen);
                    self.drag.update(screen_pt, self.viewport.scale());
                    self.input = InputState::DraggingTokens;
                    tracing::debug!(tokens = self.selection.len(), "token drag started");
                    actions.push(Action::RenderNeeded);
                }
            }
            InputState::DraggingTokens => {
                if self.drag.update(screen_pt, self.viewport.scale()) {
                    actions.push(Action::RenderNeeded);
                }
            }
            InputState::PanPending(mut pan) => {
                if pan.exceeds(screen_pt, self.config.pan_threshold_px) {
                    self.viewport.move_by(pan.step(screen_pt));
                    self.input = InputState::Panning(pan);
                    tracing::debug!("pan started");
                    actions.push(Action::RenderNeeded);
                }
            }
            InputState::Panning(mut pan) => {
                let delta = pan.step(screen_pt);
                self.input = InputState::Panning(pan);
                if !delta.is_zero() {
                    self.viewport.move_by(delta);
                    actions.push(Action::RenderNeeded);
                }
            }
        }
        actions
    }

    /// Pointer released. A release of a button other than the one driving the
    /// current gesture is ignored.
    pub fn on_pointer_up(&mut self, screen_pt: Vector, button: Button, now_ms: f64) -> Vec<Action> {
        if button == Button::Primary {
            self.long_press.cancel();
        }
        if gesture_button(&self.input) != Some(button) {
            return Vec::new();
        }

        let mut actions = Vec::new();
        match self.input {
            InputState::Idle => {}
            InputState::Marquee => {
                self.selection.update_marquee(screen_pt);
                self.finish_marquee(&mut actions);
            }
            InputState::PressingToken { key, collapse_on_release, .. } => {
                if collapse_on_release && self.selection.set_selected([key]) {
                    actions.push(Action::SelectionChanged);
                }
            }
            InputState::DraggingTokens => {
                self.drag.update(screen_pt, self.viewport.scale());
                self.commit_drag(&mut actions);
            }
            InputState::PanPending(_) => {}
            InputState::Panning(_) => self.context_menu.suppress(now_ms, self.config.context_menu_suppress_ms),
        }
        self.input = InputState::Idle;
        actions.push(Action::ReleasePointer);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// The platform cancelled the pointer. Drags still commit.
    pub fn on_pointer_cancel(&mut self, now_ms: f64) -> Vec<Action> {
        self.terminate_gesture(now_ms)
    }

    /// The window lost focus. Drags still commit.
    pub fn on_blur(&mut self, now_ms: f64) -> Vec<Action> {
        self.terminate_gesture(now_ms)
    }

    /// Wheel zoom around the cursor. Ignored while tokens are being dragged.
    pub fn on_wheel(&mut self, wheel: &WheelInput) -> Vec<Action> {
        if matches!(self.input, InputState::DraggingTokens) {
            return Vec::new();
        }
        let Some((direction, pivot)) = gestures::wheel_zoom(wheel) else {
            return Vec::new();
        };
        if self.viewport.zoom(direction, pivot) { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    /// Whether the host should let a context menu open at `now_ms`.
    #[must_use]
    pub fn on_context_menu(&self, now_ms: f64) -> bool {
        !matches!(self.input, InputState::Panning(_)) && self.context_menu.allows(now_ms)
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if key.is_escape() {
            return match self.input {
                InputState::Marquee => {
                    self.selection.cancel_marquee();
                    self.long_press.cancel();
                    self.input = InputState::Idle;
                    vec![Action::ReleasePointer, Action::RenderNeeded]
                }
                InputState::Idle => {
                    if self.selection.clear() {
                        selection_changed()
                    } else {
                        Vec::new()
                    }
                }
                _ => Vec::new(),
            };
        }
        if key.is_delete() && self.role == Role::Owner && !self.input.is_active() {
            return self.remove_selected();
        }
        Vec::new()
    }

    /// Fire timers that have come due: currently the long-press ping.
    pub fn poll_timers(&mut self, now_ms: f64) -> Vec<Action> {
        let Some(screen_pt) = self.long_press.poll(now_ms, self.config.long_press_ms) else {
            return Vec::new();
        };
        let mut actions = vec![self.ping_at(screen_pt, now_ms)];
        match self.input {
            InputState::Marquee => {
                self.selection.cancel_marquee();
            }
            InputState::PressingToken { .. } => {}
            _ => return actions,
        }
        self.input = InputState::Idle;
        actions.push(Action::ReleasePointer);
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Queries ---

    /// Everything the rendering surface needs for the next frame.
    #[must_use]
    pub fn frame(&self) -> RenderFrame {
        render::build(self)
    }

    #[must_use]
    pub fn doc(&self) -> &TokenDoc {
        &self.doc
    }

    #[must_use]
    pub fn token(&self, key: &TokenKey) -> Option<&Token> {
        self.doc.get(key)
    }

    #[must_use]
    pub fn grid(&self) -> GridSpec {
        self.grid
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn drag(&self) -> &TokenDrag {
        &self.drag
    }

    #[must_use]
    pub fn input_state(&self) -> &InputState {
        &self.input
    }

    /// World position a token is drawn at: snapped, plus the drag offset when
    /// it is part of the selection.
    #[must_use]
    pub fn render_position_of(&self, token: &Token) -> Vector {
        if self.selection.contains(&token.key) {
            self.drag.preview_position(token.position, &self.grid)
        } else {
            self.grid.snap(token.position)
        }
    }

    /// Screen-space box around the selected tokens, for anchoring menus.
    #[must_use]
    pub fn selection_bounds(&self) -> Option<Rect> {
        let rects = self
            .selection
            .iter()
            .filter_map(|key| self.doc.get(&key))
            .filter(|&token| self.role.can_see(token))
            .map(|token| {
                let world = hit::bounds_at(token, self.render_position_of(token), &self.grid);
                self.viewport.world_rect_to_screen(&world)
            });
        Rect::bounding(rects)
    }

    // --- Internals ---

    fn primary_down(&mut self, screen_pt: Vector, modifiers: Modifiers, now_ms: f64, actions: &mut Vec<Action>) {
        self.long_press.arm(screen_pt, now_ms);
        let world = self.viewport.screen_to_world(screen_pt);
        let hit = hit::hit_test(world, &self.doc, &self.grid, self.role, |t| self.render_position_of(t));

        let Some(key) = hit else {
            let mode = if modifiers.additive() { MarqueeMode::Additive } else { MarqueeMode::Replace };
            self.selection.begin_marquee(screen_pt, mode);
            self.input = InputState::Marquee;
            actions.push(Action::CapturePointer);
            actions.push(Action::RenderNeeded);
            return;
        };

        let mut collapse_on_release = false;
        if modifiers.toggles() {
            self.selection.toggle(key);
            actions.push(Action::SelectionChanged);
            if !self.selection.contains(&key) {
                // Toggled off: nothing left under the pointer to drag.
                actions.push(Action::RenderNeeded);
                return;
            }
        } else if !self.selection.contains(&key) {
            self.selection.set_selected([key]);
            actions.push(Action::SelectionChanged);
        } else {
            collapse_on_release = self.selection.len() > 1;
        }

        self.input = InputState::PressingToken { key, start_screen: screen_pt, collapse_on_release };
        actions.push(Action::CapturePointer);
        actions.push(Action::RenderNeeded);
    }

    /// End whatever gesture is active without a matching pointer-up.
    fn terminate_gesture(&mut self, now_ms: f64) -> Vec<Action> {
        self.long_press.cancel();
        let mut actions = Vec::new();
        match self.input {
            InputState::Idle => return actions,
            InputState::Marquee => {
                self.selection.cancel_marquee();
            }
            InputState::PressingToken { .. } | InputState::PanPending(_) => {}
            InputState::DraggingTokens => self.commit_drag(&mut actions),
            InputState::Panning(_) => self.context_menu.suppress(now_ms, self.config.context_menu_suppress_ms),
        }
        tracing::debug!(state = ?self.input, "gesture terminated");
        self.input = InputState::Idle;
        actions.push(Action::ReleasePointer);
        actions.push(Action::RenderNeeded);
        actions
    }

    fn finish_marquee(&mut self, actions: &mut Vec<Action>) {
        let candidates =
            hit::screen_bounds(&self.doc, &self.grid, &self.viewport, self.role, |t| self.render_position_of(t));
        if self.selection.end_marquee(candidates) {
            actions.push(Action::SelectionChanged);
        }
    }

    fn commit_drag(&mut self, actions: &mut Vec<Action>) {
        let keys = self.selection.keys();
        let batch = self.drag.commit(keys, &mut self.doc, &self.grid);
        actions.extend(batch.into_iter().map(|(key, position)| Action::TokenMoved { key, position }));
    }

    fn remove_selected(&mut self) -> Vec<Action> {
        let mut actions: Vec<Action> = self
            .selection
            .keys()
            .into_iter()
            .filter(|key| self.doc.remove(key).is_some())
            .map(|key| Action::TokenRemoved { key })
            .collect();
        if self.selection.clear() {
            actions.push(Action::SelectionChanged);
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    fn ping_at(&self, screen_pt: Vector, now_ms: f64) -> Action {
        let world = self.viewport.screen_to_world(screen_pt);
        tracing::debug!(%world, "ping requested");
        Action::PingRequested { world, at_ms: now_ms }
    }

    /// Drop selected keys that vanished or became invisible to the role.
    fn after_doc_change(&mut self, changed: bool) -> Vec<Action> {
        let doc = &self.doc;
        let role = self.role;
        let pruned = self.selection.retain(|key| doc.get(key).is_some_and(|t| role.can_see(t)));

        let mut actions = Vec::new();
        if pruned {
            actions.push(Action::SelectionChanged);
        }
        if changed || pruned {
            actions.push(Action::RenderNeeded);
        }
        actions
    }
}

fn selection_changed() -> Vec<Action> {
    vec![Action::SelectionChanged, Action::RenderNeeded]
}

/// Button that started the active gesture.
fn gesture_button(state: &InputState) -> Option<Button> {
    match state {
        InputState::Idle => None,
        InputState::Marquee | InputState::PressingToken { .. } | InputState::DraggingTokens => Some(Button::Primary),
        InputState::PanPending(_) | InputState::Panning(_) => Some(Button::Secondary),
    }
}
