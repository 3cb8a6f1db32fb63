//! Scene session: one engine per active scene, wired to the collaborators.
//!
//! DESIGN
//! ======
//! Input methods forward to `EngineCore` and then dispatch the returned
//! actions. The engine has already applied moves and removals to its own
//! document by the time they reach here, so dispatch only has to tell the
//! store. Calls are awaited sequentially in emission order; a drag's batch of
//! position updates is therefore sent only after the engine has finalized the
//! drag offset.
//!
//! ERROR HANDLING
//! ==============
//! A failed store call is logged with `warn!` and counted in the returned
//! [`DispatchReport`]. Local state is not rolled back: the store's broadcast
//! (fed back through the `apply_remote_*` methods) settles the authoritative
//! position.

use std::sync::Arc;

use scene::doc::{Token, TokenDescriptor, TokenKey, TokenPatch};
use scene::engine::{Action, EngineCore};
use scene::geometry::Vector;
use scene::hit::Role;
use scene::input::{Button, Key, Modifiers, WheelInput};
use scene::render::RenderFrame;
use tracing::{debug, info, warn};

use crate::config::InteractionConfig;
use crate::store::{Ping, PingSink, SceneCatalog, SceneId, StoreError, TokenStore, UserId};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no active scene")]
    NoActiveScene,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a batch of engine actions amounted to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// The host should redraw.
    pub render: bool,
    /// The selected set changed (floating menus need refreshing).
    pub selection_changed: bool,
    /// Pointer capture the host should hold after this batch: `Some(true)`
    /// to route pointer events to the scene, `Some(false)` to stop, `None`
    /// to leave it as is. The last capture action in the batch wins, so a
    /// press that ends one gesture and starts another reports `Some(true)`.
    pub pointer_capture: Option<bool>,
    /// Position updates the store accepted.
    pub moved: usize,
    /// Removals the store accepted.
    pub removed: usize,
    /// Pings delivered.
    pub pinged: usize,
    /// Store calls that failed.
    pub failures: usize,
}

/// Collaborators a session talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub tokens: Arc<dyn TokenStore>,
    pub catalog: Arc<dyn SceneCatalog>,
    pub pings: Arc<dyn PingSink>,
}

impl Collaborators {
    /// Use one value for every role, e.g. a shared `MemoryStore`.
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: TokenStore + SceneCatalog + PingSink + 'static,
    {
        Self { tokens: store.clone(), catalog: store.clone(), pings: store }
    }
}

// =============================================================================
// SESSION
// =============================================================================

pub struct SceneSession {
    engine: EngineCore,
    scene_id: Option<SceneId>,
    user_id: UserId,
    collaborators: Collaborators,
}

impl SceneSession {
    #[must_use]
    pub fn new(config: InteractionConfig, role: Role, user_id: UserId, collaborators: Collaborators) -> Self {
        Self { engine: EngineCore::new(config, role), scene_id: None, user_id, collaborators }
    }

    #[must_use]
    pub fn scene_id(&self) -> Option<SceneId> {
        self.scene_id
    }

    #[must_use]
    pub fn engine(&self) -> &EngineCore {
        &self.engine
    }

    #[must_use]
    pub fn frame(&self) -> RenderFrame {
        self.engine.frame()
    }

    /// Enter a scene: load its grid and tokens, then reset viewport,
    /// selection and gestures.
    ///
    /// A gesture still active in the previous scene is terminated first; a
    /// drag in progress is committed to the previous scene before the switch.
    ///
    /// # Errors
    ///
    /// Returns the store error if either lookup fails; the previous scene
    /// and its gesture stay active in that case.
    pub async fn enter(&mut self, scene_id: SceneId) -> Result<DispatchReport, SessionError> {
        let grid = self.collaborators.catalog.grid(scene_id).await?;
        let tokens = self.collaborators.tokens.list_tokens(scene_id).await?;
        info!(%scene_id, tokens = tokens.len(), cell_size = grid.cell_size, "entering scene");
        let actions = self.engine.enter_scene(grid, tokens);
        // Dispatched while `scene_id` still names the outgoing scene.
        let report = self.dispatch(actions).await;
        self.scene_id = Some(scene_id);
        Ok(report)
    }

    /// Reload the active scene's tokens without touching the viewport.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoActiveScene`] before [`Self::enter`], or the
    /// store error.
    pub async fn refresh(&mut self) -> Result<DispatchReport, SessionError> {
        let scene_id = self.scene_id.ok_or(SessionError::NoActiveScene)?;
        let tokens = self.collaborators.tokens.list_tokens(scene_id).await?;
        let actions = self.engine.load_snapshot(tokens);
        Ok(self.dispatch(actions).await)
    }

    /// Create a token at the grid-snapped descriptor position.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoActiveScene`] before [`Self::enter`], or the
    /// store error.
    pub async fn add_token(&mut self, mut descriptor: TokenDescriptor) -> Result<Token, SessionError> {
        let scene_id = self.scene_id.ok_or(SessionError::NoActiveScene)?;
        descriptor.position = self.engine.grid().snap(descriptor.position);
        let token = self.collaborators.tokens.add_token(scene_id, descriptor).await?;
        debug!(key = %token.key, position = %token.position, "token added");
        self.engine.apply_create(token.clone());
        Ok(token)
    }

    // --- Input ---

    pub async fn pointer_down(
        &mut self,
        screen_pt: Vector,
        button: Button,
        modifiers: Modifiers,
        now_ms: f64,
    ) -> DispatchReport {
        let actions = self.engine.on_pointer_down(screen_pt, button, modifiers, now_ms);
        self.dispatch(actions).await
    }

    /// Press on a token's drag handle.
    pub async fn handle_down(&mut self, key: TokenKey, screen_pt: Vector, now_ms: f64) -> DispatchReport {
        let actions = self.engine.on_handle_down(key, screen_pt, now_ms);
        self.dispatch(actions).await
    }

    pub async fn pointer_move(&mut self, screen_pt: Vector) -> DispatchReport {
        let actions = self.engine.on_pointer_move(screen_pt);
        self.dispatch(actions).await
    }

    pub async fn pointer_up(&mut self, screen_pt: Vector, button: Button, now_ms: f64) -> DispatchReport {
        let actions = self.engine.on_pointer_up(screen_pt, button, now_ms);
        self.dispatch(actions).await
    }

    pub async fn pointer_cancel(&mut self, now_ms: f64) -> DispatchReport {
        let actions = self.engine.on_pointer_cancel(now_ms);
        self.dispatch(actions).await
    }

    pub async fn blur(&mut self, now_ms: f64) -> DispatchReport {
        let actions = self.engine.on_blur(now_ms);
        self.dispatch(actions).await
    }

    pub async fn wheel(&mut self, wheel: WheelInput) -> DispatchReport {
        let actions = self.engine.on_wheel(&wheel);
        self.dispatch(actions).await
    }

    pub async fn key_down(&mut self, key: Key) -> DispatchReport {
        let actions = self.engine.on_key_down(&key);
        self.dispatch(actions).await
    }

    pub async fn poll_timers(&mut self, now_ms: f64) -> DispatchReport {
        let actions = self.engine.poll_timers(now_ms);
        self.dispatch(actions).await
    }

    #[must_use]
    pub fn context_menu_allowed(&self, now_ms: f64) -> bool {
        self.engine.on_context_menu(now_ms)
    }

    /// Reduce the selection to one random member.
    pub async fn pick_random_selected(&mut self) -> DispatchReport {
        let actions = self.engine.pick_random_selected(&mut rand::rng());
        self.dispatch(actions).await
    }

    // --- Store broadcasts ---

    /// Authoritative position from the store. Re-applying a position the
    /// engine already holds is a no-op.
    pub async fn apply_remote_position(&mut self, key: TokenKey, position: Vector) -> DispatchReport {
        let patch = TokenPatch { position: Some(position), visible: None };
        let actions = self.engine.apply_update(&key, &patch);
        self.dispatch(actions).await
    }

    pub async fn apply_remote_patch(&mut self, key: TokenKey, patch: TokenPatch) -> DispatchReport {
        let actions = self.engine.apply_update(&key, &patch);
        self.dispatch(actions).await
    }

    pub async fn apply_remote_create(&mut self, token: Token) -> DispatchReport {
        let actions = self.engine.apply_create(token);
        self.dispatch(actions).await
    }

    pub async fn apply_remote_delete(&mut self, key: TokenKey) -> DispatchReport {
        let actions = self.engine.apply_delete(&key);
        self.dispatch(actions).await
    }

    // --- Dispatch ---

    async fn dispatch(&self, actions: Vec<Action>) -> DispatchReport {
        let mut report = DispatchReport::default();
        for action in actions {
            match action {
                Action::RenderNeeded => report.render = true,
                Action::SelectionChanged => report.selection_changed = true,
                Action::CapturePointer => report.pointer_capture = Some(true),
                Action::ReleasePointer => report.pointer_capture = Some(false),
                Action::TokenMoved { key, position } => match self.persist_position(key, position).await {
                    Ok(()) => report.moved += 1,
                    Err(e) => {
                        warn!(%key, %position, error = %e, "token position update failed");
                        report.failures += 1;
                    }
                },
                Action::TokenRemoved { key } => match self.persist_removal(key).await {
                    Ok(()) => report.removed += 1,
                    Err(e) => {
                        warn!(%key, error = %e, "token removal failed");
                        report.failures += 1;
                    }
                },
                Action::PingRequested { world, at_ms } => match self.send_ping(world, at_ms).await {
                    Ok(()) => report.pinged += 1,
                    Err(e) => {
                        warn!(%world, error = %e, "ping delivery failed");
                        report.failures += 1;
                    }
                },
            }
        }
        report
    }

    async fn persist_position(&self, key: TokenKey, position: Vector) -> Result<(), SessionError> {
        let scene_id = self.scene_id.ok_or(SessionError::NoActiveScene)?;
        self.collaborators.tokens.update_token_position(scene_id, key, position).await?;
        Ok(())
    }

    async fn persist_removal(&self, key: TokenKey) -> Result<(), SessionError> {
        let scene_id = self.scene_id.ok_or(SessionError::NoActiveScene)?;
        self.collaborators.tokens.remove_token(scene_id, key).await?;
        Ok(())
    }

    async fn send_ping(&self, world: Vector, at_ms: f64) -> Result<(), SessionError> {
        let scene_id = self.scene_id.ok_or(SessionError::NoActiveScene)?;
        let ping = Ping { scene_id, user_id: self.user_id, world, at_ms };
        self.collaborators.pings.ping(ping).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
