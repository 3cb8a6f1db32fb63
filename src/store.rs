//! External collaborators: token persistence, scene descriptors, pings.
//!
//! DESIGN
//! ======
//! The session only talks to these traits, so the real backend (a remote
//! data store reached by query/mutation calls) stays outside this crate.
//! [`MemoryStore`] implements all three over `tokio::sync::RwLock` maps and
//! is the reference implementation used by tests and local hosts.

use std::collections::HashMap;

use scene::doc::{Token, TokenDescriptor, TokenKey};
use scene::geometry::Vector;
use scene::grid::GridSpec;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Identifier of a scene (battle map) within a room.
pub type SceneId = Uuid;

/// Identifier of the user driving a session.
pub type UserId = Uuid;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("scene not found: {0}")]
    SceneNotFound(SceneId),
    #[error("token not found: {key} in scene {scene_id}")]
    TokenNotFound { scene_id: SceneId, key: TokenKey },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SceneNotFound(_) => "E_SCENE_NOT_FOUND",
            Self::TokenNotFound { .. } => "E_TOKEN_NOT_FOUND",
            Self::Unavailable(_) => "E_STORE_UNAVAILABLE",
        }
    }
}

/// A transient marker request: where, by whom, and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ping {
    pub scene_id: SceneId,
    pub user_id: UserId,
    pub world: Vector,
    pub at_ms: f64,
}

// =============================================================================
// TRAITS
// =============================================================================

/// Token persistence for a scene.
#[async_trait::async_trait]
pub trait TokenStore: Send + Sync {
    /// # Errors
    ///
    /// Returns [`StoreError::SceneNotFound`] for an unknown scene.
    async fn list_tokens(&self, scene_id: SceneId) -> Result<Vec<Token>, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError::TokenNotFound`] when the token does not exist.
    async fn update_token_position(
        &self,
        scene_id: SceneId,
        key: TokenKey,
        position: Vector,
    ) -> Result<(), StoreError>;

    /// Create a token; the store assigns its key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SceneNotFound`] for an unknown scene.
    async fn add_token(&self, scene_id: SceneId, descriptor: TokenDescriptor) -> Result<Token, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError::TokenNotFound`] when the token does not exist.
    async fn remove_token(&self, scene_id: SceneId, key: TokenKey) -> Result<(), StoreError>;
}

/// Scene descriptors: the grid each scene snaps to.
#[async_trait::async_trait]
pub trait SceneCatalog: Send + Sync {
    /// # Errors
    ///
    /// Returns [`StoreError::SceneNotFound`] for an unknown scene.
    async fn grid(&self, scene_id: SceneId) -> Result<GridSpec, StoreError>;
}

/// Receiver of ping markers. No acknowledgment beyond delivery.
#[async_trait::async_trait]
pub trait PingSink: Send + Sync {
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the ping cannot be delivered.
    async fn ping(&self, ping: Ping) -> Result<(), StoreError>;
}

// =============================================================================
// MEMORY STORE
// =============================================================================

#[derive(Debug, Default)]
struct SceneRecord {
    grid: GridSpec,
    tokens: HashMap<TokenKey, Token>,
}

/// In-memory implementation of every collaborator trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    scenes: RwLock<HashMap<SceneId, SceneRecord>>,
    pings: RwLock<Vec<Ping>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scene with its grid and initial tokens; returns its id.
    pub async fn create_scene(&self, grid: GridSpec, tokens: Vec<Token>) -> SceneId {
        let scene_id = Uuid::new_v4();
        let tokens = tokens.into_iter().map(|token| (token.key, token)).collect();
        self.scenes.write().await.insert(scene_id, SceneRecord { grid, tokens });
        scene_id
    }

    /// Pings received so far, oldest first.
    pub async fn pings(&self) -> Vec<Ping> {
        self.pings.read().await.clone()
    }

    /// Current stored copy of a token.
    pub async fn token(&self, scene_id: SceneId, key: TokenKey) -> Option<Token> {
        self.scenes.read().await.get(&scene_id).and_then(|scene| scene.tokens.get(&key)).cloned()
    }
}

#[async_trait::async_trait]
impl TokenStore for MemoryStore {
    async fn list_tokens(&self, scene_id: SceneId) -> Result<Vec<Token>, StoreError> {
        let scenes = self.scenes.read().await;
        let scene = scenes.get(&scene_id).ok_or(StoreError::SceneNotFound(scene_id))?;
        Ok(scene.tokens.values().cloned().collect())
    }

    async fn update_token_position(
        &self,
        scene_id: SceneId,
        key: TokenKey,
        position: Vector,
    ) -> Result<(), StoreError> {
        let mut scenes = self.scenes.write().await;
        let scene = scenes.get_mut(&scene_id).ok_or(StoreError::SceneNotFound(scene_id))?;
        let token = scene.tokens.get_mut(&key).ok_or(StoreError::TokenNotFound { scene_id, key })?;
        token.position = position;
        Ok(())
    }

    async fn add_token(&self, scene_id: SceneId, descriptor: TokenDescriptor) -> Result<Token, StoreError> {
        let mut scenes = self.scenes.write().await;
        let scene = scenes.get_mut(&scene_id).ok_or(StoreError::SceneNotFound(scene_id))?;
        let token = descriptor.into_token(Uuid::new_v4());
        scene.tokens.insert(token.key, token.clone());
        Ok(token)
    }

    async fn remove_token(&self, scene_id: SceneId, key: TokenKey) -> Result<(), StoreError> {
        let mut scenes = self.scenes.write().await;
        let scene = scenes.get_mut(&scene_id).ok_or(StoreError::SceneNotFound(scene_id))?;
        scene.tokens.remove(&key).map(|_| ()).ok_or(StoreError::TokenNotFound { scene_id, key })
    }
}

#[async_trait::async_trait]
impl SceneCatalog for MemoryStore {
    async fn grid(&self, scene_id: SceneId) -> Result<GridSpec, StoreError> {
        let scenes = self.scenes.read().await;
        scenes.get(&scene_id).map(|scene| scene.grid).ok_or(StoreError::SceneNotFound(scene_id))
    }
}

#[async_trait::async_trait]
impl PingSink for MemoryStore {
    async fn ping(&self, ping: Ping) -> Result<(), StoreError> {
        self.pings.write().await.push(ping);
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
