//! Document model: scene tokens, sparse token patches, and the in-memory store.
//!
//! `TokenDoc` is the engine's local mirror of the tokens persisted by the
//! external store. Positions here are canonical (as last reported or
//! optimistically committed); the engine never writes a drag preview into
//! the document. Tokens refer to characters by id only; the character list is
//! owned elsewhere.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Vector;

/// Stable identifier of a token within a scene.
pub type TokenKey = Uuid;

/// Identifier of a character in the externally-owned character list.
pub type CharacterId = Uuid;

/// What a token represents on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TokenKind {
    /// A character marker occupying one grid cell.
    Character {
        #[serde(default)]
        character_id: Option<CharacterId>,
    },
    /// A rectangular zone marker spanning `size` world units from its position.
    Area { size: Vector },
}

/// A token as stored in the document and exchanged with the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub key: TokenKey,
    /// Top-left corner in world coordinates.
    pub position: Vector,
    /// Hidden tokens are shown to the game owner only.
    #[serde(default = "default_visible")]
    pub visible: bool,
    pub kind: TokenKind,
}

fn default_visible() -> bool {
    true
}

impl Token {
    /// A visible character token without a linked character.
    #[must_use]
    pub fn character(key: TokenKey, position: impl Into<Vector>) -> Self {
        Self { key, position: position.into(), visible: true, kind: TokenKind::Character { character_id: None } }
    }

    /// A visible area token.
    #[must_use]
    pub fn area(key: TokenKey, position: impl Into<Vector>, size: impl Into<Vector>) -> Self {
        Self { key, position: position.into(), visible: true, kind: TokenKind::Area { size: size.into() } }
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    #[must_use]
    pub fn is_area(&self) -> bool {
        matches!(self.kind, TokenKind::Area { .. })
    }

    #[must_use]
    pub fn character_id(&self) -> Option<CharacterId> {
        match self.kind {
            TokenKind::Character { character_id } => character_id,
            TokenKind::Area { .. } => None,
        }
    }
}

/// Request body for creating a token; the store assigns the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    pub position: Vector,
    #[serde(default = "default_visible")]
    pub visible: bool,
    pub kind: TokenKind,
}

impl TokenDescriptor {
    #[must_use]
    pub fn into_token(self, key: TokenKey) -> Token {
        Token { key, position: self.position, visible: self.visible, kind: self.kind }
    }
}

/// Sparse update for a token. Only present fields are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Vector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

/// In-memory store of scene tokens.
#[derive(Debug, Default)]
pub struct TokenDoc {
    tokens: HashMap<TokenKey, Token>,
}

impl TokenDoc {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a token.
    pub fn insert(&mut self, token: Token) {
        self.tokens.insert(token.key, token);
    }

    pub fn remove(&mut self, key: &TokenKey) -> Option<Token> {
        self.tokens.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: &TokenKey) -> Option<&Token> {
        self.tokens.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &TokenKey) -> bool {
        self.tokens.contains_key(key)
    }

    /// Set a token's canonical position. Returns `true` only when the stored
    /// value actually changed, so re-applying an echoed position is a no-op.
    pub fn set_position(&mut self, key: &TokenKey, position: Vector) -> bool {
        match self.tokens.get_mut(key) {
            Some(token) if token.position != position => {
                token.position = position;
                true
            }
            _ => false,
        }
    }

    /// Apply a sparse patch. Returns `true` when any field changed.
    pub fn apply_patch(&mut self, key: &TokenKey, patch: &TokenPatch) -> bool {
        let Some(token) = self.tokens.get_mut(key) else {
            return false;
        };
        let mut changed = false;
        if let Some(position) = patch.position
            && token.position != position
        {
            token.position = position;
            changed = true;
        }
        if let Some(visible) = patch.visible
            && token.visible != visible
        {
            token.visible = visible;
            changed = true;
        }
        changed
    }

    /// Replace all tokens with a full snapshot.
    pub fn load_snapshot(&mut self, tokens: Vec<Token>) {
        self.tokens.clear();
        for token in tokens {
            self.tokens.insert(token.key, token);
        }
    }

    /// All tokens in draw order: areas beneath characters, then by key.
    #[must_use]
    pub fn ordered(&self) -> Vec<&Token> {
        let mut tokens = self.tokens.values().collect::<Vec<_>>();
        tokens.sort_by(|a, b| b.is_area().cmp(&a.is_area()).then_with(|| a.key.cmp(&b.key)));
        tokens
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
