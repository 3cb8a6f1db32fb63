//! Selection engine: the set of selected token keys plus the in-progress
//! marquee.
//!
//! The marquee lives in screen space, since it is drawn as an overlay and
//! compared against tokens' screen-space bounds. Whether a marquee replaces
//! or extends the current selection is decided by the caller when the marquee
//! begins ([`MarqueeMode`]); single-token toggling never clears other keys.
//!
//! An empty selection is a normal state: consumers treat it as "nothing to
//! show or drag".

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::IteratorRandom;

use crate::doc::TokenKey;
use crate::geometry::{Rect, Vector};

/// How a finished marquee combines with the existing selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarqueeMode {
    /// The marquee's hits become the whole selection.
    #[default]
    Replace,
    /// The marquee's hits are added to the existing selection.
    Additive,
}

/// An in-progress marquee, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marquee {
    pub start: Vector,
    pub end: Vector,
    pub mode: MarqueeMode,
}

impl Marquee {
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.start, self.end)
    }
}

/// Selected token keys, kept ordered so iteration is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    keys: BTreeSet<TokenKey>,
    marquee: Option<Marquee>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, key: &TokenKey) -> bool {
        self.keys.contains(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = TokenKey> + '_ {
        self.keys.iter().copied()
    }

    #[must_use]
    pub fn keys(&self) -> Vec<TokenKey> {
        self.iter().collect()
    }

    // --- Marquee ---

    /// Start a marquee at `screen_pt`, discarding any unfinished one.
    pub fn begin_marquee(&mut self, screen_pt: Vector, mode: MarqueeMode) {
        self.marquee = Some(Marquee { start: screen_pt, end: screen_pt, mode });
    }

    /// Move the marquee's free corner. Returns `false` when no marquee is active.
    pub fn update_marquee(&mut self, screen_pt: Vector) -> bool {
        match self.marquee.as_mut() {
            Some(marquee) => {
                marquee.end = screen_pt;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn marquee(&self) -> Option<Marquee> {
        self.marquee
    }

    #[must_use]
    pub fn marquee_rect(&self) -> Option<Rect> {
        self.marquee.map(|m| m.rect())
    }

    /// Finish the marquee: every candidate whose screen bounds overlap the
    /// marquee rectangle is selected, combined per the marquee's mode.
    ///
    /// Returns `true` when the selection changed.
    pub fn end_marquee<I>(&mut self, candidates: I) -> bool
    where
        I: IntoIterator<Item = (TokenKey, Rect)>,
    {
        let Some(marquee) = self.marquee.take() else {
            return false;
        };
        let rect = marquee.rect();
        let hits = candidates
            .into_iter()
            .filter(|(_, bounds)| rect.overlaps(bounds))
            .map(|(key, _)| key);

        let next = match marquee.mode {
            MarqueeMode::Replace => hits.collect::<BTreeSet<_>>(),
            MarqueeMode::Additive => self.keys.iter().copied().chain(hits).collect(),
        };
        self.replace_keys(next)
    }

    /// Drop the marquee without touching the selection.
    pub fn cancel_marquee(&mut self) -> bool {
        self.marquee.take().is_some()
    }

    // --- Direct mutation ---

    /// Flip one key. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, key: TokenKey) -> bool {
        if self.keys.remove(&key) {
            false
        } else {
            self.keys.insert(key);
            true
        }
    }

    /// Replace the selection. Returns `true` when it changed.
    pub fn set_selected<I>(&mut self, keys: I) -> bool
    where
        I: IntoIterator<Item = TokenKey>,
    {
        self.replace_keys(keys.into_iter().collect())
    }

    /// Returns `true` when anything was selected.
    pub fn clear(&mut self) -> bool {
        self.replace_keys(BTreeSet::new())
    }

    /// Keep only keys for which `keep` holds. Returns `true` when any were dropped.
    pub fn retain<F>(&mut self, mut keep: F) -> bool
    where
        F: FnMut(&TokenKey) -> bool,
    {
        let before = self.keys.len();
        self.keys.retain(|key| keep(key));
        self.keys.len() != before
    }

    /// Reduce the selection to one uniformly chosen member.
    pub fn pick_random<R>(&mut self, rng: &mut R) -> Option<TokenKey>
    where
        R: Rng + ?Sized,
    {
        let chosen = self.keys.iter().copied().choose(rng)?;
        self.replace_keys(BTreeSet::from([chosen]));
        Some(chosen)
    }

    /// Empty selection and no marquee, as at the start of a scene session.
    pub fn reset(&mut self) {
        self.keys.clear();
        self.marquee = None;
    }

    fn replace_keys(&mut self, next: BTreeSet<TokenKey>) -> bool {
        if next == self.keys {
            return false;
        }
        self.keys = next;
        true
    }
}
