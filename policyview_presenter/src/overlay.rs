//! View-state overlay.
//!
//! Holds the one piece of UI state a policy card has (expanded or not), keyed
//! by card key, so `NormalizedPolicy` never carries it. No IO, no async; one
//! lock guards the whole map.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

/// UI state attached to one presented card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub expanded: bool,
}

/// Every card with stored state, in key order. Callers choose how to persist it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlaySnapshot {
    pub states: Vec<(String, ViewState)>,
}

/// What a restore did: cards written, and how many of those replaced state
/// that was already held.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreStats {
    pub applied: usize,
    pub overwritten: usize,
}

/// Expanded flags for presented cards. Cards never touched read as collapsed.
#[derive(Debug, Default)]
pub struct ViewOverlay {
    cards: Mutex<BTreeMap<String, ViewState>>,
}

impl ViewOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    fn cards(&self) -> MutexGuard<'_, BTreeMap<String, ViewState>> {
        self.cards.lock().expect("view overlay mutex poisoned")
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.cards().get(key).is_some_and(|s| s.expanded)
    }

    pub fn set_expanded(&self, key: &str, expanded: bool) {
        self.cards().entry(key.to_string()).or_default().expanded = expanded;
    }

    /// Flip the card's expanded flag and return the new value.
    pub fn toggle_expanded(&self, key: &str) -> bool {
        let mut cards = self.cards();
        let state = cards.entry(key.to_string()).or_default();
        state.expanded = !state.expanded;
        state.expanded
    }

    /// Number of cards with stored state.
    pub fn len(&self) -> usize {
        self.cards().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> OverlaySnapshot {
        let states = self.cards().iter().map(|(k, s)| (k.clone(), *s)).collect();
        OverlaySnapshot { states }
    }

    /// Drop everything held and load the snapshot.
    pub fn restore(&self, snap: OverlaySnapshot) -> RestoreStats {
        let mut cards = self.cards();
        cards.clear();
        load(&mut cards, snap)
    }

    /// Load the snapshot over current state; the snapshot wins per key and
    /// keys it does not mention are kept.
    pub fn restore_merge(&self, snap: OverlaySnapshot) -> RestoreStats {
        load(&mut self.cards(), snap)
    }
}

fn load(cards: &mut BTreeMap<String, ViewState>, snap: OverlaySnapshot) -> RestoreStats {
    let mut stats = RestoreStats::default();
    for (key, state) in snap.states {
        if cards.insert(key, state).is_some() {
            stats.overwritten += 1;
        }
        stats.applied += 1;
    }
    stats
}
