//! Key identifiers and the held-key latch read by the tick functions.

use std::collections::HashMap;

/// The keys the games care about. Everything else is filtered out by the
/// terminal front-end before it reaches a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    W,
    A,
    S,
    D,
    Space,
}

/// Last known up/down state of each key. Written by key events, read once
/// per tick. Rapid presses are not queued: the latest value wins.
#[derive(Clone, Debug, Default)]
pub struct InputLatch {
    held: HashMap<Key, bool>,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.held.insert(key, true);
    }

    pub fn release(&mut self, key: Key) {
        self.held.insert(key, false);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.get(&key).copied().unwrap_or(false)
    }

    /// Read and clear a key in one step, turning a held key into a single
    /// edge-triggered action.
    pub fn consume(&mut self, key: Key) -> bool {
        let was_held = self.is_held(key);
        if was_held {
            self.release(key);
        }
        was_held
    }
}

/// Frame at which each held key was last reported. Terminals without
/// keyboard enhancement deliver OS auto-repeat as fresh presses and never
/// send a release, so a key counts as held until it goes quiet for longer
/// than the hold window.
#[derive(Clone, Debug, Default)]
pub struct HoldTracker {
    last_seen: HashMap<Key, u64>,
}

impl HoldTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press seen at `frame`. Returns `false` when the key was
    /// already held, i.e. the press is really auto-repeat.
    pub fn press(&mut self, key: Key, frame: u64) -> bool {
        self.last_seen.insert(key, frame).is_none()
    }

    pub fn refresh(&mut self, key: Key, frame: u64) {
        self.last_seen.insert(key, frame);
    }

    pub fn release(&mut self, key: Key) {
        self.last_seen.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.last_seen.contains_key(&key)
    }

    /// Forget every key not seen for more than `window` frames and return
    /// them so the caller can release them.
    pub fn expire(&mut self, frame: u64, window: u64) -> Vec<Key> {
        let expired: Vec<Key> = self
            .last_seen
            .iter()
            .filter(|(_, last)| frame.saturating_sub(**last) > window)
            .map(|(&key, _)| key)
            .collect();
        for key in &expired {
            self.last_seen.remove(key);
        }
        expired
    }
}
