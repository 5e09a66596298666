//! Held-key tracking.
//!
//! Terminals without the keyboard-enhancement protocol never send key
//! releases, so a key counts as held while its last press or repeat is
//! recent. Releases, when they do arrive, drop the key at once.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEventKind};

use crate::compute::Steering;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. The OS key-repeat rate is ≥ 15 Hz, so a window of 4
/// frames (≈133 ms) is always refreshed before expiry.
pub const HOLD_WINDOW: u64 = 4;

const LEFT: [KeyCode; 3] = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT: [KeyCode; 3] = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const UP: [KeyCode; 3] = [KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const DOWN: [KeyCode; 3] = [KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];

#[derive(Debug, Default)]
pub struct HeldKeys {
    // Maps each held key → the frame it was last seen (press or repeat).
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_frame(&mut self) {
        self.frame += 1;
    }

    pub fn record(&mut self, code: KeyCode, kind: KeyEventKind) {
        match kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.key_frame.insert(code, self.frame);
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&code);
            }
        }
    }

    pub fn is_held(&self, key: &KeyCode) -> bool {
        self.key_frame
            .get(key)
            .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    fn any_held(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|k| self.is_held(k))
    }

    /// Opposite keys cancel; two perpendicular keys give a diagonal.
    pub fn steering(&self) -> Steering {
        let left = self.any_held(&LEFT) as i8;
        let right = self.any_held(&RIGHT) as i8;
        let up = self.any_held(&UP) as i8;
        let down = self.any_held(&DOWN) as i8;
        Steering::new(right - left, down - up)
    }

    /// Forget every key, e.g. after a blocking screen swallowed the releases.
    pub fn clear(&mut self) {
        self.key_frame.clear();
    }
}
