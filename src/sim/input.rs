//! Keyboard input reduced to driving intents
//!
//! The control scheme is fixed: arrows or WASD to drive, Space to brake.

use serde::{Deserialize, Serialize};

/// Physical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Forward,
    Backward,
    Left,
    Right,
    Brake,
    /// Restart the current level
    Restart,
    /// Start / advance / return to menu, depending on the screen
    Confirm,
}

impl Key {
    /// Map a browser `KeyboardEvent.code` to a key
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowUp" | "KeyW" => Some(Key::Forward),
            "ArrowDown" | "KeyS" => Some(Key::Backward),
            "ArrowLeft" | "KeyA" => Some(Key::Left),
            "ArrowRight" | "KeyD" => Some(Key::Right),
            "Space" => Some(Key::Brake),
            "KeyR" => Some(Key::Restart),
            "Enter" | "NumpadEnter" => Some(Key::Confirm),
            _ => None,
        }
    }

    /// Whether this key is held (an intent) rather than pressed once (a command)
    pub fn is_driving(&self) -> bool {
        !matches!(self, Key::Restart | Key::Confirm)
    }
}

/// Current held state of the driving controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub brake: bool,
}

impl InputIntent {
    /// Apply a key press/release. Returns false for keys that carry no intent.
    pub fn apply(&mut self, key: Key, pressed: bool) -> bool {
        let slot = match key {
            Key::Forward => &mut self.forward,
            Key::Backward => &mut self.backward,
            Key::Left => &mut self.left,
            Key::Right => &mut self.right,
            Key::Brake => &mut self.brake,
            Key::Restart | Key::Confirm => return false,
        };
        *slot = pressed;
        true
    }

    /// Release everything, e.g. when the page loses focus and key-ups never arrive
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Any of throttle, reverse or brake held
    #[inline]
    pub fn pedal_held(&self) -> bool {
        self.forward || self.backward || self.brake
    }

    /// Steering direction: +1 left, -1 right, 0 for neither or both
    #[inline]
    pub fn steer_axis(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }
}
