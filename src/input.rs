use std::collections::HashSet;

use winit::keyboard::KeyCode;

/// Keys currently held down.
///
/// The event loop owns one of these and updates it from keyboard events; each
/// frame reads it through a shared reference only.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KeyState {
    pressed: HashSet<KeyCode>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keys(keys: impl IntoIterator<Item = KeyCode>) -> Self {
        Self {
            pressed: keys.into_iter().collect(),
        }
    }

    pub fn set(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.pressed.insert(key);
        } else {
            self.pressed.remove(&key);
        }
    }

    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    pub fn clear(&mut self) {
        self.pressed.clear();
    }
}
