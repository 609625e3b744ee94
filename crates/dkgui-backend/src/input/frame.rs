use std::collections::HashSet;

use super::types::{EventSink, InputEvent, MouseButton, NavKey};

/// Per-poll input deltas.
///
/// A plain [`EventSink`] that keeps events in arrival order plus the sets of
/// keys and pointer buttons that changed. Hosts whose GUI library consumes
/// events directly do not need it.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    /// Keys pressed this poll.
    pub keys_pressed: HashSet<NavKey>,

    /// Keys released this poll.
    pub keys_released: HashSet<NavKey>,

    /// Pointer buttons pressed this poll.
    pub buttons_pressed: HashSet<MouseButton>,

    /// Pointer buttons released this poll.
    pub buttons_released: HashSet<MouseButton>,

    /// Last pointer position reported, if any.
    pub pointer_pos: Option<(f32, f32)>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
    }
}

impl EventSink for InputFrame {
    fn add_key_event(&mut self, key: NavKey, down: bool) {
        if down {
            self.keys_pressed.insert(key);
        } else {
            self.keys_released.insert(key);
        }
        self.events.push(InputEvent::Key { key, down });
    }

    fn add_mouse_pos_event(&mut self, x: f32, y: f32) {
        self.pointer_pos = Some((x, y));
        self.events.push(InputEvent::PointerMoved { x, y });
    }

    fn add_mouse_button_event(&mut self, button: MouseButton, down: bool) {
        if down {
            self.buttons_pressed.insert(button);
        } else {
            self.buttons_released.insert(button);
        }
        self.events.push(InputEvent::PointerButton { button, down });
    }
}
