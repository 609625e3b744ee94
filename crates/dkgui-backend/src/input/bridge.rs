use super::{BUTTON_MAP, EventSink, Gamepad, MouseButton};

/// A single touch sample in display pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
}

/// Raw input devices: the pad and the touch screen.
pub trait HidSource {
    /// Bitmask of currently held pad buttons (see [`PadButtons`](super::PadButtons)).
    fn held_buttons(&mut self) -> u64;

    /// First active touch, if any.
    fn touch(&mut self) -> Option<TouchPoint>;
}

/// Translates pad and touch state into GUI events.
#[derive(Debug, Default)]
pub struct InputBridge {
    pad: Gamepad,
    touch_down: bool,
}

impl InputBridge {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn gamepad(&self) -> &Gamepad {
        &self.pad
    }

    /// Polls `hid` once and emits the resulting events into `sink`.
    ///
    /// Touch:
    /// - present: pointer position every poll, pointer-down on the first sample
    /// - absent after present: one pointer-up
    /// - absent while up: nothing
    ///
    /// Each mapped button emits key-down on its press edge, otherwise key-up
    /// on its release edge.
    ///
    /// Returns the released-this-poll mask so the caller can detect an exit gesture.
    pub fn poll(&mut self, hid: &mut impl HidSource, sink: &mut impl EventSink) -> u64 {
        self.pad.update(hid.held_buttons());
        let down = self.pad.buttons_down();
        let up = self.pad.buttons_up();

        match hid.touch() {
            Some(TouchPoint { x, y }) => {
                sink.add_mouse_pos_event(x, y);
                if !self.touch_down {
                    self.touch_down = true;
                    sink.add_mouse_button_event(MouseButton::Left, true);
                }
            }
            None if self.touch_down => {
                self.touch_down = false;
                sink.add_mouse_button_event(MouseButton::Left, false);
            }
            None => {}
        }

        for (button, key) in BUTTON_MAP {
            let bit = button.bits();
            if down & bit != 0 {
                sink.add_key_event(key, true);
            } else if up & bit != 0 {
                sink.add_key_event(key, false);
            }
        }

        up
    }
}
