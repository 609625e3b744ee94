use std::fmt;

/// Abstract GUI navigation key fed by the console pad.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum NavKey {
    GamepadStart,
    GamepadBack,

    // Face buttons, by position.
    GamepadFaceLeft,
    GamepadFaceRight,
    GamepadFaceUp,
    GamepadFaceDown,

    GamepadDpadLeft,
    GamepadDpadRight,
    GamepadDpadUp,
    GamepadDpadDown,

    // Shoulders and triggers
    GamepadL1,
    GamepadR1,
    GamepadL2,
    GamepadR2,

    GamepadLStickLeft,
    GamepadLStickRight,
    GamepadLStickUp,
    GamepadLStickDown,
}

/// Pointer button identifier. Touch is reported as `Left`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Events the bridge delivers to the GUI, in arrival order.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    Key { key: NavKey, down: bool },
    PointerMoved { x: f32, y: f32 },
    PointerButton { button: MouseButton, down: bool },
}

/// Receiver of GUI input events (the GUI library's event queue).
pub trait EventSink {
    fn add_key_event(&mut self, key: NavKey, down: bool);
    fn add_mouse_pos_event(&mut self, x: f32, y: f32);
    fn add_mouse_button_event(&mut self, button: MouseButton, down: bool);
}

impl fmt::Display for NavKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
