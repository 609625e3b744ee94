//! Input bridge.
//!
//! Public API is platform-agnostic: the host supplies raw pad/touch state via
//! [`HidSource`] and receives GUI events through an [`EventSink`].

mod bridge;
mod buttons;
mod frame;
mod gamepad;
mod types;

pub use bridge::{HidSource, InputBridge, TouchPoint};
pub use buttons::{BUTTON_MAP, PadButtons};
pub use frame::InputFrame;
pub use gamepad::Gamepad;
pub use types::{EventSink, InputEvent, MouseButton, NavKey};
