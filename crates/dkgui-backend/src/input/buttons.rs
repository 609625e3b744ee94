use bitflags::bitflags;

use super::NavKey;

bitflags! {
    /// Console pad button bits, as reported by the HID service.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct PadButtons: u64 {
        const A             = 1 << 0;
        const B             = 1 << 1;
        const X             = 1 << 2;
        const Y             = 1 << 3;
        const STICK_L       = 1 << 4;
        const STICK_R       = 1 << 5;
        const L             = 1 << 6;
        const R             = 1 << 7;
        const ZL            = 1 << 8;
        const ZR            = 1 << 9;
        const PLUS          = 1 << 10;
        const MINUS         = 1 << 11;
        const LEFT          = 1 << 12;
        const UP            = 1 << 13;
        const RIGHT         = 1 << 14;
        const DOWN          = 1 << 15;
        const STICK_L_LEFT  = 1 << 16;
        const STICK_L_UP    = 1 << 17;
        const STICK_L_RIGHT = 1 << 18;
        const STICK_L_DOWN  = 1 << 19;
        const STICK_R_LEFT  = 1 << 20;
        const STICK_R_UP    = 1 << 21;
        const STICK_R_RIGHT = 1 << 22;
        const STICK_R_DOWN  = 1 << 23;
    }
}

/// Pad buttons that drive GUI navigation, and the key each one maps to.
///
/// Face buttons map by role: A activates (GUI "face down") and B cancels
/// ("face right"), whatever their physical position on the pad.
pub const BUTTON_MAP: [(PadButtons, NavKey); 18] = [
    (PadButtons::A, NavKey::GamepadFaceDown),
    (PadButtons::B, NavKey::GamepadFaceRight),
    (PadButtons::X, NavKey::GamepadFaceUp),
    (PadButtons::Y, NavKey::GamepadFaceLeft),
    (PadButtons::L, NavKey::GamepadL1),
    (PadButtons::R, NavKey::GamepadR1),
    (PadButtons::ZL, NavKey::GamepadL2),
    (PadButtons::ZR, NavKey::GamepadR2),
    (PadButtons::PLUS, NavKey::GamepadStart),
    (PadButtons::MINUS, NavKey::GamepadBack),
    (PadButtons::LEFT, NavKey::GamepadDpadLeft),
    (PadButtons::RIGHT, NavKey::GamepadDpadRight),
    (PadButtons::UP, NavKey::GamepadDpadUp),
    (PadButtons::DOWN, NavKey::GamepadDpadDown),
    (PadButtons::STICK_L_LEFT, NavKey::GamepadLStickLeft),
    (PadButtons::STICK_L_RIGHT, NavKey::GamepadLStickRight),
    (PadButtons::STICK_L_UP, NavKey::GamepadLStickUp),
    (PadButtons::STICK_L_DOWN, NavKey::GamepadLStickDown),
];
