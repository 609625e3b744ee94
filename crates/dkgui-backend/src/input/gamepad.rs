use super::PadButtons;

/// Edge detector over the pad's held-button mask.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Gamepad {
    held: u64,
    prev: u64,
}

impl Gamepad {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds this poll's held mask; the previous one becomes the baseline.
    #[inline]
    pub fn update(&mut self, held: u64) {
        self.prev = self.held;
        self.held = held;
    }

    #[inline]
    pub fn held(&self) -> u64 {
        self.held
    }

    /// Buttons that went from released to pressed on the last update.
    #[inline]
    pub fn buttons_down(&self) -> u64 {
        self.held & !self.prev
    }

    /// Buttons that went from pressed to released on the last update.
    #[inline]
    pub fn buttons_up(&self) -> u64 {
        self.prev & !self.held
    }

    #[inline]
    pub fn is_held(&self, buttons: PadButtons) -> bool {
        self.held & buttons.bits() == buttons.bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: u64 = PadButtons::A.bits();
    const B: u64 = PadButtons::B.bits();

    #[test]
    fn press_hold_release() {
        let mut pad = Gamepad::new();

        pad.update(A);
        assert_eq!((pad.buttons_down(), pad.buttons_up()), (A, 0));

        pad.update(A | B);
        assert_eq!((pad.buttons_down(), pad.buttons_up()), (B, 0));
        assert!(pad.is_held(PadButtons::A | PadButtons::B));

        pad.update(B);
        assert_eq!((pad.buttons_down(), pad.buttons_up()), (0, A));

        pad.update(0);
        assert_eq!((pad.buttons_down(), pad.buttons_up()), (0, B));

        pad.update(0);
        assert_eq!((pad.buttons_down(), pad.buttons_up()), (0, 0));
    }
}
