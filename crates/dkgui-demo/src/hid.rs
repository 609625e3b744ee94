use dkgui_backend::input::{HidSource, PadButtons, TouchPoint};

/// One step of the input script: what is held during `frames`.
struct Step {
    frames: std::ops::Range<u32>,
    held: PadButtons,
    touch: Option<TouchPoint>,
}

/// Replays a fixed pad/touch script, one sample per frame.
///
/// Stands in for the console HID service when running headless. The script
/// ends by pressing and releasing Plus, the exit gesture.
pub struct ScriptedHid {
    frame: u32,
    steps: Vec<Step>,
}

impl ScriptedHid {
    pub fn demo() -> Self {
        let touch = |x, y| Some(TouchPoint { x, y });
        Self {
            frame: 0,
            steps: vec![
                Step { frames: 10..20, held: PadButtons::RIGHT, touch: None },
                Step { frames: 20..24, held: PadButtons::DOWN, touch: None },
                Step { frames: 30..42, held: PadButtons::empty(), touch: touch(400.0, 300.0) },
                Step { frames: 42..48, held: PadButtons::empty(), touch: touch(420.0, 310.0) },
                Step { frames: 60..64, held: PadButtons::A, touch: None },
                Step { frames: 90..96, held: PadButtons::PLUS, touch: None },
            ],
        }
    }

    fn current(&self) -> Option<&Step> {
        self.steps.iter().find(|s| s.frames.contains(&self.frame))
    }
}

impl HidSource for ScriptedHid {
    fn held_buttons(&mut self) -> u64 {
        // Sampled first each poll; advances the script.
        self.frame += 1;
        self.current().map_or(0, |s| s.held.bits())
    }

    fn touch(&mut self) -> Option<TouchPoint> {
        self.current().and_then(|s| s.touch)
    }
}
