use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous tick, in seconds. Always positive.
    pub dt: f32,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

#[derive(Debug, Clone)]
enum Mode {
    RealTime {
        last: Instant,
        dt_min: Duration,
        dt_max: Duration,
    },
    Fixed(Duration),
}

/// Produces the per-frame delta time handed to the GUI.
///
/// Real-time clocks clamp the delta so a stalled frame (suspend, debugger)
/// does not feed the GUI a huge step, and a tight loop never reports zero.
/// Fixed-step clocks report the same delta every tick, which keeps headless
/// runs deterministic.
#[derive(Debug, Clone)]
pub struct FrameClock {
    mode: Mode,
    frame_index: u64,
}

impl FrameClock {
    /// Real-time clock with default clamps (0.1 ms to 250 ms).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Real-time clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(!dt_min.is_zero() && dt_min <= dt_max);
        Self {
            mode: Mode::RealTime {
                last: Instant::now(),
                dt_min,
                dt_max,
            },
            frame_index: 0,
        }
    }

    /// Clock that advances by exactly `step` per tick.
    pub fn fixed(step: Duration) -> Self {
        debug_assert!(!step.is_zero());
        Self {
            mode: Mode::Fixed(step),
            frame_index: 0,
        }
    }

    /// Resets the real-time baseline, e.g. after the application resumes.
    pub fn reset(&mut self) {
        if let Mode::RealTime { last, .. } = &mut self.mode {
            *last = Instant::now();
        }
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let dt = match &mut self.mode {
            Mode::RealTime {
                last,
                dt_min,
                dt_max,
            } => {
                let now = Instant::now();
                let dt = now.saturating_duration_since(*last).clamp(*dt_min, *dt_max);
                *last = now;
                dt
            }
            Mode::Fixed(step) => *step,
        };

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
