//! Frame timing.
//!
//! One [`FrameClock`] per render loop; `tick()` once per frame yields the
//! delta time the GUI consumes.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
