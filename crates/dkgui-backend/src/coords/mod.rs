//! Coordinate, clip and color types shared by the GUI interface and the recorder.
//!
//! Canonical CPU space:
//! - display pixels
//! - origin top-left
//! - +X right, +Y down
//!
//! The vertex shader maps this space to clip space with the projection uniform.

mod clip;
mod color;
mod vec2;

pub use clip::ClipRect;
pub use color::ColorRgba;
pub use vec2::Vec2;
