//! Per-frame command recording.
//!
//! Each swapchain slot owns a command buffer and grow-only vertex/index
//! buffers. A frame is recorded into the acquired slot and submitted as a
//! state list followed by a draw list.
//!
//! Convention:
//! - GUI geometry is in display pixels (top-left origin, +Y down).
//! - The vertex shader maps it to clip space with an orthographic uniform.

mod buffer;
mod recorder;
mod slot;
mod state;
mod uniforms;

pub use buffer::DynamicBuffer;
pub use recorder::{FrameRecorder, FrameStats};
pub use slot::FrameSlot;
pub use state::{GeometryBinding, Pipeline};
pub use uniforms::{FragUniforms, UniformBlock, VertUniforms};
