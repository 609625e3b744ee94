//! Low-level GPU interface and resource primitives.
//!
//! This module is responsible for:
//! - the [`GpuDevice`] trait, the explicit-memory graphics API the backend drives
//! - memory blocks, image layouts and the typed command stream
//! - the device + queue owner ([`GpuContext`]) and chunked command buffers
//! - [`HeadlessDevice`], a CPU reference implementation used by tests and hosts
//!   without the console GPU

mod align;
mod api;
mod cmd;
mod cmdbuf;
mod context;
mod error;
mod headless;
mod image;
mod memory;
pub mod state;

pub use align::{align, is_aligned};
pub use api::{DeviceLimits, GpuDevice, Queue, Swapchain};
pub use cmd::{CmdList, Command};
pub use cmdbuf::{CmdBuf, Encoder};
pub use context::GpuContext;
pub use error::DeviceError;
pub use headless::{CONSOLE_LIMITS, HeadlessDevice, Submission};
pub use image::{Image, ImageFlags, ImageFormat, ImageLayout, ImageLayoutDesc};
pub use memory::{BufferRange, MemBlock, MemBlockDesc, MemBlockFlags};
