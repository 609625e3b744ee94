//! Presentable framebuffers and the shared depth buffer.

mod resources;

pub use resources::SwapchainResources;
