//! Lifecycle orchestration.
//!
//! [`Backend`] ties the device, shaders, swapchain, textures, frame recorder
//! and input bridge together behind the calls a host loop makes.

mod backend;

pub use backend::{Backend, RENDERER_NAME};
