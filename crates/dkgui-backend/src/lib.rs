//! dkgui backend crate.
//!
//! Renders immediate-mode GUI draw data on an explicit-memory console GPU:
//! owns the device-side resources (queue, swapchain, shader code, textures,
//! per-frame command and geometry buffers) and bridges pad/touch input back
//! to the GUI.

pub mod config;
pub mod coords;
pub mod core;
pub mod device;
pub mod font;
pub mod gui;
pub mod input;
pub mod logging;
pub mod render;
pub mod shader;
pub mod swapchain;
pub mod texture;
pub mod time;
