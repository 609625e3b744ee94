//! Backend configuration.

use std::path::PathBuf;

use crate::coords::ColorRgba;
use crate::shader::ShaderCode;

/// Number of swapchain images and, with them, per-frame resource slots.
pub const SWAPCHAIN_SLOTS: usize = 2;

/// Initialization parameters for [`Backend`](crate::core::Backend).
///
/// The display is fixed for the lifetime of the backend; there is no resize
/// path. Memory sizes are rounded up to the device block alignment where
/// noted.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub display_width: u32,
    pub display_height: u32,

    /// Color the framebuffer is cleared to at the start of every frame.
    pub clear_color: ColorRgba,

    /// Code memory for the shader pair. Must be block aligned.
    pub code_mem_size: u32,

    /// Size of each command memory chunk per frame slot. Rounded up.
    pub cmd_mem_size: u32,

    /// Size of the uniform memory block. Rounded up.
    pub uniform_mem_size: u32,

    /// Smallest vertex or index block ever allocated. Rounded up.
    pub min_buffer_size: u32,

    /// Maximum number of live textures, font atlas included.
    pub descriptor_capacity: u32,

    pub vertex_shader: ShaderCode,
    pub fragment_shader: ShaderCode,

    /// Optional JPEG uploaded at startup as a user texture.
    pub background: Option<PathBuf>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            display_width: 1280,
            display_height: 720,
            clear_color: ColorRgba::new(0.125, 0.294, 0.478, 1.0),
            code_mem_size: 64 * 1024,
            cmd_mem_size: 16 * 1024,
            uniform_mem_size: 4 * 1024,
            min_buffer_size: 64 * 1024,
            descriptor_capacity: 16,
            vertex_shader: ShaderCode::File(PathBuf::from("romfs:/shaders/imgui_vsh.dksh")),
            fragment_shader: ShaderCode::File(PathBuf::from("romfs:/shaders/imgui_fsh.dksh")),
            background: None,
        }
    }
}
