//! Fixed-function state and binding records carried by [`Command`](super::Command)s.

use super::MemBlock;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// A compiled shader program living at `offset` inside a code block.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Shader {
    pub stage: ShaderStage,
    pub block: MemBlock,
    pub offset: u32,
    /// Binary size in bytes.
    pub size: u32,
    /// Bytes consumed in the code block (size rounded to code alignment).
    pub aligned_size: u32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub near: f32,
    pub far: f32,
}

impl Viewport {
    #[inline]
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
            near: 0.0,
            far: 1.0,
        }
    }
}

/// Scissor rectangle in framebuffer pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Scissor {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Scissor {
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CullMode {
    None,
    Front,
    Back,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RasterizerState {
    pub cull_mode: CullMode,
}

impl Default for RasterizerState {
    fn default() -> Self {
        Self { cull_mode: CullMode::Back }
    }
}

/// Per-render-target blending switch.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ColorState {
    /// Bit `i` enables blending on render target `i`.
    pub blend_enable_mask: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ColorWriteState {
    /// RGBA write mask per render target, 4 bits each.
    pub masks: u32,
}

impl Default for ColorWriteState {
    fn default() -> Self {
        Self { masks: 0xFFFF_FFFF }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    InvSrcAlpha,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BlendState {
    pub color_src: BlendFactor,
    pub color_dst: BlendFactor,
    pub alpha_src: BlendFactor,
    pub alpha_dst: BlendFactor,
}

impl BlendState {
    /// Straight (non-premultiplied) alpha blending.
    pub const ALPHA: Self = Self {
        color_src: BlendFactor::SrcAlpha,
        color_dst: BlendFactor::InvSrcAlpha,
        alpha_src: BlendFactor::InvSrcAlpha,
        alpha_dst: BlendFactor::Zero,
    };
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct DepthStencilState {
    pub depth_test: bool,
    pub depth_write: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AttribFormat {
    Float32x2,
    Unorm8x4,
}

impl AttribFormat {
    #[inline]
    pub const fn size(self) -> u32 {
        match self {
            AttribFormat::Float32x2 => 8,
            AttribFormat::Unorm8x4 => 4,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexAttrib {
    pub buffer: u32,
    pub offset: u32,
    pub format: AttribFormat,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexBufferLayout {
    pub stride: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IndexFormat {
    Uint16,
    Uint32,
}

impl IndexFormat {
    #[inline]
    pub const fn size(self) -> u32 {
        match self {
            IndexFormat::Uint16 => 2,
            IndexFormat::Uint32 => 4,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Filter {
    Nearest,
    Linear,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WrapMode {
    Repeat,
    ClampToEdge,
}

/// Sampler parameters, written into a sampler descriptor.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Sampler {
    pub min_filter: Filter,
    pub mag_filter: Filter,
    pub wrap_u: WrapMode,
    pub wrap_v: WrapMode,
}

impl Sampler {
    pub const LINEAR_CLAMP: Self = Self {
        min_filter: Filter::Linear,
        mag_filter: Filter::Linear,
        wrap_u: WrapMode::ClampToEdge,
        wrap_v: WrapMode::ClampToEdge,
    };
}

/// Pair of (image descriptor index, sampler descriptor index) bound for sampling.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TextureBinding {
    pub image: u32,
    pub sampler: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Barrier {
    /// Wait for all in-flight fragment work to complete.
    Fragments,
    /// Wait for everything.
    Full,
}
