use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::coords::Vec2;
use crate::device::{BufferRange, DeviceError, GpuContext, GpuDevice, MemBlock, MemBlockFlags, align};

// ── vertex stage ──────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct VertUniforms {
    pub proj: [[f32; 4]; 4],
}

impl VertUniforms {
    /// Orthographic projection mapping the display rectangle (top-left origin,
    /// +Y down) to clip space.
    pub fn ortho(display_pos: Vec2, display_size: Vec2) -> Self {
        let left = display_pos.x;
        let right = display_pos.x + display_size.x;
        let top = display_pos.y;
        let bottom = display_pos.y + display_size.y;
        let proj = Mat4::orthographic_rh(left, right, bottom, top, -1.0, 1.0);
        Self {
            proj: proj.to_cols_array_2d(),
        }
    }
}

// ── fragment stage ────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct FragUniforms {
    /// Non-zero when the bound texture is a single-channel alpha atlas.
    pub font: u32,
    pub _pad: [u32; 3], // 16-byte alignment
}

impl FragUniforms {
    #[inline]
    pub fn for_texture(is_alpha: bool) -> Self {
        Self {
            font: is_alpha as u32,
            _pad: [0; 3],
        }
    }
}

// ── block ─────────────────────────────────────────────────────────────────

/// One block holding both uniform buffers, each at a uniform-aligned offset.
///
/// Contents are only ever updated through push-constant commands, so the
/// values a draw observes follow command order rather than CPU timing.
#[derive(Debug)]
pub struct UniformBlock {
    block: MemBlock,
    vert: BufferRange,
    frag: BufferRange,
}

impl UniformBlock {
    pub fn create<D: GpuDevice>(gpu: &mut GpuContext<D>, size: u32) -> Result<Self, DeviceError> {
        let alignment = gpu.limits().uniform_buffer_alignment;
        let vert_size = size_of::<VertUniforms>() as u32;
        let frag_size = size_of::<FragUniforms>() as u32;
        let frag_offset = align(vert_size, alignment);
        let needed = frag_offset + frag_size;

        let (block, _) = gpu.create_block(size.max(needed), MemBlockFlags::STREAMING)?;
        Ok(Self {
            block,
            vert: BufferRange::new(block, 0, vert_size),
            frag: BufferRange::new(block, frag_offset, frag_size),
        })
    }

    #[inline]
    pub fn vert(&self) -> BufferRange {
        self.vert
    }

    #[inline]
    pub fn frag(&self) -> BufferRange {
        self.frag
    }

    pub fn destroy<D: GpuDevice>(self, gpu: &mut GpuContext<D>) -> Result<(), DeviceError> {
        gpu.destroy_block(self.block)
    }
}
