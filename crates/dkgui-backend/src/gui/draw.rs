use bytemuck::{Pod, Zeroable};

use crate::coords::{ClipRect, ColorRgba, Vec2};

use super::TextureId;

/// GUI vertex layout (20 bytes):
///
///  offset  0  pos  [f32; 2]
///  offset  8  uv   [f32; 2]
///  offset 16  col  [u8; 4]   normalized
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct DrawVert {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
    pub col: [u8; 4],
}

/// Indices are always 16-bit.
pub type DrawIdx = u16;

/// Vertices one command can address through 16-bit indices.
pub const MAX_VERTICES_PER_CMD: usize = DrawIdx::MAX as usize + 1;

/// One indexed-draw sub-range of a draw list.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawElements {
    pub clip_rect: ClipRect,
    pub texture_id: TextureId,
    pub elem_count: u32,
    /// First index, relative to the owning list's index array.
    pub idx_offset: u32,
    /// Added to every index, relative to the owning list's vertex array.
    pub vtx_offset: u32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DrawCmd {
    Elements(DrawElements),
    /// Ask the renderer to re-emit its full render state.
    ResetRenderState,
}

/// Vertices, indices and commands of one GUI window/layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub vertices: Vec<DrawVert>,
    pub indices: Vec<DrawIdx>,
    pub commands: Vec<DrawCmd>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an axis-aligned textured quad.
    ///
    /// Merges into the previous command when it uses the same texture and
    /// clip rect, as the GUI library does. Once the current command's vertex
    /// window would exceed [`MAX_VERTICES_PER_CMD`], a new command starts with
    /// `vtx_offset` at the quad's first vertex.
    pub fn add_quad(
        &mut self,
        min: Vec2,
        max: Vec2,
        uv_min: Vec2,
        uv_max: Vec2,
        color: ColorRgba,
        clip_rect: ClipRect,
        texture_id: TextureId,
    ) {
        let first_vertex = self.vertices.len();
        let mut vtx_offset = self.current_vtx_offset();
        let split = first_vertex - vtx_offset + 4 > MAX_VERTICES_PER_CMD;
        if split {
            vtx_offset = first_vertex;
        }
        let base = (first_vertex - vtx_offset) as DrawIdx;

        let col = color.to_unorm8();
        let corners = [
            ([min.x, min.y], [uv_min.x, uv_min.y]),
            ([max.x, min.y], [uv_max.x, uv_min.y]),
            ([max.x, max.y], [uv_max.x, uv_max.y]),
            ([min.x, max.y], [uv_min.x, uv_max.y]),
        ];
        self.vertices
            .extend(corners.iter().map(|&(pos, uv)| DrawVert { pos, uv, col }));
        let idx_offset = self.indices.len() as u32;
        self.indices.extend([0u16, 1, 2, 0, 2, 3].map(|i| base + i));

        if !split {
            if let Some(DrawCmd::Elements(last)) = self.commands.last_mut() {
                if last.texture_id == texture_id && last.clip_rect == clip_rect {
                    last.elem_count += 6;
                    return;
                }
            }
        }
        self.commands.push(DrawCmd::Elements(DrawElements {
            clip_rect,
            texture_id,
            elem_count: 6,
            idx_offset,
            vtx_offset: vtx_offset as u32,
        }));
    }

    /// Vertex base of the most recent draw command, or 0 for a fresh list.
    fn current_vtx_offset(&self) -> usize {
        self.commands
            .iter()
            .rev()
            .find_map(|cmd| match cmd {
                DrawCmd::Elements(e) => Some(e.vtx_offset as usize),
                DrawCmd::ResetRenderState => None,
            })
            .unwrap_or(0)
    }
}

/// Everything the GUI produced for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawData {
    /// Top-left of the displayed area in GUI coordinates.
    pub display_pos: Vec2,
    pub display_size: Vec2,
    pub framebuffer_scale: Vec2,
    pub lists: Vec<DrawList>,
}

impl DrawData {
    pub fn new(display_size: Vec2) -> Self {
        Self {
            display_pos: Vec2::zero(),
            display_size,
            framebuffer_scale: Vec2::splat(1.0),
            lists: Vec::new(),
        }
    }

    pub fn total_vtx_count(&self) -> usize {
        self.lists.iter().map(|l| l.vertices.len()).sum()
    }

    pub fn total_idx_count(&self) -> usize {
        self.lists.iter().map(|l| l.indices.len()).sum()
    }
}
