use bitflags::bitflags;

use crate::coords::Vec2;
use crate::input::EventSink;

use super::TextureId;

bitflags! {
    /// Capabilities the backend advertises to the GUI library.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct BackendFlags: u32 {
        const HAS_GAMEPAD             = 1 << 0;
        /// Draw commands may use `vtx_offset`; 16-bit indices suffice for large lists.
        const RENDERER_HAS_VTX_OFFSET = 1 << 1;
        const IS_TOUCH_SCREEN         = 1 << 2;
        const NAV_ENABLE_GAMEPAD      = 1 << 3;
    }
}

bitflags! {
    /// Build options for the GUI's font atlas.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct FontAtlasFlags: u32 {
        /// Keep the atlas height at what the glyphs need instead of rounding up.
        const NO_POWER_OF_TWO_HEIGHT = 1 << 0;
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BackendInfo {
    pub renderer_name: &'static str,
    pub flags: BackendFlags,
}

/// Codepoints a font contributes to the atlas.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GlyphRanges {
    /// Basic Latin and Latin-1 supplement.
    Default,
    /// Common simplified Chinese ideographs, plus the default ranges.
    ChineseSimplifiedCommon,
    /// Inclusive codepoint ranges.
    Custom(&'static [(u32, u32)]),
}

/// A TrueType font handed to the GUI's atlas. The data is borrowed; the GUI
/// copies what it needs before the atlas is built.
#[derive(Debug, Copy, Clone)]
pub struct FontSource<'a> {
    pub data: &'a [u8],
    pub size_px: f32,
    pub glyph_ranges: GlyphRanges,
    /// Add the glyphs to the previously added font instead of a new one.
    pub merge: bool,
}

/// 8-bit alpha font atlas produced by the GUI's font rasterizer.
#[derive(Debug, Copy, Clone)]
pub struct FontAtlas<'a> {
    pub pixels: &'a [u8],
    pub width: u32,
    pub height: u32,
}

/// The GUI library's IO surface, as seen by the backend.
pub trait GuiIo: EventSink {
    fn set_backend_info(&mut self, info: BackendInfo);

    fn set_display_size(&mut self, size: Vec2, framebuffer_scale: Vec2);

    fn set_delta_time(&mut self, dt: f32);

    fn add_font_from_memory(&mut self, font: FontSource<'_>);

    fn set_font_atlas_flags(&mut self, flags: FontAtlasFlags);

    /// Builds (if needed) and returns the font atlas pixels.
    fn font_atlas(&mut self) -> FontAtlas<'_>;

    /// Stores the texture the GUI must reference when drawing text.
    fn set_font_texture(&mut self, id: TextureId);
}
