use crate::gui::{FontAtlasFlags, FontSource, GlyphRanges, GuiIo};

use super::{FontError, FontService, SharedFontKind};

/// Pixel height every system font is rasterized at.
pub const SYSTEM_FONT_SIZE: f32 = 20.0;

/// Private-use codepoints of the console's button glyphs.
pub const EXTENDED_GLYPHS: &[(u32, u32)] = &[(0xE000, 0xE152)];

/// Registration order: the first font is the base, the rest merge into it.
const SYSTEM_FONTS: [(SharedFontKind, GlyphRanges); 3] = [
    (SharedFontKind::Standard, GlyphRanges::Default),
    (SharedFontKind::NintendoExt, GlyphRanges::Custom(EXTENDED_GLYPHS)),
    (SharedFontKind::ChineseSimplified, GlyphRanges::ChineseSimplifiedCommon),
];

/// Fetches every shared font and registers them with `io` as one merged font.
///
/// Nothing is registered unless all fonts are available.
pub fn load_system_fonts<F: FontService>(
    fonts: &F,
    io: &mut impl GuiIo,
) -> Result<(), FontError> {
    let mut sources = Vec::with_capacity(SYSTEM_FONTS.len());
    for (kind, glyph_ranges) in SYSTEM_FONTS {
        let data = fonts
            .shared_font(kind)
            .map_err(|e| FontError::Unavailable {
                kind,
                source: Box::new(e),
            })?;
        if data.is_empty() {
            return Err(FontError::Empty(kind));
        }
        log::debug!("shared font {kind}: {} bytes", data.len());
        sources.push(FontSource {
            data,
            size_px: SYSTEM_FONT_SIZE,
            glyph_ranges,
            merge: !sources.is_empty(),
        });
    }

    for source in sources {
        io.add_font_from_memory(source);
    }
    io.set_font_atlas_flags(FontAtlasFlags::NO_POWER_OF_TWO_HEIGHT);
    Ok(())
}
