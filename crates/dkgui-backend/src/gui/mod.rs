//! Interface to the immediate-mode GUI library.
//!
//! The GUI owns widgets and layout; per frame it hands the backend a
//! [`DrawData`] and, through [`GuiIo`], receives display metrics, timing,
//! input events, system fonts and the font texture id.

mod draw;
mod io;
mod texture_id;

pub use draw::{
    DrawCmd, DrawData, DrawElements, DrawIdx, DrawList, DrawVert, MAX_VERTICES_PER_CMD,
};
pub use io::{
    BackendFlags, BackendInfo, FontAtlas, FontAtlasFlags, FontSource, GlyphRanges, GuiIo,
};
pub use texture_id::TextureId;
