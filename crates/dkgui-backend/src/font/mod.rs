//! Shared system fonts.
//!
//! The platform font service hands out TrueType blobs that live for the whole
//! process; [`load_system_fonts`] registers them with the GUI so its atlas
//! covers Latin, the console's button glyphs and simplified Chinese.

mod error;
mod loader;
mod service;

pub use error::FontError;
pub use loader::{EXTENDED_GLYPHS, SYSTEM_FONT_SIZE, load_system_fonts};
pub use service::{FontService, SharedFontKind};
