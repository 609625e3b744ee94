use std::convert::Infallible;
use std::path::Path;

use dkgui_backend::font::{FontService, SharedFontKind};

const KINDS: [SharedFontKind; 3] = [
    SharedFontKind::Standard,
    SharedFontKind::NintendoExt,
    SharedFontKind::ChineseSimplified,
];

/// Shared fonts for a host without the platform font service.
///
/// Reads `<kind>.ttf` from a directory, or carries small placeholder blobs
/// that the stand-in GUI never rasterizes.
pub struct DemoFonts {
    data: [Vec<u8>; 3],
}

impl DemoFonts {
    pub fn placeholder() -> Self {
        Self {
            data: KINDS.map(|kind| format!("placeholder {kind} font").into_bytes()),
        }
    }

    pub fn from_dir(dir: &Path) -> std::io::Result<Self> {
        let [standard, ext, chinese] = KINDS.map(|kind| dir.join(format!("{kind}.ttf")));
        Ok(Self {
            data: [
                std::fs::read(standard)?,
                std::fs::read(ext)?,
                std::fs::read(chinese)?,
            ],
        })
    }
}

impl FontService for DemoFonts {
    type Error = Infallible;

    fn shared_font(&self, kind: SharedFontKind) -> Result<&[u8], Infallible> {
        let index = match kind {
            SharedFontKind::Standard => 0,
            SharedFontKind::NintendoExt => 1,
            SharedFontKind::ChineseSimplified => 2,
        };
        Ok(&self.data[index])
    }
}
