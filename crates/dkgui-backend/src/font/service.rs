use std::fmt;

/// Fonts the platform shares with every application.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SharedFontKind {
    Standard,
    /// Console button and icon glyphs in the private-use area.
    NintendoExt,
    ChineseSimplified,
}

impl fmt::Display for SharedFontKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Standard => "standard",
            Self::NintendoExt => "nintendo-ext",
            Self::ChineseSimplified => "chinese-simplified",
        })
    }
}

/// The platform font service.
pub trait FontService {
    type Error: std::error::Error + Send + Sync + 'static;

    /// TrueType data of a shared font. The data outlives the service handle.
    fn shared_font(&self, kind: SharedFontKind) -> Result<&[u8], Self::Error>;
}
