/// Opaque texture reference carried by GUI draw commands.
///
/// The upper 16 bits hold a tag so that arbitrary integers the GUI may carry
/// (e.g. a default of zero) are not mistaken for descriptor slots; the lower
/// 32 bits hold the descriptor-table index.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct TextureId(u64);

const TAG: u64 = 0x646B << 48;
const TAG_MASK: u64 = 0xFFFF << 48;
const INDEX_MASK: u64 = 0xFFFF_FFFF;

impl TextureId {
    /// The id of no texture.
    pub const NONE: Self = Self(0);

    #[inline]
    pub const fn from_descriptor_index(index: u32) -> Self {
        Self(TAG | index as u64)
    }

    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Decodes the descriptor index, or `None` if this id was not issued by
    /// the backend.
    #[inline]
    pub fn descriptor_index(self) -> Option<u32> {
        if self.0 & TAG_MASK != TAG || self.0 & !(TAG_MASK | INDEX_MASK) != 0 {
            return None;
        }
        Some((self.0 & INDEX_MASK) as u32)
    }
}
