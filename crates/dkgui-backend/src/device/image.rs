use bitflags::bitflags;

use super::align::is_aligned;
use super::{DeviceError, MemBlock};

/// Pixel formats used by the backend.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// 8-bit single channel; font atlases uploaded as alpha.
    R8Unorm,
    Rgba8Unorm,
    /// Packed 24-bit depth + 8-bit stencil.
    Z24S8,
}

impl ImageFormat {
    #[inline]
    pub const fn bytes_per_pixel(self) -> u32 {
        match self {
            ImageFormat::R8Unorm => 1,
            ImageFormat::Rgba8Unorm | ImageFormat::Z24S8 => 4,
        }
    }

    /// Stable numeric code written into image descriptors.
    #[inline]
    pub const fn code(self) -> u32 {
        match self {
            ImageFormat::R8Unorm => 1,
            ImageFormat::Rgba8Unorm => 2,
            ImageFormat::Z24S8 => 3,
        }
    }
}

bitflags! {
    /// Usage flags of an image layout.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct ImageFlags: u32 {
        const USAGE_RENDER   = 1 << 0;
        const USAGE_PRESENT  = 1 << 1;
        const HW_COMPRESSION = 1 << 2;
        /// Image is sampled by shaders.
        const USAGE_SAMPLED  = 1 << 3;
    }
}

/// Input to `GpuDevice::image_layout`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ImageLayoutDesc {
    pub format: ImageFormat,
    pub flags: ImageFlags,
    pub width: u32,
    pub height: u32,
}

/// Storage requirements computed by the device for an image.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ImageLayout {
    pub desc: ImageLayoutDesc,
    /// Bytes of backing memory, before alignment.
    pub size: u32,
    /// Required alignment of the image's offset (a power of two).
    pub alignment: u32,
}

impl ImageLayout {
    /// Size rounded up to the image alignment; the stride between images
    /// packed back to back in one block.
    #[inline]
    pub fn aligned_size(&self) -> u32 {
        super::align(self.size, self.alignment)
    }
}

/// A 2D image bound to a byte range of a memory block.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Image {
    pub layout: ImageLayout,
    pub block: MemBlock,
    pub offset: u32,
}

impl Image {
    /// Binds `layout` to `block` at `offset`.
    ///
    /// The offset must honour the layout alignment.
    pub fn new(layout: ImageLayout, block: MemBlock, offset: u32) -> Result<Self, DeviceError> {
        if !is_aligned(offset, layout.alignment) {
            return Err(DeviceError::Misaligned {
                offset,
                alignment: layout.alignment,
            });
        }
        Ok(Self { layout, block, offset })
    }

    #[inline]
    pub fn format(&self) -> ImageFormat {
        self.layout.desc.format
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.layout.desc.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.layout.desc.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(alignment: u32) -> ImageLayout {
        ImageLayout {
            desc: ImageLayoutDesc {
                format: ImageFormat::Rgba8Unorm,
                flags: ImageFlags::USAGE_SAMPLED,
                width: 4,
                height: 4,
            },
            size: 64,
            alignment,
        }
    }

    #[test]
    fn image_rejects_misaligned_offset() {
        let block = MemBlock { id: 0, generation: 0 };
        assert!(Image::new(layout(0x200), block, 0x400).is_ok());
        assert_eq!(
            Image::new(layout(0x200), block, 0x10),
            Err(DeviceError::Misaligned { offset: 0x10, alignment: 0x200 })
        );
    }

    #[test]
    fn aligned_size_rounds_to_alignment() {
        assert_eq!(layout(0x200).aligned_size(), 0x200);
    }
}
