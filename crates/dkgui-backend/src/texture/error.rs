use std::path::PathBuf;

use thiserror::Error;

use crate::device::DeviceError;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("texture size {width}x{height} is empty")]
    EmptyImage { width: u32, height: u32 },

    /// Pixel data is neither one byte (alpha) nor four bytes (RGBA) per pixel.
    #[error("{len} bytes of pixel data do not match a {width}x{height} alpha or RGBA image")]
    InvalidPixelData { len: usize, width: u32, height: u32 },

    #[error("descriptor table is full ({capacity} textures)")]
    TableFull { capacity: u32 },

    #[error("descriptor index {index} outside table of {capacity}")]
    DescriptorOutOfRange { index: u32, capacity: u32 },

    #[error("failed to read image {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode JPEG")]
    Decode(#[from] image::ImageError),

    #[error(transparent)]
    Device(#[from] DeviceError),
}
