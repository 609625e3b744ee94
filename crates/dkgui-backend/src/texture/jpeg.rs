use std::path::Path;

use super::TextureError;

/// Tightly packed RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decodes a baseline or progressive JPEG to RGBA8.
pub fn decode_jpeg(bytes: &[u8]) -> Result<DecodedImage, TextureError> {
    let rgba = image::load_from_memory_with_format(bytes, image::ImageFormat::Jpeg)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage {
        pixels: rgba.into_raw(),
        width,
        height,
    })
}

/// Reads and decodes a JPEG file.
pub fn load_jpeg(path: &Path) -> Result<DecodedImage, TextureError> {
    let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_jpeg(&bytes)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{DynamicImage, Rgb, RgbImage};

    use super::*;

    fn encoded(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([200, 40, 40]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Jpeg)
            .unwrap();
        bytes
    }

    #[test]
    fn decodes_to_opaque_rgba() {
        let decoded = decode_jpeg(&encoded(16, 8)).unwrap();
        assert_eq!((decoded.width, decoded.height), (16, 8));
        assert_eq!(decoded.pixels.len(), 16 * 8 * 4);
        assert!(decoded.pixels.chunks_exact(4).all(|px| px[3] == 255));
        // Lossy, but a flat color stays close.
        assert!(decoded.pixels[0].abs_diff(200) < 8);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            decode_jpeg(b"not a jpeg"),
            Err(TextureError::Decode(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            load_jpeg(Path::new("/nonexistent/dkgui/background.jpg")),
            Err(TextureError::Io { .. })
        ));
    }
}
