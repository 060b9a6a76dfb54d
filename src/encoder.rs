//! [`FrameEncoder`] backed by the `image` crate.
//!
//! The requested format string is looked up as a file extension
//! (`png`, `jpg`, `jpeg`, `bmp`, `webp`, `tiff`, …). Unknown formats and
//! encoder errors yield `None`, which the sampler treats as a skipped frame.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

use crate::source::FrameEncoder;

/// Encodes [`DynamicImage`] frames with the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageEncoder;

impl ImageEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a format identifier to an `image` format.
    pub fn image_format(format: &str) -> Option<ImageFormat> {
        ImageFormat::from_extension(format.trim_start_matches('.'))
    }
}

impl FrameEncoder<DynamicImage> for ImageEncoder {
    fn encode(&self, frame: &DynamicImage, format: &str) -> Option<Vec<u8>> {
        let image_format = Self::image_format(format)?;

        // JPEG cannot carry alpha.
        let converted;
        let frame = if image_format == ImageFormat::Jpeg && frame.color().has_alpha() {
            converted = DynamicImage::ImageRgb8(frame.to_rgb8());
            &converted
        } else {
            frame
        };

        let mut buffer = Cursor::new(Vec::new());
        match frame.write_to(&mut buffer, image_format) {
            Ok(()) => Some(buffer.into_inner()),
            Err(error) => {
                log::debug!("Encoding as {format} failed: {error}");
                None
            }
        }
    }
}
