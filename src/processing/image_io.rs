//! Conversion between image file bytes and RGBA pixel buffers.

use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

use crate::error::CodecError;

/// Decode any format the `image` crate understands into an RGBA8 buffer.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, CodecError> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// Encode a pixel buffer as PNG.
///
/// Result images must stay lossless, otherwise the LSB plane is destroyed.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, CodecError> {
    let mut output_bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut output_bytes), ImageFormat::Png)?;
    Ok(output_bytes)
}
