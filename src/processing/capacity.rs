//! # Carrier Capacity
//!
//! How many payload bytes fit into one carrier image.
//!
//! Each pixel contributes one bit in each of its R, G and B channels, so an
//! image has `width * height * 3` usable bits. The first 32 of those bits hold
//! the carrier's own chunk-length header, which leaves
//! `floor(bits / 8) - 4` bytes for the chunk itself (never negative).
//!
//! Example: an 800x600 image holds 179 996 payload bytes.

use image::RgbaImage;

/// Color channels carrying one payload bit per pixel (R, G, B; alpha is skipped).
pub const CHANNELS_PER_PIXEL: usize = 3;

/// Size of the big-endian `u32` chunk-length header written into every carrier.
pub const HEADER_BYTES: usize = 4;

pub const HEADER_BITS: usize = HEADER_BYTES * 8;

/// Number of LSB slots an image of the given size offers.
pub fn usable_bits(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS_PER_PIXEL
}

/// Payload capacity in bytes for an image of the given size.
///
/// Capped at `u32::MAX` because the length header is 32 bits wide.
pub fn capacity_for_dimensions(width: u32, height: u32) -> usize {
    (usable_bits(width, height) / 8)
        .saturating_sub(HEADER_BYTES)
        .min(u32::MAX as usize)
}

/// Maximum number of payload bytes that can be embedded in `image`.
///
/// Pure function of the image geometry; pixel values are irrelevant.
pub fn estimate_capacity(image: &RgbaImage) -> usize {
    let (width, height) = image.dimensions();
    capacity_for_dimensions(width, height)
}
