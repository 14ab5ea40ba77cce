//! # LSB Steganography Implementation
//!
//! Embeds one chunk of bytes into one carrier image using Least Significant Bit
//! (LSB) steganography, and extracts it again.
//!
//! ## Algorithm
//!
//! The chunk is hidden in the least significant bit of each color channel
//! (R, G, B) of the image pixels. The alpha channel is never touched.
//!
//! ### Frame Layout
//! ```text
//! [4 bytes chunk length, big-endian][chunk bytes]
//! ```
//!
//! ### Encoding Process
//! 1. Prepend the 4-byte length header to the chunk
//! 2. For each bit of the frame (MSB first):
//!    - Take the next channel slot (R → G → B → next pixel, row-major)
//!    - Clear its LSB and set it to the data bit
//! 3. Pixels past the end of the frame keep their original values
//!
//! ### Decoding Process
//! 1. Read the first 32 bits to get the chunk length
//! 2. Reject lengths larger than the carrier could hold (corrupt or foreign image)
//! 3. Read the next `length * 8` bits back into bytes

use image::RgbaImage;

use crate::error::CodecError;
use crate::processing::capacity::{self, HEADER_BITS, HEADER_BYTES};
use crate::processing::ChunkCodec;

/// Byte index in the raw RGBA buffer of the `bit`-th LSB slot.
fn lsb_slot(bit: usize) -> usize {
    (bit / capacity::CHANNELS_PER_PIXEL) * 4 + bit % capacity::CHANNELS_PER_PIXEL
}

/// Carriers too small for the length header always hold an empty chunk.
fn is_headerless(image: &RgbaImage) -> bool {
    let (width, height) = image.dimensions();
    capacity::usable_bits(width, height) < HEADER_BITS
}

/// Read `count` bytes starting at frame byte `first_byte`.
fn read_bytes(buffer: &[u8], first_byte: usize, count: usize) -> Vec<u8> {
    (first_byte..first_byte + count)
        .map(|byte_index| {
            (0..8).fold(0u8, |byte, bit_index| {
                (byte << 1) | (buffer[lsb_slot(byte_index * 8 + bit_index)] & 1)
            })
        })
        .collect()
}

/// Embed `chunk` into `image`, returning the modified image.
///
/// A zero-length chunk is valid: only the header is written. On an image with
/// fewer than 32 usable bits nothing is written at all and the image comes back
/// unchanged; [`extract_chunk`] reads such an image as an empty chunk.
///
/// # Errors
/// [`CodecError::ChunkTooLarge`] if the chunk exceeds the recomputed capacity
pub fn embed_chunk(mut image: RgbaImage, chunk: &[u8]) -> Result<RgbaImage, CodecError> {
    let capacity = capacity::estimate_capacity(&image);
    if chunk.len() > capacity {
        return Err(CodecError::ChunkTooLarge {
            chunk: chunk.len(),
            capacity,
        });
    }
    if is_headerless(&image) {
        return Ok(image);
    }

    // capacity is capped at u32::MAX, so this cannot truncate
    let header = (chunk.len() as u32).to_be_bytes();
    let buffer: &mut [u8] = &mut image;

    for (byte_index, byte) in header.iter().chain(chunk).enumerate() {
        for bit_index in 0..8 {
            let bit = (byte >> (7 - bit_index)) & 1;
            let slot = lsb_slot(byte_index * 8 + bit_index);
            buffer[slot] = (buffer[slot] & 0xFE) | bit;
        }
    }

    Ok(image)
}

/// Extract the chunk embedded in `image` by [`embed_chunk`].
///
/// Images with fewer than 32 usable bits carry no header and yield an empty chunk.
///
/// # Errors
/// [`CodecError::HeaderOutOfRange`] if the header declares more bytes than the
/// image can hold, which means the carrier was never encoded, was re-compressed,
/// or was resized in transit
pub fn extract_chunk(image: &RgbaImage) -> Result<Vec<u8>, CodecError> {
    if is_headerless(image) {
        return Ok(Vec::new());
    }

    let buffer: &[u8] = image;
    let header = read_bytes(buffer, 0, HEADER_BYTES);
    let declared = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;

    let capacity = capacity::estimate_capacity(image);
    if declared > capacity {
        return Err(CodecError::HeaderOutOfRange { declared, capacity });
    }

    Ok(read_bytes(buffer, HEADER_BYTES, declared))
}

/// The LSB codec as a [`ChunkCodec`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LsbCodec;

impl ChunkCodec for LsbCodec {
    fn capacity(&self, image: &RgbaImage) -> usize {
        capacity::estimate_capacity(image)
    }

    fn embed(&self, image: RgbaImage, chunk: &[u8]) -> Result<RgbaImage, CodecError> {
        embed_chunk(image, chunk)
    }

    fn extract(&self, image: &RgbaImage) -> Result<Vec<u8>, CodecError> {
        extract_chunk(image)
    }
}
