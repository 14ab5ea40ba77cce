//! # Image Processing and Steganography
//!
//! The single-image side of the system: how much one carrier holds, and how one
//! chunk is embedded into and extracted from it.
//!
//! The multi-carrier layer only talks to the [`ChunkCodec`] trait, so a different
//! embedding scheme can be plugged in without touching planning or reassembly.

pub mod capacity;
pub mod image_io;
pub mod steganography;

use image::RgbaImage;

use crate::error::CodecError;

/// Embeds one length-prefixed chunk into one carrier, and extracts it again.
///
/// Implementations must be self-describing: `extract` recovers the chunk length
/// from the image alone, because decode has no access to the encode-time plan.
pub trait ChunkCodec: Send + Sync + 'static {
    /// Payload bytes `image` can hold, after the codec's own header overhead.
    fn capacity(&self, image: &RgbaImage) -> usize;

    /// Embed `chunk`, failing if it exceeds the recomputed capacity.
    fn embed(&self, image: RgbaImage, chunk: &[u8]) -> Result<RgbaImage, CodecError>;

    /// Read the header and return exactly the chunk it declares.
    fn extract(&self, image: &RgbaImage) -> Result<Vec<u8>, CodecError>;
}

// Re-export main items for convenience
pub use capacity::estimate_capacity;
pub use image_io::{decode_image, encode_png};
pub use steganography::{embed_chunk, extract_chunk, LsbCodec};
