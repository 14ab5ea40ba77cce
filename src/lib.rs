//! # Stegify
//!
//! Hides a binary payload across several cover images with LSB steganography
//! and recovers it from the same images, fed back in the same order.
//!
//! ## Layers
//!
//! - [`processing`]: single-image capacity, LSB embed/extract and image I/O
//! - [`split`]: chunk planning, multi-carrier orchestration and reassembly
//! - [`service`]: byte- and file-level entry points used by the binaries
//! - [`common`]: configuration and logging
//!
//! There is no checksum or chunk index in the carriers. Carriers supplied in a
//! different order decode without error into a wrong payload.

pub mod common;
pub mod error;
pub mod processing;
pub mod service;
pub mod split;

pub use error::{CodecError, Result, StegError};
pub use processing::{ChunkCodec, LsbCodec};
pub use service::StegService;
pub use split::{plan, Carrier, ChunkAssignment, EncodingPlan, MultiCarrier};
