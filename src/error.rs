//! # Error Types
//!
//! Every multi-carrier operation is all-or-nothing, so failures are reported as a
//! single [`StegError`] carrying enough context (carrier index, required vs.
//! available capacity) to print a precise message.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of the single-image codec on one carrier.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The carrier bytes could not be decoded, or the result could not be encoded.
    #[error("image codec failed: {0}")]
    Image(#[from] image::ImageError),

    /// The chunk does not fit into the carrier's recomputed capacity.
    #[error("chunk of {chunk} bytes exceeds carrier capacity of {capacity} bytes")]
    ChunkTooLarge { chunk: usize, capacity: usize },

    /// The embedded header declares more bytes than the carrier could ever hold.
    #[error("embedded header declares {declared} bytes but carrier holds at most {capacity}")]
    HeaderOutOfRange { declared: usize, capacity: usize },
}

/// Top-level error for encode/decode across a carrier set.
#[derive(Debug, Error)]
pub enum StegError {
    /// Combined carrier capacity is smaller than the payload.
    #[error("not enough capacity: payload needs {required} bytes, carriers hold {available} bytes")]
    Capacity { required: usize, available: usize },

    /// The codec failed on one carrier; the whole operation is aborted.
    #[error("carrier #{carrier}: {source}")]
    Codec {
        carrier: usize,
        #[source]
        source: CodecError,
    },

    /// Encode was given a different number of result slots than carriers.
    #[error("carrier and result counts must be equal (carriers: {carriers}, results: {results})")]
    ResultCountMismatch { carriers: usize, results: usize },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A per-carrier worker task did not complete.
    #[error("worker for carrier #{carrier} failed: {reason}")]
    Worker { carrier: usize, reason: String },

    /// A background task covering the whole carrier set did not complete.
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl StegError {
    /// Tag a codec failure with the index of the carrier it happened on.
    pub fn codec(carrier: usize, source: CodecError) -> Self {
        Self::Codec { carrier, source }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StegError>;
