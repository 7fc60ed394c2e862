use std::io;
use thiserror::Error;

use crate::constants::BYTES_BUFFER_SIZE;

/// How a payload is cut into sequential chunks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkPolicy {
    /// At most `n` bytes per chunk (rounded up to the next char boundary).
    Fixed(usize),
    /// Whole text when it fits the buffer threshold, otherwise
    /// `len / threshold` bytes per chunk. Chunks grow with the input.
    Proportional,
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        ChunkPolicy::Fixed(BYTES_BUFFER_SIZE)
    }
}

/// Malformed compressed input.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid gzip stream: {0}")]
    Gzip(io::Error),

    #[error("gzip stream is empty")]
    EmptyStream,

    #[error("decompressed text is not valid UTF-8")]
    InvalidUtf8,
}

#[derive(Debug, Error)]
pub enum CompressionError {
    /// Input could not be decoded. Never swallowed.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// A producer or consumer stage failed or panicked.
    #[error("{stage} task failed: {msg}")]
    Task { stage: &'static str, msg: String },

    /// Temp file or pipe I/O.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CompressionError {
    pub fn task(stage: &'static str, msg: impl Into<String>) -> Self {
        CompressionError::Task { stage, msg: msg.into() }
    }

    pub fn is_codec(&self) -> bool {
        matches!(self, CompressionError::Codec(_))
    }
}
