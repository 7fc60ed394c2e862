//! telemetry/counters.rs
//! Mutable counters collected while a payload moves through the codec.
//!
//! Summary: converted into an immutable `TelemetrySnapshot` at call end.
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub chunks: u64,
    pub bytes_plaintext: u64,
    pub bytes_compressed: u64,
    pub bytes_encoded: u64,
}

impl TelemetryCounters {
    /// Record chunks pushed through the pipe (or staged to disk).
    pub fn add_chunks(&mut self, chunks: usize) {
        self.chunks += chunks as u64;
    }

    pub fn add_plaintext(&mut self, len: usize) {
        self.bytes_plaintext += len as u64;
    }

    /// Raw gzip bytes, before base64.
    pub fn add_compressed(&mut self, len: usize) {
        self.bytes_compressed += len as u64;
    }

    /// Base64 text length.
    pub fn add_encoded(&mut self, len: usize) {
        self.bytes_encoded += len as u64;
    }

    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.chunks += other.chunks;
        self.bytes_plaintext += other.bytes_plaintext;
        self.bytes_compressed += other.bytes_compressed;
        self.bytes_encoded += other.bytes_encoded;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
