//! compression/mod.rs
//! Payload codec: gzip + standard base64.
//!
//! - `stream`: in-memory producer/consumer pipeline over a bounded pipe
//! - `file`: temp-file staging for very large payloads
//! - `chunk`: chunk planning shared by both paths

pub mod types;
pub mod chunk;
pub mod pipe;
pub mod stream;
pub mod file;

pub use types::*;
pub use chunk::{ChunkPlan, ChunkWriter, Chunks};
pub use pipe::{byte_pipe, PipeReader, PipeWriter};
pub use stream::{StreamCompressor, StreamDecompressor};
pub use file::{read_and_remove, ChunkedFileCodec};
