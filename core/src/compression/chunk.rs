//! compression/chunk.rs
//! Splits a payload into bounded chunks for sequential writes.
//!
//! Summary: the same plan drives the in-memory pipe and the temp-file codec.
//! Chunk boundaries are moved forward to the next char boundary so every
//! chunk is valid UTF-8 on its own.

use std::io::Write;

use crate::compression::types::ChunkPolicy;
use crate::constants::STRING_MAX_SIZE;

/// Chunk size derived from payload length and policy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChunkPlan {
    pub text_len: usize,
    pub chunk_size: usize,
}

impl ChunkPlan {
    pub fn new(text_len: usize, policy: ChunkPolicy) -> Self {
        if text_len == 0 {
            return Self { text_len, chunk_size: 0 };
        }

        let chunk_size = match policy {
            ChunkPolicy::Fixed(max) => text_len.min(max),
            ChunkPolicy::Proportional => {
                if text_len <= STRING_MAX_SIZE {
                    text_len
                } else {
                    text_len / STRING_MAX_SIZE
                }
            }
        };

        Self { text_len, chunk_size: chunk_size.max(1) }
    }

    pub fn is_empty(&self) -> bool {
        self.text_len == 0
    }
}

/// Iterator over the chunks of a text, in order.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    text: &'a str,
    pos: usize,
    size: usize,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.pos >= self.text.len() {
            return None;
        }

        let mut end = (self.pos + self.size).min(self.text.len());
        while !self.text.is_char_boundary(end) {
            end += 1;
        }

        let chunk = &self.text[self.pos..end];
        self.pos = end;
        Some(chunk)
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct ChunkWriter {
    policy: ChunkPolicy,
}

impl ChunkWriter {
    pub fn new(policy: ChunkPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ChunkPolicy {
        self.policy
    }

    pub fn plan(&self, text: &str) -> ChunkPlan {
        ChunkPlan::new(text.len(), self.policy)
    }

    pub fn chunks<'a>(&self, text: &'a str) -> Chunks<'a> {
        Chunks { text, pos: 0, size: self.plan(text).chunk_size }
    }

    /// Write every chunk of `text` to `w`, returning the number of chunks.
    pub fn write_to<W: Write>(&self, text: &str, w: &mut W) -> std::io::Result<usize> {
        let mut count = 0;
        for chunk in self.chunks(text) {
            w.write_all(chunk.as_bytes())?;
            count += 1;
        }
        tracing::trace!(chunks = count, bytes = text.len(), "chunked payload written");
        Ok(count)
    }
}
