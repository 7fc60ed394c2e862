//! compression/stream.rs
//! Streaming gzip + base64 codec over a two-stage pipeline.
//!
//! Each call spawns exactly two scoped threads joined by a bounded byte pipe:
//! - producer: writes the payload into the pipe in chunks
//! - consumer: runs the gzip encoder/decoder over the other end
//!
//! The caller blocks until both join. There is no internal timeout; a caller
//! that needs one must wrap the call.

use std::borrow::Cow;
use std::io::{self, Read, Write};
use std::thread::{self, ScopedJoinHandle};
use std::time::{Duration, Instant};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::compression::chunk::ChunkWriter;
use crate::compression::pipe::byte_pipe;
use crate::compression::types::{CodecError, CompressionError};
use crate::config::CodecConfig;
use crate::constants::BYTES_BUFFER_SIZE;
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};

// ============================================================
// Compressor
// ============================================================
#[derive(Debug, Clone)]
pub struct StreamCompressor {
    chunker: ChunkWriter,
    pipe_depth: usize,
}

impl Default for StreamCompressor {
    fn default() -> Self {
        Self::new(&CodecConfig::default())
    }
}

impl StreamCompressor {
    pub fn new(config: &CodecConfig) -> Self {
        Self {
            chunker: ChunkWriter::new(config.chunk_policy),
            pipe_depth: config.pipe_depth,
        }
    }

    /// gzip + base64. Empty input is returned unchanged.
    pub fn compress(&self, text: &str) -> Result<String, CompressionError> {
        self.compress_with_telemetry(text).map(|(encoded, _)| encoded)
    }

    pub fn compress_with_telemetry(
        &self,
        text: &str,
    ) -> Result<(String, TelemetrySnapshot), CompressionError> {
        let mut counters = TelemetryCounters::default();
        let mut timer = TelemetryTimer::new();

        if text.is_empty() {
            timer.finish();
            return Ok((String::new(), TelemetrySnapshot::from(&counters, &timer)));
        }

        tracing::debug!(bytes = text.len(), plan = ?self.chunker.plan(text), "compress pipeline start");
        let (writer, reader) = byte_pipe(self.pipe_depth);

        let (produced, consumed) = thread::scope(|scope| {
            // ---- Producer ----
            let producer = scope.spawn(move || -> Result<(usize, Duration), CompressionError> {
                let start = Instant::now();
                let mut writer = writer;
                let chunks = self.chunker.write_to(text, &mut writer)?;
                drop(writer); // EOF for the consumer
                Ok((chunks, start.elapsed()))
            });

            // ---- Consumer ----
            let consumer = scope.spawn(move || -> Result<(Vec<u8>, Duration), CompressionError> {
                let start = Instant::now();
                let mut reader = reader;
                let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
                io::copy(&mut reader, &mut encoder)?;
                let compressed = encoder.finish()?;
                Ok((compressed, start.elapsed()))
            });

            (join_stage("producer", producer), join_stage("consumer", consumer))
        });

        let ((chunks, chunk_time), (compressed, compress_time)) = settle(produced, consumed)?;
        counters.add_chunks(chunks);
        counters.add_plaintext(text.len());
        counters.add_compressed(compressed.len());
        timer.add_stage_time(Stage::Chunk, chunk_time);
        timer.add_stage_time(Stage::Compress, compress_time);

        let encoded = timer.time(Stage::Encode, || STANDARD.encode(&compressed));
        counters.add_encoded(encoded.len());
        timer.finish();

        let snapshot = TelemetrySnapshot::from(&counters, &timer);
        tracing::debug!(
            chunks = snapshot.chunks,
            compressed = snapshot.bytes_compressed,
            ratio = snapshot.compression_ratio,
            "compress pipeline done"
        );
        Ok((encoded, snapshot))
    }
}

// ============================================================
// Decompressor
// ============================================================
#[derive(Debug, Clone)]
pub struct StreamDecompressor {
    pipe_depth: usize,
}

impl Default for StreamDecompressor {
    fn default() -> Self {
        Self::new(&CodecConfig::default())
    }
}

impl StreamDecompressor {
    pub fn new(config: &CodecConfig) -> Self {
        Self { pipe_depth: config.pipe_depth }
    }

    /// base64 + gunzip. Empty input is returned unchanged; malformed input
    /// fails with `CompressionError::Codec`.
    pub fn decompress(&self, text: &str) -> Result<String, CompressionError> {
        self.decompress_with_telemetry(text).map(|(plain, _)| plain)
    }

    pub fn decompress_with_telemetry(
        &self,
        text: &str,
    ) -> Result<(String, TelemetrySnapshot), CompressionError> {
        let mut counters = TelemetryCounters::default();
        let mut timer = TelemetryTimer::new();

        if text.is_empty() {
            timer.finish();
            return Ok((String::new(), TelemetrySnapshot::from(&counters, &timer)));
        }

        counters.add_encoded(text.len());
        let raw = timer.time(Stage::Decode, || decode_base64(text))?;
        counters.add_compressed(raw.len());

        tracing::debug!(bytes = raw.len(), "decompress pipeline start");
        let (writer, reader) = byte_pipe(self.pipe_depth);
        let raw = raw.as_slice();

        let (produced, consumed) = thread::scope(|scope| {
            // ---- Producer ----
            let producer = scope.spawn(move || -> Result<(usize, Duration), CompressionError> {
                let start = Instant::now();
                let mut writer = writer;
                let mut chunks = 0;
                for chunk in raw.chunks(BYTES_BUFFER_SIZE) {
                    writer.write_all(chunk)?;
                    chunks += 1;
                }
                drop(writer);
                Ok((chunks, start.elapsed()))
            });

            // ---- Consumer ----
            let consumer = scope.spawn(move || -> Result<(Vec<u8>, Duration), CompressionError> {
                let start = Instant::now();
                // Concatenated members decode as one stream.
                let mut decoder = MultiGzDecoder::new(reader);
                let mut plain = Vec::new();
                decoder.read_to_end(&mut plain).map_err(CodecError::Gzip)?;

                // Drain anything past the last member so the producer never
                // blocks on a full pipe.
                let mut rest = decoder.into_inner();
                io::copy(&mut rest, &mut io::sink())?;
                Ok((plain, start.elapsed()))
            });

            (join_stage("producer", producer), join_stage("consumer", consumer))
        });

        let ((chunks, chunk_time), (plain, decompress_time)) = settle(produced, consumed)?;
        counters.add_chunks(chunks);
        counters.add_plaintext(plain.len());
        timer.add_stage_time(Stage::Chunk, chunk_time);
        timer.add_stage_time(Stage::Decompress, decompress_time);

        let text = String::from_utf8(plain).map_err(|_| CodecError::InvalidUtf8)?;
        timer.finish();

        let snapshot = TelemetrySnapshot::from(&counters, &timer);
        tracing::debug!(
            chunks = snapshot.chunks,
            plaintext = snapshot.bytes_plaintext,
            "decompress pipeline done"
        );
        Ok((text, snapshot))
    }
}

// ============================================================
// Helpers
// ============================================================

/// Standard base64 to raw gzip bytes. Line breaks and other ASCII whitespace
/// (as written by MIME-style encoders) are ignored.
pub(crate) fn decode_base64(text: &str) -> Result<Vec<u8>, CodecError> {
    let cleaned: Cow<'_, str> = if text.bytes().any(|b| b.is_ascii_whitespace()) {
        Cow::Owned(text.chars().filter(|c| !c.is_ascii_whitespace()).collect())
    } else {
        Cow::Borrowed(text)
    };

    let raw = STANDARD.decode(cleaned.as_bytes())?;
    if raw.is_empty() {
        return Err(CodecError::EmptyStream);
    }
    Ok(raw)
}

fn join_stage<T>(
    stage: &'static str,
    handle: ScopedJoinHandle<'_, Result<T, CompressionError>>,
) -> Result<T, CompressionError> {
    let res = handle
        .join()
        .unwrap_or_else(|_| Err(CompressionError::task(stage, "worker panicked")));

    if let Err(e) = &res {
        tracing::error!(stage, error = %e, "codec task failed");
    }
    res
}

/// Combine stage results. A consumer failure is the root cause whenever both
/// fail (the producer then only sees a closed pipe).
fn settle<P, C>(
    produced: Result<P, CompressionError>,
    consumed: Result<C, CompressionError>,
) -> Result<(P, C), CompressionError> {
    match (produced, consumed) {
        (Ok(p), Ok(c)) => Ok((p, c)),
        (_, Err(e)) => Err(e),
        (Err(e), Ok(_)) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::thread;

    use super::{join_stage, settle};
    use crate::compression::types::{CodecError, CompressionError};

    #[test]
    fn panicking_worker_becomes_task_error() {
        let res: Result<(), CompressionError> = thread::scope(|scope| {
            let handle = scope.spawn(|| -> Result<(), CompressionError> { panic!("worker blew up") });
            join_stage("consumer", handle)
        });

        match res {
            Err(CompressionError::Task { stage, msg }) => {
                assert_eq!(stage, "consumer");
                assert!(msg.contains("panicked"), "{msg}");
            }
            other => panic!("expected task error, got {other:?}"),
        }
    }

    #[test]
    fn failing_worker_error_is_returned() {
        let res: Result<u8, CompressionError> = thread::scope(|scope| {
            let handle = scope.spawn(|| Err(CompressionError::task("producer", "disk full")));
            join_stage("producer", handle)
        });
        assert!(matches!(res, Err(CompressionError::Task { stage: "producer", .. })), "{res:?}");
    }

    #[test]
    fn consumer_error_wins_when_both_fail() {
        let produced: Result<(), CompressionError> =
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe reader closed").into());
        let consumed: Result<(), CompressionError> = Err(CodecError::EmptyStream.into());

        let err = settle(produced, consumed).unwrap_err();
        assert!(matches!(err, CompressionError::Codec(CodecError::EmptyStream)), "{err:?}");
    }

    #[test]
    fn producer_error_surfaces_when_consumer_succeeds() {
        let produced: Result<(), CompressionError> = Err(CompressionError::task("producer", "short write"));
        let consumed: Result<Vec<u8>, CompressionError> = Ok(b"partial".to_vec());

        let err = settle(produced, consumed).unwrap_err();
        assert!(matches!(err, CompressionError::Task { stage: "producer", .. }), "{err:?}");
    }

    #[test]
    fn both_ok_passes_values_through() {
        let (p, c) = settle::<u8, &str>(Ok(3), Ok("done")).unwrap();
        assert_eq!((p, c), (3, "done"));
    }
}
