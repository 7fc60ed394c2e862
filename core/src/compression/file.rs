//! compression/file.rs
//! Temp-file backed codec for payloads too large to stage in memory.
//!
//! Every temp file is a `NamedTempFile` in the configured directory, so it is
//! removed on drop on every exit path. The only file that survives a call is
//! the plaintext file handed back by `decompress_to_file`; the caller owns it.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::write::EncoderStringWriter;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::NamedTempFile;

use crate::compression::chunk::ChunkWriter;
use crate::compression::stream::decode_base64;
use crate::compression::types::{CodecError, CompressionError};
use crate::config::CodecConfig;
use crate::constants::{BYTES_BUFFER_SIZE, TMP_IN_PREFIX, TMP_OUT_PREFIX, TMP_SUFFIX};

#[derive(Debug, Clone)]
pub struct ChunkedFileCodec {
    chunker: ChunkWriter,
    temp_dir: PathBuf,
}

impl ChunkedFileCodec {
    pub fn new(config: &CodecConfig) -> Self {
        Self {
            chunker: ChunkWriter::new(config.chunk_policy),
            temp_dir: config.temp_dir.clone(),
        }
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// gzip + base64 through `tmp_in_*` / `tmp_out_*` files. Both are
    /// deleted before returning, on success or failure. Empty input is
    /// returned unchanged and touches no files.
    pub fn compress_to_file(&self, text: &str) -> Result<String, CompressionError> {
        if text.is_empty() {
            return Ok(String::new());
        }

        let mut input = self.temp_file(TMP_IN_PREFIX)?;
        let output = self.temp_file(TMP_OUT_PREFIX)?;
        tracing::debug!(input = ?input.path(), output = ?output.path(), "staging payload for compression");

        // ---- Stage plaintext ----
        {
            let mut w = BufWriter::with_capacity(BYTES_BUFFER_SIZE, input.as_file_mut());
            let chunks = self.chunker.write_to(text, &mut w)?;
            w.flush()?;
            tracing::trace!(chunks, "plaintext staged");
        }

        // ---- gzip input -> output ----
        {
            let mut reader = BufReader::with_capacity(BYTES_BUFFER_SIZE, input.reopen()?);
            let sink = BufWriter::with_capacity(BYTES_BUFFER_SIZE, output.as_file());
            let mut encoder = GzEncoder::new(sink, Compression::default());
            io::copy(&mut reader, &mut encoder)?;
            let mut sink = encoder.finish()?;
            sink.flush()?;
        }

        // ---- base64 output ----
        let encoded = {
            let mut compressed = BufReader::with_capacity(BYTES_BUFFER_SIZE, output.reopen()?);
            let mut encoder = EncoderStringWriter::new(&STANDARD);
            io::copy(&mut compressed, &mut encoder)?;
            encoder.into_inner()
        };

        input.close()?;
        output.close()?;
        Ok(encoded)
    }

    /// base64 + gunzip into a `tmp_out_*` file whose path is returned.
    /// The caller must delete it. Empty input yields `None` and no file.
    pub fn decompress_to_file(&self, text: &str) -> Result<Option<PathBuf>, CompressionError> {
        if text.is_empty() {
            return Ok(None);
        }

        let raw = decode_base64(text)?;
        let output = self.temp_file(TMP_OUT_PREFIX)?;

        {
            let decoder = MultiGzDecoder::new(raw.as_slice());
            let mut w = BufWriter::with_capacity(BYTES_BUFFER_SIZE, output.as_file());
            let written = copy_utf8(decoder, &mut w)?;
            w.flush()?;
            tracing::debug!(bytes = written, path = ?output.path(), "payload decompressed to file");
        }

        // Persist only after a complete, valid write.
        let path = output.into_temp_path().keep().map_err(|e| CompressionError::Io(e.error))?;
        Ok(Some(path))
    }

    fn temp_file(&self, prefix: &str) -> io::Result<NamedTempFile> {
        tempfile::Builder::new()
            .prefix(prefix)
            .suffix(TMP_SUFFIX)
            .tempfile_in(&self.temp_dir)
    }
}

/// Copy decoded bytes to `w`, rejecting invalid UTF-8. A code point split
/// across reads is carried into the next read.
fn copy_utf8<R: Read, W: Write>(mut reader: R, w: &mut W) -> Result<u64, CompressionError> {
    let mut buf = vec![0u8; BYTES_BUFFER_SIZE];
    let mut pending: Vec<u8> = Vec::with_capacity(BYTES_BUFFER_SIZE + 4);
    let mut total = 0u64;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CodecError::Gzip(e).into()),
        };
        pending.extend_from_slice(&buf[..n]);

        let valid = match std::str::from_utf8(&pending) {
            Ok(_) => pending.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(_) => return Err(CodecError::InvalidUtf8.into()),
        };

        w.write_all(&pending[..valid])?;
        total += valid as u64;
        pending.drain(..valid);
    }

    if !pending.is_empty() {
        return Err(CodecError::InvalidUtf8.into());
    }
    Ok(total)
}

/// Read a file produced by `decompress_to_file` and delete it.
pub fn read_and_remove(path: &Path) -> io::Result<String> {
    let mut text = String::new();
    File::open(path)?.read_to_string(&mut text)?;
    std::fs::remove_file(path)?;
    Ok(text)
}
