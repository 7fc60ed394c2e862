//! compression/pipe.rs
//! Bounded, blocking, in-process byte pipe.
//!
//! Summary: a crossbeam bounded channel of `Bytes` with a `Write` end and a
//! `Read` end. Writes block once `depth` chunks are in flight, reads block
//! while the pipe is empty. Dropping the writer signals EOF; dropping the
//! reader makes further writes fail with `BrokenPipe`.

use std::io::{self, Read, Write};

use bytes::{Buf, Bytes};
use crossbeam::channel::{bounded, Receiver, Sender};

/// Create a connected writer/reader pair holding at most `depth` chunks.
pub fn byte_pipe(depth: usize) -> (PipeWriter, PipeReader) {
    let (tx, rx) = bounded::<Bytes>(depth.max(1));
    (PipeWriter { tx }, PipeReader { rx, current: Bytes::new() })
}

#[derive(Debug)]
pub struct PipeWriter {
    tx: Sender<Bytes>,
}

impl Write for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.tx
            .send(Bytes::copy_from_slice(buf))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "pipe reader closed"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Debug)]
pub struct PipeReader {
    rx: Receiver<Bytes>,
    current: Bytes,
}

impl Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        while !self.current.has_remaining() {
            match self.rx.recv() {
                Ok(chunk) => self.current = chunk,
                // writer dropped: EOF
                Err(_) => return Ok(0),
            }
        }

        let n = buf.len().min(self.current.remaining());
        self.current.copy_to_slice(&mut buf[..n]);
        Ok(n)
    }
}
