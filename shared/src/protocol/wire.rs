//! Capture file wire format.
//!
//! A capture is a plain sequence of frames. Each frame is a little-endian `u32`
//! byte length followed by one bincode-encoded [`CaptureBatch`]. Bincode runs
//! with an explicit config (fixint for lengths and enums) so a writer and a
//! reader built from different crate versions always agree on the layout.

use crate::types::message::ProtocolMessage;
use anyhow::{Context, Result};
use bincode::Options;
use std::collections::VecDeque;
use std::io::{ErrorKind, Read, Write};

/// Capture format version
pub const PROTOCOL_VERSION: u32 = 1;

/// Frames larger than this are treated as corruption rather than allocated.
pub const MAX_FRAME_LEN: u32 = 64 * 1024 * 1024;

fn wire_bincode() -> impl bincode::config::Options {
    bincode::config::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
}

/// A batch of captured messages, in arrival order
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CaptureBatch {
    pub version: u32,
    pub sequence: u64,
    pub messages: Vec<ProtocolMessage>,
}

impl CaptureBatch {
    /// Create a new batch
    pub fn new(sequence: u64, messages: Vec<ProtocolMessage>) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            sequence,
            messages,
        }
    }

    /// Serialize the batch body (bincode, fixint encoding).
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        wire_bincode().serialize(self).map_err(Into::into)
    }

    /// Deserialize a batch body, validating the format version.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let batch: Self = wire_bincode()
            .deserialize(bytes)
            .context("failed to decode capture batch")?;
        if batch.version != PROTOCOL_VERSION {
            anyhow::bail!(
                "unsupported capture version {} (expected {})",
                batch.version,
                PROTOCOL_VERSION
            );
        }
        Ok(batch)
    }
}

/// Appends length-prefixed batches to a byte sink
#[derive(Debug)]
pub struct CaptureWriter<W: Write> {
    inner: W,
    next_sequence: u64,
}

impl<W: Write> CaptureWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            next_sequence: 1,
        }
    }

    /// Write one frame and return the sequence number it was given.
    pub fn write_batch(&mut self, messages: Vec<ProtocolMessage>) -> Result<u64> {
        let sequence = self.next_sequence;
        let body = CaptureBatch::new(sequence, messages).to_bytes()?;
        let len = u32::try_from(body.len())
            .ok()
            .filter(|len| *len <= MAX_FRAME_LEN)
            .with_context(|| format!("capture batch too large: {} bytes", body.len()))?;

        self.inner.write_all(&len.to_le_bytes())?;
        self.inner.write_all(&body)?;
        self.next_sequence += 1;
        Ok(sequence)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush().context("failed to flush capture")
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Iterates messages out of a capture, frame by frame.
///
/// A clean end of input (or a truncated length prefix) ends iteration. A frame
/// whose body is cut short or fails to decode yields an error.
#[derive(Debug)]
pub struct CaptureReader<R: Read> {
    inner: R,
    pending: VecDeque<ProtocolMessage>,
    frames_read: u64,
    done: bool,
}

impl<R: Read> CaptureReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pending: VecDeque::new(),
            frames_read: 0,
            done: false,
        }
    }

    /// Number of frames decoded so far
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Read the next whole batch, or `None` at end of input.
    pub fn next_batch(&mut self) -> Result<Option<CaptureBatch>> {
        let mut len_buf = [0u8; 4];
        match self.inner.read_exact(&mut len_buf) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e).context("failed to read frame length"),
        }

        let len = u32::from_le_bytes(len_buf);
        if len > MAX_FRAME_LEN {
            anyhow::bail!("frame length {} exceeds limit of {} bytes", len, MAX_FRAME_LEN);
        }

        let mut body = vec![0u8; len as usize];
        self.inner
            .read_exact(&mut body)
            .with_context(|| format!("truncated frame {} ({} bytes expected)", self.frames_read + 1, len))?;

        let batch = CaptureBatch::from_bytes(&body)?;
        self.frames_read += 1;
        Ok(Some(batch))
    }
}

impl<R: Read> Iterator for CaptureReader<R> {
    type Item = Result<ProtocolMessage>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(msg) = self.pending.pop_front() {
                return Some(Ok(msg));
            }
            if self.done {
                return None;
            }
            match self.next_batch() {
                Ok(Some(batch)) => self.pending.extend(batch.messages),
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
