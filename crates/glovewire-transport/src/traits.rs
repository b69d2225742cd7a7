use std::io::{ErrorKind, Write};

use bytes::Bytes;

use crate::error::{Result, TransportError};

/// A single-writer sink for complete protocol frames.
///
/// Implementations receive exactly the bytes of one frame per call and must
/// either deliver all of them or fail; partial frames are never reported as
/// success.
pub trait Transport {
    /// Transmit one complete frame.
    fn transmit(&mut self, frame: &[u8]) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn transmit(&mut self, frame: &[u8]) -> Result<()> {
        (**self).transmit(frame)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn transmit(&mut self, frame: &[u8]) -> Result<()> {
        (**self).transmit(frame)
    }
}

/// Appends every frame back to back, like a byte stream would see them.
impl Transport for Vec<u8> {
    fn transmit(&mut self, frame: &[u8]) -> Result<()> {
        self.extend_from_slice(frame);
        Ok(())
    }
}

/// Writes frames to any blocking `Write` stream.
pub struct StreamTransport<W> {
    inner: W,
}

impl<W: Write> StreamTransport<W> {
    /// Wrap a writable stream.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Consume the transport and return the inner stream.
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }
}

impl<W: Write> Transport for StreamTransport<W> {
    fn transmit(&mut self, frame: &[u8]) -> Result<()> {
        let mut offset = 0usize;
        while offset < frame.len() {
            match self.inner.write(&frame[offset..]) {
                Ok(0) => return Err(TransportError::Closed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }

        tracing::trace!(size = frame.len(), "frame written");
        self.flush()
    }
}

impl<W> std::fmt::Debug for StreamTransport<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamTransport").finish_non_exhaustive()
    }
}

/// Keeps each transmitted frame as a separate buffer.
///
/// Frame boundaries survive, so callers can assert how many frames a single
/// operation produced.
#[derive(Debug, Default, Clone)]
pub struct RecordingTransport {
    frames: Vec<Bytes>,
    closed: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames transmitted so far, oldest first.
    pub fn frames(&self) -> &[Bytes] {
        &self.frames
    }

    /// Total number of bytes transmitted so far.
    pub fn bytes_sent(&self) -> usize {
        self.frames.iter().map(Bytes::len).sum()
    }

    /// Remove and return every recorded frame.
    pub fn take(&mut self) -> Vec<Bytes> {
        std::mem::take(&mut self.frames)
    }

    /// Refuse further frames.
    pub fn close(&mut self) {
        self.closed = true;
    }
}

impl Transport for RecordingTransport {
    fn transmit(&mut self, frame: &[u8]) -> Result<()> {
        if self.closed {
            return Err(TransportError::Shutdown);
        }
        self.frames.push(Bytes::copy_from_slice(frame));
        Ok(())
    }
}
