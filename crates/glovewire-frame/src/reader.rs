use std::io::{ErrorKind, Read};
use std::time::Instant;

use bytes::{Buf, BytesMut};

use crate::codec::{decode_frame, skip_to_start, FrameConfig, Packet, HEADER_SIZE};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 2 * (HEADER_SIZE + crate::codec::MAX_PAYLOAD);
const READ_CHUNK_SIZE: usize = 512;

/// Reassembles complete packets from any `Read` byte stream.
///
/// Handles partial reads internally; callers always get complete packets.
/// Bytes that cannot start a packet are discarded until a known packet type
/// shows up again.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
    pending_since: Option<Instant>,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
            pending_since: None,
        }
    }

    /// Read the next complete packet (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached.
    /// `PayloadTooLarge` and `PacketTimeout` drop the offending bytes, so the
    /// next call resumes with whatever follows them.
    pub fn read_packet(&mut self) -> Result<Packet> {
        loop {
            let skipped = skip_to_start(&mut self.buf);
            if skipped > 0 {
                tracing::warn!(skipped, "discarded bytes outside any packet");
            }

            match decode_frame(&mut self.buf, self.config.max_payload_size) {
                Ok(Some(packet)) => {
                    self.pending_since = if self.buf.is_empty() {
                        None
                    } else {
                        Some(Instant::now())
                    };
                    return Ok(packet);
                }
                Ok(None) => {}
                Err(err @ FrameError::PayloadTooLarge { .. }) => {
                    self.buf.advance(1);
                    self.pending_since = None;
                    return Err(err);
                }
                Err(err) => return Err(err),
            }

            if !self.buf.is_empty() && self.pending_since.is_none() {
                self.pending_since = Some(Instant::now());
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err)
                    if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
                {
                    self.expire_pending(&[])?;
                    return Err(FrameError::Io(err));
                }
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::ConnectionClosed);
            }

            self.expire_pending(&chunk[..read])?;
            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Fail with `PacketTimeout` if the buffered partial packet is stale.
    ///
    /// The stale bytes are discarded and `fresh` (data that arrived after the
    /// deadline) is kept for the next call.
    fn expire_pending(&mut self, fresh: &[u8]) -> Result<()> {
        let (Some(timeout), Some(since)) = (self.config.packet_timeout, self.pending_since) else {
            return Ok(());
        };
        if since.elapsed() < timeout {
            return Ok(());
        }

        tracing::debug!(
            discarded = self.buf.len(),
            timeout_ms = timeout.as_millis() as u64,
            "partial packet timed out"
        );
        self.buf.clear();
        self.buf.extend_from_slice(fresh);
        self.pending_since = None;
        Err(FrameError::PacketTimeout(timeout))
    }

    /// Number of buffered bytes not yet returned as a packet.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl<T: Read> Iterator for FrameReader<T> {
    type Item = Result<Packet>;

    /// Yields packets until the stream closes cleanly.
    fn next(&mut self) -> Option<Self::Item> {
        match self.read_packet() {
            Err(FrameError::ConnectionClosed) => None,
            other => Some(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io::Cursor;
    use std::time::Duration;

    use bytes::BytesMut;

    use super::*;
    use crate::class::{FEEDBACK, SYSTEM};
    use crate::codec::{encode_frame, PacketType};

    fn wire(packets: &[(u8, u8, &[u8])]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        for (class, command, payload) in packets {
            encode_frame(PacketType::Command, *class, *command, payload, &mut buf).unwrap();
        }
        buf.to_vec()
    }

    #[test]
    fn read_single_packet() {
        let bytes = wire(&[(FEEDBACK, 0x02, &[3])]);
        let mut reader = FrameReader::new(Cursor::new(bytes));

        let packet = reader.read_packet().unwrap();

        assert_eq!(packet.class(), FEEDBACK);
        assert_eq!(packet.command(), 0x02);
        assert_eq!(packet.payload(), &[3]);
    }

    #[test]
    fn read_multiple_packets() {
        let bytes = wire(&[
            (FEEDBACK, 0x01, &[]),
            (SYSTEM, 0x01, &[]),
            (FEEDBACK, 0x04, &[0, 1, 2, 3, 4]),
        ]);
        let reader = FrameReader::new(Cursor::new(bytes));

        let packets: Vec<Packet> = reader.map(|p| p.unwrap()).collect();

        assert_eq!(packets.len(), 3);
        assert_eq!(packets[1].class(), SYSTEM);
        assert_eq!(packets[2].payload(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn partial_read_handling() {
        let bytes = wire(&[(FEEDBACK, 0x06, &[1, 2, 3])]);
        let mut reader = FrameReader::new(ByteByByteReader { bytes, pos: 0 });

        let packet = reader.read_packet().unwrap();
        assert_eq!(packet.command(), 0x06);
        assert_eq!(packet.payload(), &[1, 2, 3]);
        assert_eq!(reader.buffered(), 0);
    }

    #[test]
    fn resyncs_after_line_noise() {
        let mut bytes = vec![0x00, 0x13, 0x37];
        bytes.extend(wire(&[(FEEDBACK, 0x01, &[])]));
        let mut reader = FrameReader::new(Cursor::new(bytes));

        let packet = reader.read_packet().unwrap();
        assert_eq!(packet.as_bytes(), &[0xC0, 0x00, FEEDBACK, 0x01]);
    }

    #[test]
    fn connection_closed_cleanly() {
        let mut reader = FrameReader::new(Cursor::new(Vec::<u8>::new()));
        let err = reader.read_packet().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn connection_closed_mid_packet() {
        let mut reader = FrameReader::new(Cursor::new(vec![0xC0, 0x03, FEEDBACK, 0x06, 0x01]));
        let err = reader.read_packet().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn oversized_declaration_is_dropped_and_reading_resumes() {
        let cfg = FrameConfig {
            max_payload_size: 4,
            ..FrameConfig::default()
        };
        let mut bytes = vec![0xC0, 0x20, FEEDBACK, 0x01];
        bytes.extend(wire(&[(FEEDBACK, 0x02, &[3])]));
        let mut reader = FrameReader::with_config(Cursor::new(bytes), cfg);

        let err = reader.read_packet().unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { size: 32, max: 4 }));

        let packet = reader.read_packet().unwrap();
        assert_eq!(packet.command(), 0x02);
    }

    #[test]
    fn stale_partial_packet_times_out() {
        let cfg = FrameConfig {
            packet_timeout: Some(Duration::ZERO),
            ..FrameConfig::default()
        };
        let chunks = ChunkedReader::new(vec![
            vec![0xC0, 0x01],
            wire(&[(FEEDBACK, 0x01, &[])]),
        ]);
        let mut reader = FrameReader::with_config(chunks, cfg);

        let err = reader.read_packet().unwrap_err();
        assert!(matches!(err, FrameError::PacketTimeout(_)));

        let packet = reader.read_packet().unwrap();
        assert_eq!(packet.as_bytes(), &[0xC0, 0x00, FEEDBACK, 0x01]);
    }

    #[test]
    fn would_block_with_stale_data_times_out() {
        let cfg = FrameConfig {
            packet_timeout: Some(Duration::ZERO),
            ..FrameConfig::default()
        };
        let stream = WouldBlockAfter::new(vec![0xC0, 0x02, FEEDBACK]);
        let mut reader = FrameReader::with_config(stream, cfg);

        let err = reader.read_packet().unwrap_err();
        assert!(matches!(err, FrameError::PacketTimeout(_)));
        assert_eq!(reader.buffered(), 0);
    }

    #[test]
    fn would_block_without_pending_data_is_io() {
        let mut reader = FrameReader::new(WouldBlockAfter::new(Vec::new()));
        let err = reader.read_packet().unwrap_err();
        assert!(matches!(err, FrameError::Io(ref io) if io.kind() == ErrorKind::WouldBlock));
    }

    #[test]
    fn no_timeout_configured_keeps_partial_data() {
        let mut reader = FrameReader::new(WouldBlockAfter::new(vec![0xC0, 0x02, FEEDBACK]));

        let err = reader.read_packet().unwrap_err();
        assert!(matches!(err, FrameError::Io(_)));
        assert_eq!(reader.buffered(), 3);
    }

    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct ChunkedReader {
        chunks: VecDeque<Vec<u8>>,
    }

    impl ChunkedReader {
        fn new(chunks: Vec<Vec<u8>>) -> Self {
            Self {
                chunks: chunks.into(),
            }
        }
    }

    impl Read for ChunkedReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.chunks.pop_front() {
                Some(chunk) => {
                    buf[..chunk.len()].copy_from_slice(&chunk);
                    Ok(chunk.len())
                }
                None => Ok(0),
            }
        }
    }

    struct WouldBlockAfter {
        first: Option<Vec<u8>>,
    }

    impl WouldBlockAfter {
        fn new(first: Vec<u8>) -> Self {
            Self {
                first: if first.is_empty() { None } else { Some(first) },
            }
        }
    }

    impl Read for WouldBlockAfter {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.first.take() {
                Some(chunk) => {
                    buf[..chunk.len()].copy_from_slice(&chunk);
                    Ok(chunk.len())
                }
                None => Err(std::io::Error::from(ErrorKind::WouldBlock)),
            }
        }
    }
}
