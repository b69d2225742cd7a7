use bytes::BytesMut;
use glovewire_transport::Transport;

use crate::codec::{encode_frame, Packet, PacketType, HEADER_SIZE, MAX_PAYLOAD};
use crate::error::Result;

/// Encodes packets and hands each one to a [`Transport`].
///
/// A device owns exactly one `FrameWriter`; everything that reaches the wire
/// goes through it, one complete frame per call.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
    frames_sent: u64,
}

impl<T: Transport> FrameWriter<T> {
    /// Create a new frame writer on top of a transport.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(HEADER_SIZE + MAX_PAYLOAD),
            frames_sent: 0,
        }
    }

    /// Encode and transmit one frame.
    pub fn send(
        &mut self,
        packet_type: PacketType,
        class: u8,
        command: u8,
        payload: &[u8],
    ) -> Result<()> {
        self.buf.clear();
        encode_frame(packet_type, class, command, payload, &mut self.buf)?;
        self.inner.transmit(&self.buf)?;
        self.frames_sent += 1;

        tracing::trace!(
            packet_type = packet_type.name(),
            class,
            command,
            size = payload.len(),
            "frame sent"
        );
        Ok(())
    }

    /// Transmit an already framed packet.
    pub fn write_packet(&mut self, packet: &Packet) -> Result<()> {
        self.inner.transmit(packet.as_bytes())?;
        self.frames_sent += 1;
        Ok(())
    }

    /// Number of frames handed to the transport so far.
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    /// Borrow the underlying transport.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner transport.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
