use std::time::Duration;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Packet header: type (1) + length (1) + class (1) + command (1) = 4 bytes.
pub const HEADER_SIZE: usize = 4;

/// Largest payload the one-byte length field can describe.
pub const MAX_PAYLOAD: usize = u8::MAX as usize;

/// Packet type carried in the first header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketType {
    /// Unsolicited device notification.
    Event = 0x80,
    /// Host request, or the device's response to one.
    Command = 0xC0,
}

impl PacketType {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Command => "command",
        }
    }

    /// Returns true if `byte` can start a packet.
    pub fn is_start(byte: u8) -> bool {
        Self::try_from(byte).is_ok()
    }
}

impl TryFrom<u8> for PacketType {
    type Error = FrameError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x80 => Ok(Self::Event),
            0xC0 => Ok(Self::Command),
            other => Err(FrameError::UnknownPacketType(other)),
        }
    }
}

/// The fixed four-byte header that starts every packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub packet_type: PacketType,
    /// Declared payload length in bytes.
    pub length: u8,
    pub class: u8,
    pub command: u8,
}

impl Header {
    /// Parse the header at the start of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(FrameError::TooShort {
                len: bytes.len(),
                header: HEADER_SIZE,
            });
        }
        Ok(Self {
            packet_type: PacketType::try_from(bytes[0])?,
            length: bytes[1],
            class: bytes[2],
            command: bytes[3],
        })
    }

    /// Declared payload length as a byte count.
    pub fn payload_len(&self) -> usize {
        usize::from(self.length)
    }

    /// Header plus declared payload.
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload_len()
    }
}

/// One complete packet, header included.
///
/// A `Packet` always holds exactly `HEADER_SIZE + header.length` bytes; it
/// cannot be constructed otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    header: Header,
    bytes: Bytes,
}

impl Packet {
    /// Validate a complete framed buffer.
    pub fn parse(bytes: impl Into<Bytes>) -> Result<Self> {
        let bytes = bytes.into();
        let header = Header::parse(&bytes)?;
        let actual = bytes.len() - HEADER_SIZE;
        if actual != header.payload_len() {
            return Err(FrameError::LengthMismatch {
                declared: header.payload_len(),
                actual,
            });
        }
        Ok(Self { header, bytes })
    }

    /// Build a packet from its parts.
    pub fn new(packet_type: PacketType, class: u8, command: u8, payload: &[u8]) -> Result<Self> {
        let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload.len());
        encode_frame(packet_type, class, command, payload, &mut buf)?;
        Self::parse(buf.freeze())
    }

    /// Build a command request, the way a host would.
    pub fn request(class: u8, command: u8, params: &[u8]) -> Result<Self> {
        Self::new(PacketType::Command, class, command, params)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn packet_type(&self) -> PacketType {
        self.header.packet_type
    }

    pub fn class(&self) -> u8 {
        self.header.class
    }

    pub fn command(&self) -> u8 {
        self.header.command
    }

    /// Payload bytes following the header (command parameters for a request).
    pub fn payload(&self) -> &[u8] {
        &self.bytes[HEADER_SIZE..]
    }

    /// The whole packet as it appears on the wire.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    pub fn wire_size(&self) -> usize {
        self.bytes.len()
    }
}

/// Encode a packet into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────┬──────────┬──────────┬──────────┬───────────────────┐
/// │ Type (1) │ Len (1)  │ Class(1) │ Cmd (1)  │ Payload (Len)     │
/// │ C0 / 80  │          │          │          │ little-endian ints│
/// └──────────┴──────────┴──────────┴──────────┴───────────────────┘
/// ```
pub fn encode_frame(
    packet_type: PacketType,
    class: u8,
    command: u8,
    payload: &[u8],
    dst: &mut BytesMut,
) -> Result<()> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD,
        });
    }
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_u8(packet_type.as_u8());
    dst.put_u8(payload.len() as u8);
    dst.put_u8(class);
    dst.put_u8(command);
    dst.put_slice(payload);
    Ok(())
}

/// Decode one packet from the front of a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete packet yet.
/// On success, consumes the packet bytes from the buffer. On error the
/// buffer is left untouched; the caller decides how much to discard.
pub fn decode_frame(src: &mut BytesMut, max_payload: usize) -> Result<Option<Packet>> {
    let Some(&first) = src.first() else {
        return Ok(None);
    };
    let packet_type = PacketType::try_from(first)?;

    if src.len() < HEADER_SIZE {
        return Ok(None); // Need more data
    }

    let payload_len = usize::from(src[1]);
    if payload_len > max_payload {
        return Err(FrameError::PayloadTooLarge {
            size: payload_len,
            max: max_payload,
        });
    }

    let total = HEADER_SIZE + payload_len;
    if src.len() < total {
        return Ok(None); // Need more data
    }

    let header = Header {
        packet_type,
        length: src[1],
        class: src[2],
        command: src[3],
    };
    let bytes = src.split_to(total).freeze();

    Ok(Some(Packet { header, bytes }))
}

/// Drop leading bytes that cannot start a packet.
///
/// Returns how many bytes were discarded.
pub fn skip_to_start(src: &mut BytesMut) -> usize {
    let skip = src
        .iter()
        .position(|byte| PacketType::is_start(*byte))
        .unwrap_or(src.len());
    src.advance(skip);
    skip
}

/// Configuration for packet reassembly.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum accepted payload size in bytes. Default: 255.
    pub max_payload_size: usize,
    /// How long a partially received packet may stay incomplete.
    pub packet_timeout: Option<Duration>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: MAX_PAYLOAD,
            packet_timeout: None,
        }
    }
}
