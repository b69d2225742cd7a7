use std::time::Duration;

/// Errors that can occur during packet encoding, decoding and reassembly.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Fewer bytes than a packet header.
    #[error("packet too short ({len} bytes, header is {header})")]
    TooShort { len: usize, header: usize },

    /// The first byte is not a known packet type.
    #[error("unknown packet type 0x{0:02X}")]
    UnknownPacketType(u8),

    /// The buffer length disagrees with the length byte in the header.
    #[error("packet length mismatch (header declares {declared} payload bytes, buffer carries {actual})")]
    LengthMismatch { declared: usize, actual: usize },

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// A partially received packet was not completed in time.
    #[error("packet incomplete after {0:?}")]
    PacketTimeout(Duration),

    /// An I/O error occurred while reading packets.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The transport refused an outgoing frame.
    #[error("frame transport error: {0}")]
    Transport(#[from] glovewire_transport::TransportError),

    /// The stream ended before a complete packet was received.
    #[error("connection closed (incomplete packet)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
