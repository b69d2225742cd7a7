use glovewire_frame::{FrameError, Header};

/// Protocol code for a packet that was handled without error.
pub const NO_ERROR: u16 = 0x0000;

/// Errors reported back to the host by protocol code.
///
/// None of these produce a response frame for the offending packet. The
/// caller decides whether to surface them, usually through
/// [`crate::event::ProtocolEvent::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// Unknown class, unknown command, or a command compiled out of this
    /// build.
    #[error("invalid command 0x{command:02X} for class 0x{class:02X}")]
    InvalidCommand { class: u8, command: u8 },

    /// A partial packet sat in the input buffer for too long.
    #[error("packet timed out before it was complete")]
    PacketTimeout,

    /// The header declared a length the receiver cannot accept.
    #[error("bad packet length")]
    BadLength,

    /// The command is known but its parameter block has the wrong size.
    #[error(
        "parameter length mismatch for class 0x{class:02X} command 0x{command:02X}: \
         expected {expected}, got {actual}"
    )]
    ParameterLength {
        class: u8,
        command: u8,
        expected: usize,
        actual: usize,
    },

    /// The command is recognised but has no implementation.
    #[error("command not implemented")]
    NotImplemented,
}

impl ProtocolError {
    /// Numeric code sent to the host.
    pub const fn code(&self) -> u16 {
        match self {
            Self::InvalidCommand { .. } => 0x0001,
            Self::PacketTimeout => 0x0002,
            Self::BadLength => 0x0003,
            Self::ParameterLength { .. } => 0x0004,
            Self::NotImplemented => 0x0005,
        }
    }

    /// Short uppercase name, as it appears in protocol documentation.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::InvalidCommand { .. } => "INVALID_COMMAND",
            Self::PacketTimeout => "PACKET_TIMEOUT",
            Self::BadLength => "BAD_LENGTH",
            Self::ParameterLength { .. } => "PARAMETER_LENGTH",
            Self::NotImplemented => "NOT_IMPLEMENTED",
        }
    }

    pub(crate) fn invalid_command(header: &Header) -> Self {
        Self::InvalidCommand {
            class: header.class,
            command: header.command,
        }
    }

    /// Map a receive-side framing failure onto the protocol code the host
    /// understands. Transport and I/O failures have no protocol equivalent.
    pub fn from_frame_error(err: &FrameError) -> Option<Self> {
        match err {
            FrameError::PacketTimeout(_) => Some(Self::PacketTimeout),
            FrameError::PayloadTooLarge { .. }
            | FrameError::LengthMismatch { .. }
            | FrameError::TooShort { .. } => Some(Self::BadLength),
            _ => None,
        }
    }
}

/// Name for a protocol error code, including [`NO_ERROR`].
pub fn code_name(code: u16) -> &'static str {
    match code {
        NO_ERROR => "NO_ERROR",
        0x0001 => "INVALID_COMMAND",
        0x0002 => "PACKET_TIMEOUT",
        0x0003 => "BAD_LENGTH",
        0x0004 => "PARAMETER_LENGTH",
        0x0005 => "NOT_IMPLEMENTED",
        _ => "UNKNOWN",
    }
}

/// Errors returned from dispatching a single packet.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The packet was rejected; nothing was sent.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The handler ran but its response could not be sent.
    #[error("response not sent: {0}")]
    Frame(#[from] FrameError),
}

impl DispatchError {
    /// Protocol error code, if the packet was rejected.
    pub fn protocol_code(&self) -> Option<u16> {
        match self {
            Self::Protocol(err) => Some(err.code()),
            Self::Frame(_) => None,
        }
    }
}

/// Protocol code for a dispatch result: [`NO_ERROR`] on success, the error's
/// code on rejection, `None` when the response failed to go out.
pub fn result_code(result: &Result<()>) -> Option<u16> {
    match result {
        Ok(()) => Some(NO_ERROR),
        Err(err) => err.protocol_code(),
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn codes_are_stable() {
        let invalid = ProtocolError::InvalidCommand {
            class: 4,
            command: 9,
        };
        let length = ProtocolError::ParameterLength {
            class: 4,
            command: 2,
            expected: 1,
            actual: 0,
        };

        assert_eq!(invalid.code(), 0x0001);
        assert_eq!(ProtocolError::PacketTimeout.code(), 0x0002);
        assert_eq!(ProtocolError::BadLength.code(), 0x0003);
        assert_eq!(length.code(), 0x0004);
        assert_eq!(ProtocolError::NotImplemented.code(), 0x0005);
        assert_eq!(code_name(length.code()), length.name());
        assert_eq!(code_name(NO_ERROR), "NO_ERROR");
    }

    #[test]
    fn frame_errors_map_to_protocol_codes() {
        let timeout = FrameError::PacketTimeout(Duration::from_millis(500));
        let too_large = FrameError::PayloadTooLarge { size: 300, max: 255 };

        assert_eq!(
            ProtocolError::from_frame_error(&timeout),
            Some(ProtocolError::PacketTimeout)
        );
        assert_eq!(
            ProtocolError::from_frame_error(&too_large),
            Some(ProtocolError::BadLength)
        );
        assert_eq!(
            ProtocolError::from_frame_error(&FrameError::ConnectionClosed),
            None
        );
    }

    #[test]
    fn result_code_distinguishes_outcomes() {
        let rejected: Result<()> = Err(ProtocolError::BadLength.into());
        let unsent: Result<()> = Err(FrameError::ConnectionClosed.into());

        assert_eq!(result_code(&Ok(())), Some(NO_ERROR));
        assert_eq!(result_code(&rejected), Some(0x0003));
        assert_eq!(result_code(&unsent), None);
    }

    #[test]
    fn display_names_the_command() {
        let err = ProtocolError::ParameterLength {
            class: 0x04,
            command: 0x02,
            expected: 1,
            actual: 0,
        };
        assert_eq!(
            err.to_string(),
            "parameter length mismatch for class 0x04 command 0x02: expected 1, got 0"
        );
    }
}
