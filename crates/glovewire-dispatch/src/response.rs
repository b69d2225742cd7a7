//! Handler results and how they reach the wire.
//!
//! Set-style commands answer with a bare 16-bit [`Status`]. Get-style
//! commands answer with the requested values only; the handler still reports
//! a status alongside them through [`Reply`], but that status stays on the
//! device side.

use bytes::BytesMut;
use glovewire_frame::{Field, Wire};

/// Handler-level result code. Zero means success.
///
/// This is unrelated to the protocol error codes in [`crate::error`]: a
/// command that fails validation never reaches a handler, so it never
/// produces a `Status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Status(pub u16);

impl Status {
    pub const OK: Status = Status(0x0000);
    /// A parameter value is outside its defined set (unknown mode, etc.).
    pub const INVALID_PARAMETER: Status = Status(0x0001);
    /// An index addresses hardware that does not exist.
    pub const OUT_OF_RANGE: Status = Status(0x0002);
    /// The hardware refused the request.
    pub const HARDWARE_FAULT: Status = Status(0x0003);

    pub const fn is_ok(self) -> bool {
        self.0 == Self::OK.0
    }

    pub const fn name(self) -> &'static str {
        match self.0 {
            0x0000 => "OK",
            0x0001 => "INVALID_PARAMETER",
            0x0002 => "OUT_OF_RANGE",
            0x0003 => "HARDWARE_FAULT",
            _ => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (0x{:04X})", self.name(), self.0)
    }
}

impl Wire for Status {
    const SIZE: usize = 2;
    const FIELDS: &'static [Field] = &[Field::new("result", 2)];

    fn decode<B: bytes::Buf>(src: &mut B) -> Self {
        Status(u16::decode(src))
    }

    fn encode<B: bytes::BufMut>(&self, dst: &mut B) {
        self.0.encode(dst);
    }
}

/// Values returned by a get-style handler, plus the handler's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reply<T> {
    pub status: Status,
    pub value: T,
}

impl<T> Reply<T> {
    pub fn ok(value: T) -> Self {
        Self {
            status: Status::OK,
            value,
        }
    }

    pub fn with_status(status: Status, value: T) -> Self {
        Self { status, value }
    }
}

/// Anything a handler can return.
///
/// `SIZE` and `FIELDS` describe the response payload exactly; the command
/// table is built from them.
pub trait Response {
    const SIZE: usize;
    const FIELDS: &'static [Field];

    fn status(&self) -> Status;

    fn encode_into(&self, dst: &mut BytesMut);
}

impl Response for Status {
    const SIZE: usize = <Status as Wire>::SIZE;
    const FIELDS: &'static [Field] = <Status as Wire>::FIELDS;

    fn status(&self) -> Status {
        *self
    }

    fn encode_into(&self, dst: &mut BytesMut) {
        self.encode(dst);
    }
}

impl<T: Wire> Response for Reply<T> {
    const SIZE: usize = T::SIZE;
    const FIELDS: &'static [Field] = T::FIELDS;

    fn status(&self) -> Status {
        self.status
    }

    fn encode_into(&self, dst: &mut BytesMut) {
        self.value.encode(dst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_two_bytes_little_endian() {
        let mut buf = BytesMut::new();
        Status(0x0102).encode_into(&mut buf);
        assert_eq!(&buf[..], &[0x02, 0x01]);
        assert_eq!(<Status as Response>::SIZE, 2);
    }

    #[test]
    fn reply_omits_status_on_the_wire() {
        let reply = Reply::with_status(Status::OUT_OF_RANGE, 7u8);
        let mut buf = BytesMut::new();
        reply.encode_into(&mut buf);

        assert_eq!(&buf[..], &[7]);
        assert_eq!(<Reply<u8> as Response>::SIZE, 1);
        assert_eq!(reply.status(), Status::OUT_OF_RANGE);
    }

    #[test]
    fn status_display() {
        assert_eq!(Status::OK.to_string(), "OK (0x0000)");
        assert_eq!(Status(0x0042).to_string(), "UNKNOWN (0x0042)");
        assert!(!Status::INVALID_PARAMETER.is_ok());
    }
}
