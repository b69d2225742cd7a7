//! Fixed-header packet framing for the glovewire device protocol.
//!
//! Every packet starts with a four-byte header:
//! - packet type (`0xC0` command/response, `0x80` event)
//! - payload length (one byte, so at most 255 payload bytes)
//! - class ID
//! - command (or event) ID within the class
//!
//! Payload integers are little-endian, fields in declaration order. The
//! [`Wire`] trait is the single place that turns typed values into bytes and
//! back.

pub mod class;
pub mod codec;
pub mod error;
pub mod marshal;
pub mod reader;
pub mod writer;

pub use bytes;

pub use codec::{
    decode_frame, encode_frame, skip_to_start, FrameConfig, Header, Packet, PacketType,
    HEADER_SIZE, MAX_PAYLOAD,
};
pub use error::{FrameError, Result};
pub use marshal::{Field, Wire};
pub use reader::FrameReader;
pub use writer::FrameWriter;
