//! Outbound transport abstraction for the glovewire device protocol.
//!
//! The device side of the protocol never owns the physical link. Serial,
//! Bluetooth and USB line handling live outside this workspace; what the
//! dispatch layer needs is a sink that accepts one complete frame at a time.
//! That sink is the [`Transport`] trait.
//!
//! Two implementations are provided:
//! - [`StreamTransport`] for anything implementing [`std::io::Write`]
//! - [`RecordingTransport`] which keeps every frame apart (tests, simulation)

pub mod error;
pub mod traits;

pub use error::{Result, TransportError};
pub use traits::{RecordingTransport, StreamTransport, Transport};
