//! Command validation and dispatch for glovewire devices.
//!
//! A host sends command packets; each one names a class and a command. The
//! [`router::Router`] picks the class, the class dispatcher checks that the
//! parameter block has exactly the declared size, decodes the parameters,
//! runs the handler and sends back one response frame. Any rejection sends
//! nothing and returns a [`error::ProtocolError`].
//!
//! # Feature gating
//!
//! Classes (`system`, `touch`, `feedback`, `motion`) and feedback capability
//! groups (`feedback-blink`, `feedback-piezo`, `feedback-vibrate`,
//! `feedback-rgb`) are cargo features. A disabled command is gone from the
//! build entirely: it has no table entry, no handler method and no match
//! arm, so a request for it is answered exactly like an unknown command.
//!
//! The default build has every feature on. The tests that check a group is
//! really gone (`#[cfg(not(feature = ...))]`) only build with a reduced set:
//!
//! ```text
//! cargo test -p glovewire-dispatch --no-default-features --features feedback-blink
//! cargo test -p glovewire-dispatch --no-default-features --features system,feedback-blink
//! ```
//!
//! # Example
//!
//! ```
//! use glovewire_dispatch::{MemoryDevice, Router};
//! use glovewire_frame::Packet;
//! use glovewire_transport::RecordingTransport;
//!
//! let mut router = Router::new(MemoryDevice::new(), RecordingTransport::new());
//!
//! // Unknown class: rejected, nothing sent.
//! let err = router.route(&Packet::request(0x42, 0x01, &[]).unwrap()).unwrap_err();
//! assert_eq!(err.protocol_code(), Some(0x0001));
//! assert!(router.transport().frames().is_empty());
//! ```

pub mod class;
pub mod error;
pub mod event;
pub mod features;
pub mod memory;
pub mod response;
pub mod router;
pub mod table;

pub use error::{code_name, result_code, DispatchError, ProtocolError, Result, NO_ERROR};
pub use event::{event_spec, ErrorReport, Event, EventSink, EventSpec, NoEvents, ProtocolEvent};
pub use features::{FeatureSet, COMPILED};
pub use memory::MemoryDevice;
pub use response::{Reply, Response, Status};
pub use router::{Device, Router, RouterConfig, RouterStats};
pub use table::CommandSpec;
