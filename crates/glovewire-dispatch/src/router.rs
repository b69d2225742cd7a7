//! Class routing and the device's single writer.

use glovewire_frame::{FrameError, FrameWriter, Packet, PacketType};
use glovewire_transport::Transport;

#[cfg(feature = "feedback")]
use crate::class::feedback::{self, FeedbackHandler};
#[cfg(feature = "motion")]
use crate::class::motion::{self, MotionHandler};
#[cfg(feature = "system")]
use crate::class::system::{self, SystemHandler};
#[cfg(feature = "touch")]
use crate::class::touch::{self, TouchHandler};
use crate::error::{DispatchError, ProtocolError, Result};
use crate::event::{Event, ProtocolEvent};

/// A device: one handler per compiled class.
///
/// A type that implements every handler trait itself can return `self` from
/// each accessor.
pub trait Device {
    #[cfg(feature = "system")]
    fn system(&mut self) -> &mut dyn SystemHandler;
    #[cfg(feature = "touch")]
    fn touch(&mut self) -> &mut dyn TouchHandler;
    #[cfg(feature = "feedback")]
    fn feedback(&mut self) -> &mut dyn FeedbackHandler;
    #[cfg(feature = "motion")]
    fn motion(&mut self) -> &mut dyn MotionHandler;
}

/// Router configuration.
#[derive(Debug, Clone, Default)]
pub struct RouterConfig {
    /// Send a `protocol/error` event for every rejected packet.
    pub report_errors: bool,
}

/// Running counters, for logs and the simulator summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouterStats {
    /// Packets whose handler ran and whose response went out.
    pub handled: u64,
    /// Packets (or partial packets) rejected with a protocol error.
    pub rejected: u64,
    /// Responses lost to a transport failure.
    pub unsent: u64,
    pub events_sent: u64,
}

/// Selects the class dispatcher for each packet and owns the device's
/// [`FrameWriter`].
pub struct Router<D, T> {
    device: D,
    writer: FrameWriter<T>,
    config: RouterConfig,
    stats: RouterStats,
}

impl<D: Device, T: Transport> Router<D, T> {
    pub fn new(device: D, transport: T) -> Self {
        Self::with_config(device, transport, RouterConfig::default())
    }

    pub fn with_config(device: D, transport: T, config: RouterConfig) -> Self {
        Self {
            device,
            writer: FrameWriter::new(transport),
            config,
            stats: RouterStats::default(),
        }
    }

    /// Dispatch one complete packet.
    ///
    /// Non-command packets and unknown or compiled-out classes are rejected
    /// as `INVALID_COMMAND`. A rejected packet never produces a response;
    /// with [`RouterConfig::report_errors`] set it produces an error event
    /// instead.
    pub fn route(&mut self, packet: &Packet) -> Result<()> {
        let result = self.dispatch(packet);

        match &result {
            Ok(()) => {
                self.stats.handled += 1;
                tracing::debug!(
                    class = packet.class(),
                    command = packet.command(),
                    "command handled"
                );
            }
            Err(DispatchError::Protocol(err)) => {
                self.stats.rejected += 1;
                tracing::debug!(
                    class = packet.class(),
                    command = packet.command(),
                    code = err.code(),
                    error = %err,
                    "packet rejected"
                );
                self.report(*err);
            }
            Err(DispatchError::Frame(err)) => {
                self.stats.unsent += 1;
                tracing::warn!(
                    class = packet.class(),
                    command = packet.command(),
                    error = %err,
                    "response not sent"
                );
            }
        }

        result
    }

    fn dispatch(&mut self, packet: &Packet) -> Result<()> {
        #[cfg(any(
            feature = "system",
            feature = "touch",
            feature = "feedback",
            feature = "motion"
        ))]
        use glovewire_frame::class::*;

        let header = packet.header();
        if header.packet_type != PacketType::Command {
            return Err(ProtocolError::invalid_command(header).into());
        }

        match header.class {
            #[cfg(feature = "system")]
            SYSTEM => system::dispatch(self.device.system(), packet, &mut self.writer),
            #[cfg(feature = "touch")]
            TOUCH => touch::dispatch(self.device.touch(), packet, &mut self.writer),
            #[cfg(feature = "feedback")]
            FEEDBACK => feedback::dispatch(self.device.feedback(), packet, &mut self.writer),
            #[cfg(feature = "motion")]
            MOTION => motion::dispatch(self.device.motion(), packet, &mut self.writer),
            _ => Err(ProtocolError::invalid_command(header).into()),
        }
    }

    /// Account for a framing failure seen by the receive loop.
    ///
    /// Returns the protocol error it maps to, if any, after reporting it the
    /// same way a rejected packet is reported.
    pub fn report_frame_error(&mut self, err: &FrameError) -> Option<ProtocolError> {
        let protocol = ProtocolError::from_frame_error(err)?;
        self.stats.rejected += 1;
        tracing::debug!(code = protocol.code(), error = %err, "framing error");
        self.report(protocol);
        Some(protocol)
    }

    fn report(&mut self, err: ProtocolError) {
        if !self.config.report_errors {
            return;
        }
        let event = Event::from(ProtocolEvent::Error { code: err.code() });
        if let Err(send_err) = self.send_event(&event) {
            tracing::warn!(error = %send_err, "error event not sent");
        }
    }

    /// Send a device event through the writer.
    pub fn send_event(&mut self, event: &Event) -> glovewire_frame::Result<()> {
        event.send(&mut self.writer)?;
        self.stats.events_sent += 1;
        tracing::trace!(event = %event.name(), "event sent");
        Ok(())
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn stats(&self) -> RouterStats {
        self.stats
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn transport(&self) -> &T {
        self.writer.get_ref()
    }

    pub fn transport_mut(&mut self) -> &mut T {
        self.writer.get_mut()
    }

    /// Consume the router, returning the device and the transport.
    pub fn into_parts(self) -> (D, T) {
        (self.device, self.writer.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use glovewire_frame::class::{PROTOCOL, SYSTEM};
    use glovewire_transport::RecordingTransport;

    use super::*;
    use crate::memory::MemoryDevice;

    fn router(report_errors: bool) -> Router<MemoryDevice, RecordingTransport> {
        Router::with_config(
            MemoryDevice::new(),
            RecordingTransport::new(),
            RouterConfig { report_errors },
        )
    }

    #[test]
    fn unknown_class_is_invalid_command() {
        let mut router = router(false);
        let packet = Packet::request(0x42, 0x01, &[]).unwrap();

        let err = router.route(&packet).unwrap_err();

        assert_eq!(err.protocol_code(), Some(0x0001));
        assert!(router.transport().frames().is_empty());
        assert_eq!(router.stats().rejected, 1);
    }

    #[test]
    fn protocol_class_has_no_commands() {
        let mut router = router(false);
        let packet = Packet::request(PROTOCOL, 0x01, &[]).unwrap();

        assert!(matches!(
            router.route(&packet),
            Err(DispatchError::Protocol(ProtocolError::InvalidCommand { .. }))
        ));
    }

    #[test]
    fn event_packets_are_not_dispatched() {
        let mut router = router(false);
        let packet = Packet::new(PacketType::Event, SYSTEM, 0x01, &[]).unwrap();

        let err = router.route(&packet).unwrap_err();
        assert_eq!(err.protocol_code(), Some(0x0001));
        assert!(router.transport().frames().is_empty());
    }

    #[test]
    fn rejection_reported_as_event_when_enabled() {
        let mut router = router(true);
        let packet = Packet::request(0x42, 0x07, &[1, 2]).unwrap();

        router.route(&packet).unwrap_err();

        let frames = router.transport_mut().take();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].as_ref(), &[0x80, 0x02, PROTOCOL, 0x01, 0x01, 0x00]);
        assert_eq!(router.stats().events_sent, 1);
    }

    #[test]
    fn frame_timeout_maps_to_packet_timeout() {
        let mut router = router(true);

        let code = router.report_frame_error(&FrameError::PacketTimeout(Duration::from_millis(50)));

        assert_eq!(code, Some(ProtocolError::PacketTimeout));
        let frames = router.transport().frames();
        assert_eq!(frames[0].as_ref(), &[0x80, 0x02, PROTOCOL, 0x01, 0x02, 0x00]);
    }

    #[test]
    fn closed_stream_is_not_a_protocol_error() {
        let mut router = router(true);

        assert_eq!(router.report_frame_error(&FrameError::ConnectionClosed), None);
        assert!(router.transport().frames().is_empty());
        assert_eq!(router.stats().rejected, 0);
    }

    #[cfg(feature = "system")]
    #[test]
    fn transport_failure_counts_as_unsent() {
        let mut router = router(false);
        router.transport_mut().close();
        let packet = Packet::request(SYSTEM, system::PING, &[]).unwrap();

        let err = router.route(&packet).unwrap_err();

        assert!(matches!(err, DispatchError::Frame(_)));
        assert_eq!(err.protocol_code(), None);
        assert_eq!(router.stats().unsent, 1);
    }

    #[cfg(feature = "system")]
    #[test]
    fn routes_to_system_class() {
        let mut router = router(false);
        let packet = Packet::request(SYSTEM, system::GET_MEMORY, &[]).unwrap();

        router.route(&packet).unwrap();

        let frames = router.transport().frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0][..4], [0xC0, 0x04, SYSTEM, system::GET_MEMORY]);
        assert_eq!(router.stats().handled, 1);
    }
}
