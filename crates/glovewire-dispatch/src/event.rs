//! Device-originated events.
//!
//! Handlers never write event frames themselves: they hand an [`Event`] to an
//! [`EventSink`], and whoever owns the [`FrameWriter`] sends it between
//! dispatches. That keeps a single writer on the link.

use std::sync::mpsc;

use bytes::BytesMut;
use glovewire_frame::class::PROTOCOL;
use glovewire_frame::{encode_frame, wire_struct, Field, FrameWriter, Packet, PacketType, Wire};
use glovewire_transport::Transport;

#[cfg(feature = "feedback")]
use crate::class::feedback::FeedbackEvent;
#[cfg(feature = "motion")]
use crate::class::motion::MotionEvent;
#[cfg(feature = "system")]
use crate::class::system::SystemEvent;
#[cfg(feature = "touch")]
use crate::class::touch::TouchEvent;

wire_struct! {
    /// Payload of the protocol error event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ErrorReport {
        pub code: u16,
    }
}

/// Events of the protocol class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolEvent {
    /// A packet was rejected. Carries the protocol error code.
    Error { code: u16 },
}

impl ProtocolEvent {
    pub const ERROR: u8 = 0x01;
    pub fn id(&self) -> u8 {
        match self {
            Self::Error { .. } => Self::ERROR,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Error { .. } => "error",
        }
    }

    pub fn payload(&self) -> Vec<u8> {
        match self {
            Self::Error { code } => ErrorReport { code: *code }.to_wire(),
        }
    }
}

/// Any event this build can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Protocol(ProtocolEvent),
    #[cfg(feature = "system")]
    System(SystemEvent),
    #[cfg(feature = "touch")]
    Touch(TouchEvent),
    #[cfg(feature = "feedback")]
    Feedback(FeedbackEvent),
    #[cfg(feature = "motion")]
    Motion(MotionEvent),
}

impl Event {
    pub fn class(&self) -> u8 {
        match self {
            Self::Protocol(_) => PROTOCOL,
            #[cfg(feature = "system")]
            Self::System(_) => glovewire_frame::class::SYSTEM,
            #[cfg(feature = "touch")]
            Self::Touch(_) => glovewire_frame::class::TOUCH,
            #[cfg(feature = "feedback")]
            Self::Feedback(_) => glovewire_frame::class::FEEDBACK,
            #[cfg(feature = "motion")]
            Self::Motion(_) => glovewire_frame::class::MOTION,
        }
    }

    pub fn id(&self) -> u8 {
        match self {
            Self::Protocol(event) => event.id(),
            #[cfg(feature = "system")]
            Self::System(event) => event.id(),
            #[cfg(feature = "touch")]
            Self::Touch(event) => event.id(),
            #[cfg(feature = "feedback")]
            Self::Feedback(event) => event.id(),
            #[cfg(feature = "motion")]
            Self::Motion(event) => event.id(),
        }
    }

    /// `class/event` name, e.g. `feedback/blink_mode`.
    pub fn name(&self) -> String {
        let event = match self {
            Self::Protocol(event) => event.name(),
            #[cfg(feature = "system")]
            Self::System(event) => event.name(),
            #[cfg(feature = "touch")]
            Self::Touch(event) => event.name(),
            #[cfg(feature = "feedback")]
            Self::Feedback(event) => event.name(),
            #[cfg(feature = "motion")]
            Self::Motion(event) => event.name(),
        };
        format!("{}/{}", glovewire_frame::class::class_name(self.class()), event)
    }

    pub fn payload(&self) -> Vec<u8> {
        match self {
            Self::Protocol(event) => event.payload(),
            #[cfg(feature = "system")]
            Self::System(event) => event.payload(),
            #[cfg(feature = "touch")]
            Self::Touch(event) => event.payload(),
            #[cfg(feature = "feedback")]
            Self::Feedback(event) => event.payload(),
            #[cfg(feature = "motion")]
            Self::Motion(event) => event.payload(),
        }
    }

    /// Append the event frame to `dst`.
    pub fn encode(&self, dst: &mut BytesMut) -> glovewire_frame::Result<()> {
        encode_frame(PacketType::Event, self.class(), self.id(), &self.payload(), dst)
    }

    /// Frame the event as an event-type packet.
    pub fn to_packet(&self) -> glovewire_frame::Result<Packet> {
        Packet::new(PacketType::Event, self.class(), self.id(), &self.payload())
    }

    /// Send the event through the device's writer.
    pub fn send<T: Transport>(&self, writer: &mut FrameWriter<T>) -> glovewire_frame::Result<()> {
        writer.send(PacketType::Event, self.class(), self.id(), &self.payload())
    }
}

impl From<ProtocolEvent> for Event {
    fn from(event: ProtocolEvent) -> Self {
        Self::Protocol(event)
    }
}

#[cfg(feature = "system")]
impl From<SystemEvent> for Event {
    fn from(event: SystemEvent) -> Self {
        Self::System(event)
    }
}

#[cfg(feature = "touch")]
impl From<TouchEvent> for Event {
    fn from(event: TouchEvent) -> Self {
        Self::Touch(event)
    }
}

#[cfg(feature = "feedback")]
impl From<FeedbackEvent> for Event {
    fn from(event: FeedbackEvent) -> Self {
        Self::Feedback(event)
    }
}

#[cfg(feature = "motion")]
impl From<MotionEvent> for Event {
    fn from(event: MotionEvent) -> Self {
        Self::Motion(event)
    }
}

/// Name and payload layout of one event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSpec {
    pub class: u8,
    pub id: u8,
    pub name: &'static str,
    pub fields: &'static [Field],
}

/// Look up an event type compiled into this build.
pub fn event_spec(class: u8, id: u8) -> Option<EventSpec> {
    #[cfg(any(
        feature = "system",
        feature = "touch",
        feature = "feedback",
        feature = "motion"
    ))]
    use glovewire_frame::class::*;

    let (name, fields): (&'static str, &'static [Field]) = match (class, id) {
        (PROTOCOL, ProtocolEvent::ERROR) => ("error", ErrorReport::FIELDS),
        #[cfg(feature = "system")]
        (SYSTEM, SystemEvent::BOOT) => ("boot", crate::class::system::Info::FIELDS),
        #[cfg(feature = "system")]
        (SYSTEM, SystemEvent::READY) => ("ready", &[]),
        #[cfg(feature = "touch")]
        (TOUCH, TouchEvent::MODE) => ("mode", crate::class::touch::TouchMode::FIELDS),
        #[cfg(feature = "feedback-blink")]
        (FEEDBACK, FeedbackEvent::BLINK_MODE) => {
            ("blink_mode", crate::class::feedback::BlinkMode::FIELDS)
        }
        #[cfg(feature = "feedback-piezo")]
        (FEEDBACK, FeedbackEvent::PIEZO_MODE) => {
            ("piezo_mode", crate::class::feedback::PiezoModeChanged::FIELDS)
        }
        #[cfg(feature = "feedback-vibrate")]
        (FEEDBACK, FeedbackEvent::VIBRATE_MODE) => {
            ("vibrate_mode", crate::class::feedback::VibrateModeChanged::FIELDS)
        }
        #[cfg(feature = "feedback-rgb")]
        (FEEDBACK, FeedbackEvent::RGB_MODE) => {
            ("rgb_mode", crate::class::feedback::RgbModeChanged::FIELDS)
        }
        #[cfg(feature = "motion")]
        (MOTION, MotionEvent::MODE) => ("mode", crate::class::motion::MotionModeChanged::FIELDS),
        _ => return None,
    };

    Some(EventSpec {
        class,
        id,
        name,
        fields,
    })
}

/// Where handlers put events.
pub trait EventSink {
    fn emit(&mut self, event: Event);
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEvents;

impl EventSink for NoEvents {
    fn emit(&mut self, _event: Event) {}
}

impl EventSink for Vec<Event> {
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}

impl EventSink for mpsc::Sender<Event> {
    fn emit(&mut self, event: Event) {
        if self.send(event).is_err() {
            tracing::warn!(event = %event.name(), "event receiver dropped, event lost");
        }
    }
}

impl<E: EventSink + ?Sized> EventSink for &mut E {
    fn emit(&mut self, event: Event) {
        (**self).emit(event);
    }
}

impl<E: EventSink + ?Sized> EventSink for Box<E> {
    fn emit(&mut self, event: Event) {
        (**self).emit(event);
    }
}
