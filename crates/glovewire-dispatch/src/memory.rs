//! A device that keeps its state in memory.
//!
//! Implements every compiled handler trait with plain fields. Setters check
//! indices and mode ranges, store the new setting and emit the matching
//! mode-change event. Used by the simulator and by tests.

#[cfg(feature = "system")]
use std::time::Instant;

#[cfg(feature = "feedback")]
use crate::class::feedback::FeedbackHandler;
#[cfg(any(
    feature = "feedback-blink",
    feature = "feedback-piezo",
    feature = "feedback-vibrate",
    feature = "feedback-rgb"
))]
use crate::class::feedback::{self, FeedbackEvent};
#[cfg(feature = "motion")]
use crate::class::motion::{MotionEvent, MotionHandler, MotionMode, MotionModeChanged};
#[cfg(feature = "system")]
use crate::class::system::{
    reset_mode, Capabilities, Info, Memory, SystemEvent, SystemHandler, Uptime,
};
#[cfg(feature = "touch")]
use crate::class::touch::{TouchEvent, TouchHandler, TouchMode};
use crate::event::{EventSink, NoEvents};
#[allow(unused_imports)]
use crate::response::{Reply, Status};
use crate::router::Device;

/// Number of piezo, vibration, RGB and motion units.
pub const SLOTS: usize = 2;

/// Highest touch mode.
pub const TOUCH_MODE_MAX: u8 = 0x03;

/// Highest motion mode.
pub const MOTION_MODE_MAX: u8 = 0x02;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct State {
    #[cfg(feature = "touch")]
    touch: TouchMode,
    #[cfg(feature = "feedback-blink")]
    blink: feedback::BlinkMode,
    #[cfg(feature = "feedback-piezo")]
    piezo: [feedback::PiezoMode; SLOTS],
    #[cfg(feature = "feedback-vibrate")]
    vibrate: [feedback::VibrateMode; SLOTS],
    #[cfg(feature = "feedback-rgb")]
    rgb: [feedback::RgbMode; SLOTS],
    #[cfg(feature = "motion")]
    motion: [MotionMode; SLOTS],
}

/// In-memory implementation of every compiled class.
#[derive(Debug)]
pub struct MemoryDevice<E = NoEvents> {
    events: E,
    state: State,
    #[cfg(feature = "system")]
    booted: Instant,
    #[cfg(feature = "system")]
    info: Info,
    #[cfg(feature = "system")]
    memory: Memory,
    #[cfg(feature = "system")]
    resets: u32,
}

impl MemoryDevice {
    /// A device whose events are discarded.
    pub fn new() -> Self {
        Self::with_events(NoEvents)
    }
}

impl Default for MemoryDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EventSink> MemoryDevice<E> {
    pub fn with_events(events: E) -> Self {
        Self {
            events,
            state: State::default(),
            #[cfg(feature = "system")]
            booted: Instant::now(),
            #[cfg(feature = "system")]
            info: Info {
                major: env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or(0),
                minor: env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or(0),
                patch: env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or(0),
                timestamp: 0,
            },
            #[cfg(feature = "system")]
            memory: Memory {
                free_ram: 6144,
                total_ram: 8192,
            },
            #[cfg(feature = "system")]
            resets: 0,
        }
    }

    /// Report firmware identity as `get_info` and the boot event do.
    #[cfg(feature = "system")]
    pub fn with_info(mut self, info: Info) -> Self {
        self.info = info;
        self
    }

    #[cfg(feature = "system")]
    pub fn with_memory(mut self, memory: Memory) -> Self {
        self.memory = memory;
        self
    }

    /// Emit the boot and ready events, as firmware does on power-up.
    #[cfg(feature = "system")]
    pub fn boot(&mut self) {
        self.booted = Instant::now();
        self.events.emit(SystemEvent::Boot(self.info).into());
        self.events.emit(SystemEvent::Ready.into());
    }

    /// Number of `reset` commands accepted so far.
    #[cfg(feature = "system")]
    pub fn resets(&self) -> u32 {
        self.resets
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    pub fn into_events(self) -> E {
        self.events
    }
}

#[allow(dead_code)]
fn slot<T: Copy + Default>(slots: &[T], index: u8) -> Reply<T> {
    match slots.get(usize::from(index)) {
        Some(value) => Reply::ok(*value),
        None => Reply::with_status(Status::OUT_OF_RANGE, T::default()),
    }
}

impl<E: EventSink> Device for MemoryDevice<E> {
    #[cfg(feature = "system")]
    fn system(&mut self) -> &mut dyn SystemHandler {
        self
    }

    #[cfg(feature = "touch")]
    fn touch(&mut self) -> &mut dyn TouchHandler {
        self
    }

    #[cfg(feature = "feedback")]
    fn feedback(&mut self) -> &mut dyn FeedbackHandler {
        self
    }

    #[cfg(feature = "motion")]
    fn motion(&mut self) -> &mut dyn MotionHandler {
        self
    }
}

#[cfg(feature = "system")]
impl<E: EventSink> SystemHandler for MemoryDevice<E> {
    fn ping(&mut self) -> Reply<Uptime> {
        let uptime = u32::try_from(self.booted.elapsed().as_secs()).unwrap_or(u32::MAX);
        Reply::ok(Uptime { uptime })
    }

    fn reset(&mut self, mode: u8) -> Status {
        match mode {
            reset_mode::SOFT => self.state = State::default(),
            reset_mode::WARM => {}
            _ => return Status::INVALID_PARAMETER,
        }
        self.resets += 1;
        tracing::info!(mode, resets = self.resets, "device reset");
        self.boot();
        Status::OK
    }

    fn get_info(&mut self) -> Reply<Info> {
        Reply::ok(self.info)
    }

    fn get_capabilities(&mut self) -> Reply<Capabilities> {
        let features = crate::features::COMPILED;
        Reply::ok(Capabilities {
            classes: features.classes,
            feedback: features.feedback,
        })
    }

    fn get_memory(&mut self) -> Reply<Memory> {
        Reply::ok(self.memory)
    }
}

#[cfg(feature = "touch")]
impl<E: EventSink> TouchHandler for MemoryDevice<E> {
    fn get_mode(&mut self) -> Reply<TouchMode> {
        Reply::ok(self.state.touch)
    }

    fn set_mode(&mut self, mode: u8) -> Status {
        if mode > TOUCH_MODE_MAX {
            return Status::INVALID_PARAMETER;
        }
        self.state.touch = TouchMode { mode };
        self.events.emit(TouchEvent::Mode(self.state.touch).into());
        Status::OK
    }
}

#[cfg(feature = "feedback")]
impl<E: EventSink> FeedbackHandler for MemoryDevice<E> {
    #[cfg(feature = "feedback-blink")]
    fn get_blink_mode(&mut self) -> Reply<feedback::BlinkMode> {
        Reply::ok(self.state.blink)
    }

    #[cfg(feature = "feedback-blink")]
    fn set_blink_mode(&mut self, mode: u8) -> Status {
        if mode > feedback::mode::BLINK_MAX {
            return Status::INVALID_PARAMETER;
        }
        self.state.blink = feedback::BlinkMode { mode };
        self.events.emit(FeedbackEvent::BlinkMode(self.state.blink).into());
        Status::OK
    }

    #[cfg(feature = "feedback-piezo")]
    fn get_piezo_mode(&mut self, index: u8) -> Reply<feedback::PiezoMode> {
        slot(&self.state.piezo, index)
    }

    #[cfg(feature = "feedback-piezo")]
    fn set_piezo_mode(&mut self, index: u8, mode: u8, duration: u8, frequency: u16) -> Status {
        let Some(piezo) = self.state.piezo.get_mut(usize::from(index)) else {
            return Status::OUT_OF_RANGE;
        };
        if mode > feedback::mode::PIEZO_MAX {
            return Status::INVALID_PARAMETER;
        }
        *piezo = feedback::PiezoMode {
            mode,
            duration,
            frequency,
        };
        self.events.emit(
            FeedbackEvent::PiezoMode(feedback::PiezoModeChanged {
                index,
                mode,
                duration,
                frequency,
            })
            .into(),
        );
        Status::OK
    }

    #[cfg(feature = "feedback-vibrate")]
    fn get_vibrate_mode(&mut self, index: u8) -> Reply<feedback::VibrateMode> {
        slot(&self.state.vibrate, index)
    }

    #[cfg(feature = "feedback-vibrate")]
    fn set_vibrate_mode(&mut self, index: u8, mode: u8, duration: u8) -> Status {
        let Some(vibrate) = self.state.vibrate.get_mut(usize::from(index)) else {
            return Status::OUT_OF_RANGE;
        };
        if mode > feedback::mode::VIBRATE_MAX {
            return Status::INVALID_PARAMETER;
        }
        *vibrate = feedback::VibrateMode { mode, duration };
        self.events.emit(
            FeedbackEvent::VibrateMode(feedback::VibrateModeChanged {
                index,
                mode,
                duration,
            })
            .into(),
        );
        Status::OK
    }

    #[cfg(feature = "feedback-rgb")]
    fn get_rgb_mode(&mut self, index: u8) -> Reply<feedback::RgbMode> {
        slot(&self.state.rgb, index)
    }

    #[cfg(feature = "feedback-rgb")]
    fn set_rgb_mode(&mut self, index: u8, mode_red: u8, mode_green: u8, mode_blue: u8) -> Status {
        let Some(rgb) = self.state.rgb.get_mut(usize::from(index)) else {
            return Status::OUT_OF_RANGE;
        };
        if [mode_red, mode_green, mode_blue]
            .iter()
            .any(|mode| *mode > feedback::mode::RGB_MAX)
        {
            return Status::INVALID_PARAMETER;
        }
        *rgb = feedback::RgbMode {
            mode_red,
            mode_green,
            mode_blue,
        };
        self.events.emit(
            FeedbackEvent::RgbMode(feedback::RgbModeChanged {
                index,
                mode_red,
                mode_green,
                mode_blue,
            })
            .into(),
        );
        Status::OK
    }
}

#[cfg(feature = "motion")]
impl<E: EventSink> MotionHandler for MemoryDevice<E> {
    fn get_mode(&mut self, index: u8) -> Reply<MotionMode> {
        slot(&self.state.motion, index)
    }

    fn set_mode(&mut self, index: u8, mode: u8) -> Status {
        let Some(motion) = self.state.motion.get_mut(usize::from(index)) else {
            return Status::OUT_OF_RANGE;
        };
        if mode > MOTION_MODE_MAX {
            return Status::INVALID_PARAMETER;
        }
        *motion = MotionMode { mode };
        self.events
            .emit(MotionEvent::Mode(MotionModeChanged { index, mode }).into());
        Status::OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;

    fn device() -> MemoryDevice<Vec<Event>> {
        MemoryDevice::with_events(Vec::new())
    }

    #[cfg(feature = "feedback-blink")]
    #[test]
    fn blink_mode_is_stored_and_announced() {
        let mut dev = device();

        assert_eq!(dev.set_blink_mode(3), Status::OK);
        assert_eq!(dev.get_blink_mode(), Reply::ok(feedback::BlinkMode { mode: 3 }));
        assert_eq!(
            dev.events(),
            &vec![Event::Feedback(FeedbackEvent::BlinkMode(
                feedback::BlinkMode { mode: 3 }
            ))]
        );
    }

    #[cfg(feature = "feedback-blink")]
    #[test]
    fn unknown_blink_mode_is_refused_quietly() {
        let mut dev = device();

        assert_eq!(
            dev.set_blink_mode(feedback::mode::BLINK_MAX + 1),
            Status::INVALID_PARAMETER
        );
        assert_eq!(dev.get_blink_mode().value.mode, feedback::mode::OFF);
        assert!(dev.events().is_empty());
    }

    #[cfg(feature = "feedback-piezo")]
    #[test]
    fn piezo_index_out_of_range() {
        let mut dev = device();

        assert_eq!(dev.set_piezo_mode(SLOTS as u8, 1, 10, 440), Status::OUT_OF_RANGE);
        let reply = dev.get_piezo_mode(SLOTS as u8);
        assert_eq!(reply.status, Status::OUT_OF_RANGE);
        assert_eq!(reply.value, feedback::PiezoMode::default());
    }

    #[cfg(feature = "feedback-rgb")]
    #[test]
    fn rgb_channels_validated_together() {
        let mut dev = device();

        assert_eq!(dev.set_rgb_mode(0, 1, 0xFF, 1), Status::INVALID_PARAMETER);
        assert_eq!(dev.set_rgb_mode(1, 1, 2, 3), Status::OK);
        assert_eq!(
            dev.get_rgb_mode(1).value,
            feedback::RgbMode {
                mode_red: 1,
                mode_green: 2,
                mode_blue: 3
            }
        );
    }

    #[cfg(feature = "motion")]
    #[test]
    fn motion_slots_are_independent() {
        let mut dev = device();

        assert_eq!(MotionHandler::set_mode(&mut dev, 1, 2), Status::OK);
        assert_eq!(MotionHandler::get_mode(&mut dev, 0).value.mode, 0);
        assert_eq!(MotionHandler::get_mode(&mut dev, 1).value.mode, 2);
    }

    #[cfg(all(feature = "system", feature = "touch"))]
    #[test]
    fn soft_reset_restores_defaults_and_reboots() {
        let mut dev = device();
        TouchHandler::set_mode(&mut dev, 2);
        dev.events_mut().clear();

        assert_eq!(dev.reset(reset_mode::SOFT), Status::OK);

        assert_eq!(TouchHandler::get_mode(&mut dev).value.mode, 0);
        assert_eq!(dev.resets(), 1);
        let events = dev.into_events();
        assert!(matches!(events[0], Event::System(SystemEvent::Boot(_))));
        assert_eq!(events[1], Event::System(SystemEvent::Ready));
    }

    #[cfg(all(feature = "system", feature = "touch"))]
    #[test]
    fn warm_reset_keeps_settings() {
        let mut dev = device();
        TouchHandler::set_mode(&mut dev, 2);

        assert_eq!(dev.reset(reset_mode::WARM), Status::OK);
        assert_eq!(TouchHandler::get_mode(&mut dev).value.mode, 2);
    }

    #[cfg(feature = "system")]
    #[test]
    fn unknown_reset_mode_is_refused() {
        let mut dev = device();

        assert_eq!(dev.reset(0x7F), Status::INVALID_PARAMETER);
        assert_eq!(dev.resets(), 0);
        assert!(dev.events().is_empty());
    }

    #[cfg(feature = "system")]
    #[test]
    fn capabilities_report_this_build() {
        let mut dev = device();
        let caps = dev.get_capabilities().value;

        assert_eq!(caps.classes, crate::features::COMPILED.classes);
        assert_eq!(caps.feedback, crate::features::COMPILED.feedback);
    }
}
