//! Feedback class: blink LED, piezo buzzer, vibration motor and RGB LED.
//!
//! Each device is a capability group with its own cargo feature. A group
//! that is not enabled contributes no commands, no handler methods and no
//! events; requests for its command IDs are rejected as unknown.

#[cfg(any(
    feature = "feedback-blink",
    feature = "feedback-piezo",
    feature = "feedback-vibrate",
    feature = "feedback-rgb"
))]
use glovewire_frame::class::FEEDBACK;
use glovewire_frame::wire_struct;
#[allow(unused_imports)]
use glovewire_frame::Wire;

#[allow(unused_imports)]
use crate::response::{Reply, Status};
use crate::table::command_class;

wire_struct! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BlinkMode {
        pub mode: u8,
    }
}

wire_struct! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PiezoMode {
        pub mode: u8,
        /// Tone length in 10 ms units.
        pub duration: u8,
        /// Tone frequency in Hz.
        pub frequency: u16,
    }
}

wire_struct! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct VibrateMode {
        pub mode: u8,
        /// Pulse length in 10 ms units.
        pub duration: u8,
    }
}

wire_struct! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RgbMode {
        pub mode_red: u8,
        pub mode_green: u8,
        pub mode_blue: u8,
    }
}

wire_struct! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PiezoModeChanged {
        pub index: u8,
        pub mode: u8,
        pub duration: u8,
        pub frequency: u16,
    }
}

wire_struct! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct VibrateModeChanged {
        pub index: u8,
        pub mode: u8,
        pub duration: u8,
    }
}

wire_struct! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RgbModeChanged {
        pub index: u8,
        pub mode_red: u8,
        pub mode_green: u8,
        pub mode_blue: u8,
    }
}

/// Mode values understood by the feedback devices.
pub mod mode {
    pub const OFF: u8 = 0x00;
    pub const SOLID: u8 = 0x01;

    /// Highest blink pattern.
    pub const BLINK_MAX: u8 = 0x0A;
    /// Highest piezo pattern.
    pub const PIEZO_MAX: u8 = 0x06;
    /// Highest vibration pattern.
    pub const VIBRATE_MAX: u8 = 0x06;
    /// Highest per-channel RGB pattern.
    pub const RGB_MAX: u8 = 0x0A;
}

pub trait FeedbackHandler {
    #[cfg(feature = "feedback-blink")]
    fn get_blink_mode(&mut self) -> Reply<BlinkMode>;
    #[cfg(feature = "feedback-blink")]
    fn set_blink_mode(&mut self, mode: u8) -> Status;

    #[cfg(feature = "feedback-piezo")]
    fn get_piezo_mode(&mut self, index: u8) -> Reply<PiezoMode>;
    #[cfg(feature = "feedback-piezo")]
    fn set_piezo_mode(&mut self, index: u8, mode: u8, duration: u8, frequency: u16) -> Status;

    #[cfg(feature = "feedback-vibrate")]
    fn get_vibrate_mode(&mut self, index: u8) -> Reply<VibrateMode>;
    #[cfg(feature = "feedback-vibrate")]
    fn set_vibrate_mode(&mut self, index: u8, mode: u8, duration: u8) -> Status;

    #[cfg(feature = "feedback-rgb")]
    fn get_rgb_mode(&mut self, index: u8) -> Reply<RgbMode>;
    #[cfg(feature = "feedback-rgb")]
    fn set_rgb_mode(&mut self, index: u8, mode_red: u8, mode_green: u8, mode_blue: u8) -> Status;
}

command_class! {
    class: FEEDBACK;
    handler: FeedbackHandler;
    commands {
        #[cfg(feature = "feedback-blink")]
        GET_BLINK_MODE = 0x01 => fn get_blink_mode() -> Reply<BlinkMode>;
        #[cfg(feature = "feedback-blink")]
        SET_BLINK_MODE = 0x02 => fn set_blink_mode(mode: u8) -> Status;

        #[cfg(feature = "feedback-piezo")]
        GET_PIEZO_MODE = 0x03 => fn get_piezo_mode(index: u8) -> Reply<PiezoMode>;
        /// Start a tone on one piezo.
        #[cfg(feature = "feedback-piezo")]
        SET_PIEZO_MODE = 0x04 => fn set_piezo_mode(
            index: u8,
            mode: u8,
            duration: u8,
            frequency: u16,
        ) -> Status;

        #[cfg(feature = "feedback-vibrate")]
        GET_VIBRATE_MODE = 0x05 => fn get_vibrate_mode(index: u8) -> Reply<VibrateMode>;
        #[cfg(feature = "feedback-vibrate")]
        SET_VIBRATE_MODE = 0x06 => fn set_vibrate_mode(index: u8, mode: u8, duration: u8) -> Status;

        #[cfg(feature = "feedback-rgb")]
        GET_RGB_MODE = 0x07 => fn get_rgb_mode(index: u8) -> Reply<RgbMode>;
        #[cfg(feature = "feedback-rgb")]
        SET_RGB_MODE = 0x08 => fn set_rgb_mode(
            index: u8,
            mode_red: u8,
            mode_green: u8,
            mode_blue: u8,
        ) -> Status;
    }
}

/// Mode-change notifications, one per capability group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackEvent {
    #[cfg(feature = "feedback-blink")]
    BlinkMode(BlinkMode),
    #[cfg(feature = "feedback-piezo")]
    PiezoMode(PiezoModeChanged),
    #[cfg(feature = "feedback-vibrate")]
    VibrateMode(VibrateModeChanged),
    #[cfg(feature = "feedback-rgb")]
    RgbMode(RgbModeChanged),
}

impl FeedbackEvent {
    pub const BLINK_MODE: u8 = 0x01;
    pub const PIEZO_MODE: u8 = 0x02;
    pub const VIBRATE_MODE: u8 = 0x03;
    pub const RGB_MODE: u8 = 0x04;

    pub fn id(&self) -> u8 {
        match *self {
            #[cfg(feature = "feedback-blink")]
            Self::BlinkMode(_) => Self::BLINK_MODE,
            #[cfg(feature = "feedback-piezo")]
            Self::PiezoMode(_) => Self::PIEZO_MODE,
            #[cfg(feature = "feedback-vibrate")]
            Self::VibrateMode(_) => Self::VIBRATE_MODE,
            #[cfg(feature = "feedback-rgb")]
            Self::RgbMode(_) => Self::RGB_MODE,
        }
    }

    pub fn name(&self) -> &'static str {
        match *self {
            #[cfg(feature = "feedback-blink")]
            Self::BlinkMode(_) => "blink_mode",
            #[cfg(feature = "feedback-piezo")]
            Self::PiezoMode(_) => "piezo_mode",
            #[cfg(feature = "feedback-vibrate")]
            Self::VibrateMode(_) => "vibrate_mode",
            #[cfg(feature = "feedback-rgb")]
            Self::RgbMode(_) => "rgb_mode",
        }
    }

    pub fn payload(&self) -> Vec<u8> {
        match *self {
            #[cfg(feature = "feedback-blink")]
            Self::BlinkMode(ref mode) => mode.to_wire(),
            #[cfg(feature = "feedback-piezo")]
            Self::PiezoMode(ref change) => change.to_wire(),
            #[cfg(feature = "feedback-vibrate")]
            Self::VibrateMode(ref change) => change.to_wire(),
            #[cfg(feature = "feedback-rgb")]
            Self::RgbMode(ref change) => change.to_wire(),
        }
    }
}
