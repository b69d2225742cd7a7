//! System class: liveness, reset, firmware identity and capabilities.

use glovewire_frame::class::SYSTEM;
use glovewire_frame::{wire_struct, Wire};

use crate::response::{Reply, Status};
use crate::table::command_class;

wire_struct! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Uptime {
        /// Seconds since the last boot.
        pub uptime: u32,
    }
}

wire_struct! {
    /// Firmware version and build time.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Info {
        pub major: u16,
        pub minor: u16,
        pub patch: u16,
        /// Build time, Unix seconds.
        pub timestamp: u32,
    }
}

wire_struct! {
    /// Bitmasks from [`crate::features::FeatureSet`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Capabilities {
        pub classes: u16,
        pub feedback: u16,
    }
}

wire_struct! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Memory {
        pub free_ram: u16,
        pub total_ram: u16,
    }
}

/// Reset modes accepted by `reset`.
pub mod reset_mode {
    /// Restart the firmware and restore default settings.
    pub const SOFT: u8 = 0x00;
    /// Restart without touching stored settings.
    pub const WARM: u8 = 0x01;
}

pub trait SystemHandler {
    fn ping(&mut self) -> Reply<Uptime>;
    fn reset(&mut self, mode: u8) -> Status;
    fn get_info(&mut self) -> Reply<Info>;
    fn get_capabilities(&mut self) -> Reply<Capabilities>;
    fn get_memory(&mut self) -> Reply<Memory>;
}

command_class! {
    class: SYSTEM;
    handler: SystemHandler;
    commands {
        /// Liveness check; answers with uptime.
        PING = 0x01 => fn ping() -> Reply<Uptime>;
        RESET = 0x02 => fn reset(mode: u8) -> Status;
        GET_INFO = 0x03 => fn get_info() -> Reply<Info>;
        /// Classes and feedback groups compiled into the firmware.
        GET_CAPABILITIES = 0x04 => fn get_capabilities() -> Reply<Capabilities>;
        GET_MEMORY = 0x05 => fn get_memory() -> Reply<Memory>;
    }
}

/// Events raised by the system class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemEvent {
    /// Firmware started; carries its identity.
    Boot(Info),
    /// Initialisation finished, commands are accepted.
    Ready,
}

impl SystemEvent {
    pub const BOOT: u8 = 0x01;
    pub const READY: u8 = 0x02;

    pub fn id(&self) -> u8 {
        match self {
            Self::Boot(_) => Self::BOOT,
            Self::Ready => Self::READY,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Boot(_) => "boot",
            Self::Ready => "ready",
        }
    }

    pub fn payload(&self) -> Vec<u8> {
        match self {
            Self::Boot(info) => info.to_wire(),
            Self::Ready => Vec::new(),
        }
    }
}
