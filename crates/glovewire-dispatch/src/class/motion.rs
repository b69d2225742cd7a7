//! Motion class: per-sensor mode control.

use glovewire_frame::class::MOTION;
use glovewire_frame::{wire_struct, Wire};

use crate::response::{Reply, Status};
use crate::table::command_class;

wire_struct! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MotionMode {
        pub mode: u8,
    }
}

wire_struct! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MotionModeChanged {
        pub index: u8,
        pub mode: u8,
    }
}

pub trait MotionHandler {
    fn get_mode(&mut self, index: u8) -> Reply<MotionMode>;
    fn set_mode(&mut self, index: u8, mode: u8) -> Status;
}

command_class! {
    class: MOTION;
    handler: MotionHandler;
    commands {
        GET_MODE = 0x01 => fn get_mode(index: u8) -> Reply<MotionMode>;
        SET_MODE = 0x02 => fn set_mode(index: u8, mode: u8) -> Status;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionEvent {
    Mode(MotionModeChanged),
}

impl MotionEvent {
    pub const MODE: u8 = 0x01;

    pub fn id(&self) -> u8 {
        match self {
            Self::Mode(_) => Self::MODE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Mode(_) => "mode",
        }
    }

    pub fn payload(&self) -> Vec<u8> {
        match self {
            Self::Mode(change) => change.to_wire(),
        }
    }
}
