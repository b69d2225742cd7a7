//! Touch class: sensor mode control.

use glovewire_frame::class::TOUCH;
use glovewire_frame::{wire_struct, Wire};

use crate::response::{Reply, Status};
use crate::table::command_class;

wire_struct! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TouchMode {
        pub mode: u8,
    }
}

pub trait TouchHandler {
    fn get_mode(&mut self) -> Reply<TouchMode>;
    fn set_mode(&mut self, mode: u8) -> Status;
}

command_class! {
    class: TOUCH;
    handler: TouchHandler;
    commands {
        GET_MODE = 0x01 => fn get_mode() -> Reply<TouchMode>;
        SET_MODE = 0x02 => fn set_mode(mode: u8) -> Status;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchEvent {
    /// The touch mode changed.
    Mode(TouchMode),
}

impl TouchEvent {
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
            Self::Mode(mode) => mode.to_wire(),
        }
    }
}
