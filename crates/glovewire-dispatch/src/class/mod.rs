//! Per-class command tables, handler traits and events.
//!
//! Every class module is gated by its cargo feature. The protocol class has
//! no commands; it only carries error events (see [`crate::event`]).

#[cfg(feature = "feedback")]
pub mod feedback;
#[cfg(feature = "motion")]
pub mod motion;
#[cfg(feature = "system")]
pub mod system;
#[cfg(feature = "touch")]
pub mod touch;

use crate::table::CommandSpec;

/// Look up any command compiled into this build.
pub fn spec(class: u8, command: u8) -> Option<CommandSpec> {
    use glovewire_frame::class::*;

    match class {
        #[cfg(feature = "system")]
        SYSTEM => system::spec(command),
        #[cfg(feature = "touch")]
        TOUCH => touch::spec(command),
        #[cfg(feature = "feedback")]
        FEEDBACK => feedback::spec(command),
        #[cfg(feature = "motion")]
        MOTION => motion::spec(command),
        _ => None,
    }
}

/// Every compiled-in command, ordered by class then command ID.
pub fn all_commands() -> Vec<CommandSpec> {
    glovewire_frame::class::ALL
        .iter()
        .flat_map(|class| (0..=u8::MAX).filter_map(move |command| spec(*class, command)))
        .collect()
}

/// Find a command by class and method name (`"set_blink_mode"`).
pub fn find(class: u8, name: &str) -> Option<CommandSpec> {
    all_commands()
        .into_iter()
        .find(|spec| spec.class == class && spec.name.eq_ignore_ascii_case(name))
}
