//! Which classes and feedback groups this build contains.

use glovewire_frame::class::{self, FEEDBACK, MOTION, PROTOCOL, SYSTEM, TOUCH};

/// Feedback capability group bits.
pub mod group {
    pub const BLINK: u16 = 0x0001;
    pub const PIEZO: u16 = 0x0002;
    pub const VIBRATE: u16 = 0x0004;
    pub const RGB: u16 = 0x0008;

    pub const ALL: [(u16, &str); 4] = [
        (BLINK, "blink"),
        (PIEZO, "piezo"),
        (VIBRATE, "vibrate"),
        (RGB, "rgb"),
    ];
}

/// Compiled-in classes (bit `n` set for class ID `n`) and feedback groups.
///
/// Reported to the host by `system/get_capabilities`, so the layout is part
/// of the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSet {
    pub classes: u16,
    pub feedback: u16,
}

/// The feature set of this build.
pub const COMPILED: FeatureSet = FeatureSet::compiled();

impl FeatureSet {
    pub const fn compiled() -> Self {
        let mut classes = 1u16 << PROTOCOL;
        if cfg!(feature = "system") {
            classes |= 1u16 << SYSTEM;
        }
        if cfg!(feature = "touch") {
            classes |= 1u16 << TOUCH;
        }
        if cfg!(feature = "feedback") {
            classes |= 1u16 << FEEDBACK;
        }
        if cfg!(feature = "motion") {
            classes |= 1u16 << MOTION;
        }

        let mut feedback = 0;
        if cfg!(feature = "feedback-blink") {
            feedback |= group::BLINK;
        }
        if cfg!(feature = "feedback-piezo") {
            feedback |= group::PIEZO;
        }
        if cfg!(feature = "feedback-vibrate") {
            feedback |= group::VIBRATE;
        }
        if cfg!(feature = "feedback-rgb") {
            feedback |= group::RGB;
        }

        Self { classes, feedback }
    }

    pub const fn has_class(&self, id: u8) -> bool {
        id < 16 && self.classes & (1u16 << id) != 0
    }

    pub const fn has_feedback(&self, group: u16) -> bool {
        self.feedback & group == group
    }

    /// Names of the classes present, in ID order.
    pub fn class_names(&self) -> Vec<&'static str> {
        class::ALL
            .iter()
            .filter(|id| self.has_class(**id))
            .map(|id| class::class_name(*id))
            .collect()
    }

    /// Names of the feedback groups present.
    pub fn feedback_names(&self) -> Vec<&'static str> {
        group::ALL
            .iter()
            .filter(|(bit, _)| self.has_feedback(*bit))
            .map(|(_, name)| *name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_class_is_always_present() {
        assert!(COMPILED.has_class(PROTOCOL));
        assert_eq!(COMPILED.class_names()[0], "protocol");
    }

    #[test]
    fn reflects_cargo_features() {
        assert_eq!(COMPILED.has_class(SYSTEM), cfg!(feature = "system"));
        assert_eq!(COMPILED.has_class(TOUCH), cfg!(feature = "touch"));
        assert_eq!(COMPILED.has_class(FEEDBACK), cfg!(feature = "feedback"));
        assert_eq!(COMPILED.has_class(MOTION), cfg!(feature = "motion"));
        assert_eq!(
            COMPILED.has_feedback(group::PIEZO),
            cfg!(feature = "feedback-piezo")
        );
    }

    #[test]
    fn feedback_groups_imply_the_class() {
        if COMPILED.feedback != 0 {
            assert!(COMPILED.has_class(FEEDBACK));
        }
    }

    #[test]
    fn out_of_range_class_is_absent() {
        assert!(!COMPILED.has_class(0x20));
        assert!(!COMPILED.has_class(0x00));
    }
}
