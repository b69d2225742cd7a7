//! Packet dispatch and validation for the glovewire host/device protocol.
//!
//! A glovewire device answers fixed-header command packets from a host:
//! `[type][len][class][cmd]` followed by exactly the parameter bytes the
//! command declares. This crate bundles the layers that make up the device
//! side.
//!
//! # Crate Structure
//!
//! - [`transport`]: outbound frame sink (`Transport`) and stream/recording
//!   implementations
//! - [`frame`]: header codec, little-endian marshaling, stream reassembly
//! - [`dispatch`]: command tables, per-class dispatchers, routing, events
//!
//! Classes and feedback capability groups are cargo features
//! (`system`, `touch`, `motion`, `feedback-blink`, `feedback-piezo`,
//! `feedback-vibrate`, `feedback-rgb`); all are on by default.

/// Re-export transport types.
pub mod transport {
    pub use glovewire_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use glovewire_frame::*;
}

/// Re-export dispatch types.
pub mod dispatch {
    pub use glovewire_dispatch::*;
}

#[cfg(test)]
mod tests {
    use glovewire_dispatch::features::group;
    use glovewire_dispatch::COMPILED;
    use glovewire_frame::class::{FEEDBACK, MOTION, SYSTEM, TOUCH};

    #[test]
    fn facade_features_match_dispatch_build() {
        assert_eq!(cfg!(feature = "system"), COMPILED.has_class(SYSTEM));
        assert_eq!(cfg!(feature = "touch"), COMPILED.has_class(TOUCH));
        assert_eq!(cfg!(feature = "feedback"), COMPILED.has_class(FEEDBACK));
        assert_eq!(cfg!(feature = "motion"), COMPILED.has_class(MOTION));

        assert_eq!(cfg!(feature = "feedback-blink"), COMPILED.has_feedback(group::BLINK));
        assert_eq!(cfg!(feature = "feedback-piezo"), COMPILED.has_feedback(group::PIEZO));
        assert_eq!(
            cfg!(feature = "feedback-vibrate"),
            COMPILED.has_feedback(group::VIBRATE)
        );
        assert_eq!(cfg!(feature = "feedback-rgb"), COMPILED.has_feedback(group::RGB));
    }

    #[cfg(feature = "feedback-all")]
    #[test]
    fn feedback_all_enables_every_group() {
        assert!(cfg!(feature = "feedback-blink"));
        assert!(cfg!(feature = "feedback-piezo"));
        assert!(cfg!(feature = "feedback-vibrate"));
        assert!(cfg!(feature = "feedback-rgb"));
    }
}
