//! Protocol class IDs.
//!
//! A class groups the commands and events of one feature area. The class
//! byte sits at offset 2 of every packet header.

/// Protocol-level notifications (errors reported by the parser and router).
pub const PROTOCOL: u8 = 0x01;

/// Device housekeeping: ping, reset, version and capability queries.
pub const SYSTEM: u8 = 0x02;

/// Touch sensor mode control.
pub const TOUCH: u8 = 0x03;

/// Blink LED, piezo buzzer, vibration motor and RGB LED feedback.
pub const FEEDBACK: u8 = 0x04;

/// Motion sensor mode control.
pub const MOTION: u8 = 0x05;

/// Every class ID defined by the protocol, in ID order.
pub const ALL: [u8; 5] = [PROTOCOL, SYSTEM, TOUCH, FEEDBACK, MOTION];

/// Returns a human-readable name for a class ID.
pub fn class_name(id: u8) -> &'static str {
    match id {
        PROTOCOL => "protocol",
        SYSTEM => "system",
        TOUCH => "touch",
        FEEDBACK => "feedback",
        MOTION => "motion",
        _ => "unknown",
    }
}

/// Resolve a class name (case-insensitive) or a numeric literal to a class ID.
pub fn class_id(name: &str) -> Option<u8> {
    let name = name.trim();
    if let Some(hex) = name
        .strip_prefix("0x")
        .or_else(|| name.strip_prefix("0X"))
    {
        return u8::from_str_radix(hex, 16).ok();
    }
    if let Ok(id) = name.parse::<u8>() {
        return Some(id);
    }
    ALL.iter()
        .copied()
        .find(|id| class_name(*id).eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for id in ALL {
            assert_eq!(class_id(class_name(id)), Some(id));
        }
    }

    #[test]
    fn numeric_class_ids() {
        assert_eq!(class_id("0x04"), Some(FEEDBACK));
        assert_eq!(class_id("5"), Some(MOTION));
        assert_eq!(class_id("Feedback"), Some(FEEDBACK));
        assert_eq!(class_id("gesture"), None);
    }

    #[test]
    fn unknown_class_name() {
        assert_eq!(class_name(0x7F), "unknown");
    }
}
