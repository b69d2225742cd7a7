//! Fixed-width little-endian parameter marshaling.
//!
//! Every parameter and result on the wire is a fixed-width unsigned (or
//! signed) integer, low byte first, laid out in declaration order with no
//! padding. All commands and events go through [`Wire`]; nothing else in
//! the workspace splits or joins multi-byte integers by hand.

use bytes::{Buf, BufMut};

/// Name and width of one field in a fixed wire layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub width: usize,
}

impl Field {
    pub const fn new(name: &'static str, width: usize) -> Self {
        Self { name, width }
    }
}

/// A value with a fixed wire width.
///
/// `decode` trusts that at least [`Wire::SIZE`] bytes remain in `src`; the
/// dispatcher's exact length check is what makes that true for request
/// parameters. Use [`Wire::decode_exact`] when the input is not validated.
///
/// # Panics
///
/// `decode` panics if `src` holds fewer than `SIZE` bytes.
pub trait Wire: Sized {
    /// Encoded width in bytes.
    const SIZE: usize;

    /// Field layout, in wire order. Widths add up to `SIZE`.
    const FIELDS: &'static [Field];

    /// Read one value from the front of `src`.
    fn decode<B: Buf>(src: &mut B) -> Self;

    /// Append the value to `dst`.
    fn encode<B: BufMut>(&self, dst: &mut B);

    /// Decode from a slice that must be exactly `SIZE` bytes long.
    fn decode_exact(mut bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::SIZE {
            return None;
        }
        Some(Self::decode(&mut bytes))
    }

    /// Encode into a fresh vector of exactly `SIZE` bytes.
    fn to_wire(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::SIZE);
        self.encode(&mut out);
        out
    }
}

impl Wire for () {
    const SIZE: usize = 0;
    const FIELDS: &'static [Field] = &[];

    fn decode<B: Buf>(_src: &mut B) -> Self {}

    fn encode<B: BufMut>(&self, _dst: &mut B) {}
}

impl Wire for u8 {
    const SIZE: usize = 1;
    const FIELDS: &'static [Field] = &[Field::new("value", 1)];

    fn decode<B: Buf>(src: &mut B) -> Self {
        src.get_u8()
    }

    fn encode<B: BufMut>(&self, dst: &mut B) {
        dst.put_u8(*self);
    }
}

impl Wire for u16 {
    const SIZE: usize = 2;
    const FIELDS: &'static [Field] = &[Field::new("value", 2)];

    fn decode<B: Buf>(src: &mut B) -> Self {
        src.get_u16_le()
    }

    fn encode<B: BufMut>(&self, dst: &mut B) {
        dst.put_u16_le(*self);
    }
}

impl Wire for i16 {
    const SIZE: usize = 2;
    const FIELDS: &'static [Field] = &[Field::new("value", 2)];

    fn decode<B: Buf>(src: &mut B) -> Self {
        src.get_i16_le()
    }

    fn encode<B: BufMut>(&self, dst: &mut B) {
        dst.put_i16_le(*self);
    }
}

impl Wire for u32 {
    const SIZE: usize = 4;
    const FIELDS: &'static [Field] = &[Field::new("value", 4)];

    fn decode<B: Buf>(src: &mut B) -> Self {
        src.get_u32_le()
    }

    fn encode<B: BufMut>(&self, dst: &mut B) {
        dst.put_u32_le(*self);
    }
}

/// Declare a struct whose fields are marshaled in declaration order.
///
/// ```
/// glovewire_frame::wire_struct! {
///     #[derive(Debug, PartialEq)]
///     pub struct PiezoMode {
///         pub mode: u8,
///         pub duration: u8,
///         pub frequency: u16,
///     }
/// }
///
/// use glovewire_frame::Wire;
/// let mode = PiezoMode { mode: 1, duration: 20, frequency: 0x0370 };
/// assert_eq!(PiezoMode::SIZE, 4);
/// assert_eq!(mode.to_wire(), vec![1, 20, 0x70, 0x03]);
/// ```
#[macro_export]
macro_rules! wire_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::marshal::Wire for $name {
            const SIZE: usize = 0 $(+ <$ty as $crate::marshal::Wire>::SIZE)*;

            const FIELDS: &'static [$crate::marshal::Field] = &[
                $($crate::marshal::Field::new(
                    stringify!($field),
                    <$ty as $crate::marshal::Wire>::SIZE,
                ),)*
            ];

            #[allow(unused_variables)]
            fn decode<B: $crate::bytes::Buf>(src: &mut B) -> Self {
                Self {
                    $($field: <$ty as $crate::marshal::Wire>::decode(src),)*
                }
            }

            #[allow(unused_variables)]
            fn encode<B: $crate::bytes::BufMut>(&self, dst: &mut B) {
                $(<$ty as $crate::marshal::Wire>::encode(&self.$field, dst);)*
            }
        }
    };
}
