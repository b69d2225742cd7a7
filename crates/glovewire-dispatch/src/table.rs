//! Command descriptions and the generator for per-class dispatchers.
//!
//! Each class module declares its commands once, through
//! [`command_class!`]. The declaration yields the command ID constants,
//! a lookup (`spec`), an iterator over everything compiled in
//! (`commands`), and the `dispatch` function itself. Parameter and response
//! sizes are computed from the declared types, so the length check and the
//! marshaling can never disagree.

use bytes::BytesMut;
use glovewire_frame::{FrameWriter, Header, PacketType};
use glovewire_transport::Transport;

pub use glovewire_frame::Field;

use crate::error::{ProtocolError, Result};
use crate::response::Response;

/// One command, as compiled into this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub class: u8,
    pub id: u8,
    pub name: &'static str,
    pub params: &'static [Field],
    pub param_len: usize,
    pub response: &'static [Field],
    pub response_len: usize,
}

/// Reject a parameter block whose size differs from `expected`.
pub(crate) fn check_length(header: &Header, expected: usize) -> std::result::Result<(), ProtocolError> {
    let actual = header.payload_len();
    if actual == expected {
        return Ok(());
    }

    tracing::debug!(
        class = header.class,
        command = header.command,
        expected,
        actual,
        "parameter length mismatch"
    );
    Err(ProtocolError::ParameterLength {
        class: header.class,
        command: header.command,
        expected,
        actual,
    })
}

/// Send a handler's response, echoing the request's class and command.
pub(crate) fn respond<R, T>(header: &Header, reply: &R, writer: &mut FrameWriter<T>) -> Result<()>
where
    R: Response,
    T: Transport,
{
    let status = reply.status();
    if !status.is_ok() {
        tracing::debug!(
            class = header.class,
            command = header.command,
            %status,
            "handler reported failure"
        );
    }

    let mut payload = BytesMut::with_capacity(R::SIZE);
    reply.encode_into(&mut payload);
    debug_assert_eq!(payload.len(), R::SIZE);

    writer.send(PacketType::Command, header.class, header.command, &payload)?;
    Ok(())
}

/// Declare the commands of one class.
///
/// ```ignore
/// command_class! {
///     class: TOUCH;
///     handler: TouchHandler;
///     commands {
///         /// Read the touch mode.
///         GET_MODE = 0x01 => fn get_mode() -> Reply<TouchMode>;
///         #[cfg(feature = "touch-write")]
///         SET_MODE = 0x02 => fn set_mode(mode: u8) -> Status;
///     }
/// }
/// ```
///
/// Parameters are decoded in order with [`glovewire_frame::Wire`] and passed
/// to the handler method of the same name. Commands under a disabled `cfg`
/// vanish from the constants, the lookup and the dispatcher alike; a request
/// for one is indistinguishable from an unknown command.
macro_rules! command_class {
    (
        class: $class:expr;
        handler: $handler:ident;
        commands {
            $(
                $(#[doc = $doc:literal])*
                $(#[cfg($cfg:meta)])?
                $konst:ident = $id:literal => fn $method:ident (
                    $($param:ident : $pty:ty),* $(,)?
                ) -> $reply:ty;
            )*
        }
    ) => {
        $(
            $(#[doc = $doc])*
            $(#[cfg($cfg)])?
            pub const $konst: u8 = $id;
        )*

        /// Look up a command compiled into this class.
        pub const fn spec(command: u8) -> Option<$crate::table::CommandSpec> {
            match command {
                $(
                    $(#[cfg($cfg)])?
                    $id => {
                        const PARAMS: &[$crate::table::Field] = &[
                            $($crate::table::Field::new(
                                stringify!($param),
                                <$pty as ::glovewire_frame::Wire>::SIZE,
                            ),)*
                        ];
                        Some($crate::table::CommandSpec {
                            class: $class,
                            id: $id,
                            name: stringify!($method),
                            params: PARAMS,
                            param_len: 0 $(+ <$pty as ::glovewire_frame::Wire>::SIZE)*,
                            response: <$reply as $crate::response::Response>::FIELDS,
                            response_len: <$reply as $crate::response::Response>::SIZE,
                        })
                    }
                )*
                _ => None,
            }
        }

        /// Every command compiled into this class, in ID order.
        pub fn commands() -> impl Iterator<Item = $crate::table::CommandSpec> {
            (0..=u8::MAX).filter_map(spec)
        }

        /// Validate one packet of this class and run its handler.
        ///
        /// The parameter block must match the command's declared size
        /// exactly. On any rejection nothing is written.
        #[allow(unused_variables)]
        pub fn dispatch<H, T>(
            handler: &mut H,
            packet: &::glovewire_frame::Packet,
            writer: &mut ::glovewire_frame::FrameWriter<T>,
        ) -> $crate::error::Result<()>
        where
            H: $handler + ?Sized,
            T: ::glovewire_transport::Transport,
        {
            let header = packet.header();
            match header.command {
                $(
                    $(#[cfg($cfg)])?
                    $id => {
                        $crate::table::check_length(
                            header,
                            0 $(+ <$pty as ::glovewire_frame::Wire>::SIZE)*,
                        )?;

                        #[allow(unused_mut)]
                        let mut params = packet.payload();
                        $(let $param = <$pty as ::glovewire_frame::Wire>::decode(&mut params);)*

                        let reply = handler.$method($($param),*);
                        $crate::table::respond(header, &reply, writer)
                    }
                )*
                _ => Err($crate::error::ProtocolError::invalid_command(header).into()),
            }
        }
    };
}

#[cfg(any(feature = "system", feature = "touch", feature = "feedback", feature = "motion"))]
pub(crate) use command_class;
