use glovewire_frame::Packet;

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, CliError, CliResult, SUCCESS};
use crate::output::{parse_hex, print_packet, Direction, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = parse_hex(&args.hex.join(" ")).map_err(CliError::usage)?;
    let packet = Packet::parse(bytes).map_err(|err| frame_error("invalid frame", err))?;

    let direction = if args.response {
        Direction::Response
    } else {
        Direction::Request
    };
    print_packet(&packet, direction, format);

    Ok(SUCCESS)
}
