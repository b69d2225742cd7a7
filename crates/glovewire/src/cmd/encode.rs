use glovewire_dispatch::class;
use glovewire_dispatch::CommandSpec;
use glovewire_frame::class::{class_id, class_name};
use glovewire_frame::{Field, Packet, Wire};
use serde::Serialize;

use crate::cmd::EncodeArgs;
use crate::exit::{frame_error, CliError, CliResult, SUCCESS};
use crate::output::{print_raw, to_hex, OutputFormat};

#[derive(Serialize)]
struct EncodeOutput<'a> {
    class: u8,
    class_name: &'a str,
    command: u8,
    name: &'a str,
    hex: String,
}

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let spec = resolve(&args.class, &args.command)?;
    let params = encode_params(&spec, &args.params)?;
    let packet = Packet::request(spec.class, spec.id, &params)
        .map_err(|err| frame_error("encode failed", err))?;

    match format {
        OutputFormat::Raw => print_raw(packet.as_bytes()),
        OutputFormat::Json => {
            let out = EncodeOutput {
                class: spec.class,
                class_name: class_name(spec.class),
                command: spec.id,
                name: spec.name,
                hex: to_hex(packet.as_bytes()),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => println!("{}", to_hex(packet.as_bytes())),
    }

    Ok(SUCCESS)
}

/// Find a compiled command by class and command name or ID.
pub fn resolve(class: &str, command: &str) -> CliResult<CommandSpec> {
    let class_id = class_id(class).ok_or_else(|| CliError::usage(format!("unknown class: {class}")))?;

    let spec = match parse_number(command) {
        Some(id) => u8::try_from(id).ok().and_then(|id| class::spec(class_id, id)),
        None => class::find(class_id, command),
    };

    spec.ok_or_else(|| {
        CliError::usage(format!(
            "command {command} is not available in class {} in this build",
            class_name(class_id)
        ))
    })
}

/// Marshal decimal/hex arguments into the command's parameter block.
pub fn encode_params(spec: &CommandSpec, values: &[String]) -> CliResult<Vec<u8>> {
    if values.len() != spec.params.len() {
        let expected: Vec<&str> = spec.params.iter().map(|field| field.name).collect();
        return Err(CliError::usage(format!(
            "{} takes {} parameter(s) [{}], got {}",
            spec.name,
            spec.params.len(),
            expected.join(", "),
            values.len()
        )));
    }

    let mut out = Vec::with_capacity(spec.param_len);
    for (field, raw) in spec.params.iter().zip(values) {
        encode_field(field, raw, &mut out)?;
    }
    Ok(out)
}

fn encode_field(field: &Field, raw: &str, out: &mut Vec<u8>) -> CliResult<()> {
    let value = parse_number(raw)
        .ok_or_else(|| CliError::usage(format!("{}: not a number: {raw}", field.name)))?;
    let out_of_range = || CliError::usage(format!("{}: {raw} does not fit in {} byte(s)", field.name, field.width));

    match field.width {
        1 => u8::try_from(value).map_err(|_| out_of_range())?.encode(out),
        2 => u16::try_from(value).map_err(|_| out_of_range())?.encode(out),
        4 => u32::try_from(value).map_err(|_| out_of_range())?.encode(out),
        width => {
            return Err(CliError::new(
                crate::exit::INTERNAL,
                format!("{}: unsupported field width {width}", field.name),
            ))
        }
    }
    Ok(())
}

pub fn parse_number(input: &str) -> Option<u64> {
    let input = input.trim();
    match input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => input.parse().ok(),
    }
}
