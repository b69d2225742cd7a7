use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use glovewire_dispatch::{event_spec, CommandSpec};
use glovewire_frame::class::class_name;
use glovewire_frame::{Field, Packet, PacketType, Wire};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Uppercase hex bytes separated by single spaces.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse hex bytes. Accepts `C0 00 04 01`, `c0000401`, `0xC0,0x00,...`.
pub fn parse_hex(input: &str) -> Result<Vec<u8>, String> {
    let mut bytes = Vec::new();
    for token in input
        .split(|c: char| c.is_whitespace() || c == ',' || c == ':')
        .filter(|token| !token.is_empty())
    {
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        if digits.is_empty() || digits.len() % 2 != 0 {
            return Err(format!("odd number of hex digits in {token:?}"));
        }
        for pair in digits.as_bytes().chunks(2) {
            let pair = std::str::from_utf8(pair).map_err(|_| format!("invalid hex {token:?}"))?;
            let byte =
                u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex {token:?}"))?;
            bytes.push(byte);
        }
    }
    Ok(bytes)
}

/// Wire type name for a field width.
pub fn width_type(width: usize) -> &'static str {
    match width {
        1 => "u8",
        2 => "u16",
        4 => "u32",
        _ => "bytes",
    }
}

pub fn describe_fields(fields: &[Field]) -> String {
    if fields.is_empty() {
        return "-".to_string();
    }
    fields
        .iter()
        .map(|field| format!("{}: {}", field.name, width_type(field.width)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Split a payload into named values. `None` if the sizes disagree.
pub fn decode_fields(fields: &[Field], payload: &[u8]) -> Option<Vec<FieldValue>> {
    let total: usize = fields.iter().map(|field| field.width).sum();
    if total != payload.len() {
        return None;
    }

    let mut src = payload;
    let mut values = Vec::with_capacity(fields.len());
    for field in fields {
        let value = match field.width {
            1 => u32::from(u8::decode(&mut src)),
            2 => u32::from(u16::decode(&mut src)),
            4 => u32::decode(&mut src),
            _ => return None,
        };
        values.push(FieldValue {
            name: field.name,
            value,
        });
    }
    Some(values)
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldValue {
    pub name: &'static str,
    pub value: u32,
}

fn format_values(values: &[FieldValue]) -> String {
    values
        .iter()
        .map(|field| format!("{}={}", field.name, field.value))
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Serialize)]
struct CommandOutput<'a> {
    class: u8,
    class_name: &'a str,
    id: u8,
    name: &'a str,
    params: Vec<FieldOutput<'a>>,
    param_len: usize,
    response: Vec<FieldOutput<'a>>,
    response_len: usize,
}

#[derive(Serialize)]
struct FieldOutput<'a> {
    name: &'a str,
    width: usize,
}

fn field_output(fields: &[Field]) -> Vec<FieldOutput<'_>> {
    fields
        .iter()
        .map(|field| FieldOutput {
            name: field.name,
            width: field.width,
        })
        .collect()
}

pub fn print_commands(commands: &[CommandSpec], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out: Vec<CommandOutput<'_>> = commands
                .iter()
                .map(|spec| CommandOutput {
                    class: spec.class,
                    class_name: class_name(spec.class),
                    id: spec.id,
                    name: spec.name,
                    params: field_output(spec.params),
                    param_len: spec.param_len,
                    response: field_output(spec.response),
                    response_len: spec.response_len,
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CLASS", "ID", "COMMAND", "PARAMS", "RESPONSE"]);
            for spec in commands {
                table.add_row(vec![
                    class_name(spec.class).to_string(),
                    format!("0x{:02X}", spec.id),
                    spec.name.to_string(),
                    describe_fields(spec.params),
                    describe_fields(spec.response),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for spec in commands {
                println!(
                    "{}/{} (0x{:02X}/0x{:02X}) params[{}]: {} -> response[{}]: {}",
                    class_name(spec.class),
                    spec.name,
                    spec.class,
                    spec.id,
                    spec.param_len,
                    describe_fields(spec.params),
                    spec.response_len,
                    describe_fields(spec.response)
                );
            }
        }
    }
}

/// How to read a command packet's payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Request,
    Response,
}

#[derive(Serialize)]
pub struct PacketOutput {
    #[serde(rename = "type")]
    pub packet_type: &'static str,
    pub length: u8,
    pub class: u8,
    pub class_name: &'static str,
    pub command: u8,
    pub name: Option<&'static str>,
    pub payload: String,
    pub fields: Option<Vec<FieldValue>>,
    pub hex: String,
}

impl PacketOutput {
    pub fn new(packet: &Packet, direction: Direction) -> Self {
        let header = packet.header();
        let (name, fields) = match header.packet_type {
            PacketType::Event => match event_spec(header.class, header.command) {
                Some(spec) => (Some(spec.name), Some(spec.fields)),
                None => (None, None),
            },
            PacketType::Command => {
                match glovewire_dispatch::class::spec(header.class, header.command) {
                    Some(spec) => {
                        let fields = match direction {
                            Direction::Request => spec.params,
                            Direction::Response => spec.response,
                        };
                        (Some(spec.name), Some(fields))
                    }
                    None => (None, None),
                }
            }
        };

        Self {
            packet_type: header.packet_type.name(),
            length: header.length,
            class: header.class,
            class_name: class_name(header.class),
            command: header.command,
            name,
            payload: to_hex(packet.payload()),
            fields: fields.and_then(|fields| decode_fields(fields, packet.payload())),
            hex: to_hex(packet.as_bytes()),
        }
    }

    fn summary(&self) -> String {
        let name = self.name.unwrap_or("?");
        let detail = match &self.fields {
            Some(values) if !values.is_empty() => format_values(values),
            Some(_) => String::new(),
            None if self.payload.is_empty() => String::new(),
            None => format!("payload={}", self.payload),
        };
        format!("{}/{} {}", self.class_name, name, detail)
            .trim_end()
            .to_string()
    }
}

/// Print one packet in full (header, payload, decoded fields).
pub fn print_packet(packet: &Packet, direction: Direction, format: OutputFormat) {
    let out = PacketOutput::new(packet, direction);
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TYPE", "LEN", "CLASS", "COMMAND", "FIELDS"])
                .add_row(vec![
                    out.packet_type.to_string(),
                    out.length.to_string(),
                    format!("{} (0x{:02X})", out.class_name, out.class),
                    format!("{} (0x{:02X})", out.name.unwrap_or("?"), out.command),
                    match &out.fields {
                        Some(values) => format_values(values),
                        None => out.payload.clone(),
                    },
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{} {}", out.packet_type, out.summary());
        }
        OutputFormat::Raw => print_raw(packet.as_bytes()),
    }
}

/// Print one frame as a line of a simulator transcript.
pub fn print_frame_line(packet: &Packet, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = PacketOutput::new(packet, Direction::Response);
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Pretty => {
            let out = PacketOutput::new(packet, Direction::Response);
            println!("{:<23}  # {}", out.hex, out.summary());
        }
        OutputFormat::Table => println!("{}", to_hex(packet.as_bytes())),
        OutputFormat::Raw => print_raw(packet.as_bytes()),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_accepts_common_spellings() {
        let expected = vec![0xC0, 0x00, 0x04, 0x01];
        assert_eq!(parse_hex("C0 00 04 01").unwrap(), expected);
        assert_eq!(parse_hex("c0000401").unwrap(), expected);
        assert_eq!(parse_hex("0xC0,0x00,0x04,0x01").unwrap(), expected);
        assert_eq!(parse_hex("c0:00:04:01\n").unwrap(), expected);
    }

    #[test]
    fn hex_rejects_bad_digits() {
        assert!(parse_hex("C0 0").is_err());
        assert!(parse_hex("ZZ").is_err());
        assert!(parse_hex("0x").is_err());
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(to_hex(&[0xC0, 0x01, 0x04, 0x01, 0x0A]), "C0 01 04 01 0A");
        assert_eq!(to_hex(&[]), "");
    }

    #[test]
    fn fields_decode_little_endian() {
        let fields = [
            Field::new("mode", 1),
            Field::new("duration", 1),
            Field::new("frequency", 2),
        ];
        let values = decode_fields(&fields, &[1, 20, 0x70, 0x03]).unwrap();

        assert_eq!(values[2].name, "frequency");
        assert_eq!(values[2].value, 880);
        assert!(decode_fields(&fields, &[1, 20, 0x70]).is_none());
    }

    #[test]
    fn field_descriptions() {
        assert_eq!(describe_fields(&[]), "-");
        assert_eq!(
            describe_fields(&[Field::new("index", 1), Field::new("frequency", 2)]),
            "index: u8, frequency: u16"
        );
    }

    #[cfg(feature = "feedback-blink")]
    #[test]
    fn response_packet_summary_names_fields() {
        let packet = Packet::new(PacketType::Command, 0x04, 0x01, &[3]).unwrap();
        let out = PacketOutput::new(&packet, Direction::Response);

        assert_eq!(out.name, Some("get_blink_mode"));
        assert_eq!(out.summary(), "feedback/get_blink_mode mode=3");
    }

    #[test]
    fn protocol_error_event_summary() {
        let packet = Packet::new(PacketType::Event, 0x01, 0x01, &[0x04, 0x00]).unwrap();
        let out = PacketOutput::new(&packet, Direction::Response);

        assert_eq!(out.summary(), "protocol/error code=4");
    }
}
