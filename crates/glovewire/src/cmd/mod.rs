use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod commands;
pub mod decode;
pub mod encode;
pub mod simulate;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the commands compiled into this build.
    Commands(CommandsArgs),
    /// Build a request frame from a class, a command and its parameters.
    Encode(EncodeArgs),
    /// Parse a frame and show its header and fields.
    Decode(DecodeArgs),
    /// Run an in-memory device against requests from a file or stdin.
    Simulate(SimulateArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Commands(args) => commands::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Simulate(args) => simulate::run(args, format),
        Command::Version(args) => version::run(args, format),
    }
}

#[derive(Args, Debug)]
pub struct CommandsArgs {
    /// Only list one class (name, decimal or 0x hex ID).
    #[arg(long)]
    pub class: Option<String>,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Class name or ID.
    pub class: String,
    /// Command name (e.g. set_blink_mode) or ID.
    pub command: String,
    /// Parameter values in declaration order (decimal or 0x hex).
    pub params: Vec<String>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Frame bytes as hex; may be split across arguments.
    #[arg(required = true)]
    pub hex: Vec<String>,
    /// Read a command packet's payload as a response instead of a request.
    #[arg(long)]
    pub response: bool,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Read requests from a file instead of stdin.
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,
    /// Input is a raw byte stream instead of one hex frame per line.
    #[arg(long)]
    pub raw: bool,
    /// Send a protocol error event for every rejected packet.
    #[arg(long)]
    pub report_errors: bool,
    /// Drop a partial packet left incomplete this long (raw input only, e.g. 500ms).
    #[arg(long, value_name = "DURATION")]
    pub packet_timeout: Option<String>,
    /// Emit the boot and ready events before reading input.
    #[arg(long)]
    pub boot: bool,
    /// Exit with a data error if any packet was rejected.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show build provenance and the compiled feature set.
    #[arg(long)]
    pub extended: bool,
}
