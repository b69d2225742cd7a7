use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use glovewire_dispatch::{Event, MemoryDevice, Router, RouterConfig, RouterStats};
use glovewire_frame::{FrameConfig, FrameError, FrameReader, Packet};
use glovewire_transport::RecordingTransport;

use crate::cmd::SimulateArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{parse_hex, print_frame_line, OutputFormat};

type SimRouter = Router<MemoryDevice<mpsc::Sender<Event>>, RecordingTransport>;

/// A device under simulation: the router, plus the receiving end of the
/// device's event channel.
struct Simulator {
    router: SimRouter,
    events: Receiver<Event>,
    format: OutputFormat,
}

impl Simulator {
    fn new(config: RouterConfig, format: OutputFormat) -> Self {
        let (tx, events) = mpsc::channel();
        Self {
            router: Router::with_config(
                MemoryDevice::with_events(tx),
                RecordingTransport::new(),
                config,
            ),
            events,
            format,
        }
    }

    #[cfg(feature = "system")]
    fn boot(&mut self) -> CliResult<()> {
        self.router.device_mut().boot();
        self.flush()
    }

    #[cfg(not(feature = "system"))]
    fn boot(&mut self) -> CliResult<()> {
        tracing::warn!("boot events need the system class; ignoring --boot");
        Ok(())
    }

    fn handle(&mut self, packet: &Packet) -> CliResult<()> {
        if let Err(err) = self.router.route(packet) {
            tracing::warn!(
                class = packet.class(),
                command = packet.command(),
                code = err.protocol_code(),
                error = %err,
                "request rejected"
            );
        }
        self.flush()
    }

    fn handle_frame_error(&mut self, err: &FrameError) -> CliResult<()> {
        match self.router.report_frame_error(err) {
            Some(code) => tracing::warn!(code = code.code(), error = %err, "malformed input"),
            None => tracing::warn!(error = %err, "input error"),
        }
        self.flush()
    }

    /// Send queued device events, then print everything the device wrote.
    fn flush(&mut self) -> CliResult<()> {
        while let Ok(event) = self.events.try_recv() {
            self.router
                .send_event(&event)
                .map_err(|err| frame_error("event not sent", err))?;
        }

        for frame in self.router.transport_mut().take() {
            let packet = Packet::parse(frame)
                .map_err(|err| frame_error("device wrote a bad frame", err))?;
            print_frame_line(&packet, self.format);
        }
        Ok(())
    }

    fn stats(&self) -> RouterStats {
        self.router.stats()
    }
}

pub fn run(args: SimulateArgs, format: OutputFormat) -> CliResult<i32> {
    let packet_timeout = args
        .packet_timeout
        .as_deref()
        .map(parse_duration)
        .transpose()?;
    if packet_timeout.is_some() && !args.raw {
        return Err(CliError::usage("--packet-timeout only applies to --raw input"));
    }

    let input: Box<dyn Read> = match &args.input {
        Some(path) => Box::new(
            File::open(path)
                .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?,
        ),
        None => Box::new(io::stdin()),
    };

    let mut sim = Simulator::new(
        RouterConfig {
            report_errors: args.report_errors,
        },
        format,
    );
    if args.boot {
        sim.boot()?;
    }

    if args.raw {
        let config = FrameConfig {
            packet_timeout,
            ..FrameConfig::default()
        };
        run_raw(&mut sim, input, config)?;
    } else {
        run_lines(&mut sim, input)?;
    }

    let stats = sim.stats();
    tracing::info!(
        handled = stats.handled,
        rejected = stats.rejected,
        unsent = stats.unsent,
        events = stats.events_sent,
        "simulation finished"
    );

    if args.strict && stats.rejected > 0 {
        return Err(CliError::new(
            DATA_INVALID,
            format!("{} packet(s) rejected", stats.rejected),
        ));
    }
    Ok(SUCCESS)
}

/// One hex frame per line; blank lines and `#` comments are skipped.
fn run_lines(sim: &mut Simulator, input: Box<dyn Read>) -> CliResult<()> {
    for (index, line) in BufReader::new(input).lines().enumerate() {
        let line = line.map_err(|err| io_error("failed reading input", err))?;
        let text = line.split('#').next().unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }

        let bytes = parse_hex(text)
            .map_err(|err| CliError::usage(format!("line {}: {err}", index + 1)))?;
        match Packet::parse(bytes) {
            Ok(packet) => sim.handle(&packet)?,
            Err(err) => sim.handle_frame_error(&err)?,
        }
    }
    Ok(())
}

fn run_raw(sim: &mut Simulator, input: Box<dyn Read>, config: FrameConfig) -> CliResult<()> {
    let mut reader = FrameReader::with_config(input, config);
    loop {
        match reader.read_packet() {
            Ok(packet) => sim.handle(&packet)?,
            Err(FrameError::ConnectionClosed) => {
                if reader.buffered() > 0 {
                    tracing::warn!(discarded = reader.buffered(), "input ended mid-packet");
                }
                return Ok(());
            }
            Err(FrameError::Io(err)) => return Err(io_error("failed reading input", err)),
            Err(err) => sim.handle_frame_error(&err)?,
        }
    }
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::usage("duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "ms")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::usage(format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::usage("duration must be greater than zero"));
    }

    Ok(match unit {
        "s" => Duration::from_secs(value),
        _ => Duration::from_millis(value),
    })
}
