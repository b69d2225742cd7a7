#![cfg(all(feature = "system", feature = "feedback-blink"))]

use std::io::Cursor;
use std::sync::mpsc;

use glovewire_dispatch::class::{feedback, system};
use glovewire_dispatch::{MemoryDevice, ProtocolError, Router, RouterConfig};
use glovewire_frame::class::{FEEDBACK, PROTOCOL, SYSTEM};
use glovewire_frame::{FrameConfig, FrameError, FrameReader, Packet, PacketType};
use glovewire_transport::StreamTransport;

/// Reads requests from `input`, routes them, and forwards device events
/// after each dispatch, the way a firmware main loop does.
fn run(input: Vec<u8>, config: FrameConfig, report_errors: bool) -> Vec<Packet> {
    let (tx, rx) = mpsc::channel();
    let mut router = Router::with_config(
        MemoryDevice::with_events(tx),
        StreamTransport::new(Vec::new()),
        RouterConfig { report_errors },
    );
    let mut reader = FrameReader::with_config(Cursor::new(input), config);

    loop {
        match reader.read_packet() {
            Ok(packet) => {
                let _ = router.route(&packet);
            }
            Err(FrameError::ConnectionClosed) => break,
            Err(err) => {
                router.report_frame_error(&err);
            }
        }
        while let Ok(event) = rx.try_recv() {
            router.send_event(&event).unwrap();
        }
    }

    let (_, transport) = router.into_parts();
    FrameReader::new(Cursor::new(transport.into_inner()))
        .map(|packet| packet.unwrap())
        .collect()
}

fn frame(class: u8, command: u8, params: &[u8]) -> Vec<u8> {
    Packet::request(class, command, params).unwrap().as_bytes().to_vec()
}

#[test]
fn responses_and_events_keep_dispatch_order() {
    let mut input = Vec::new();
    input.extend(frame(FEEDBACK, feedback::SET_BLINK_MODE, &[2]));
    input.extend(frame(SYSTEM, system::GET_MEMORY, &[]));

    let out = run(input, FrameConfig::default(), false);

    assert_eq!(out.len(), 3);
    assert_eq!(out[0].packet_type(), PacketType::Command);
    assert_eq!(out[0].command(), feedback::SET_BLINK_MODE);
    assert_eq!(out[1].packet_type(), PacketType::Event);
    assert_eq!(out[1].as_bytes(), &[0x80, 0x01, FEEDBACK, 0x01, 2]);
    assert_eq!(out[2].class(), SYSTEM);
}

#[test]
fn line_noise_between_packets_is_skipped() {
    let mut input = vec![0x00, 0x11];
    input.extend(frame(FEEDBACK, feedback::GET_BLINK_MODE, &[]));
    input.extend([0x22, 0x33]);
    input.extend(frame(FEEDBACK, feedback::GET_BLINK_MODE, &[]));

    let out = run(input, FrameConfig::default(), false);

    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|p| p.payload() == [0]));
}

#[test]
fn oversized_declaration_reported_as_bad_length() {
    let config = FrameConfig {
        max_payload_size: 8,
        ..FrameConfig::default()
    };
    let mut input = vec![0xC0, 0x40, FEEDBACK, 0x01];
    input.extend(frame(FEEDBACK, feedback::GET_BLINK_MODE, &[]));

    let out = run(input, config, true);

    let code = ProtocolError::BadLength.code().to_le_bytes();
    assert_eq!(out[0].as_bytes(), &[0x80, 0x02, PROTOCOL, 0x01, code[0], code[1]]);
    assert_eq!(out.last().unwrap().command(), feedback::GET_BLINK_MODE);
}

#[test]
fn reset_announces_boot_and_ready() {
    let input = frame(SYSTEM, system::RESET, &[system::reset_mode::WARM]);

    let out = run(input, FrameConfig::default(), false);

    let ids: Vec<(PacketType, u8)> = out.iter().map(|p| (p.packet_type(), p.command())).collect();
    assert_eq!(
        ids,
        vec![
            (PacketType::Command, system::RESET),
            (PacketType::Event, system::SystemEvent::BOOT),
            (PacketType::Event, system::SystemEvent::READY),
        ]
    );
}
