#![cfg(feature = "cli")]

use std::process::{Command, Output};

fn glovewire(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_glovewire"))
        .arg("--log-level")
        .arg("error")
        .args(args)
        .output()
        .expect("glovewire should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[cfg(feature = "feedback-all")]
#[test]
fn commands_json_lists_feedback_table() {
    let output = glovewire(&["--format", "json", "commands", "--class", "feedback"]);

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(stdout(&output).trim()).expect("json");
    let commands = value.as_array().expect("array of commands");
    assert_eq!(commands.len(), 8);
    assert!(commands.iter().all(|cmd| cmd["class"] == 4));

    let piezo = commands
        .iter()
        .find(|cmd| cmd["name"] == "set_piezo_mode")
        .expect("set_piezo_mode listed");
    assert_eq!(piezo["id"], 4);
    assert_eq!(piezo["param_len"], 5);
    assert_eq!(piezo["response_len"], 2);
}

#[test]
fn commands_rejects_unknown_class() {
    let output = glovewire(&["commands", "--class", "telepathy"]);

    assert_eq!(output.status.code(), Some(64));
}

#[cfg(feature = "feedback-piezo")]
#[test]
fn encode_marshals_little_endian() {
    let output = glovewire(&[
        "--format",
        "pretty",
        "encode",
        "feedback",
        "set_piezo_mode",
        "1",
        "2",
        "20",
        "0x370",
    ]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "C0 05 04 04 01 02 14 70 03");
}

#[cfg(feature = "feedback-blink")]
#[test]
fn encode_checks_parameter_count() {
    let output = glovewire(&["encode", "feedback", "set_blink_mode"]);

    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("takes 1 parameter(s)"));
}

#[cfg(feature = "feedback-rgb")]
#[test]
fn decode_request_names_fields() {
    let output = glovewire(&["--format", "json", "decode", "C0", "04", "04", "08", "01020304"]);

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(stdout(&output).trim()).expect("json");
    assert_eq!(value["name"], "set_rgb_mode");
    assert_eq!(value["class_name"], "feedback");
    let names: Vec<&str> = value["fields"]
        .as_array()
        .expect("fields decoded")
        .iter()
        .map(|field| field["name"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["index", "mode_red", "mode_green", "mode_blue"]);
}

#[cfg(feature = "system")]
#[test]
fn decode_response_uses_reply_layout() {
    let output = glovewire(&[
        "--format",
        "json",
        "decode",
        "--response",
        "C0 04 02 01 10 27 00 00",
    ]);

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(stdout(&output).trim()).expect("json");
    assert_eq!(value["name"], "ping");
    assert_eq!(value["fields"][0]["name"], "uptime");
    assert_eq!(value["fields"][0]["value"], 10_000);
}

#[test]
fn decode_length_mismatch_is_data_error() {
    let output = glovewire(&["decode", "C0 03 04 02 03"]);

    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn version_plain_and_extended() {
    let output = glovewire(&["version"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        format!("glovewire {}", env!("CARGO_PKG_VERSION"))
    );

    let output = glovewire(&["--format", "json", "version", "--extended"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(stdout(&output).trim()).expect("json");
    assert_eq!(value["name"], "glovewire");
    assert!(value["classes"].is_array());
}
