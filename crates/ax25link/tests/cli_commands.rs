#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::{Command, Output};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "ax25link-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn ax25link(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ax25link"))
        .args(["--log-level", "error", "--format", "json"])
        .args(args)
        .env_remove("AX25LINK_GROUND_CALLSIGN")
        .env_remove("AX25LINK_GROUND_SSID")
        .env_remove("AX25LINK_SATELLITE_CALLSIGN")
        .env_remove("AX25LINK_SATELLITE_SSID")
        .output()
        .expect("ax25link should run")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).expect("stdout should be one JSON object")
}

#[test]
fn encode_then_decode_hex() {
    let output = ax25link(&["encode", "--data", "hello ground"]);
    assert!(output.status.success());
    let encoded = stdout_json(&output);
    assert_eq!(encoded["payload_len"], 12);
    assert_eq!(encoded["source"], "PARSAT-0");
    assert_eq!(encoded["destination"], "ABCD-0");
    let wire = encoded["wire"].as_str().expect("wire should be hex");
    assert!(wire.starts_with("7e"));

    let output = ax25link(&["decode", "--hex", wire]);
    assert!(output.status.success());
    let decoded = stdout_json(&output);
    assert_eq!(decoded["info"], "hello ground");
    assert_eq!(decoded["kind"], "UI");
    assert_eq!(decoded["pid"], 0xF0);
    assert_eq!(decoded["source"], "PARSAT-0");
}

#[test]
fn station_flags_change_route() {
    let output = ax25link(&[
        "--ground-callsign",
        "w1aw",
        "--satellite-ssid",
        "4",
        "encode",
        "--data",
        "x",
    ]);
    assert!(output.status.success());
    let encoded = stdout_json(&output);
    assert_eq!(encoded["destination"], "W1AW-0");
    assert_eq!(encoded["source"], "PARSAT-4");
}

#[test]
fn oversized_payload_is_data_invalid() {
    let payload = "x".repeat(241);
    let output = ax25link(&["encode", "--data", &payload]);
    assert_eq!(output.status.code(), Some(60));
    assert!(output.stdout.is_empty());
}

#[test]
fn garbage_wire_is_data_invalid() {
    let output = ax25link(&["decode", "--hex", "00000000"]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn bad_hex_is_usage_error() {
    let output = ax25link(&["decode", "--hex", "xyz"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn long_callsign_is_usage_error() {
    let output = ax25link(&["--satellite-callsign", "SATELLITE", "config"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn matrix_files_roundtrip() {
    let dir = unique_temp_dir("matrix");
    let input = dir.join("matrix.bin");
    let container = dir.join("frames.bin");
    let restored = dir.join("restored.bin");

    let matrix: Vec<u8> = (0..40u32 * 12).map(|i| (i % 113) as u8).collect();
    std::fs::write(&input, &matrix).expect("matrix should be writable");

    let output = ax25link(&[
        "matrix-encode",
        input.to_str().unwrap(),
        "--rows",
        "40",
        "--cols",
        "12",
        "--out",
        container.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    let summary = stdout_json(&output);
    assert_eq!(summary["frame_count"], 3);

    let output = ax25link(&[
        "matrix-decode",
        container.to_str().unwrap(),
        "--out",
        restored.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    let summary = stdout_json(&output);
    assert_eq!(summary["rows"], 40);
    assert_eq!(summary["cols"], 12);
    assert_eq!(std::fs::read(&restored).unwrap(), matrix);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn matrix_size_mismatch_is_data_invalid() {
    let dir = unique_temp_dir("mismatch");
    let input = dir.join("matrix.bin");
    std::fs::write(&input, [1u8; 10]).expect("matrix should be writable");

    let output = ax25link(&[
        "matrix-encode",
        input.to_str().unwrap(),
        "--rows",
        "3",
        "--cols",
        "3",
        "--out",
        dir.join("frames.bin").to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(60));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn config_reports_effective_settings() {
    let dir = unique_temp_dir("config");
    let path = dir.join("link.json");
    std::fs::write(
        &path,
        r#"{"link":{"ground":{"callsign":"VU2CWA","ssid":1}},"chunk":{"ordering":"arrival"}}"#,
    )
    .expect("config should be writable");

    let output = ax25link(&["--config", path.to_str().unwrap(), "config"]);
    assert!(output.status.success());
    let settings = stdout_json(&output);
    assert_eq!(settings["link"]["ground"]["callsign"], "VU2CWA");
    assert_eq!(settings["link"]["satellite"]["callsign"], "PARSAT");
    assert_eq!(settings["link"]["max_info_len"], 240);
    assert_eq!(settings["chunk"]["ordering"], "arrival");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_config_file_fails() {
    let output = ax25link(&["--config", "/nonexistent/ax25link.json", "config"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn version_prints_name() {
    let output = ax25link(&["version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("ax25link "));
}
