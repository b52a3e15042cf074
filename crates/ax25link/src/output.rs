use std::io::{IsTerminal, Write};

use ax25link_frame::{DecodedFrame, FrameKind};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
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

#[derive(Serialize)]
struct EncodedOutput<'a> {
    payload_len: usize,
    wire_len: usize,
    destination: &'a str,
    source: &'a str,
    wire: String,
}

pub fn print_encoded(
    wire: &[u8],
    payload_len: usize,
    destination: &str,
    source: &str,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => {
            let out = EncodedOutput {
                payload_len,
                wire_len: wire.len(),
                destination,
                source,
                wire: hex::encode(wire),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ROUTE", "PAYLOAD", "WIRE", "BYTES"])
                .add_row(vec![
                    format!("{source}>{destination}"),
                    payload_len.to_string(),
                    wire.len().to_string(),
                    hex::encode(wire),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{source}>{destination} payload={payload_len} wire={} {}",
                wire.len(),
                hex::encode(wire)
            );
        }
        OutputFormat::Raw => print_raw(wire),
    }
}

#[derive(Serialize)]
struct DecodedOutput {
    destination: String,
    source: String,
    kind: &'static str,
    control: u16,
    pid: Option<u8>,
    info_len: usize,
    info: String,
    info_hex: String,
}

pub fn print_decoded(frame: &DecodedFrame, format: OutputFormat) {
    let address = frame.address();
    match format {
        OutputFormat::Json => {
            let out = DecodedOutput {
                destination: address.destination.to_string(),
                source: address.source.to_string(),
                kind: kind_name(frame.kind()),
                control: frame.control(),
                pid: frame.pid(),
                info_len: frame.info().len(),
                info: info_preview(frame.info()),
                info_hex: hex::encode(frame.info()),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ROUTE", "KIND", "CONTROL", "PID", "SIZE", "INFO"])
                .add_row(vec![
                    address.to_string(),
                    kind_name(frame.kind()).to_string(),
                    format!("0x{:02X}", frame.control()),
                    pid_label(frame.pid()),
                    frame.info().len().to_string(),
                    info_preview(frame.info()),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{} kind={} control=0x{:02X} pid={} size={} info={}",
                address,
                kind_name(frame.kind()),
                frame.control(),
                pid_label(frame.pid()),
                frame.info().len(),
                info_preview(frame.info())
            );
        }
        OutputFormat::Raw => print_raw(frame.info()),
    }
}

/// One summary record, printed as a JSON object or a two-column table.
pub fn print_summary<T: Serialize>(summary: &T, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(summary),
        OutputFormat::Pretty | OutputFormat::Raw => {
            println!(
                "{}",
                serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let value = serde_json::to_value(summary).unwrap_or(serde_json::Value::Null);
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"]);
            if let serde_json::Value::Object(map) = value {
                for (key, value) in map {
                    let cell = match value {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    };
                    table.add_row(vec![key, cell]);
                }
            }
            println!("{table}");
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn kind_name(kind: FrameKind) -> &'static str {
    match kind {
        FrameKind::Information => "I",
        FrameKind::Supervisory => "S",
        FrameKind::Unnumbered => "U",
        FrameKind::UnnumberedInformation => "UI",
    }
}

fn pid_label(pid: Option<u8>) -> String {
    match pid {
        Some(pid) => format!("0x{pid:02X}"),
        None => "-".to_string(),
    }
}

fn info_preview(info: &[u8]) -> String {
    match std::str::from_utf8(info) {
        Ok(text) => text.to_string(),
        Err(_) => format!("<binary {} bytes>", info.len()),
    }
}
