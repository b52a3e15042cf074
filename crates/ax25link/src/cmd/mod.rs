use std::fs;
use std::path::{Path, PathBuf};

use ax25link_chunk::ChunkConfig;
use ax25link_frame::{LinkConfig, Station};
use clap::{Args, Subcommand};
use serde::{Deserialize, Serialize};

use crate::exit::{io_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod config;
pub mod decode;
pub mod encode;
pub mod matrix;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a payload into one wire frame.
    Encode(EncodeArgs),
    /// Decode one wire frame and print its fields.
    Decode(DecodeArgs),
    /// Split a matrix file into a frame container.
    MatrixEncode(MatrixEncodeArgs),
    /// Reassemble a matrix from a frame container.
    MatrixDecode(MatrixDecodeArgs),
    /// Print the effective configuration.
    Config(ConfigArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, settings: &Settings, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, settings, format),
        Command::Decode(args) => decode::run(args, settings, format),
        Command::MatrixEncode(args) => matrix::encode(args, settings, format),
        Command::MatrixDecode(args) => matrix::decode(args, settings, format),
        Command::Config(args) => config::run(args, settings, format),
        Command::Version(args) => version::run(args),
    }
}

/// Station identity and config file, shared by every subcommand.
#[derive(Args, Debug, Default)]
pub struct LinkArgs {
    /// JSON configuration file (`{"link": {...}, "chunk": {...}}`).
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
    /// Ground station callsign (frame destination).
    #[arg(long, env = "AX25LINK_GROUND_CALLSIGN", global = true)]
    pub ground_callsign: Option<String>,
    /// Ground station SSID.
    #[arg(long, env = "AX25LINK_GROUND_SSID", global = true)]
    pub ground_ssid: Option<u8>,
    /// Satellite callsign (frame source).
    #[arg(long, env = "AX25LINK_SATELLITE_CALLSIGN", global = true)]
    pub satellite_callsign: Option<String>,
    /// Satellite SSID.
    #[arg(long, env = "AX25LINK_SATELLITE_SSID", global = true)]
    pub satellite_ssid: Option<u8>,
}

/// Effective configuration: file values with flag/env overrides applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub link: LinkConfig,
    pub chunk: ChunkConfig,
}

impl Settings {
    pub fn load(args: &LinkArgs) -> CliResult<Self> {
        let mut settings = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let link = &mut settings.link;
        link.ground = override_station(&link.ground, &args.ground_callsign, args.ground_ssid)?;
        link.satellite =
            override_station(&link.satellite, &args.satellite_callsign, args.satellite_ssid)?;
        link.validate()
            .map_err(|err| CliError::new(USAGE, format!("invalid configuration: {err}")))?;
        Ok(settings)
    }

    fn from_file(path: &Path) -> CliResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
        serde_json::from_str(&text).map_err(|err| {
            CliError::new(
                USAGE,
                format!("{} is not a valid configuration: {err}", path.display()),
            )
        })
    }
}

fn override_station(
    base: &Station,
    callsign: &Option<String>,
    ssid: Option<u8>,
) -> CliResult<Station> {
    if callsign.is_none() && ssid.is_none() {
        return Ok(base.clone());
    }
    let callsign = callsign.as_deref().unwrap_or(&base.callsign);
    Station::new(callsign, ssid.unwrap_or(base.ssid))
        .map_err(|err| CliError::new(USAGE, format!("invalid station: {err}")))
}

/// Read a byte payload from exactly one of `--hex` or `--file`.
pub fn read_hex_or_file(hex_arg: &Option<String>, file: &Option<PathBuf>) -> CliResult<Vec<u8>> {
    if let Some(text) = hex_arg {
        return parse_hex(text);
    }
    if let Some(path) = file {
        return read_file(path);
    }
    Err(CliError::new(USAGE, "one of --hex or --file is required"))
}

pub fn read_file(path: &Path) -> CliResult<Vec<u8>> {
    fs::read(path).map_err(|err| io_error(&format!("failed reading {}", path.display()), err))
}

pub fn write_file(path: &Path, data: &[u8]) -> CliResult<()> {
    fs::write(path, data)
        .map_err(|err| io_error(&format!("failed writing {}", path.display()), err))
}

/// Hex digits with optional whitespace between bytes.
pub fn parse_hex(text: &str) -> CliResult<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    hex::decode(compact)
        .map_err(|err| CliError::new(USAGE, format!("--hex is not valid hex: {err}")))
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Raw string payload.
    #[arg(long, conflicts_with_all = ["hex", "file"])]
    pub data: Option<String>,
    /// Hex-encoded payload.
    #[arg(long, conflicts_with_all = ["data", "file"])]
    pub hex: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with_all = ["data", "hex"])]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Hex-encoded wire frame.
    #[arg(long, conflicts_with = "file")]
    pub hex: Option<String>,
    /// Read wire frame from file.
    #[arg(long, conflicts_with = "hex")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct MatrixEncodeArgs {
    /// Row-major matrix file.
    pub input: PathBuf,
    /// Number of rows.
    #[arg(long)]
    pub rows: u16,
    /// Number of columns.
    #[arg(long)]
    pub cols: u16,
    /// Bytes per element.
    #[arg(long, default_value = "1")]
    pub element_size: u8,
    /// Container output file.
    #[arg(long, value_name = "PATH")]
    pub out: PathBuf,
}

#[derive(Args, Debug)]
pub struct MatrixDecodeArgs {
    /// Frame container file.
    pub input: PathBuf,
    /// Number of frames to read. Default: every record in the container.
    #[arg(long)]
    pub frames: Option<usize>,
    /// Matrix output file.
    #[arg(long, value_name = "PATH")]
    pub out: PathBuf,
}

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
