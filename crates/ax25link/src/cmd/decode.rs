use ax25link_frame::Ax25Codec;

use crate::cmd::{read_hex_or_file, DecodeArgs, Settings};
use crate::exit::{frame_error, CliResult, SUCCESS};
use crate::output::{print_decoded, OutputFormat};

pub fn run(args: DecodeArgs, settings: &Settings, format: OutputFormat) -> CliResult<i32> {
    let wire = read_hex_or_file(&args.hex, &args.file)?;
    let mut codec = Ax25Codec::with_config(settings.link.clone())
        .map_err(|err| frame_error("invalid configuration", err))?;

    let frame = codec
        .receive(&wire)
        .map_err(|err| frame_error("decode failed", err))?;
    print_decoded(&frame, format);
    Ok(SUCCESS)
}
