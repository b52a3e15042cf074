use ax25link_frame::{Ax25Codec, FrameKind};
use bytes::BytesMut;

use crate::cmd::{parse_hex, read_file, EncodeArgs, Settings};
use crate::exit::{frame_error, CliResult, SUCCESS};
use crate::output::{print_encoded, OutputFormat};

pub fn run(args: EncodeArgs, settings: &Settings, format: OutputFormat) -> CliResult<i32> {
    let payload = resolve_payload(&args)?;
    let mut codec = Ax25Codec::with_config(settings.link.clone())
        .map_err(|err| frame_error("invalid configuration", err))?;

    let mut wire = BytesMut::new();
    codec
        .encode(&payload, FrameKind::UnnumberedInformation, &mut wire)
        .map_err(|err| frame_error("encode failed", err))?;

    print_encoded(
        &wire,
        payload.len(),
        &settings.link.ground.to_string(),
        &settings.link.satellite.to_string(),
        format,
    );
    Ok(SUCCESS)
}

fn resolve_payload(args: &EncodeArgs) -> CliResult<Vec<u8>> {
    if let Some(data) = &args.data {
        return Ok(data.as_bytes().to_vec());
    }
    if let Some(text) = &args.hex {
        return parse_hex(text);
    }
    if let Some(path) = &args.file {
        return read_file(path);
    }
    Ok(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_payload_is_empty() {
        let args = EncodeArgs {
            data: None,
            hex: None,
            file: None,
        };
        assert!(resolve_payload(&args).unwrap().is_empty());
    }

    #[test]
    fn hex_payload_is_decoded() {
        let args = EncodeArgs {
            data: None,
            hex: Some("7e7e".into()),
            file: None,
        };
        assert_eq!(resolve_payload(&args).unwrap(), vec![0x7E, 0x7E]);
    }
}
