use ax25link_chunk::{ChunkCodec, ContainerReader};
use serde::Serialize;
use tracing::info;

use crate::cmd::{read_file, write_file, MatrixDecodeArgs, MatrixEncodeArgs, Settings};
use crate::exit::{chunk_error, CliResult, SUCCESS};
use crate::output::{print_summary, OutputFormat};

#[derive(Serialize)]
struct MatrixSummary {
    rows: u16,
    cols: u16,
    element_size: u8,
    matrix_len: usize,
    frame_count: usize,
    container_len: usize,
    out: String,
}

fn chunk_codec(settings: &Settings) -> CliResult<ChunkCodec> {
    ChunkCodec::with_config(settings.link.clone(), settings.chunk)
        .map_err(|err| chunk_error("invalid configuration", err))
}

pub fn encode(args: MatrixEncodeArgs, settings: &Settings, format: OutputFormat) -> CliResult<i32> {
    let matrix = read_file(&args.input)?;
    let mut codec = chunk_codec(settings)?;
    let encoded = codec
        .encode_matrix(&matrix, args.rows, args.cols, args.element_size)
        .map_err(|err| chunk_error("matrix encode failed", err))?;
    write_file(&args.out, &encoded.container)?;
    info!(
        frames = encoded.frame_count,
        out = %args.out.display(),
        "wrote frame container"
    );

    print_summary(
        &MatrixSummary {
            rows: args.rows,
            cols: args.cols,
            element_size: args.element_size,
            matrix_len: matrix.len(),
            frame_count: encoded.frame_count,
            container_len: encoded.container.len(),
            out: args.out.display().to_string(),
        },
        format,
    );
    Ok(SUCCESS)
}

pub fn decode(args: MatrixDecodeArgs, settings: &Settings, format: OutputFormat) -> CliResult<i32> {
    let container = read_file(&args.input)?;
    let frame_count = match args.frames {
        Some(count) => count,
        None => count_records(&container, settings)?,
    };

    let mut codec = chunk_codec(settings)?;
    let decoded = codec
        .decode_matrix(&container, frame_count)
        .map_err(|err| chunk_error("matrix decode failed", err))?;
    write_file(&args.out, &decoded.data)?;
    info!(
        bytes = decoded.data.len(),
        out = %args.out.display(),
        "wrote matrix"
    );

    print_summary(
        &MatrixSummary {
            rows: decoded.rows,
            cols: decoded.cols,
            element_size: decoded.element_size,
            matrix_len: decoded.data.len(),
            frame_count,
            container_len: container.len(),
            out: args.out.display().to_string(),
        },
        format,
    );
    Ok(SUCCESS)
}

fn count_records(container: &[u8], settings: &Settings) -> CliResult<usize> {
    let mut count = 0;
    for record in ContainerReader::new(container, settings.chunk.max_frame_len) {
        record.map_err(|err| chunk_error("malformed container", err))?;
        count += 1;
    }
    Ok(count)
}
