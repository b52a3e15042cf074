//! Send a small image-like matrix as a frame container and reassemble it.
//!
//! Run with:
//!   cargo run --example matrix-transfer

use ax25link::ChunkCodec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (rows, cols) = (32u16, 24u16);
    let matrix: Vec<u8> = (0..usize::from(rows) * usize::from(cols))
        .map(|i| (i % 97) as u8)
        .collect();

    let mut codec = ChunkCodec::new();
    let encoded = codec.encode_matrix(&matrix, rows, cols, 1)?;
    eprintln!(
        "{}x{} matrix -> {} frames, {} container bytes ({} data bytes per chunk)",
        rows,
        cols,
        encoded.frame_count,
        encoded.container.len(),
        codec.chunk_capacity()
    );

    let decoded = codec.decode_matrix(&encoded.container, encoded.frame_count)?;
    assert_eq!(decoded.data.as_ref(), matrix.as_slice());
    eprintln!("Reassembled {} bytes intact", decoded.data.len());
    Ok(())
}
