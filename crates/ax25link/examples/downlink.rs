//! Encode a telemetry beacon, corrupt one copy, and receive both.
//!
//! Run with:
//!   cargo run --example downlink

use ax25link::frame::FrameError;
use ax25link::{Ax25Codec, FrameKind};
use bytes::BytesMut;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut codec = Ax25Codec::new();
    let mut wire = BytesMut::new();
    let n = codec.encode(
        b"PARSAT beacon: batt=7.9V temp=21C",
        FrameKind::UnnumberedInformation,
        &mut wire,
    )?;
    let bytes: &[u8] = &wire;
    eprintln!("Encoded {n} wire bytes: {bytes:02X?}");

    let frame = codec.receive(&wire)?;
    eprintln!(
        "Received {} ({} info bytes): {}",
        frame.address(),
        frame.info().len(),
        String::from_utf8_lossy(frame.info())
    );

    let mut corrupted = wire.clone();
    let mid = corrupted.len() / 2;
    corrupted[mid] ^= 0x10;
    match codec.receive(&corrupted) {
        Ok(_) => eprintln!("Corrupted frame slipped through"),
        Err(err @ FrameError::ChecksumMismatch { .. }) => eprintln!("Rejected: {err}"),
        Err(err) => eprintln!("Rejected before FCS check: {err}"),
    }
    Ok(())
}
