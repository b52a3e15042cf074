//! AX.25 UI-frame codec for packet-radio and small-satellite links.
//!
//! A payload becomes a synchronized, bit-stuffed HDLC-style frame:
//! - A 14-byte address field (destination + source callsign/SSID)
//! - A 1- or 2-byte control field and, for I/UI frames, a PID byte
//! - A CRC-16/CCITT frame check sequence over address through info
//! - `0x7E` flags on both ends, never bit-stuffed
//!
//! The receive path searches for the flags, removes stuffed bits and only
//! hands back a frame whose FCS verifies.

pub mod address;
pub mod bits;
pub mod codec;
pub mod config;
pub mod crc;
pub mod error;
pub mod frame;

pub use address::{pack_address, Address, Station, ADDR_LEN, CALLSIGN_LEN, MAX_SSID};
pub use bits::{
    bit_stuff, deframe, pack_bits, unpack_bits, BitBuffer, FrameBounds, MAX_WIRE_LEN,
    SYNC_FLAG_BITS,
};
pub use codec::Ax25Codec;
pub use config::LinkConfig;
pub use crc::fcs;
pub use error::{FrameError, Result, SyncStage};
pub use frame::{
    assemble, verify_fcs, DecodedFrame, FrameKind, CTRL_UI, FLAG, MAX_FRAME_LEN, MAX_INFO_LEN,
    PID_NO_LAYER3,
};
