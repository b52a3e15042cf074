use std::fmt;

use crate::frame::FrameKind;

/// Where the flag search gave up while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    /// No opening flag anywhere in the bit array.
    Start,
    /// An opening flag was found but the bits ran out before a closing one.
    Stop,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStage::Start => f.write_str("start"),
            SyncStage::Stop => f.write_str("stop"),
        }
    }
}

/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// An info, control, address or buffer length is outside its allowed set.
    #[error("invalid {field} length ({len} bytes, max {max})")]
    InvalidLength {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// The run of consecutive one bits reached the hard ceiling; the frame is dropped.
    #[error("run of {run} high bits reached the stuffing ceiling of {ceiling}")]
    StuffingOverflow { run: usize, ceiling: usize },

    /// No synchronization flag was located.
    #[error("{0} flag not found")]
    SyncNotFound(SyncStage),

    /// The recomputed frame check sequence does not match the received one.
    #[error("FCS mismatch (expected {expected:#06x}, received {actual:#06x})")]
    ChecksumMismatch { expected: u16, actual: u16 },

    /// A callsign is empty or carries characters outside `[A-Z0-9]`.
    #[error("invalid callsign {0:?}")]
    InvalidCallsign(String),

    /// An SSID outside 0..=15.
    #[error("invalid SSID {0} (must be 0-15)")]
    InvalidSsid(u8),

    /// The codec has no control field mapping for this frame kind.
    #[error("frame kind {0:?} is not supported by the encoder")]
    UnsupportedFrameKind(FrameKind),

    /// The link configuration is inconsistent.
    #[error("invalid link configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FrameError>;
