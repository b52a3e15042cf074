//! AX.25 UI framing and matrix chunking for satellite downlinks.
//!
//! # Crate Structure
//!
//! - [`frame`]: FCS, address codec, frame assembly, bit stuffing and the
//!   `Ax25Codec` encode/receive pipeline
//! - [`chunk`]: matrix chunking with per-chunk metadata and the
//!   length-prefixed frame container

/// Re-export frame types.
pub mod frame {
    pub use ax25link_frame::*;
}

/// Re-export chunk types.
pub mod chunk {
    pub use ax25link_chunk::*;
}

pub use ax25link_chunk::{ChunkCodec, ChunkConfig, ChunkError, DecodedMatrix, EncodedMatrix};
pub use ax25link_frame::{Ax25Codec, DecodedFrame, FrameError, FrameKind, LinkConfig};
