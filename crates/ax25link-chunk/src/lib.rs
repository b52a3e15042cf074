//! Matrix chunking over AX.25 UI frames.
//!
//! A row-major matrix is split into chunks that each fit one info field
//! behind an 11-byte metadata header. Encoded frames are concatenated into a
//! container of `[len: u16 BE][wire frame]` records, and reassembly rejects
//! the matrix if any chunk fails.

pub mod config;
pub mod container;
pub mod error;
pub mod matrix;
pub mod metadata;

pub use config::{ChunkConfig, ChunkOrdering};
pub use container::{append_frame, ContainerReader, LEN_PREFIX};
pub use error::{ChunkError, Result};
pub use matrix::{ChunkCodec, DecodedMatrix, EncodedMatrix};
pub use metadata::{ChunkMetadata, METADATA_LEN};
