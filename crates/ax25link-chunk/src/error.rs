use ax25link_frame::FrameError;

/// Errors that can occur while chunking or reassembling a matrix.
#[derive(Debug, thiserror::Error)]
pub enum ChunkError {
    /// A container length prefix is zero or above the safety ceiling.
    #[error("chunk {index}: frame length {len} outside 1..={max}")]
    ChunkLengthInvalid { index: usize, len: usize, max: usize },

    /// The container ends before the declared frame does.
    #[error("chunk {index}: container truncated (need {needed} bytes, have {available})")]
    IncompleteContainer {
        index: usize,
        needed: usize,
        available: usize,
    },

    /// One chunk's frame failed to decode; the whole matrix is rejected.
    #[error("chunk {index} failed to decode: {source}")]
    PartialChunkFailure {
        index: usize,
        #[source]
        source: FrameError,
    },

    /// One chunk's frame failed to encode; no container is produced.
    #[error("chunk {index} failed to encode: {source}")]
    EncodeFailed {
        index: usize,
        #[source]
        source: FrameError,
    },

    /// Link configuration error.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Rows or columns above the configured maxima.
    #[error("matrix {rows}x{cols} exceeds configured maximum {max_rows}x{max_cols}")]
    DimensionsExceeded {
        rows: u16,
        cols: u16,
        max_rows: u16,
        max_cols: u16,
    },

    /// A zero row count, column count or element size.
    #[error("matrix has no elements")]
    EmptyMatrix,

    /// The matrix buffer does not hold rows x cols x element_size bytes.
    #[error("matrix buffer is {actual} bytes, expected {expected}")]
    MatrixSizeMismatch { expected: usize, actual: usize },

    /// More chunks than the 16-bit counter can carry.
    #[error("matrix needs {chunks} chunks (max {max})")]
    TooManyChunks { chunks: usize, max: usize },

    /// A chunk's metadata header is malformed or out of range.
    #[error("chunk {index}: invalid metadata ({reason})")]
    InvalidMetadata { index: usize, reason: String },

    /// A chunk disagrees with the first chunk on a shared field.
    #[error("chunk {index}: {field} differs from the first chunk")]
    InconsistentMetadata { index: usize, field: &'static str },

    /// Two chunks carry the same index.
    #[error("chunk index {0} received twice")]
    DuplicateChunk(u16),

    /// A chunk index never arrived.
    #[error("chunk index {0} missing")]
    MissingChunk(u16),

    /// Reassembled byte count does not match the declared matrix size.
    #[error("reassembled {received} of {expected} matrix bytes")]
    IncompleteMatrix { expected: usize, received: usize },

    /// The chunk configuration is inconsistent with the link limits.
    #[error("invalid chunk configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ChunkError>;
