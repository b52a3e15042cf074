use ax25link_frame::{Ax25Codec, FrameKind, LinkConfig};
use bytes::{Bytes, BytesMut};
use tracing::{debug, warn};

use crate::config::{ChunkConfig, ChunkOrdering};
use crate::container::{append_frame, ContainerReader};
use crate::error::{ChunkError, Result};
use crate::metadata::{ChunkMetadata, METADATA_LEN};

/// A matrix split into a frame container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMatrix {
    /// `[len][wire frame]` records, one per chunk.
    pub container: Bytes,
    /// Number of frames in the container.
    pub frame_count: usize,
}

/// A reassembled matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMatrix {
    /// Row-major element bytes, exactly as handed to the encoder.
    pub data: Bytes,
    pub rows: u16,
    pub cols: u16,
    pub element_size: u8,
}

/// Splits matrices into AX.25 UI frames and reassembles them.
pub struct ChunkCodec {
    codec: Ax25Codec,
    config: ChunkConfig,
    chunk_capacity: usize,
}

impl ChunkCodec {
    /// Create a chunk codec with default link and chunk configuration.
    pub fn new() -> Self {
        let codec = Ax25Codec::new();
        let chunk_capacity = codec.config().max_info_len - METADATA_LEN;
        Self {
            codec,
            config: ChunkConfig::default(),
            chunk_capacity,
        }
    }

    /// Create a chunk codec with explicit configuration.
    pub fn with_config(link: LinkConfig, config: ChunkConfig) -> Result<Self> {
        if link.max_info_len <= METADATA_LEN {
            return Err(ChunkError::Config(format!(
                "max_info_len {} leaves no room after the {METADATA_LEN}-byte chunk header",
                link.max_info_len
            )));
        }
        if config.max_frame_len == 0 {
            return Err(ChunkError::Config("max_frame_len must be positive".into()));
        }
        let chunk_capacity = link.max_info_len - METADATA_LEN;
        let codec = Ax25Codec::with_config(link)?;
        Ok(Self {
            codec,
            config,
            chunk_capacity,
        })
    }

    /// Data bytes carried per chunk.
    pub fn chunk_capacity(&self) -> usize {
        self.chunk_capacity
    }

    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    pub fn link_config(&self) -> &LinkConfig {
        self.codec.config()
    }

    fn check_dimensions(&self, rows: u16, cols: u16, element_size: u8) -> Result<usize> {
        if rows > self.config.max_rows || cols > self.config.max_cols {
            return Err(ChunkError::DimensionsExceeded {
                rows,
                cols,
                max_rows: self.config.max_rows,
                max_cols: self.config.max_cols,
            });
        }
        if rows == 0 || cols == 0 || element_size == 0 {
            return Err(ChunkError::EmptyMatrix);
        }
        Ok(usize::from(rows) * usize::from(cols) * usize::from(element_size))
    }

    /// Split `matrix` (row-major, `rows * cols * element_size` bytes) into
    /// metadata-tagged chunks, one UI frame each.
    ///
    /// Fails as a whole if any chunk fails to encode.
    pub fn encode_matrix(
        &mut self,
        matrix: &[u8],
        rows: u16,
        cols: u16,
        element_size: u8,
    ) -> Result<EncodedMatrix> {
        let total = self.check_dimensions(rows, cols, element_size)?;
        if matrix.len() != total {
            return Err(ChunkError::MatrixSizeMismatch {
                expected: total,
                actual: matrix.len(),
            });
        }

        let chunks = total.div_ceil(self.chunk_capacity);
        let total_chunks = u16::try_from(chunks).map_err(|_| ChunkError::TooManyChunks {
            chunks,
            max: usize::from(u16::MAX),
        })?;

        let mut container = BytesMut::new();
        let mut info = BytesMut::with_capacity(METADATA_LEN + self.chunk_capacity);
        let mut wire = BytesMut::new();

        for (index, data) in matrix.chunks(self.chunk_capacity).enumerate() {
            let meta = ChunkMetadata {
                total_chunks,
                // Both fit: index < chunks <= u16::MAX, data.len() <= 229.
                chunk_index: index as u16,
                rows,
                cols,
                data_len: data.len() as u16,
                element_size,
            };
            info.clear();
            meta.encode(&mut info);
            info.extend_from_slice(data);

            wire.clear();
            self.codec
                .encode(&info, FrameKind::UnnumberedInformation, &mut wire)
                .map_err(|source| ChunkError::EncodeFailed { index, source })?;
            append_frame(&mut container, &wire, index)?;
        }

        debug!(
            rows,
            cols,
            element_size,
            bytes = total,
            frames = chunks,
            container_len = container.len(),
            "encoded matrix"
        );
        Ok(EncodedMatrix {
            container: container.freeze(),
            frame_count: chunks,
        })
    }

    /// Reassemble a matrix from the first `frame_count` frames of `container`.
    ///
    /// Any chunk that fails to decode rejects the whole matrix.
    pub fn decode_matrix(
        &mut self,
        container: &[u8],
        frame_count: usize,
    ) -> Result<DecodedMatrix> {
        if frame_count == 0 {
            return Err(ChunkError::MissingChunk(0));
        }

        let mut reader = ContainerReader::new(container, self.config.max_frame_len);
        let mut assembly: Option<Assembly> = None;

        for index in 0..frame_count {
            let wire = match reader.next() {
                Some(record) => record?,
                None => {
                    return Err(ChunkError::IncompleteContainer {
                        index,
                        needed: crate::container::LEN_PREFIX,
                        available: 0,
                    })
                }
            };
            let frame = self
                .codec
                .receive(wire)
                .map_err(|source| ChunkError::PartialChunkFailure { index, source })?;

            let info = frame.info();
            let meta = ChunkMetadata::decode(info, index)?;
            let data = &info[METADATA_LEN..];
            if data.len() != usize::from(meta.data_len) {
                return Err(ChunkError::InvalidMetadata {
                    index,
                    reason: format!(
                        "data_len {} but frame carries {} bytes",
                        meta.data_len,
                        data.len()
                    ),
                });
            }

            let asm = match assembly.take() {
                Some(asm) => {
                    asm.check_consistent(&meta, index)?;
                    asm
                }
                None => self.start_assembly(&meta, frame_count, index)?,
            };
            assembly
                .insert(asm)
                .place(&meta, data, index, self.config.ordering, self.chunk_capacity)?;
        }

        if !reader.remaining().is_empty() {
            warn!(
                trailing = reader.remaining().len(),
                "ignoring bytes after the last counted frame"
            );
        }

        let asm = assembly.ok_or(ChunkError::MissingChunk(0))?;
        asm.finish(self.config.ordering)
    }

    fn start_assembly(
        &self,
        meta: &ChunkMetadata,
        frame_count: usize,
        index: usize,
    ) -> Result<Assembly> {
        self.check_dimensions(meta.rows, meta.cols, meta.element_size)?;
        let total = meta.matrix_len();
        let expected_chunks = total.div_ceil(self.chunk_capacity);
        if usize::from(meta.total_chunks) != expected_chunks {
            return Err(ChunkError::InvalidMetadata {
                index,
                reason: format!(
                    "total_chunks {} but a {}-byte matrix needs {expected_chunks}",
                    meta.total_chunks, total
                ),
            });
        }
        if frame_count != expected_chunks {
            warn!(
                frame_count,
                total_chunks = meta.total_chunks,
                "frame count differs from declared chunk count"
            );
        }
        Ok(Assembly {
            first: *meta,
            data: BytesMut::zeroed(total),
            seen: vec![false; expected_chunks],
            filled: 0,
        })
    }
}

impl Default for ChunkCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Reassembly state, shaped by the first chunk.
struct Assembly {
    first: ChunkMetadata,
    data: BytesMut,
    seen: Vec<bool>,
    filled: usize,
}

impl Assembly {
    fn check_consistent(&self, meta: &ChunkMetadata, index: usize) -> Result<()> {
        let field = if meta.total_chunks != self.first.total_chunks {
            "total_chunks"
        } else if meta.rows != self.first.rows {
            "rows"
        } else if meta.cols != self.first.cols {
            "cols"
        } else if meta.element_size != self.first.element_size {
            "element_size"
        } else {
            return Ok(());
        };
        Err(ChunkError::InconsistentMetadata { index, field })
    }

    fn place(
        &mut self,
        meta: &ChunkMetadata,
        data: &[u8],
        index: usize,
        ordering: ChunkOrdering,
        capacity: usize,
    ) -> Result<()> {
        let offset = match ordering {
            ChunkOrdering::ByIndex => {
                let slot = usize::from(meta.chunk_index);
                if slot >= self.seen.len() {
                    return Err(ChunkError::InvalidMetadata {
                        index,
                        reason: format!(
                            "chunk_index {} outside 0..{}",
                            meta.chunk_index,
                            self.seen.len()
                        ),
                    });
                }
                if self.seen[slot] {
                    return Err(ChunkError::DuplicateChunk(meta.chunk_index));
                }
                let offset = slot * capacity;
                let expected_len = capacity.min(self.data.len() - offset);
                if data.len() != expected_len {
                    return Err(ChunkError::InvalidMetadata {
                        index,
                        reason: format!(
                            "chunk_index {} carries {} bytes, expected {expected_len}",
                            meta.chunk_index,
                            data.len()
                        ),
                    });
                }
                self.seen[slot] = true;
                offset
            }
            ChunkOrdering::Arrival => self.filled,
        };

        let end = offset + data.len();
        if end > self.data.len() {
            return Err(ChunkError::IncompleteMatrix {
                expected: self.data.len(),
                received: end,
            });
        }
        self.data[offset..end].copy_from_slice(data);
        self.filled += data.len();
        Ok(())
    }

    fn finish(self, ordering: ChunkOrdering) -> Result<DecodedMatrix> {
        if ordering == ChunkOrdering::ByIndex {
            if let Some(missing) = self.seen.iter().position(|seen| !seen) {
                return Err(ChunkError::MissingChunk(missing as u16));
            }
        }
        if self.filled != self.data.len() {
            return Err(ChunkError::IncompleteMatrix {
                expected: self.data.len(),
                received: self.filled,
            });
        }
        debug!(
            rows = self.first.rows,
            cols = self.first.cols,
            element_size = self.first.element_size,
            bytes = self.filled,
            "reassembled matrix"
        );
        Ok(DecodedMatrix {
            data: self.data.freeze(),
            rows: self.first.rows,
            cols: self.first.cols,
            element_size: self.first.element_size,
        })
    }
}
