//! Per-chunk metadata header carried at the start of every info field.
//!
//! ```text
//! ┌──────────────┬─────────────┬──────┬──────┬──────────┬──────────────┐
//! │ total_chunks │ chunk_index │ rows │ cols │ data_len │ element_size │
//! │ (2B BE)      │ (2B BE)     │ (2B) │ (2B) │ (2B BE)  │ (1B)         │
//! └──────────────┴─────────────┴──────┴──────┴──────────┴──────────────┘
//! ```

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{ChunkError, Result};

/// Encoded header length.
pub const METADATA_LEN: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkMetadata {
    pub total_chunks: u16,
    pub chunk_index: u16,
    pub rows: u16,
    pub cols: u16,
    /// Data bytes carried by this chunk.
    pub data_len: u16,
    pub element_size: u8,
}

impl ChunkMetadata {
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.reserve(METADATA_LEN);
        dst.put_u16(self.total_chunks);
        dst.put_u16(self.chunk_index);
        dst.put_u16(self.rows);
        dst.put_u16(self.cols);
        dst.put_u16(self.data_len);
        dst.put_u8(self.element_size);
    }

    /// Read a header from the start of `src`; `index` is the chunk's position
    /// in the container, used for error context.
    pub fn decode(mut src: &[u8], index: usize) -> Result<Self> {
        if src.len() < METADATA_LEN {
            return Err(ChunkError::InvalidMetadata {
                index,
                reason: format!("info field is {} bytes, header needs {METADATA_LEN}", src.len()),
            });
        }
        Ok(Self {
            total_chunks: src.get_u16(),
            chunk_index: src.get_u16(),
            rows: src.get_u16(),
            cols: src.get_u16(),
            data_len: src.get_u16(),
            element_size: src.get_u8(),
        })
    }

    /// Bytes in the whole matrix as declared by this header.
    pub fn matrix_len(&self) -> usize {
        usize::from(self.rows) * usize::from(self.cols) * usize::from(self.element_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn big_endian_layout() {
        let meta = ChunkMetadata {
            total_chunks: 0x0102,
            chunk_index: 0x0304,
            rows: 5,
            cols: 6,
            data_len: 0x00E5,
            element_size: 4,
        };
        let mut buf = BytesMut::new();
        meta.encode(&mut buf);
        assert_eq!(
            buf.as_ref(),
            &[0x01, 0x02, 0x03, 0x04, 0x00, 0x05, 0x00, 0x06, 0x00, 0xE5, 0x04]
        );
        assert_eq!(ChunkMetadata::decode(&buf, 0).unwrap(), meta);
        assert_eq!(meta.matrix_len(), 120);
    }

    #[test]
    fn decode_ignores_trailing_data() {
        let mut buf = BytesMut::new();
        ChunkMetadata {
            total_chunks: 1,
            chunk_index: 0,
            rows: 1,
            cols: 3,
            data_len: 3,
            element_size: 1,
        }
        .encode(&mut buf);
        buf.extend_from_slice(&[9, 9, 9]);
        assert_eq!(ChunkMetadata::decode(&buf, 0).unwrap().data_len, 3);
    }

    #[test]
    fn short_header_rejected() {
        let err = ChunkMetadata::decode(&[0u8; 10], 4).unwrap_err();
        assert!(matches!(err, ChunkError::InvalidMetadata { index: 4, .. }));
    }
}
