//! Frame container: `[len: u16 BE][len bytes of wire frame]`, repeated.

use bytes::{BufMut, BytesMut};

use crate::error::{ChunkError, Result};

/// Length prefix size.
pub const LEN_PREFIX: usize = 2;

/// Append one length-prefixed wire frame to `dst`.
pub fn append_frame(dst: &mut BytesMut, frame: &[u8], index: usize) -> Result<()> {
    let len = u16::try_from(frame.len()).map_err(|_| ChunkError::ChunkLengthInvalid {
        index,
        len: frame.len(),
        max: usize::from(u16::MAX),
    })?;
    if len == 0 {
        return Err(ChunkError::ChunkLengthInvalid {
            index,
            len: 0,
            max: usize::from(u16::MAX),
        });
    }
    dst.reserve(LEN_PREFIX + frame.len());
    dst.put_u16(len);
    dst.put_slice(frame);
    Ok(())
}

/// Iterates the frames of a container, validating each length prefix.
///
/// Yields `Err` once and then stops on the first malformed record.
pub struct ContainerReader<'a> {
    buf: &'a [u8],
    pos: usize,
    index: usize,
    max_frame_len: usize,
    failed: bool,
}

impl<'a> ContainerReader<'a> {
    pub fn new(buf: &'a [u8], max_frame_len: usize) -> Self {
        Self {
            buf,
            pos: 0,
            index: 0,
            max_frame_len,
            failed: false,
        }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    fn read_next(&mut self) -> Result<&'a [u8]> {
        let index = self.index;
        let rest = self.remaining();
        if rest.len() < LEN_PREFIX {
            return Err(ChunkError::IncompleteContainer {
                index,
                needed: LEN_PREFIX,
                available: rest.len(),
            });
        }
        let len = usize::from(u16::from_be_bytes([rest[0], rest[1]]));
        if len == 0 || len > self.max_frame_len {
            return Err(ChunkError::ChunkLengthInvalid {
                index,
                len,
                max: self.max_frame_len,
            });
        }
        let body = &rest[LEN_PREFIX..];
        if body.len() < len {
            return Err(ChunkError::IncompleteContainer {
                index,
                needed: len,
                available: body.len(),
            });
        }
        self.pos += LEN_PREFIX + len;
        self.index += 1;
        Ok(&body[..len])
    }
}

impl<'a> Iterator for ContainerReader<'a> {
    type Item = Result<&'a [u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos == self.buf.len() {
            return None;
        }
        let item = self.read_next();
        self.failed = item.is_err();
        Some(item)
    }
}
