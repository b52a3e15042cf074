//! Bit-level transport encoding.
//!
//! Bits are held one per `u8` slot (`0` or `1`). Frame bytes are expanded
//! LSB first, as AX.25 transmits them. Wire bytes pack that sequence MSB
//! first, so `unpack_bits(pack_bits(x))` returns `x` plus the zero pad bits.

use bytes::{BufMut, BytesMut};
use tracing::trace;

use crate::address::ADDR_LEN;
use crate::error::{FrameError, Result, SyncStage};
use crate::frame::{FCS_LEN, FLAG_LEN, MAX_FRAME_LEN};

/// The synchronization flag `0x7E` as a bit pattern.
pub const SYNC_FLAG_BITS: [u8; 8] = [0, 1, 1, 1, 1, 1, 1, 0];

/// Flag length in bits.
pub const SYNC_LEN: usize = SYNC_FLAG_BITS.len();

/// A zero is inserted after this many consecutive ones.
pub const STUFF_RUN: usize = 5;

/// Default hard ceiling on a run of data ones before a frame is dropped.
pub const DEFAULT_MAX_ONES_RUN: usize = 14;

/// Largest body (address through FCS) between the flags.
pub const MAX_BODY_LEN: usize = MAX_FRAME_LEN - 2 * FLAG_LEN;

const MAX_BODY_BITS: usize = MAX_BODY_LEN * 8;

/// Largest stuffed bit sequence, both flags included.
pub const MAX_STUFFED_BITS: usize = 2 * SYNC_LEN + MAX_BODY_BITS + MAX_BODY_BITS / STUFF_RUN;

/// Largest packed wire frame in bytes.
pub const MAX_WIRE_LEN: usize = MAX_STUFFED_BITS.div_ceil(8);

/// Capacity of a [`BitBuffer`]: every bit of the largest wire frame.
pub const BIT_CAPACITY: usize = MAX_WIRE_LEN * 8;

/// Fixed-capacity bit array with explicit length.
#[derive(Clone)]
pub struct BitBuffer {
    bits: [u8; BIT_CAPACITY],
    len: usize,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self {
            bits: [0; BIT_CAPACITY],
            len: 0,
        }
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        BIT_CAPACITY
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bits[..self.len]
    }

    /// Append one bit (any non-zero value counts as `1`).
    pub fn push(&mut self, bit: u8) -> Result<()> {
        if self.len == BIT_CAPACITY {
            return Err(FrameError::InvalidLength {
                field: "bit buffer",
                len: self.len + 1,
                max: BIT_CAPACITY,
            });
        }
        self.bits[self.len] = u8::from(bit != 0);
        self.len += 1;
        Ok(())
    }

    pub fn extend_from_slice(&mut self, bits: &[u8]) -> Result<()> {
        if self.len + bits.len() > BIT_CAPACITY {
            return Err(FrameError::InvalidLength {
                field: "bit buffer",
                len: self.len + bits.len(),
                max: BIT_CAPACITY,
            });
        }
        for &bit in bits {
            self.bits[self.len] = u8::from(bit != 0);
            self.len += 1;
        }
        Ok(())
    }
}

impl Default for BitBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BitBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitBuffer").field("len", &self.len).finish()
    }
}

/// Bit-stuff a framed byte sequence into `out`.
///
/// `frame` must start and end with its flag bytes; those are replaced by
/// unstuffed sync patterns. Fails with [`FrameError::StuffingOverflow`] once
/// a run of data ones reaches `max_ones_run`, counting across stuffed zeros.
pub fn bit_stuff(frame: &[u8], max_ones_run: usize, out: &mut BitBuffer) -> Result<()> {
    if frame.len() < 2 * FLAG_LEN {
        return Err(FrameError::InvalidLength {
            field: "frame",
            len: frame.len(),
            max: MAX_FRAME_LEN,
        });
    }

    out.clear();
    out.extend_from_slice(&SYNC_FLAG_BITS)?;

    let body = &frame[FLAG_LEN..frame.len() - FLAG_LEN];
    let mut run = 0usize;
    let mut total_run = 0usize;
    let mut stuffed = 0usize;

    for &byte in body {
        for i in 0..8 {
            let bit = (byte >> i) & 1;
            out.push(bit)?;
            if bit == 0 {
                run = 0;
                total_run = 0;
                continue;
            }

            run += 1;
            total_run += 1;
            if total_run >= max_ones_run {
                return Err(FrameError::StuffingOverflow {
                    run: total_run,
                    ceiling: max_ones_run,
                });
            }
            if run == STUFF_RUN {
                out.push(0)?;
                run = 0;
                stuffed += 1;
            }
        }
    }

    out.extend_from_slice(&SYNC_FLAG_BITS)?;
    trace!(body_len = body.len(), stuffed, bits = out.len(), "bit stuffed frame");
    Ok(())
}

/// Pack bits MSB first into bytes appended to `dst`, zero-padding the last byte.
///
/// Returns the number of pad bits added.
pub fn pack_bits(bits: &[u8], dst: &mut BytesMut) -> usize {
    dst.reserve(bits.len().div_ceil(8));
    let mut chunks = bits.chunks_exact(8);
    for chunk in &mut chunks {
        dst.put_u8(chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | (bit & 1)));
    }

    let rest = chunks.remainder();
    if rest.is_empty() {
        return 0;
    }
    let pad = 8 - rest.len();
    let partial = rest.iter().fold(0u8, |acc, &bit| (acc << 1) | (bit & 1));
    dst.put_u8(partial << pad);
    pad
}

/// Expand wire bytes into one bit per slot, MSB first.
pub fn unpack_bits(wire: &[u8], out: &mut BitBuffer) -> Result<()> {
    if wire.len() > MAX_WIRE_LEN {
        return Err(FrameError::InvalidLength {
            field: "wire frame",
            len: wire.len(),
            max: MAX_WIRE_LEN,
        });
    }
    out.clear();
    for &byte in wire {
        for i in (0..8).rev() {
            out.push((byte >> i) & 1)?;
        }
    }
    Ok(())
}

/// Bit positions of the recovered frame inside the searched bit array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBounds {
    /// First bit after the opening flag.
    pub start: usize,
    /// First bit of the closing flag.
    pub stop: usize,
    /// Unstuffed body bytes written (address through FCS).
    pub len: usize,
}

#[derive(Debug, Clone, Copy)]
enum DeframeState {
    Searching,
    Framing { start: usize },
    Done { start: usize, stop: usize },
}

fn flag_at(bits: &[u8], pos: usize) -> bool {
    bits.get(pos..pos + SYNC_LEN) == Some(&SYNC_FLAG_BITS[..])
}

/// Locate a flag-delimited frame in `bits`, destuff its body and append the
/// bytes (address through FCS) to `dst`.
///
/// Back-to-back flags before the body are treated as idle fill. On error
/// `dst` is restored to its original length.
pub fn deframe(bits: &[u8], dst: &mut BytesMut) -> Result<FrameBounds> {
    let base = dst.len();
    let result = deframe_into(bits, dst, base);
    if result.is_err() {
        dst.truncate(base);
    }
    result
}

fn deframe_into(bits: &[u8], dst: &mut BytesMut, base: usize) -> Result<FrameBounds> {
    let mut state = DeframeState::Searching;
    let mut pos = 0usize;
    let mut run = 0usize;
    let mut acc = 0u8;
    let mut filled = 0usize;

    loop {
        match state {
            DeframeState::Searching => {
                if pos + SYNC_LEN > bits.len() {
                    return Err(FrameError::SyncNotFound(SyncStage::Start));
                }
                if flag_at(bits, pos) {
                    pos += SYNC_LEN;
                    state = DeframeState::Framing { start: pos };
                } else {
                    pos += 1;
                }
            }
            DeframeState::Framing { start } => {
                if pos + SYNC_LEN > bits.len() {
                    return Err(FrameError::SyncNotFound(SyncStage::Stop));
                }
                if flag_at(bits, pos) {
                    state = if pos == start {
                        pos += SYNC_LEN;
                        DeframeState::Framing { start: pos }
                    } else {
                        DeframeState::Done { start, stop: pos }
                    };
                    continue;
                }

                let bit = bits[pos] & 1;
                pos += 1;

                // A zero after five ones is a stuffed bit. A longer run of ones
                // stays data and is left for the FCS to judge.
                if run == STUFF_RUN && bit == 0 {
                    run = 0;
                    continue;
                }
                run = if bit == 1 { run + 1 } else { 0 };

                acc |= bit << filled;
                filled += 1;
                if filled == 8 {
                    if dst.len() - base == MAX_BODY_LEN {
                        return Err(FrameError::InvalidLength {
                            field: "frame",
                            len: MAX_BODY_LEN + 1,
                            max: MAX_BODY_LEN,
                        });
                    }
                    dst.put_u8(acc);
                    acc = 0;
                    filled = 0;
                }
            }
            DeframeState::Done { start, stop } => {
                if filled != 0 {
                    trace!(dangling = filled, "dropping partial byte before stop flag");
                }
                let len = dst.len() - base;
                if len < ADDR_LEN + FCS_LEN {
                    return Err(FrameError::InvalidLength {
                        field: "frame",
                        len,
                        max: MAX_BODY_LEN,
                    });
                }
                trace!(start, stop, len, "deframed body");
                return Ok(FrameBounds { start, stop, len });
            }
        }
    }
}
