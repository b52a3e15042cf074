use bytes::{Bytes, BytesMut};
use tracing::{debug, warn};

use crate::address::ADDR_LEN;
use crate::bits::{bit_stuff, deframe, pack_bits, unpack_bits, BitBuffer};
use crate::config::LinkConfig;
use crate::error::{FrameError, Result};
use crate::frame::{assemble, verify_fcs, DecodedFrame, FrameKind, CTRL_UI, MAX_FRAME_LEN};

/// Encodes payloads into wire frames and receives them back.
///
/// Station identity is fixed at construction. Scratch buffers are owned by
/// the codec and reused across calls; use one codec per execution context.
pub struct Ax25Codec {
    config: LinkConfig,
    address: [u8; ADDR_LEN],
    frame_buf: BytesMut,
    bits: BitBuffer,
}

impl Ax25Codec {
    /// Create a codec with the default link configuration.
    pub fn new() -> Self {
        let config = LinkConfig::default();
        let address = config.downlink_address().pack();
        Self::from_parts(config, address)
    }

    /// Create a codec with an explicit, validated configuration.
    pub fn with_config(config: LinkConfig) -> Result<Self> {
        config.validate()?;
        let address = config.downlink_address().pack();
        Ok(Self::from_parts(config, address))
    }

    fn from_parts(config: LinkConfig, address: [u8; ADDR_LEN]) -> Self {
        Self {
            config,
            address,
            frame_buf: BytesMut::with_capacity(MAX_FRAME_LEN),
            bits: BitBuffer::new(),
        }
    }

    /// Current link configuration.
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Packed address field used for every outgoing frame.
    pub fn address(&self) -> &[u8; ADDR_LEN] {
        &self.address
    }

    /// Encode `payload` as one frame and append the wire bytes to `dst`.
    ///
    /// Returns the number of wire bytes appended. Oversized payloads are
    /// rejected before any work is done; `dst` is untouched on error.
    pub fn encode(&mut self, payload: &[u8], kind: FrameKind, dst: &mut BytesMut) -> Result<usize> {
        if payload.len() > self.config.max_info_len {
            return Err(FrameError::InvalidLength {
                field: "info",
                len: payload.len(),
                max: self.config.max_info_len,
            });
        }
        let control = match kind {
            FrameKind::UnnumberedInformation => u16::from(CTRL_UI),
            other => return Err(FrameError::UnsupportedFrameKind(other)),
        };

        self.frame_buf.clear();
        let frame_len = assemble(
            payload,
            kind,
            &self.address,
            control,
            self.config.control_len,
            &mut self.frame_buf,
        )?;

        if let Err(err) = bit_stuff(&self.frame_buf, self.config.max_ones_run, &mut self.bits) {
            warn!(error = %err, payload_len = payload.len(), "dropping frame");
            return Err(err);
        }

        let before = dst.len();
        let pad_bits = pack_bits(self.bits.as_slice(), dst);
        let wire_len = dst.len() - before;
        debug!(
            payload_len = payload.len(),
            frame_len,
            stuffed_bits = self.bits.len(),
            pad_bits,
            wire_len,
            "encoded frame"
        );
        Ok(wire_len)
    }

    /// Decode one wire frame.
    ///
    /// The returned frame holds the address, control, PID and info bytes;
    /// flags and FCS are stripped. Nothing is returned unless the FCS
    /// verifies.
    pub fn receive(&mut self, wire: &[u8]) -> Result<DecodedFrame> {
        match self.receive_inner(wire) {
            Ok(frame) => {
                debug!(
                    wire_len = wire.len(),
                    frame_len = frame.len(),
                    info_len = frame.info().len(),
                    "received frame"
                );
                Ok(frame)
            }
            Err(err) => {
                warn!(error = %err, wire_len = wire.len(), "rejected frame");
                Err(err)
            }
        }
    }

    fn receive_inner(&mut self, wire: &[u8]) -> Result<DecodedFrame> {
        unpack_bits(wire, &mut self.bits)?;
        self.frame_buf.clear();
        deframe(self.bits.as_slice(), &mut self.frame_buf)?;
        let body_len = verify_fcs(&self.frame_buf)?;
        let bytes = Bytes::copy_from_slice(&self.frame_buf[..body_len]);
        DecodedFrame::parse(bytes, self.config.control_len)
    }
}

impl Default for Ax25Codec {
    fn default() -> Self {
        Self::new()
    }
}
