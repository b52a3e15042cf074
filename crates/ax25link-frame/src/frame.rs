//! Frame assembly and the parsed view of a received frame.
//!
//! On-wire byte layout before bit stuffing:
//! ```text
//! ┌──────┬────────────┬─────────┬───────┬────────────┬──────────┬──────┐
//! │ 0x7E │ Address    │ Control │ PID   │ Info       │ FCS      │ 0x7E │
//! │      │ (14B)      │ (1|2B)  │ (0|1) │ (0..240B)  │ (2B, BE) │      │
//! └──────┴────────────┴─────────┴───────┴────────────┴──────────┴──────┘
//! ```
//! The FCS covers address through info. It is written high byte first,
//! while a 2-byte control field is written low byte first.

use bytes::{BufMut, Bytes, BytesMut};

use crate::address::{Address, ADDR_LEN};
use crate::crc::fcs;
use crate::error::{FrameError, Result};

/// HDLC flag byte.
pub const FLAG: u8 = 0x7E;

/// Flag length in bytes.
pub const FLAG_LEN: usize = 1;

/// Control field length for modulo-8 frames.
pub const MIN_CTRL_LEN: usize = 1;

/// Control field length for modulo-128 frames.
pub const MAX_CTRL_LEN: usize = 2;

/// PID field length.
pub const PID_LEN: usize = 1;

/// FCS field length.
pub const FCS_LEN: usize = 2;

/// Maximum info field length.
pub const MAX_INFO_LEN: usize = 240;

/// Largest framed byte sequence, flags included.
pub const MAX_FRAME_LEN: usize =
    2 * FLAG_LEN + ADDR_LEN + MAX_CTRL_LEN + PID_LEN + MAX_INFO_LEN + FCS_LEN;

/// Control value of an Unnumbered Information frame (P/F clear).
pub const CTRL_UI: u8 = 0x03;

/// PID value: no layer 3 protocol.
pub const PID_NO_LAYER3: u8 = 0xF0;

/// Frame kinds, as classified by the low bits of the control field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Information frame.
    Information,
    /// Supervisory frame (RR, RNR, REJ, SREJ).
    Supervisory,
    /// Unnumbered frame other than UI.
    Unnumbered,
    /// Unnumbered Information frame.
    UnnumberedInformation,
}

impl FrameKind {
    /// Whether frames of this kind carry a PID byte.
    pub fn has_pid(self) -> bool {
        matches!(
            self,
            FrameKind::Information | FrameKind::UnnumberedInformation
        )
    }

    /// Classify a frame from the first control byte.
    pub fn from_control(control: u8) -> Self {
        if control & 0x01 == 0 {
            FrameKind::Information
        } else if control & 0x02 == 0 {
            FrameKind::Supervisory
        } else if control & 0xEF == CTRL_UI {
            FrameKind::UnnumberedInformation
        } else {
            FrameKind::Unnumbered
        }
    }
}

fn check_control_len(control_len: usize) -> Result<()> {
    if control_len == MIN_CTRL_LEN || control_len == MAX_CTRL_LEN {
        Ok(())
    } else {
        Err(FrameError::InvalidLength {
            field: "control",
            len: control_len,
            max: MAX_CTRL_LEN,
        })
    }
}

/// Assemble a complete frame (both flags included) and append it to `dst`.
///
/// Returns the number of bytes appended. Nothing is written on error.
pub fn assemble(
    info: &[u8],
    kind: FrameKind,
    address: &[u8],
    control: u16,
    control_len: usize,
    dst: &mut BytesMut,
) -> Result<usize> {
    if info.len() > MAX_INFO_LEN {
        return Err(FrameError::InvalidLength {
            field: "info",
            len: info.len(),
            max: MAX_INFO_LEN,
        });
    }
    if address.len() != ADDR_LEN {
        return Err(FrameError::InvalidLength {
            field: "address",
            len: address.len(),
            max: ADDR_LEN,
        });
    }
    check_control_len(control_len)?;

    let pid_len = if kind.has_pid() { PID_LEN } else { 0 };
    let total = 2 * FLAG_LEN + ADDR_LEN + control_len + pid_len + info.len() + FCS_LEN;
    let start = dst.len();
    dst.reserve(total);

    dst.put_u8(FLAG);
    dst.put_slice(address);
    if control_len == MIN_CTRL_LEN {
        dst.put_u8(control as u8);
    } else {
        dst.put_u16_le(control);
    }
    if kind.has_pid() {
        dst.put_u8(PID_NO_LAYER3);
    }
    dst.put_slice(info);

    let check = fcs(&dst[start + FLAG_LEN..]);
    dst.put_u16(check);
    dst.put_u8(FLAG);

    debug_assert_eq!(dst.len() - start, total);
    Ok(total)
}

/// Check the trailing two FCS bytes of an unstuffed body (address through FCS).
///
/// Returns the body length without the FCS.
pub fn verify_fcs(body: &[u8]) -> Result<usize> {
    if body.len() < ADDR_LEN + FCS_LEN {
        return Err(FrameError::InvalidLength {
            field: "frame",
            len: body.len(),
            max: MAX_FRAME_LEN - 2 * FLAG_LEN,
        });
    }
    let split = body.len() - FCS_LEN;
    let expected = fcs(&body[..split]);
    let actual = u16::from_be_bytes([body[split], body[split + 1]]);
    if expected != actual {
        return Err(FrameError::ChecksumMismatch { expected, actual });
    }
    Ok(split)
}

/// A received frame: address, control, optional PID and info, with the
/// flags and FCS already stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    bytes: Bytes,
    address: Address,
    kind: FrameKind,
    control_len: usize,
    info_offset: usize,
}

impl DecodedFrame {
    /// Slice a verified header+info buffer at the fixed field offsets.
    pub(crate) fn parse(bytes: Bytes, control_len: usize) -> Result<Self> {
        check_control_len(control_len)?;
        if bytes.len() < ADDR_LEN + control_len {
            return Err(FrameError::InvalidLength {
                field: "header",
                len: bytes.len(),
                max: ADDR_LEN + control_len,
            });
        }
        let address = Address::unpack(&bytes)?;
        let kind = FrameKind::from_control(bytes[ADDR_LEN]);
        let mut info_offset = ADDR_LEN + control_len;
        if kind.has_pid() {
            if bytes.len() < info_offset + PID_LEN {
                return Err(FrameError::InvalidLength {
                    field: "header",
                    len: bytes.len(),
                    max: info_offset + PID_LEN,
                });
            }
            info_offset += PID_LEN;
        }
        Ok(Self {
            bytes,
            address,
            kind,
            control_len,
            info_offset,
        })
    }

    /// Header plus info bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the frame and return header plus info bytes.
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    /// Header plus info length.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    /// Control field value (little-endian for 2-byte fields).
    pub fn control(&self) -> u16 {
        let ctrl = &self.bytes[ADDR_LEN..ADDR_LEN + self.control_len];
        if self.control_len == MIN_CTRL_LEN {
            u16::from(ctrl[0])
        } else {
            u16::from_le_bytes([ctrl[0], ctrl[1]])
        }
    }

    pub fn pid(&self) -> Option<u8> {
        self.kind
            .has_pid()
            .then(|| self.bytes[ADDR_LEN + self.control_len])
    }

    /// Address + control + PID length; info starts here.
    pub fn header_len(&self) -> usize {
        self.info_offset
    }

    pub fn info(&self) -> &[u8] {
        &self.bytes[self.info_offset..]
    }

    /// Info field as a cheap `Bytes` slice.
    pub fn info_bytes(&self) -> Bytes {
        self.bytes.slice(self.info_offset..)
    }
}
