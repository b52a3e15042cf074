//! Station address field: two 7-byte subfields (destination, source).
//!
//! Each callsign character is ASCII shifted left one bit, padded with
//! shifted spaces to six characters. The seventh byte carries the SSID in
//! bits 1-4, the reserved bits `0x60`, and on the final subfield the
//! end-of-address marker in bit 0.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, Result};

/// Maximum callsign length in characters.
pub const CALLSIGN_LEN: usize = 6;

/// Bytes per station subfield.
pub const STATION_LEN: usize = CALLSIGN_LEN + 1;

/// Packed address field length (destination + source, no digipeater path).
pub const ADDR_LEN: usize = 2 * STATION_LEN;

/// Highest legal SSID.
pub const MAX_SSID: u8 = 0x0F;

const SSID_RESERVED_BITS: u8 = 0x60;
const END_OF_ADDRESS: u8 = 0x01;

/// A station identity: callsign plus secondary station identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    /// Upper-case callsign, 1-6 characters, no padding.
    pub callsign: String,
    /// Secondary station identifier (0-15).
    pub ssid: u8,
}

impl Station {
    /// Build a validated station identity.
    ///
    /// The callsign is normalised to upper case. Callsigns longer than six
    /// characters are rejected rather than truncated.
    pub fn new(callsign: &str, ssid: u8) -> Result<Self> {
        let station = Self {
            callsign: callsign.trim().to_ascii_uppercase(),
            ssid,
        };
        station.validate()?;
        Ok(station)
    }

    /// Check callsign and SSID constraints.
    pub fn validate(&self) -> Result<()> {
        let cs = &self.callsign;
        if cs.is_empty() || !cs.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()) {
            return Err(FrameError::InvalidCallsign(cs.clone()));
        }
        if cs.len() > CALLSIGN_LEN {
            return Err(FrameError::InvalidLength {
                field: "callsign",
                len: cs.len(),
                max: CALLSIGN_LEN,
            });
        }
        if self.ssid > MAX_SSID {
            return Err(FrameError::InvalidSsid(self.ssid));
        }
        Ok(())
    }

    fn write_subfield(&self, out: &mut [u8], last: bool) {
        let callsign = self.callsign.as_bytes();
        for (i, slot) in out[..CALLSIGN_LEN].iter_mut().enumerate() {
            let ch = callsign.get(i).copied().unwrap_or(b' ');
            *slot = ch << 1;
        }
        let mut ssid_byte = ((self.ssid & MAX_SSID) << 1) | SSID_RESERVED_BITS;
        if last {
            ssid_byte |= END_OF_ADDRESS;
        }
        out[CALLSIGN_LEN] = ssid_byte;
    }

    fn read_subfield(raw: &[u8]) -> Result<(Self, bool)> {
        let callsign: String = raw[..CALLSIGN_LEN]
            .iter()
            .map(|&b| char::from(b >> 1))
            .collect::<String>()
            .trim_end()
            .to_string();
        let ssid_byte = raw[CALLSIGN_LEN];
        let station = Self {
            callsign,
            ssid: (ssid_byte >> 1) & MAX_SSID,
        };
        station.validate()?;
        Ok((station, ssid_byte & END_OF_ADDRESS != 0))
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.callsign, self.ssid)
    }
}

/// Destination and source of a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub destination: Station,
    pub source: Station,
}

impl Address {
    pub fn new(destination: Station, source: Station) -> Self {
        Self {
            destination,
            source,
        }
    }

    /// Pack into the 14-byte wire form.
    pub fn pack(&self) -> [u8; ADDR_LEN] {
        let mut out = [0u8; ADDR_LEN];
        self.destination
            .write_subfield(&mut out[..STATION_LEN], false);
        self.source.write_subfield(&mut out[STATION_LEN..], true);
        out
    }

    /// Unpack the leading 14 bytes of `raw`.
    ///
    /// Fails when the source subfield does not carry the end-of-address
    /// marker, since digipeater paths are not part of this link.
    pub fn unpack(raw: &[u8]) -> Result<Self> {
        if raw.len() < ADDR_LEN {
            return Err(FrameError::InvalidLength {
                field: "address",
                len: raw.len(),
                max: ADDR_LEN,
            });
        }
        let (destination, dest_last) = Station::read_subfield(&raw[..STATION_LEN])?;
        let (source, src_last) = Station::read_subfield(&raw[STATION_LEN..ADDR_LEN])?;
        if dest_last || !src_last {
            return Err(FrameError::InvalidLength {
                field: "address",
                len: if dest_last {
                    STATION_LEN
                } else {
                    ADDR_LEN + STATION_LEN
                },
                max: ADDR_LEN,
            });
        }
        Ok(Self {
            destination,
            source,
        })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}>{}", self.source, self.destination)
    }
}

/// Pack a destination/source pair into the 14-byte address field.
pub fn pack_address(
    dest_callsign: &str,
    dest_ssid: u8,
    src_callsign: &str,
    src_ssid: u8,
) -> Result<[u8; ADDR_LEN]> {
    let address = Address::new(
        Station::new(dest_callsign, dest_ssid)?,
        Station::new(src_callsign, src_ssid)?,
    );
    Ok(address.pack())
}
