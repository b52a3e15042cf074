//! CRC-16/CCITT frame check sequence (reflected, the X.25 variant).

/// Reflected CCITT polynomial (0x1021 bit-reversed).
const POLY_REFLECTED: u16 = 0x8408;

/// Initial register value and final XOR mask.
const FCS_INIT: u16 = 0xFFFF;

/// Byte-wise lookup table, computed at compile time.
pub static FCS_TABLE: [u16; 256] = build_table();

const fn build_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u16;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ POLY_REFLECTED
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Feed `bytes` into a running (non-finalised) register.
fn update(mut reg: u16, bytes: &[u8]) -> u16 {
    for &byte in bytes {
        reg = (reg >> 8) ^ FCS_TABLE[((reg ^ u16::from(byte)) & 0xFF) as usize];
    }
    reg
}

/// Compute the AX.25 frame check sequence of `bytes`.
///
/// Callers always pass at least the 14 address bytes; an empty slice yields
/// `0x0000` and is never a valid frame body.
pub fn fcs(bytes: &[u8]) -> u16 {
    update(FCS_INIT, bytes) ^ FCS_INIT
}
