//! CRC32 for checksum-tagged protocol buffers.
//!
//! Standard reflected polynomial `0xEDB88320`, table-driven, init
//! `0xFFFF_FFFF`, final complement. The protocol checksum covers the
//! protocol version (as four big-endian bytes) followed by every payload
//! byte after the reserved checksum word.

const POLYNOMIAL: u32 = 0xEDB8_8320;

/// 256-entry lookup table, built at compile time.
const CHECKSUM_TABLE: [u32; 256] = {
    let mut table = [0u32; 256];
    let mut index = 0;
    while index < 256 {
        let mut item = index as u32;
        let mut bit = 0;
        while bit < 8 {
            item = if item & 1 != 0 {
                POLYNOMIAL ^ (item >> 1)
            } else {
                item >> 1
            };
            bit += 1;
        }
        table[index] = item;
        index += 1;
    }
    table
};

/// CRC32 of a byte slice.
#[must_use]
pub fn crc32(bytes: &[u8]) -> u32 {
    !bytes.iter().fold(u32::MAX, step)
}

/// CRC32 of `protocol_version` (big-endian bytes) followed by `payload`.
///
/// This is the value stored in the reserved first word of a finalized
/// buffer; the version itself never appears on the wire.
#[must_use]
pub fn protocol_crc32(protocol_version: u32, payload: &[u8]) -> u32 {
    let mut crc = protocol_version
        .to_be_bytes()
        .iter()
        .fold(u32::MAX, step);
    crc = payload.iter().fold(crc, step);
    !crc
}

#[inline]
fn step(crc: u32, byte: &u8) -> u32 {
    CHECKSUM_TABLE[((crc ^ u32::from(*byte)) & 0xFF) as usize] ^ (crc >> 8)
}
