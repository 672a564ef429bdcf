// Serialized transducer format: header parsing and validation.

use crate::FstError;

/// Header magic constants (little-endian).
pub(crate) const COOKIE1: u32 = 0x4E4F_5249;
pub(crate) const COOKIE2: u32 = 0x0001_F57A;

/// Size of the binary header in bytes. The arc table starts right after it.
pub const HEADER_SIZE: usize = 32;

/// Header flag: the empty label sequence is accepted.
pub const HEADER_EMPTY_ACCEPTED: u32 = 0x1;

/// Parsed transducer header.
///
/// The header occupies the first 32 bytes of a serialized transducer:
/// - bytes 0..4: cookie1 (magic number)
/// - bytes 4..8: cookie2 (magic number)
/// - bytes 8..12: root state (index of its first arc, or `NO_STATE`)
/// - bytes 12..16: header flags
/// - bytes 16..24: output of the empty sequence (signed)
/// - bytes 24..32: reserved (must be zero)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FstHeader {
    pub root: u32,
    pub flags: u32,
    pub empty_output: i64,
}

impl FstHeader {
    /// Whether the empty sequence is an accepted entry.
    #[inline]
    pub fn accepts_empty(&self) -> bool {
        self.flags & HEADER_EMPTY_ACCEPTED != 0
    }

    /// Encode this header into its 32-byte on-disk form.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[..4].copy_from_slice(&COOKIE1.to_le_bytes());
        buf[4..8].copy_from_slice(&COOKIE2.to_le_bytes());
        buf[8..12].copy_from_slice(&self.root.to_le_bytes());
        buf[12..16].copy_from_slice(&self.flags.to_le_bytes());
        buf[16..24].copy_from_slice(&self.empty_output.to_le_bytes());
        buf
    }
}

/// Parses and validates the 32-byte header.
///
/// Byte-swap detection is skipped: dictionaries are always written
/// little-endian.
pub fn parse_header(data: &[u8]) -> Result<FstHeader, FstError> {
    if data.len() < HEADER_SIZE {
        return Err(FstError::TooShort {
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }

    let word = |at: usize| u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]);

    if word(0) != COOKIE1 || word(4) != COOKIE2 {
        return Err(FstError::InvalidMagic);
    }

    let mut empty = [0u8; 8];
    empty.copy_from_slice(&data[16..24]);

    Ok(FstHeader {
        root: word(8),
        flags: word(12),
        empty_output: i64::from_le_bytes(empty),
    })
}
