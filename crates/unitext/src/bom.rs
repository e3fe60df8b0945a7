//! Byte-order-mark read, write, and validation.
//!
//! A reader returning `None` (or `false` for UTF-8) means the mark is
//! absent or corrupt, distinct from either valid order, so callers can
//! pick their own fallback policy.

use crate::endian::{self, ByteOrder};

/// The UTF-8 byte order mark.
pub const UTF8: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// The mark codepoint (U+FEFF) written for UTF-16 and UTF-32.
const MARK: u32 = 0xFEFF;

/// Validates a UTF-8 byte order mark at the front of `bom`.
#[must_use]
pub fn read8(bom: &[u8]) -> bool {
    bom.len() >= 3 && bom[..3] == UTF8
}

/// Detects the byte order of a UTF-16 mark at the front of `bom`.
#[must_use]
pub fn read16(bom: &[u8]) -> Option<ByteOrder> {
    match bom {
        [0xFF, 0xFE, ..] => Some(ByteOrder::Little),
        [0xFE, 0xFF, ..] => Some(ByteOrder::Big),
        _ => None,
    }
}

/// Detects the byte order of a UTF-32 mark at the front of `bom`.
#[must_use]
pub fn read32(bom: &[u8]) -> Option<ByteOrder> {
    match bom {
        [0xFF, 0xFE, 0x00, 0x00, ..] => Some(ByteOrder::Little),
        [0x00, 0x00, 0xFE, 0xFF, ..] => Some(ByteOrder::Big),
        _ => None,
    }
}

/// Writes the UTF-8 byte order mark into the first three bytes of `out`.
///
/// # Panics
///
/// Panics if `out` holds fewer than three bytes.
pub fn write8(out: &mut [u8]) {
    out[..3].copy_from_slice(&UTF8);
}

/// Writes a UTF-16 byte order mark in `order` into the first two bytes
/// of `out`. `ByteOrder::None` writes the host order.
///
/// # Panics
///
/// Panics if `out` holds fewer than two bytes.
pub fn write16(out: &mut [u8], order: ByteOrder) {
    endian::write16(out, MARK as u16, order);
}

/// Writes a UTF-32 byte order mark in `order` into the first four bytes
/// of `out`. `ByteOrder::None` writes the host order.
///
/// # Panics
///
/// Panics if `out` holds fewer than four bytes.
pub fn write32(out: &mut [u8], order: ByteOrder) {
    endian::write32(out, MARK, order);
}
