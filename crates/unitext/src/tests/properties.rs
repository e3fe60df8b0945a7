use quickcheck_macros::quickcheck;

use crate::endian::ByteOrder;
use crate::{Codepoint, utf16, utf8, win1252};

// Fold an arbitrary u32 into the scalar range, stepping over the
// surrogate gap.
fn scalar(raw: u32) -> Codepoint {
    let cp = raw % 0x110000;
    if (0xD800..=0xDFFF).contains(&cp) { cp - 0x800 } else { cp }
}

#[quickcheck]
fn utf8_round_trips(raw: u32) -> bool {
    let cp = scalar(raw);
    let mut out = [0u8; 4];
    let bytes = utf8::encode(cp, &mut out);
    bytes > 0 && utf8::decode(&out[..bytes]) == (cp, bytes)
}

#[quickcheck]
fn utf16_round_trips(raw: u32, big: bool) -> bool {
    let cp = scalar(raw);
    let order = if big { ByteOrder::Big } else { ByteOrder::Little };
    let mut out = [0u8; 4];
    let units = utf16::encode(cp, &mut out, order);
    units > 0 && utf16::decode(&out[..units * 2], order) == (cp, units)
}

#[quickcheck]
fn win1252_round_trips_through_encode(raw: u32) -> bool {
    let cp = scalar(raw);
    match win1252::encode(cp) {
        Some(byte) => win1252::decode(byte) == Some(cp),
        None => true,
    }
}

#[quickcheck]
fn utf8_decode_never_overconsumes(bytes: Vec<u8>) -> bool {
    let (_, consumed) = utf8::decode(&bytes);
    consumed <= bytes.len() && consumed <= 4
}

#[quickcheck]
fn utf8_resynchronizing_scan_terminates(bytes: Vec<u8>) -> bool {
    // A reject consumes one byte and restarts, the way a stream caller
    // would skip forward; the scan must cover the input exactly.
    let mut offset = 0;
    while offset < bytes.len() {
        let (_, consumed) = utf8::decode(&bytes[offset..]);
        offset += consumed.max(1);
    }
    offset >= bytes.len()
}

#[quickcheck]
fn utf16_decode_reports_exact_units(bytes: Vec<u8>, big: bool) -> bool {
    let order = if big { ByteOrder::Big } else { ByteOrder::Little };
    let (cp, units) = utf16::decode(&bytes, order);
    match units {
        0 => cp == crate::REPLACEMENT_CHAR,
        1 => cp <= 0xFFFF && bytes.len() >= 2,
        2 => (0x10000..=0x10FFFF).contains(&cp) && bytes.len() >= 4,
        _ => false,
    }
}

#[test]
fn utf8_round_trips_exhaustively() {
    let mut out = [0u8; 4];
    for cp in 0..=0x10FFFFu32 {
        // The decoder passes surrogate codepoints through the same way
        // the encoder packs them, so no range is skipped here.
        let bytes = utf8::encode(cp, &mut out);
        assert!(bytes > 0, "encode failed for {cp:#X}");
        assert_eq!(utf8::decode(&out[..bytes]), (cp, bytes), "mismatch at {cp:#X}");
    }
}

#[test]
fn win1252_decodes_every_non_table_byte_as_identity() {
    for byte in (0..0x80u8).chain(0xA0..=0xFF) {
        assert_eq!(win1252::decode(byte), Some(Codepoint::from(byte)));
    }
}
