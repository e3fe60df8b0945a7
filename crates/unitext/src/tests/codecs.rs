use rstest::rstest;

use crate::endian::{self, ByteOrder};
use crate::{Codepoint, REPLACEMENT_CHAR, bom, resolve_encoding_name, utf16, utf8};
use crate::{Encoding, TextError};

#[rstest]
#[case('a' as Codepoint, &[0x61])]
#[case('Þ' as Codepoint, &[0xC3, 0x9E])]
#[case('╤' as Codepoint, &[0xE2, 0x95, 0xA4])]
#[case(0x20000, &[0xF0, 0xA0, 0x80, 0x80])]
fn utf8_boundary_vectors(#[case] cp: Codepoint, #[case] bytes: &[u8]) {
    let mut out = [0u8; 4];
    assert_eq!(utf8::encode(cp, &mut out), bytes.len());
    assert_eq!(&out[..bytes.len()], bytes);
    assert_eq!(utf8::decode(bytes), (cp, bytes.len()));
}

#[rstest]
#[case(&[0x80])] // stray continuation
#[case(&[0xC0, 0xAF])] // overlong lead
#[case(&[0xC1, 0xBF])]
#[case(&[0xF5, 0x80, 0x80, 0x80])] // past U+10FFFF
#[case(&[0xC3])] // truncated two-byte sequence
#[case(&[0xE2, 0x95])] // truncated three-byte sequence
#[case(&[0xC3, 0x28])] // lead followed by a non-continuation
#[case(&[])]
fn utf8_malformed_input_substitutes_and_fails(#[case] bytes: &[u8]) {
    assert_eq!(utf8::decode(bytes), (REPLACEMENT_CHAR, 0));
}

#[test]
fn utf8_encode_rejects_out_of_range() {
    let mut out = [0u8; 4];
    assert_eq!(utf8::encode(0x110000, &mut out), 0);
    assert_eq!(utf8::encode(u32::MAX, &mut out), 0);
}

#[test]
fn utf8_encode_rejects_short_buffers() {
    let mut out = [0u8; 2];
    assert_eq!(utf8::encode(0x20AC, &mut out), 0);
    assert_eq!(utf8::encode(0x20AC, &mut [0u8; 3]), 3);
}

#[test]
fn utf16_surrogate_pair_round_trip() {
    let mut out = [0u8; 4];
    assert_eq!(utf16::encode(0x20000, &mut out, ByteOrder::Big), 2);

    let high = endian::read16(&out, ByteOrder::Big);
    let low = endian::read16(&out[2..], ByteOrder::Big);
    assert!((0xD800..=0xDBFF).contains(&high));
    assert!((0xDC00..=0xDFFF).contains(&low));
    assert_eq!(out, [0xD8, 0x40, 0xDC, 0x00]);

    assert_eq!(utf16::decode(&out, ByteOrder::Big), (0x20000, 2));
}

#[rstest]
#[case(ByteOrder::Little, &[0x74, 0x00])]
#[case(ByteOrder::Big, &[0x00, 0x74])]
fn utf16_scalar_respects_byte_order(#[case] order: ByteOrder, #[case] bytes: &[u8]) {
    let mut out = [0u8; 2];
    assert_eq!(utf16::encode('t' as Codepoint, &mut out, order), 1);
    assert_eq!(&out, bytes);
    assert_eq!(utf16::decode(bytes, order), ('t' as Codepoint, 1));
}

#[test]
fn utf16_rejects_lone_and_mismatched_surrogates() {
    // Lone low surrogate.
    let mut lone = [0u8; 2];
    endian::write16(&mut lone, 0xDC00, ByteOrder::Big);
    assert_eq!(utf16::decode(&lone, ByteOrder::Big), (REPLACEMENT_CHAR, 0));

    // High surrogate followed by a scalar.
    let mut pair = [0u8; 4];
    endian::write16(&mut pair, 0xD800, ByteOrder::Big);
    endian::write16(&mut pair[2..], 0x0041, ByteOrder::Big);
    assert_eq!(utf16::decode(&pair, ByteOrder::Big), (REPLACEMENT_CHAR, 0));

    // High surrogate at the end of input.
    assert_eq!(utf16::decode(&pair[..2], ByteOrder::Big), (REPLACEMENT_CHAR, 0));
}

#[test]
fn bom_detection_distinguishes_orders_from_garbage() {
    assert_eq!(bom::read16(&[0xFE, 0xFF]), Some(ByteOrder::Big));
    assert_eq!(bom::read16(&[0xFF, 0xFE]), Some(ByteOrder::Little));
    assert_eq!(bom::read16(&[0x00, 0x61]), None);
    assert_eq!(bom::read16(&[0xFF]), None);

    assert!(bom::read8(&[0xEF, 0xBB, 0xBF]));
    assert!(!bom::read8(&[0xEF, 0xBB]));
    assert!(!bom::read8(&[0xEF, 0xBF, 0xBB]));

    assert_eq!(bom::read32(&[0xFF, 0xFE, 0x00, 0x00]), Some(ByteOrder::Little));
    assert_eq!(bom::read32(&[0x00, 0x00, 0xFE, 0xFF]), Some(ByteOrder::Big));
    // A UTF-16 little-endian mark is not a UTF-32 mark.
    assert_eq!(bom::read32(&[0xFF, 0xFE]), None);
    assert_eq!(bom::read32(&[0xFF, 0xFE, 0x00, 0x61]), None);
}

#[test]
fn bom_write_read_round_trip() {
    let mut raw16 = [0u8; 2];
    bom::write16(&mut raw16, ByteOrder::Big);
    assert_eq!(bom::read16(&raw16), Some(ByteOrder::Big));

    let mut raw32 = [0u8; 4];
    bom::write32(&mut raw32, ByteOrder::Little);
    assert_eq!(bom::read32(&raw32), Some(ByteOrder::Little));

    let mut raw8 = [0u8; 3];
    bom::write8(&mut raw8);
    assert!(bom::read8(&raw8));
}

#[test]
fn endian_reads_and_writes_both_orders() {
    let mut out = [0u8; 4];
    endian::write32(&mut out, 0x1234_5678, ByteOrder::Big);
    assert_eq!(out, [0x12, 0x34, 0x56, 0x78]);
    assert_eq!(endian::read32(&out, ByteOrder::Big), 0x1234_5678);
    assert_eq!(endian::read32(&out, ByteOrder::Little), 0x7856_3412);

    endian::write16(&mut out, 0xBEEF, ByteOrder::Little);
    assert_eq!(&out[..2], &[0xEF, 0xBE]);
    assert_eq!(endian::read16(&out, ByteOrder::Little), 0xBEEF);

    assert_eq!(endian::swap16(0x1234), 0x3412);
    assert_eq!(endian::swap32(0x1234_5678), 0x7856_3412);
    assert_eq!(endian::swap64(0x0102_0304_0506_0708), 0x0807_0605_0403_0201);
}

#[rstest]
#[case("ASCII", Encoding::Utf8, ByteOrder::None)]
#[case("UTF-8", Encoding::Utf8, ByteOrder::None)]
#[case("UTF-16LE", Encoding::Utf16, ByteOrder::Little)]
#[case("UTF-16BE", Encoding::Utf16, ByteOrder::Big)]
#[case("UTF-32LE", Encoding::Utf32, ByteOrder::Little)]
#[case("UTF-32BE", Encoding::Utf32, ByteOrder::Big)]
#[case("windows-1252", Encoding::Win1252, ByteOrder::None)]
fn charset_names_resolve(
    #[case] name: &str,
    #[case] encoding: Encoding,
    #[case] order: ByteOrder,
) {
    assert_eq!(resolve_encoding_name(name), Some((encoding, order)));
}

#[test]
fn unknown_charset_name_is_unsupported_not_fatal() {
    assert_eq!(resolve_encoding_name("KOI8-R"), None);
    assert_eq!(resolve_encoding_name("utf-8"), None);
    assert_eq!(resolve_encoding_name(""), None);
}

#[test]
fn error_codes_are_stable() {
    assert_eq!(TextError::Sys(std::io::Error::other("boom")).code(), 2);
    assert_eq!(TextError::InvalidParameter.code(), 3);
    assert_eq!(TextError::BadBom.code(), 4);
    assert_eq!(TextError::InvalidChar.code(), 5);
    assert_eq!(TextError::BufferTooSmall.code(), 6);
    assert_eq!(TextError::InvalidEncoding.code(), 7);
}

#[test]
fn encoding_widths() {
    assert_eq!(Encoding::Ascii.max_char_width(), 1);
    assert_eq!(Encoding::Utf8.unit_width(), 1);
    assert_eq!(Encoding::Utf8.max_char_width(), 4);
    assert_eq!(Encoding::Utf16.unit_width(), 2);
    assert_eq!(Encoding::Utf16.max_char_width(), 4);
    assert_eq!(Encoding::Utf32.unit_width(), 4);
    assert!(Encoding::Utf16.needs_order());
    assert!(!Encoding::Win1252.needs_order());
}
