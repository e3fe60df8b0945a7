//! The character encodings a stream can carry.

use crate::endian::ByteOrder;

/// A supported character encoding.
///
/// The discriminants are a stable contract; OS tooling persists them in
/// configuration files and on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Encoding {
    /// Traditional 7-bit ASCII.
    Ascii = 1,
    /// Windows codepage 1252.
    Win1252 = 2,
    /// UTF-8.
    Utf8 = 3,
    /// UTF-16, byte order negotiated per stream.
    Utf16 = 4,
    /// UTF-32, byte order negotiated per stream.
    Utf32 = 5,
}

impl Encoding {
    /// Width of one code unit in bytes.
    #[must_use]
    pub const fn unit_width(self) -> usize {
        match self {
            Encoding::Ascii | Encoding::Win1252 | Encoding::Utf8 => 1,
            Encoding::Utf16 => 2,
            Encoding::Utf32 => 4,
        }
    }

    /// Maximum encoded width of a single character in bytes.
    ///
    /// Stream read-ahead and flush headroom are sized from this so a
    /// whole character is always available without partial-unit retries.
    #[must_use]
    pub const fn max_char_width(self) -> usize {
        match self {
            Encoding::Ascii | Encoding::Win1252 => 1,
            Encoding::Utf8 | Encoding::Utf16 | Encoding::Utf32 => 4,
        }
    }

    /// Whether a character may span more than one byte.
    #[must_use]
    pub const fn is_multi_byte(self) -> bool {
        matches!(self, Encoding::Utf8 | Encoding::Utf16 | Encoding::Utf32)
    }

    /// Whether the encoding carries a byte order.
    #[must_use]
    pub const fn needs_order(self) -> bool {
        matches!(self, Encoding::Utf16 | Encoding::Utf32)
    }
}

/// Maps an external charset name to an encoding and byte order.
///
/// `"ASCII"` resolves to [`Encoding::Utf8`]: ASCII is a strict subset of
/// UTF-8, and detection libraries report pure-ASCII input under either
/// name. An unrecognized name resolves to `None` rather than failing, so
/// the caller decides whether that is fatal.
///
/// ```
/// use unitext::{resolve_encoding_name, ByteOrder, Encoding};
///
/// assert_eq!(
///     resolve_encoding_name("UTF-16LE"),
///     Some((Encoding::Utf16, ByteOrder::Little))
/// );
/// assert_eq!(resolve_encoding_name("KOI8-R"), None);
/// ```
#[must_use]
pub fn resolve_encoding_name(name: &str) -> Option<(Encoding, ByteOrder)> {
    match name {
        "ASCII" | "UTF-8" => Some((Encoding::Utf8, ByteOrder::None)),
        "UTF-16LE" => Some((Encoding::Utf16, ByteOrder::Little)),
        "UTF-16BE" => Some((Encoding::Utf16, ByteOrder::Big)),
        "UTF-32LE" => Some((Encoding::Utf32, ByteOrder::Little)),
        "UTF-32BE" => Some((Encoding::Utf32, ByteOrder::Big)),
        "windows-1252" => Some((Encoding::Win1252, ByteOrder::None)),
        _ => None,
    }
}
