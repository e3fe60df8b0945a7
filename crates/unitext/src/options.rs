//! Stream open configuration.

use crate::encoding::Encoding;
use crate::endian::ByteOrder;

/// How a stream is opened. Fixed for the stream's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Mode {
    /// The file is opened solely for reading.
    Read = 0,
    /// The file is created (or truncated) and opened solely for writing.
    Write = 1,
    /// The file is opened for writing at its end, created if absent.
    Append = 2,
}

/// Configuration for [`TextStream::open`](crate::TextStream::open).
///
/// # Examples
///
/// ```no_run
/// use unitext::{ByteOrder, Encoding, StreamOptions, TextStream};
///
/// let stream = TextStream::open(
///     "notes.txt",
///     StreamOptions::writing(Encoding::Utf16, ByteOrder::Big).with_bom(),
/// )?;
/// stream.write_str("héllo\n")?;
/// stream.close()?;
/// # Ok::<(), unitext::TextError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StreamOptions {
    /// The open mode.
    pub mode: Mode,

    /// The character encoding of the file's contents.
    pub encoding: Encoding,

    /// Whether the file carries a leading byte order mark.
    ///
    /// In Read and Append modes the mark is consumed and validated; for
    /// UTF-16 and UTF-32 it decides the stream's byte order. In Write
    /// mode it controls whether a UTF-8 stream starts with a mark
    /// (UTF-16 and UTF-32 always write one).
    pub has_bom: bool,

    /// Byte order for UTF-16 and UTF-32 streams.
    ///
    /// Only consulted in Write mode, where the order cannot be `None`
    /// for those encodings. Streams read without a byte order mark
    /// default to big-endian, per RFC 2781.
    pub order: ByteOrder,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Read,
            encoding: Encoding::Utf8,
            has_bom: false,
            order: ByteOrder::None,
        }
    }
}

impl StreamOptions {
    /// Options for reading a file in `encoding`.
    #[must_use]
    pub fn reading(encoding: Encoding) -> Self {
        Self {
            encoding,
            ..Self::default()
        }
    }

    /// Options for creating a file in `encoding` and `order`.
    #[must_use]
    pub fn writing(encoding: Encoding, order: ByteOrder) -> Self {
        Self {
            mode: Mode::Write,
            encoding,
            has_bom: false,
            order,
        }
    }

    /// Options for appending to a file in `encoding`.
    #[must_use]
    pub fn appending(encoding: Encoding) -> Self {
        Self {
            mode: Mode::Append,
            encoding,
            ..Self::default()
        }
    }

    /// Marks the stream as carrying a byte order mark.
    #[must_use]
    pub fn with_bom(mut self) -> Self {
        self.has_bom = true;
        self
    }
}
