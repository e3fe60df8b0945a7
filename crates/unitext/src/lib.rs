//! Portable text transcoding primitives and buffered text-file streams
//! for OS tooling.
//!
//! Two layers:
//!
//! - The codec modules ([`utf8`], [`utf16`], [`bom`], [`win1252`],
//!   [`endian`]) transcode between raw bytes and Unicode codepoints.
//!   The UTF-8 decoder is a restartable finite-state machine that can
//!   be fed one byte at a time across arbitrary call boundaries.
//! - [`TextStream`] layers buffered, encoding-aware line and character
//!   I/O on top of a file: open modes, byte-order negotiation via
//!   byte order marks, line-ending normalization, and reference-counted
//!   shared handles guarded by a per-stream lock.
//!
//! ```no_run
//! use unitext::{Encoding, StreamOptions, TextStream};
//!
//! let stream = TextStream::open("config.txt", StreamOptions::reading(Encoding::Utf8))?;
//! let mut line = [0u32; 256];
//! let n = stream.read_line(&mut line)?;
//! # let _ = n;
//! stream.close()?;
//! # Ok::<(), unitext::TextError>(())
//! ```

#![allow(missing_docs)]

pub mod bom;
pub mod endian;
pub mod utf16;
pub mod utf8;
pub mod win1252;

mod encoding;
mod error;
mod lock;
mod options;
mod stream;

#[cfg(test)]
mod tests;

pub use encoding::{Encoding, resolve_encoding_name};
pub use endian::ByteOrder;
pub use error::{Result, TextError};
pub use options::{Mode, StreamOptions};
pub use stream::{DEFAULT_BUFFER_SIZE, TextStream};

/// A Unicode codepoint, the universal currency between the codecs and
/// [`TextStream`].
///
/// Kept as a raw scalar rather than [`char`]: the stream passes UTF-32
/// units through unvalidated, exactly as they appear in the file.
pub type Codepoint = u32;

/// U+FFFD, substituted for malformed input on lenient decode paths.
pub const REPLACEMENT_CHAR: Codepoint = 0xFFFD;
