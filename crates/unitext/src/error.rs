use std::io;

use thiserror::Error;

/// Result alias used by every fallible operation in this crate.
pub type Result<T> = core::result::Result<T, TextError>;

/// Errors produced by the codecs and [`TextStream`](crate::TextStream).
///
/// Every failure is reported as a value; no library path panics or
/// unwinds. Decode and encode failures inside a stream leave the stream
/// usable; the caller decides whether to abandon it or skip forward.
#[derive(Error, Debug)]
pub enum TextError {
    /// The underlying OS call failed. The original error is preserved so
    /// callers can inspect the OS error code.
    #[error("system error: {0}")]
    Sys(#[from] io::Error),
    /// A parameter was malformed or out of range for the operation.
    #[error("invalid parameter")]
    InvalidParameter,
    /// The leading byte order mark was missing or corrupt.
    #[error("invalid byte order mark")]
    BadBom,
    /// A character can't be encoded by the stream's character set.
    #[error("character can't be encoded by character set")]
    InvalidChar,
    /// The caller's buffer can't hold even a single decoded unit.
    #[error("result buffer too small")]
    BufferTooSmall,
    /// The requested character encoding is not supported.
    #[error("unsupported character encoding")]
    InvalidEncoding,
}

impl TextError {
    /// The stable numeric result code for this error.
    ///
    /// Success is code 1; the error variants occupy 2 through 7. OS
    /// tooling that persists result codes relies on these values never
    /// changing.
    #[must_use]
    pub fn code(&self) -> i16 {
        match self {
            TextError::Sys(_) => 2,
            TextError::InvalidParameter => 3,
            TextError::BadBom => 4,
            TextError::InvalidChar => 5,
            TextError::BufferTooSmall => 6,
            TextError::InvalidEncoding => 7,
        }
    }
}
