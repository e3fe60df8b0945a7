//! Buffered, encoding-aware text file streams.
//!
//! A [`TextStream`] owns a file handle and a byte staging buffer. Reads
//! pull file bytes into the staging buffer a frame at a time and decode
//! codepoints out of it; writes encode codepoints into the staging
//! buffer and spill it to the file as it fills. The encoding, byte
//! order, and mode are negotiated once at open time and fixed for the
//! stream's lifetime.
//!
//! [`TextStream`] itself is a cheap handle: cloning it takes another
//! reference to the same stream, and only the handle that releases the
//! last reference flushes and closes the file. A single lock per stream
//! serializes every operation; the reference count never does.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read as _, Write as _};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::bom;
use crate::encoding::{Encoding, resolve_encoding_name};
use crate::endian::{self, ByteOrder};
use crate::error::{Result, TextError};
use crate::lock::Lock;
use crate::options::{Mode, StreamOptions};
use crate::utf8::{self, Utf8State};
use crate::{Codepoint, utf16, win1252};

/// Staging buffer size given to new streams, in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

const LINE_FEED: Codepoint = 0x0A;
const CARRIAGE_RETURN: Codepoint = 0x0D;

/// A buffered text file stream.
///
/// See the [module documentation](self) for the ownership and buffering
/// model. All operations take `&self`; the stream's internal lock makes
/// them mutually exclusive, so handles can be shared freely across
/// threads.
#[derive(Debug)]
pub struct TextStream {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    path: PathBuf,
    mode: Mode,
    encoding: Encoding,
    order: ByteOrder,
    inner: Lock<Inner>,
}

#[derive(Debug)]
struct Inner {
    file: Option<File>,
    /// Staging buffer. Read mode keeps undecoded bytes in `pos..len`;
    /// write mode keeps pending encoded bytes in `..pos`.
    buf: Vec<u8>,
    pos: usize,
    len: usize,
    eof: bool,
}

impl TextStream {
    /// Opens a text stream over the file at `path`.
    ///
    /// The mode decides how the file is opened: `Read` requires an
    /// existing file, `Write` creates or truncates, `Append` creates if
    /// absent and writes at the end. When `has_bom` is set and the mode
    /// permits reading, the expected byte order mark is consumed and
    /// validated ([`TextError::BadBom`] on mismatch); UTF-16 and UTF-32
    /// take their byte order from it. Without a mark, UTF-16 and UTF-32
    /// reads default to big-endian per RFC 2781. Write mode uses the
    /// caller-supplied order and emits the corresponding mark before any
    /// data (for UTF-8, only when `has_bom` asks for one).
    pub fn open(path: impl AsRef<Path>, options: StreamOptions) -> Result<Self> {
        let path = path.as_ref();
        let StreamOptions {
            mode,
            encoding,
            has_bom,
            mut order,
        } = options;

        // Parameter checks happen before the file is touched.
        if encoding.needs_order() {
            if mode == Mode::Write && order == ByteOrder::None {
                return Err(TextError::InvalidParameter);
            }
        } else {
            order = ByteOrder::None;
        }

        let mut file = match mode {
            Mode::Read => File::open(path)?,
            Mode::Write => File::create(path)?,
            Mode::Append => OpenOptions::new()
                .read(true)
                .append(true)
                .create(true)
                .open(path)?,
        };

        if has_bom && matches!(mode, Mode::Read | Mode::Append) {
            order = consume_bom(&mut file, encoding, order)?;
        } else if mode != Mode::Write {
            // No mark to consult: RFC 2781 says treat the text as big
            // endian.
            order = if encoding.needs_order() {
                ByteOrder::Big
            } else {
                ByteOrder::None
            };
        }

        if mode == Mode::Write {
            emit_bom(&mut file, encoding, order, has_bom)?;
        }

        Ok(Self {
            shared: Arc::new(Shared {
                path: path.to_path_buf(),
                mode,
                encoding,
                order,
                inner: Lock::new(Inner {
                    file: Some(file),
                    buf: vec![0; DEFAULT_BUFFER_SIZE],
                    pos: 0,
                    len: 0,
                    eof: false,
                }),
            }),
        })
    }

    /// Opens a text stream using an external charset name, as reported
    /// by an encoding-detection library.
    ///
    /// Fails with [`TextError::InvalidEncoding`] when the name does not
    /// resolve to a supported encoding.
    pub fn open_charset(
        path: impl AsRef<Path>,
        charset: &str,
        mode: Mode,
        has_bom: bool,
    ) -> Result<Self> {
        let Some((encoding, order)) = resolve_encoding_name(charset) else {
            return Err(TextError::InvalidEncoding);
        };
        Self::open(
            path,
            StreamOptions {
                mode,
                encoding,
                has_bom,
                order,
            },
        )
    }

    /// Decodes up to `out.len() - 1` codepoints into `out`.
    ///
    /// The staging buffer is refilled from the file as frames are
    /// exhausted. The output is NUL-terminated and the codepoint count
    /// (excluding the terminator) returned. Reaching end-of-file simply
    /// truncates the result and sets the stream's EOF flag; malformed
    /// input fails with [`TextError::InvalidChar`].
    pub fn read(&self, out: &mut [Codepoint]) -> Result<usize> {
        self.read_internal(out, false)
    }

    /// Like [`read`](Self::read), but stops after producing a line
    /// terminator.
    ///
    /// LF, CR, and CRLF all terminate a line and are normalized to a
    /// single LF in the output, so callers observe one line ending
    /// regardless of the source format. No more than `out.len() - 1`
    /// codepoints are produced even when no terminator is found.
    pub fn read_line(&self, out: &mut [Codepoint]) -> Result<usize> {
        self.read_internal(out, true)
    }

    fn read_internal(&self, out: &mut [Codepoint], stop_on_line: bool) -> Result<usize> {
        if self.shared.mode != Mode::Read {
            return Err(TextError::InvalidParameter);
        }
        if out.len() < 2 {
            return Err(TextError::BufferTooSmall);
        }
        let mut inner = self.shared.inner.lock();
        inner.decode_into(self.shared.encoding, self.shared.order, out, stop_on_line)
    }

    /// Decodes a single codepoint, or `None` at end-of-file.
    pub fn read_char(&self) -> Result<Option<Codepoint>> {
        if self.shared.mode != Mode::Read {
            return Err(TextError::InvalidParameter);
        }
        let mut inner = self.shared.inner.lock();
        inner.next_codepoint(self.shared.encoding, self.shared.order)
    }

    /// Encodes `data` into the stream, flushing the staging buffer to
    /// the file as it fills.
    ///
    /// Returns the number of codepoints written. A codepoint the
    /// stream's encoding cannot represent fails with
    /// [`TextError::InvalidChar`]; nothing is dropped or substituted,
    /// and codepoints encoded before the failure stay buffered.
    pub fn write(&self, data: &[Codepoint]) -> Result<usize> {
        if self.shared.mode == Mode::Read {
            return Err(TextError::InvalidParameter);
        }
        let mut inner = self.shared.inner.lock();
        inner.encode_from(self.shared.encoding, self.shared.order, data.iter().copied())
    }

    /// Encodes the characters of `text` into the stream.
    pub fn write_str(&self, text: &str) -> Result<usize> {
        if self.shared.mode == Mode::Read {
            return Err(TextError::InvalidParameter);
        }
        let mut inner = self.shared.inner.lock();
        inner.encode_from(
            self.shared.encoding,
            self.shared.order,
            text.chars().map(Codepoint::from),
        )
    }

    /// Forces buffered-but-unwritten encoded bytes out to the file.
    ///
    /// A no-op for Read-mode streams. On failure the pending bytes stay
    /// buffered, so the caller may retry.
    pub fn flush(&self) -> Result<()> {
        if self.shared.mode == Mode::Read {
            return Ok(());
        }
        self.shared.inner.lock().flush_frame()
    }

    /// Releases this handle.
    ///
    /// Only the handle that brings the reference count to zero flushes
    /// pending writes, releases the staging buffer, and closes the file;
    /// earlier closes are a cheap decrement with no I/O. Dropping the
    /// last handle without calling `close` flushes best-effort instead,
    /// with nowhere to report a failure.
    pub fn close(self) -> Result<()> {
        match Arc::try_unwrap(self.shared) {
            Ok(shared) => {
                let result = shared.inner.lock().close_file(shared.mode);
                drop(shared);
                result
            }
            Err(_) => Ok(()),
        }
    }

    /// Size of the underlying file in bytes.
    ///
    /// Stats the file by path, so the result reflects what has been
    /// persisted, not bytes still sitting in the staging buffer.
    pub fn size(&self) -> Result<u64> {
        let _guard = self.shared.inner.lock();
        Ok(fs::metadata(&self.shared.path)?.len())
    }

    /// Resizes the staging buffer.
    ///
    /// Safe to call between read or write calls: pending encoded bytes
    /// are flushed first in write modes, and undecoded bytes are carried
    /// over in Read mode, never reinterpreted. Fails with
    /// [`TextError::InvalidParameter`] for sizes that cannot hold one
    /// full character, or [`TextError::BufferTooSmall`] when undecoded
    /// bytes would not fit.
    pub fn set_buffer_size(&self, size: usize) -> Result<()> {
        if size < self.shared.encoding.max_char_width() {
            return Err(TextError::InvalidParameter);
        }
        let mut inner = self.shared.inner.lock();
        inner.resize_buffer(size, self.shared.mode)
    }

    /// The stream's encoding.
    #[must_use]
    pub fn encoding(&self) -> Encoding {
        self.shared.encoding
    }

    /// The stream's resolved byte order.
    #[must_use]
    pub fn order(&self) -> ByteOrder {
        self.shared.order
    }

    /// The mode the stream was opened with.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.shared.mode
    }

    /// The path the stream was opened on.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.shared.path
    }

    /// Whether a read has reached the end of the file.
    #[must_use]
    pub fn eof(&self) -> bool {
        self.shared.inner.lock().eof
    }

    /// Current staging buffer size in bytes.
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.shared.inner.lock().buf.len()
    }

    /// Number of handles currently referencing this stream.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.shared)
    }
}

impl Clone for TextStream {
    /// Takes another reference to the same stream.
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        // Last handle gone without an explicit close: flush what we can.
        if self.mode != Mode::Read {
            let _ = self.inner.lock().flush_frame();
        }
    }
}

impl Inner {
    /// Tops up the staging buffer until at least `need` undecoded bytes
    /// are buffered or the file is exhausted. Compacts the unread tail
    /// to the front first, so a refill never reinterprets bytes already
    /// buffered.
    fn fill_at_least(&mut self, need: usize) -> Result<()> {
        while self.len - self.pos < need && !self.eof {
            if self.pos > 0 {
                self.buf.copy_within(self.pos..self.len, 0);
                self.len -= self.pos;
                self.pos = 0;
            }
            if self.len == self.buf.len() {
                break;
            }
            let Some(file) = self.file.as_mut() else {
                return Err(TextError::InvalidParameter);
            };
            let read = file.read(&mut self.buf[self.len..])?;
            if read == 0 {
                self.eof = true;
            } else {
                self.len += read;
            }
        }
        Ok(())
    }

    /// Decodes the next codepoint out of the staging buffer without
    /// consuming it, returning the codepoint and its encoded width in
    /// bytes. `None` means end-of-file, including a file that ends in
    /// the middle of a multi-byte character.
    fn peek_codepoint(
        &mut self,
        encoding: Encoding,
        order: ByteOrder,
    ) -> Result<Option<(Codepoint, usize)>> {
        self.fill_at_least(encoding.max_char_width())?;
        if self.pos == self.len {
            return Ok(None);
        }
        let window = &self.buf[self.pos..self.len];
        match encoding {
            Encoding::Ascii => Ok(Some((Codepoint::from(window[0]), 1))),
            Encoding::Win1252 => match win1252::decode(window[0]) {
                Some(cp) => Ok(Some((cp, 1))),
                None => Err(TextError::InvalidChar),
            },
            Encoding::Utf8 => {
                let mut state = Utf8State::new();
                let mut acc = 0;
                let mut used = 0;
                while !state.is_accepted() {
                    if used == window.len() {
                        // The file ends mid-sequence: truncate, don't error.
                        self.eof = true;
                        return Ok(None);
                    }
                    if utf8::decode_step(&mut acc, window[used], &mut state) == 0 {
                        return Err(TextError::InvalidChar);
                    }
                    used += 1;
                }
                Ok(Some((acc, used)))
            }
            Encoding::Utf16 => {
                if window.len() < 2 {
                    self.eof = true;
                    return Ok(None);
                }
                let (cp, units) = utf16::decode(window, order);
                if units == 0 {
                    return Err(TextError::InvalidChar);
                }
                Ok(Some((cp, units * 2)))
            }
            Encoding::Utf32 => {
                if window.len() < 4 {
                    self.eof = true;
                    return Ok(None);
                }
                Ok(Some((endian::read32(window, order), 4)))
            }
        }
    }

    fn next_codepoint(&mut self, encoding: Encoding, order: ByteOrder) -> Result<Option<Codepoint>> {
        match self.peek_codepoint(encoding, order)? {
            Some((cp, width)) => {
                self.pos += width;
                Ok(Some(cp))
            }
            None => Ok(None),
        }
    }

    fn decode_into(
        &mut self,
        encoding: Encoding,
        order: ByteOrder,
        out: &mut [Codepoint],
        stop_on_line: bool,
    ) -> Result<usize> {
        let max = out.len() - 1;
        let mut produced = 0;
        while produced < max {
            let Some(cp) = self.next_codepoint(encoding, order)? else {
                break;
            };
            if stop_on_line && cp == CARRIAGE_RETURN {
                // CR and CRLF both collapse to a lone LF.
                out[produced] = LINE_FEED;
                produced += 1;
                if let Some((next, width)) = self.peek_codepoint(encoding, order)? {
                    if next == LINE_FEED {
                        self.pos += width;
                    }
                }
                break;
            }
            out[produced] = cp;
            produced += 1;
            if stop_on_line && cp == LINE_FEED {
                break;
            }
        }
        out[produced] = 0;
        Ok(produced)
    }

    /// Makes room for at least `need` encoded bytes, spilling the
    /// pending frame to the file when headroom runs short.
    fn reserve(&mut self, need: usize) -> Result<()> {
        if self.buf.len() - self.pos < need {
            self.flush_frame()?;
        }
        Ok(())
    }

    fn encode_from<I>(&mut self, encoding: Encoding, order: ByteOrder, data: I) -> Result<usize>
    where
        I: IntoIterator<Item = Codepoint>,
    {
        let mut written = 0;
        for cp in data {
            self.reserve(encoding.max_char_width())?;
            let pos = self.pos;
            let consumed = match encoding {
                Encoding::Ascii => {
                    if cp > 0x7F {
                        return Err(TextError::InvalidChar);
                    }
                    self.buf[pos] = cp as u8;
                    1
                }
                Encoding::Win1252 => {
                    let byte = win1252::encode(cp).ok_or(TextError::InvalidChar)?;
                    self.buf[pos] = byte;
                    1
                }
                Encoding::Utf8 => {
                    let bytes = utf8::encode(cp, &mut self.buf[pos..]);
                    if bytes == 0 {
                        return Err(TextError::InvalidChar);
                    }
                    bytes
                }
                Encoding::Utf16 => {
                    let units = utf16::encode(cp, &mut self.buf[pos..], order);
                    if units == 0 {
                        return Err(TextError::InvalidChar);
                    }
                    units * 2
                }
                Encoding::Utf32 => {
                    endian::write32(&mut self.buf[pos..pos + 4], cp, order);
                    4
                }
            };
            self.pos += consumed;
            written += 1;
        }
        Ok(written)
    }

    fn flush_frame(&mut self) -> Result<()> {
        if self.pos == 0 {
            return Ok(());
        }
        let Some(file) = self.file.as_mut() else {
            return Err(TextError::InvalidParameter);
        };
        file.write_all(&self.buf[..self.pos])?;
        self.pos = 0;
        Ok(())
    }

    fn close_file(&mut self, mode: Mode) -> Result<()> {
        if mode != Mode::Read {
            self.flush_frame()?;
        }
        self.file = None;
        self.buf = Vec::new();
        self.pos = 0;
        self.len = 0;
        Ok(())
    }

    fn resize_buffer(&mut self, size: usize, mode: Mode) -> Result<()> {
        if mode == Mode::Read {
            let pending = self.len - self.pos;
            if pending > size {
                return Err(TextError::BufferTooSmall);
            }
            self.buf.copy_within(self.pos..self.len, 0);
            self.pos = 0;
            self.len = pending;
        } else {
            self.flush_frame()?;
        }
        self.buf.resize(size, 0);
        Ok(())
    }
}

fn consume_bom(file: &mut File, encoding: Encoding, order: ByteOrder) -> Result<ByteOrder> {
    match encoding {
        Encoding::Utf8 => {
            let mut raw = [0u8; 3];
            read_bom_bytes(file, &mut raw)?;
            if !bom::read8(&raw) {
                return Err(TextError::BadBom);
            }
            Ok(ByteOrder::None)
        }
        Encoding::Utf16 => {
            let mut raw = [0u8; 2];
            read_bom_bytes(file, &mut raw)?;
            bom::read16(&raw).ok_or(TextError::BadBom)
        }
        Encoding::Utf32 => {
            let mut raw = [0u8; 4];
            read_bom_bytes(file, &mut raw)?;
            bom::read32(&raw).ok_or(TextError::BadBom)
        }
        // Single-byte character sets carry no mark.
        Encoding::Ascii | Encoding::Win1252 => Ok(order),
    }
}

fn read_bom_bytes(file: &mut File, raw: &mut [u8]) -> Result<()> {
    file.read_exact(raw).map_err(|err| {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            TextError::BadBom
        } else {
            TextError::Sys(err)
        }
    })
}

fn emit_bom(file: &mut File, encoding: Encoding, order: ByteOrder, has_bom: bool) -> Result<()> {
    match encoding {
        Encoding::Utf16 => {
            let mut raw = [0u8; 2];
            bom::write16(&mut raw, order);
            file.write_all(&raw)?;
        }
        Encoding::Utf32 => {
            let mut raw = [0u8; 4];
            bom::write32(&mut raw, order);
            file.write_all(&raw)?;
        }
        Encoding::Utf8 if has_bom => {
            file.write_all(&bom::UTF8)?;
        }
        _ => {}
    }
    Ok(())
}
