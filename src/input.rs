//! Non-seekable input with one byte of pushback.
//!
//! Input may be a pipe, so format sniffing never seeks. It reads one byte,
//! decides, and hands the byte back so the selected reader sees an untouched
//! stream.

use std::io::{self, Read};

/// Read one byte and give it back.
pub trait PeekByte: Read {
    /// Read a single byte. `Ok(None)` at end of input.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Return `byte` to the front of the stream.
    ///
    /// Only one byte of pushback is guaranteed; pushing a second byte before
    /// the first is consumed fails.
    fn unread_byte(&mut self, byte: u8) -> io::Result<()>;
}

/// Wraps any reader with a single-byte pushback slot.
#[derive(Debug)]
pub struct PushbackReader<R> {
    inner: R,
    pending: Option<u8>,
}

impl<R: Read> PushbackReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pending: None,
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for PushbackReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if let Some(byte) = self.pending.take() {
            buf[0] = byte;
            // A short read is fine. Inner errors surface on the next call so
            // the returned byte is never dropped.
            let n = self.inner.read(&mut buf[1..]).unwrap_or(0);
            return Ok(1 + n);
        }
        self.inner.read(buf)
    }
}

impl<R: Read> PeekByte for PushbackReader<R> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(byte) = self.pending.take() {
            return Ok(Some(byte));
        }
        let mut b = [0u8; 1];
        loop {
            match self.inner.read(&mut b) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(b[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn unread_byte(&mut self, byte: u8) -> io::Result<()> {
        if self.pending.is_some() {
            return Err(io::Error::other("pushback slot already occupied"));
        }
        self.pending = Some(byte);
        Ok(())
    }
}

/// Read one byte, mapping end of input to [`crate::ToolError::UnexpectedEof`].
pub(crate) fn read_u8<R: Read + ?Sized>(src: &mut R) -> Result<u8, crate::ToolError> {
    let mut b = [0u8; 1];
    read_exact(src, &mut b)?;
    Ok(b[0])
}

/// `read_exact` with end of input reported as a format error.
pub(crate) fn read_exact<R: Read + ?Sized>(src: &mut R, buf: &mut [u8]) -> Result<(), crate::ToolError> {
    src.read_exact(buf).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            crate::ToolError::UnexpectedEof
        } else {
            crate::ToolError::Io(e)
        }
    })
}
