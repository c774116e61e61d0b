//! Output plumbing for the [`Encoder`](crate::Encoder).
//!
//! Decoding reads from a byte slice and needs none of this. The encoder writes
//! through [`Write`], which every `std::io::Write` implements when the `std`
//! feature is on. Without `std`, `Vec<u8>` and `&mut [u8]` implement it.

use core::fmt;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

pub use embedded_io::ErrorKind;

/// Error raised by a [`Write`] sink.
///
/// Wraps `std::io::Error` with the `std` feature, and only carries an
/// [`ErrorKind`] without it.
#[derive(Debug)]
pub struct IoError {
    #[cfg(feature = "std")]
    inner: std::io::Error,
    #[cfg(not(feature = "std"))]
    kind: ErrorKind,
}

impl IoError {
    /// An error of the given kind with no further payload.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        #[cfg(feature = "std")]
        {
            let kind = match kind {
                ErrorKind::WriteZero => std::io::ErrorKind::WriteZero,
                ErrorKind::OutOfMemory => std::io::ErrorKind::OutOfMemory,
                ErrorKind::Interrupted => std::io::ErrorKind::Interrupted,
                _ => std::io::ErrorKind::Other,
            };
            Self {
                inner: kind.into(),
            }
        }
        #[cfg(not(feature = "std"))]
        {
            Self { kind }
        }
    }
}

impl fmt::Display for IoError {
    #[cold]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[cfg(feature = "std")]
        {
            self.inner.fmt(f)
        }
        #[cfg(not(feature = "std"))]
        {
            write!(f, "write failed: {:?}", self.kind)
        }
    }
}

impl core::error::Error for IoError {
    #[cfg(feature = "std")]
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        self.inner.source()
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for IoError {
    #[inline]
    fn from(inner: std::io::Error) -> Self {
        Self { inner }
    }
}

#[cfg(feature = "std")]
impl From<IoError> for std::io::Error {
    #[inline]
    fn from(err: IoError) -> Self {
        err.inner
    }
}

impl From<ErrorKind> for IoError {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Result of a [`Write`] call.
pub type Result<T> = core::result::Result<T, IoError>;

/// Byte sink the encoder writes a file into.
pub trait Write {
    /// Writes some prefix of `buf`, returning its length.
    fn write(&mut self, buf: &[u8]) -> Result<usize>;

    /// Writes all of `buf`. A sink that stops accepting bytes is `WriteZero`.
    fn write_all(&mut self, mut buf: &[u8]) -> Result<()> {
        while !buf.is_empty() {
            let n = self.write(buf)?;
            if n == 0 {
                return Err(ErrorKind::WriteZero.into());
            }
            buf = &buf[n..];
        }
        Ok(())
    }

    /// Flushes buffered output.
    fn flush(&mut self) -> Result<()>;
}

#[cfg(feature = "std")]
impl<T: std::io::Write + ?Sized> Write for T {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        Ok(std::io::Write::write(self, buf)?)
    }

    #[inline]
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        Ok(std::io::Write::write_all(self, buf)?)
    }

    #[inline]
    fn flush(&mut self) -> Result<()> {
        Ok(std::io::Write::flush(self)?)
    }
}

#[cfg(not(feature = "std"))]
impl Write for Vec<u8> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.extend_from_slice(buf);
        Ok(buf.len())
    }

    #[inline]
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

// Fills the slice front to back, then reports `WriteZero` through `write_all`
#[cfg(not(feature = "std"))]
impl Write for &mut [u8] {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let n = buf.len().min(self.len());
        let (head, tail) = core::mem::take(self).split_at_mut(n);
        head.copy_from_slice(&buf[..n]);
        *self = tail;
        Ok(n)
    }

    #[inline]
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
