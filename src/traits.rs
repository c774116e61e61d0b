//! Traits used in this library
use crate::io::{Result, Write};

/// Writer extension to write little endian data
pub trait WriteBytesExt<T> {
    /// Writes `T` to a bytes stream. Least significant byte first.
    fn write_le(&mut self, n: T) -> Result<()>;
}

impl<W: Write + ?Sized> WriteBytesExt<u8> for W {
    #[inline(always)]
    fn write_le(&mut self, n: u8) -> Result<()> {
        self.write_all(&[n])
    }
}

impl<W: Write + ?Sized> WriteBytesExt<u16> for W {
    #[inline]
    fn write_le(&mut self, n: u16) -> Result<()> {
        self.write_all(&n.to_le_bytes())
    }
}

/// Fixed-offset reads from an in-memory file.
pub trait ReadBytesExt {
    /// The `N` bytes starting at `pos`, or `None` if the input ends first.
    fn array_at<const N: usize>(&self, pos: usize) -> Option<[u8; N]>;
}

impl ReadBytesExt for [u8] {
    #[inline]
    fn array_at<const N: usize>(&self, pos: usize) -> Option<[u8; N]> {
        let end = pos.checked_add(N)?;
        self.get(pos..end)?.try_into().ok()
    }
}
