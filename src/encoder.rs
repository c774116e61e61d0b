//! # Minimal single-frame gif encoder
//!
//! Writes exactly the subset of the format the decoder reads: signature,
//! screen descriptor, global color table, one image descriptor without a local
//! table, and its LZW data.

use alloc::fmt;
use alloc::vec::Vec;

use weezl::{encode::Encoder as LzwEncoder, BitOrder};

use crate::common::{Block, Frame};
use crate::io::{self, Write};
use crate::traits::WriteBytesExt;

/// The image has incorrect properties, making it impossible to encode as a gif.
#[derive(Debug)]
#[non_exhaustive]
pub enum EncodingFormatError {
    /// The image has too many colors.
    TooManyColors,
    /// The image has no color palette which is required.
    MissingColorPalette,
    /// A frame uses an index the padded global palette does not have.
    IndexOutOfPalette(u8),
}

impl core::error::Error for EncodingFormatError {}
impl fmt::Display for EncodingFormatError {
    #[cold]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyColors => write!(fmt, "the image has too many colors"),
            Self::MissingColorPalette => write!(
                fmt,
                "the GIF format requires a color palette but none was given"
            ),
            Self::IndexOutOfPalette(index) => {
                write!(fmt, "palette index {index} is larger than the palette")
            }
        }
    }
}

/// Encoding error.
#[derive(Debug)]
#[non_exhaustive]
pub enum EncodingError {
    /// Frame buffer is too small for the declared dimensions.
    FrameBufferTooSmallForDimensions,
    /// Expected a writer but none found.
    WriterNotFound,
    /// Returned if the to image is not encodable as a gif.
    Format(EncodingFormatError),
    /// Wraps an I/O error.
    Io(io::IoError),
}

impl fmt::Display for EncodingError {
    #[cold]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrameBufferTooSmallForDimensions => {
                fmt.write_str("Frame Buffer Too Small for Dimensions")
            }
            Self::WriterNotFound => fmt.write_str("Writer Not Found"),
            Self::Io(err) => err.fmt(fmt),
            Self::Format(err) => err.fmt(fmt),
        }
    }
}

impl core::error::Error for EncodingError {
    #[cold]
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::FrameBufferTooSmallForDimensions => None,
            Self::WriterNotFound => None,
            Self::Io(err) => Some(err),
            Self::Format(err) => Some(err),
        }
    }
}

impl From<io::IoError> for EncodingError {
    #[cold]
    fn from(err: io::IoError) -> Self {
        Self::Io(err)
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for EncodingError {
    #[cold]
    fn from(err: std::io::Error) -> Self {
        Self::Io(io::IoError::from(err))
    }
}

impl From<EncodingFormatError> for EncodingError {
    #[cold]
    fn from(err: EncodingFormatError) -> Self {
        Self::Format(err)
    }
}

/// GIF encoder.
pub struct Encoder<W: Write> {
    w: Option<W>,
    /// Size exponent of the global table, `None` without one.
    table_size: Option<u8>,
    width: u16,
    height: u16,
    buffer: Vec<u8>,
}

impl<W: Write> Encoder<W> {
    /// Creates a new encoder.
    ///
    /// `global_palette` gives the global color palette in the format `[r, g, b, ...]`,
    /// if no global palette shall be used an empty slice may be supplied.
    /// The palette is padded with black up to the next power of two.
    pub fn new(
        w: W,
        width: u16,
        height: u16,
        global_palette: &[u8],
    ) -> Result<Self, EncodingError> {
        Self {
            w: Some(w),
            table_size: None,
            width,
            height,
            buffer: Vec::new(),
        }
        .write_global_palette(global_palette)
    }

    /// Writes the screen descriptor and global color palette.
    fn write_global_palette(mut self, palette: &[u8]) -> Result<Self, EncodingError> {
        let (palette, padding, table_size) = Self::check_color_table(palette)?;
        let mut flags = 0;
        if !palette.is_empty() {
            flags |= 0b1000_0000;
            flags |= table_size;
            flags |= table_size << 4;
            self.table_size = Some(table_size);
        }
        self.write_screen_desc(flags)?;
        if !palette.is_empty() {
            Self::write_color_table(self.writer()?, palette, padding)?;
        }
        Ok(self)
    }

    /// Writes a frame to the image.
    pub fn write_frame(&mut self, frame: &Frame<'_>) -> Result<(), EncodingError> {
        if usize::from(frame.width)
            .checked_mul(usize::from(frame.height))
            .map_or(true, |size| frame.buffer.len() < size)
        {
            return Err(EncodingError::FrameBufferTooSmallForDimensions);
        }
        let table_size = self
            .table_size
            .ok_or(EncodingFormatError::MissingColorPalette)?;
        let palette_len = 2usize << table_size;
        let pixels = &frame.buffer[..usize::from(frame.width) * usize::from(frame.height)];
        if let Some(&index) = pixels.iter().find(|&&i| usize::from(i) >= palette_len) {
            return Err(EncodingFormatError::IndexOutOfPalette(index).into());
        }

        self.write_frame_header(frame)?;
        let min_code_size = (table_size + 1).max(2);
        self.write_image_block(min_code_size, pixels)
    }

    fn write_frame_header(&mut self, frame: &Frame<'_>) -> Result<(), EncodingError> {
        let writer = self.writer()?;
        writer.write_le(Block::Image as u8)?;
        writer.write_le(frame.left)?;
        writer.write_le(frame.top)?;
        writer.write_le(frame.width)?;
        writer.write_le(frame.height)?;
        // no local table, not interlaced
        writer.write_le(0u8)?;
        Ok(())
    }

    fn write_image_block(&mut self, min_code_size: u8, data: &[u8]) -> Result<(), EncodingError> {
        self.buffer.clear();
        lzw_encode(min_code_size, data, &mut self.buffer);

        let writer = self.w.as_mut().ok_or(EncodingError::WriterNotFound)?;
        writer.write_le(min_code_size)?;
        write_sub_blocks(writer, &self.buffer)?;
        Ok(())
    }

    fn write_color_table(
        writer: &mut W,
        table: &[u8],
        padding: usize,
    ) -> Result<(), EncodingError> {
        writer.write_all(table)?;
        for _ in 0..padding {
            writer.write_all(&[0, 0, 0])?;
        }
        Ok(())
    }

    fn check_color_table(table: &[u8]) -> Result<(&[u8], usize, u8), EncodingError> {
        let num_colors = table.len() / 3;
        if num_colors > 256 {
            return Err(EncodingError::from(EncodingFormatError::TooManyColors));
        }
        let table_size = flag_size(num_colors);
        let padding = (2 << table_size) - num_colors;
        Ok((&table[..num_colors * 3], padding, table_size))
    }

    /// Writes a raw extension block, for example a graphic control extension.
    ///
    /// `label` is the extension label (`0xF9` for graphic control). `data` are
    /// the payload blocks; any slice longer than 255 bytes is split into
    /// several sub-blocks. The decoder skips extensions entirely.
    pub fn write_raw_extension(&mut self, label: u8, data: &[&[u8]]) -> Result<(), EncodingError> {
        let writer = self.writer()?;
        writer.write_le(Block::Extension as u8)?;
        writer.write_le(label)?;
        for block in data {
            for chunk in block.chunks(0xFF) {
                writer.write_le(chunk.len() as u8)?;
                writer.write_all(chunk)?;
            }
        }
        writer.write_le(0u8)?;
        Ok(())
    }

    fn write_screen_desc(&mut self, flags: u8) -> Result<(), EncodingError> {
        let width = self.width;
        let height = self.height;
        let writer = self.writer()?;
        writer.write_all(b"GIF89a")?;
        writer.write_le(width)?;
        writer.write_le(height)?;
        writer.write_le(flags)?;
        writer.write_le(0u8)?;
        writer.write_le(0u8)?;
        Ok(())
    }

    /// Gets a reference to the writer instance used by this encoder.
    pub fn get_ref(&self) -> Option<&W> {
        self.w.as_ref()
    }

    /// Finishes writing, and returns the `io::Write` instance used by this encoder
    pub fn into_inner(mut self) -> Result<W, EncodingError> {
        self.write_trailer()?;
        self.w.take().ok_or(EncodingError::WriterNotFound)
    }

    fn write_trailer(&mut self) -> Result<(), EncodingError> {
        self.writer()?.write_le(Block::Trailer as u8)?;
        Ok(())
    }

    #[inline]
    fn writer(&mut self) -> Result<&mut W, EncodingError> {
        self.w.as_mut().ok_or(EncodingError::WriterNotFound)
    }
}

impl<W: Write> Drop for Encoder<W> {
    #[cfg(feature = "raii_no_panic")]
    fn drop(&mut self) {
        if self.w.is_some() {
            let _ = self.write_trailer();
        }
    }

    #[cfg(not(feature = "raii_no_panic"))]
    fn drop(&mut self) {
        if self.w.is_some() {
            self.write_trailer().unwrap();
        }
    }
}

/// Splits `data` into sub-blocks of at most 255 bytes plus the terminator.
fn write_sub_blocks<W: Write + ?Sized>(writer: &mut W, data: &[u8]) -> io::Result<()> {
    let mut iter = data.chunks_exact(0xFF);
    for full_block in iter.by_ref() {
        writer.write_le(0xFFu8)?;
        writer.write_all(full_block)?;
    }
    let last_block = iter.remainder();
    if !last_block.is_empty() {
        writer.write_le(last_block.len() as u8)?;
        writer.write_all(last_block)?;
    }
    writer.write_le(0u8)
}

/// Appends the LZW data for `data` to `buffer`, starting with a Clear Code
/// and ending with the End Code.
fn lzw_encode(min_code_size: u8, data: &[u8], buffer: &mut Vec<u8>) {
    let mut enc = LzwEncoder::new(BitOrder::Lsb, min_code_size);
    let len = enc.into_vec(buffer).encode_all(data).consumed_out;
    buffer.truncate(len);
}

// Color table size converted to flag bits
fn flag_size(size: usize) -> u8 {
    (size.clamp(2, 255).next_power_of_two().trailing_zeros() - 1) as u8
}

#[test]
fn test_flag_size() {
    #[rustfmt::skip]
    fn expected(size: usize) -> u8 {
        match size {
            0  ..=2   => 0,
            3  ..=4   => 1,
            5  ..=8   => 2,
            9  ..=16  => 3,
            17 ..=32  => 4,
            33 ..=64  => 5,
            65 ..=128 => 6,
            129..=256 => 7,
            _ => 7
        }
    }

    for i in 0..300 {
        assert_eq!(flag_size(i), expected(i));
    }
}

#[test]
fn error_cast() {
    use alloc::boxed::Box;
    let _: Box<dyn core::error::Error> =
        EncodingError::from(EncodingFormatError::MissingColorPalette).into();
}

#[test]
fn sub_block_framing() {
    let data: Vec<u8> = (0..=255u8).chain(0..10).collect();
    let mut out: Vec<u8> = Vec::new();
    write_sub_blocks(&mut out, &data).unwrap();
    assert_eq!(out.len(), 1 + 255 + 1 + 11 + 1);
    assert_eq!(out[0], 0xFF);
    assert_eq!(out[256], 11);
    assert_eq!(out.last(), Some(&0));
}
