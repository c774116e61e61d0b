use alloc::borrow::Cow;
use alloc::vec::Vec;

/// An RGB color as stored in a GIF color table.
pub type Rgb = [u8; 3];

/// Known GIF block introducers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Block {
    /// Image descriptor.
    Image = 0x2C,
    /// Extension block.
    Extension = 0x21,
    /// Image trailer.
    Trailer = 0x3B,
}

impl Block {
    /// Converts `u8` to `Option<Self>`
    #[must_use]
    pub fn from_u8(n: u8) -> Option<Self> {
        match n {
            0x2C => Some(Self::Image),
            0x21 => Some(Self::Extension),
            0x3B => Some(Self::Trailer),
            _ => None,
        }
    }
}

/// GIF version tag found in the signature.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Version {
    /// `GIF87a`
    V87a,
    /// `GIF89a`
    V89a,
}

impl Version {
    /// Parses the six signature bytes at the start of a file.
    #[must_use]
    pub fn from_signature(signature: &[u8]) -> Option<Self> {
        match signature {
            b"GIF87a" => Some(Self::V87a),
            b"GIF89a" => Some(Self::V89a),
            _ => None,
        }
    }
}

/// Number of entries described by a 3-bit color table size field.
#[inline]
pub(crate) fn color_table_len(size_exponent: u8) -> usize {
    2 << (size_exponent & 0b111)
}

/// The 7-byte logical screen descriptor following the signature.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct LogicalScreenDescriptor {
    /// Screen width in pixels.
    pub width: u16,
    /// Screen height in pixels.
    pub height: u16,
    /// A global color table follows the descriptor.
    pub global_color_table: bool,
    /// Bits per primary color minus one (3 bits).
    pub color_resolution: u8,
    /// The global color table is sorted by decreasing importance.
    pub sorted: bool,
    /// Global color table size exponent `N`; the table holds `2^(N+1)` colors.
    pub global_color_table_size: u8,
    /// Index of the background color in the global color table.
    pub background_color_index: u8,
    /// Pixel aspect ratio byte, unscaled.
    pub pixel_aspect_ratio: u8,
}

impl LogicalScreenDescriptor {
    /// Unpacks the descriptor from its 7 raw bytes.
    pub(crate) fn from_bytes(bytes: [u8; 7]) -> Self {
        let packed = bytes[4];
        Self {
            width: u16::from_le_bytes([bytes[0], bytes[1]]),
            height: u16::from_le_bytes([bytes[2], bytes[3]]),
            global_color_table: packed & 0b1000_0000 != 0,
            color_resolution: (packed >> 4) & 0b111,
            sorted: packed & 0b0000_1000 != 0,
            global_color_table_size: packed & 0b111,
            background_color_index: bytes[5],
            pixel_aspect_ratio: bytes[6],
        }
    }

    /// Number of colors in the global color table, or 0 if there is none.
    #[must_use]
    pub fn global_color_table_len(&self) -> usize {
        if self.global_color_table {
            color_table_len(self.global_color_table_size)
        } else {
            0
        }
    }
}

/// An ordered list of RGB colors, indexed by palette index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColorTable {
    colors: Vec<Rgb>,
}

impl ColorTable {
    /// Builds a table from packed `[r, g, b, r, g, b, ...]` bytes.
    ///
    /// Trailing bytes that do not form a whole triple are ignored.
    #[must_use]
    pub fn from_rgb_bytes(bytes: &[u8]) -> Self {
        let colors = bytes
            .chunks_exact(3)
            .map(|rgb| [rgb[0], rgb[1], rgb[2]])
            .collect();
        Self { colors }
    }

    /// Number of colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// `true` if the table holds no colors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `index`, if the table is large enough.
    #[inline]
    #[must_use]
    pub fn get(&self, index: u8) -> Option<Rgb> {
        self.colors.get(usize::from(index)).copied()
    }

    /// The colors in table order.
    #[must_use]
    pub fn as_slice(&self) -> &[Rgb] {
        &self.colors
    }
}

/// The image descriptor introduced by the `0x2C` separator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct ImageDescriptor {
    /// Left offset on the logical screen.
    pub left: u16,
    /// Top offset on the logical screen.
    pub top: u16,
    /// Frame width in pixels.
    pub width: u16,
    /// Frame height in pixels.
    pub height: u16,
    /// A local color table follows the descriptor.
    pub local_color_table: bool,
    /// Rows are stored interlaced.
    pub interlaced: bool,
    /// The local color table is sorted.
    pub sorted: bool,
    /// The two reserved bits.
    pub reserved: u8,
    /// Local color table size exponent.
    pub local_color_table_size: u8,
}

impl ImageDescriptor {
    /// Unpacks the descriptor from the 9 bytes following the separator.
    pub(crate) fn from_bytes(bytes: [u8; 9]) -> Self {
        let packed = bytes[8];
        Self {
            left: u16::from_le_bytes([bytes[0], bytes[1]]),
            top: u16::from_le_bytes([bytes[2], bytes[3]]),
            width: u16::from_le_bytes([bytes[4], bytes[5]]),
            height: u16::from_le_bytes([bytes[6], bytes[7]]),
            local_color_table: packed & 0b1000_0000 != 0,
            interlaced: packed & 0b0100_0000 != 0,
            sorted: packed & 0b0010_0000 != 0,
            reserved: (packed >> 3) & 0b11,
            local_color_table_size: packed & 0b111,
        }
    }

    /// Number of pixels in the frame.
    #[must_use]
    pub fn area(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Number of colors in the local color table, or 0 if there is none.
    #[must_use]
    pub fn local_color_table_len(&self) -> usize {
        if self.local_color_table {
            color_table_len(self.local_color_table_size)
        } else {
            0
        }
    }
}

/// Decoded pixels of a single frame, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl PixelGrid {
    pub(crate) fn new(width: usize, height: usize, pixels: Vec<Rgb>) -> Self {
        debug_assert_eq!(width * height, pixels.len());
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel at column `x`, row `y`.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// Row `y`, left to right.
    #[must_use]
    pub fn row(&self, y: usize) -> Option<&[Rgb]> {
        let start = y.checked_mul(self.width)?;
        self.pixels.get(start..start + self.width)
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Rgb]> + '_ {
        // `chunks_exact(0)` panics, a zero-width grid has no rows to yield
        self.pixels.chunks_exact(self.width.max(1))
    }

    /// All pixels in row-major order.
    #[must_use]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Flattens the grid into `[r, g, b, r, g, b, ...]`.
    #[must_use]
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }
}

/// A frame handed to the [`Encoder`](crate::Encoder).
#[derive(Debug, Clone, Default)]
pub struct Frame<'a> {
    /// Left offset on the logical screen.
    pub left: u16,
    /// Top offset on the logical screen.
    pub top: u16,
    /// Frame width in pixels.
    pub width: u16,
    /// Frame height in pixels.
    pub height: u16,
    /// Palette indices, row-major, `width * height` of them.
    pub buffer: Cow<'a, [u8]>,
}

impl<'a> Frame<'a> {
    /// Creates a frame at the screen origin from borrowed palette indices.
    #[must_use]
    pub fn from_indices(width: u16, height: u16, indices: &'a [u8]) -> Self {
        Self {
            left: 0,
            top: 0,
            width,
            height,
            buffer: Cow::Borrowed(indices),
        }
    }
}
