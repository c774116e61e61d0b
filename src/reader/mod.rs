use alloc::vec::Vec;
use core::num::NonZeroU64;

use crate::common::{ColorTable, ImageDescriptor, LogicalScreenDescriptor, PixelGrid, Version};

mod bits;
mod blocks;
mod compose;
mod descriptor;
mod error;
mod header;
mod lzw;

pub use self::error::DecodeError;

use self::bits::BitReader;
use self::lzw::LzwDecoder;

/// The maximum amount of memory the decoder is allowed to use for one frame.
///
/// Both the decoded index stream and the RGB pixel grid are counted against it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryLimit {
    /// Enforce no memory limit.
    ///
    /// A crafted file can declare a 65535×65535 frame, so only disable the
    /// limit for trusted input.
    Unlimited,
    /// Limit decoding to a number of bytes.
    Bytes(NonZeroU64),
}

impl MemoryLimit {
    const DEFAULT_BYTES: NonZeroU64 = match NonZeroU64::new(50_000_000) {
        Some(bytes) => bytes,
        None => panic!("limit is non-zero"),
    };

    fn bytes(self) -> Option<u64> {
        match self {
            Self::Unlimited => None,
            Self::Bytes(limit) => Some(limit.get()),
        }
    }

    fn check(self, requested: u64) -> Result<(), DecodeError> {
        match self.bytes() {
            Some(limit) if requested > limit => {
                Err(DecodeError::MemoryLimitExceeded { requested, limit })
            }
            _ => Ok(()),
        }
    }
}

impl Default for MemoryLimit {
    fn default() -> Self {
        Self::Bytes(Self::DEFAULT_BYTES)
    }
}

/// Options for opening a GIF file.
#[derive(Clone, Debug)]
pub struct DecodeOptions {
    memory_limit: MemoryLimit,
    deferred_clear: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodeOptions {
    /// Creates a new decoder builder
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self {
            memory_limit: MemoryLimit::default(),
            deferred_clear: false,
        }
    }

    /// Configure a memory limit for decoding. Defaults to 50 MB.
    pub fn set_memory_limit(&mut self, limit: MemoryLimit) {
        self.memory_limit = limit;
    }

    /// Accept image data that keeps going after the code table is full.
    ///
    /// Once 4096 codes are defined no further entries fit. By default the next
    /// code that would need one is an error (`CodeTableOverflow`). With this
    /// set, decoding continues at 12 bits without new entries until a Clear
    /// Code arrives, which is how many encoders expect the table to behave.
    pub fn allow_deferred_clear(&mut self, allow: bool) {
        self.deferred_clear = allow;
    }

    /// Decodes the first frame of a fully loaded GIF file.
    pub fn decode(&self, data: &[u8]) -> Result<DecodedImage, DecodeError> {
        let header = header::parse(data)?;
        let (descriptor, pos) = descriptor::locate(data, header.end)?;
        // Local color tables are not applied, only stepped over.
        let pos = pos + descriptor.local_color_table_len() * 3;

        self.memory_limit.check(descriptor.area() as u64 * 3)?;
        let image = blocks::read_image_data(data, pos)?;

        let output_limit = self
            .memory_limit
            .bytes()
            .map(|limit| usize::try_from(limit).unwrap_or(usize::MAX));
        let mut indices = Vec::new();
        LzwDecoder::new(image.min_code_size)?
            .with_deferred_clear(self.deferred_clear)
            .with_output_limit(output_limit)
            .decode(&mut BitReader::new(&image.bytes), &mut indices)?;

        let no_palette = ColorTable::default();
        let palette = header.global_color_table.as_ref().unwrap_or(&no_palette);
        let pixels = compose::compose(&indices, palette, descriptor.width, descriptor.height)?;

        Ok(DecodedImage {
            version: header.version,
            screen: header.screen,
            global_color_table: header.global_color_table,
            descriptor,
            indices,
            pixels,
        })
    }
}

/// A decoded frame together with the metadata it was decoded from.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    version: Version,
    screen: LogicalScreenDescriptor,
    global_color_table: Option<ColorTable>,
    descriptor: ImageDescriptor,
    indices: Vec<u8>,
    pixels: PixelGrid,
}

impl DecodedImage {
    /// Version from the signature.
    #[must_use]
    pub fn version(&self) -> Version {
        self.version
    }

    /// The logical screen descriptor.
    #[must_use]
    pub fn screen(&self) -> &LogicalScreenDescriptor {
        &self.screen
    }

    /// The global color table, if the file has one.
    #[must_use]
    pub fn global_color_table(&self) -> Option<&ColorTable> {
        self.global_color_table.as_ref()
    }

    /// The descriptor of the decoded frame.
    #[must_use]
    pub fn descriptor(&self) -> &ImageDescriptor {
        &self.descriptor
    }

    /// Palette indices in row-major order, before color lookup.
    #[must_use]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// The decoded pixels.
    #[must_use]
    pub fn pixels(&self) -> &PixelGrid {
        &self.pixels
    }

    /// Takes the decoded pixels, dropping the metadata.
    #[must_use]
    pub fn into_pixels(self) -> PixelGrid {
        self.pixels
    }
}
