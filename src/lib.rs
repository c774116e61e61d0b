#![forbid(unsafe_code)]
//! # Single-frame GIF decoder
//!
//! Decodes the first frame of a GIF file into a grid of RGB pixels. The LZW
//! decompressor, the bit reader and the sub-block framing are implemented
//! here; nothing is delegated to a compression crate.
//!
//! The pipeline runs once over an in-memory file:
//!
//! * signature, logical screen descriptor and global color table
//! * the image descriptor, found by walking past extension blocks
//! * the frame's sub-blocks, joined into one compressed byte run
//! * LZW decompression into palette indices
//! * color lookup into a row-major [`PixelGrid`]
//!
//! Animation, interlacing, local color tables and transparency are not
//! interpreted: only the first frame is decoded, rows are returned in stored
//! order, and indices always resolve against the global color table.
//!
//! ## no_std support
//!
//! This crate supports `no_std` environments with an allocator. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! gifdec = { version = "0.1", default-features = false }
//! ```
//!
//! In `no_std` mode, the crate provides its own `Write` trait in the `gifdec::io` module,
//! used by the [`Encoder`].
//!
//! ## Decoding
//!
//! Loading the file is up to the caller; [`decode`] takes the complete bytes.
//!
//! ```rust
//! // A 1x1 image with a black and white palette, its only pixel black
//! let file = [
//!     0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00,
//!     0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF,
//!     0x2C, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00,
//!     0x02, 0x02, 0x44, 0x01, 0x00,
//!     0x3B,
//! ];
//! let image = gifdec::decode(&file).unwrap();
//! assert_eq!(image.descriptor().width, 1);
//! assert_eq!(image.pixels().get(0, 0), Some([0, 0, 0]));
//! ```
//!
//! [`DecodeOptions`] configures the memory limit and how a full code table is
//! treated.
//!
//! ## Encoding
//!
//! The [`Encoder`] writes the same single-frame subset, which is handy for
//! producing test images:
//!
#![cfg_attr(feature = "std", doc = "```rust")]
#![cfg_attr(not(feature = "std"), doc = "```rust,ignore")]
//! use gifdec::{Encoder, Frame};
//!
//! let palette = &[0xFF, 0xFF, 0xFF, 0, 0, 0];
//! let glider = [0, 1, 0, 0, 0, 1, 1, 1, 1];
//! let mut file: Vec<u8> = Vec::new();
//! let mut encoder = Encoder::new(&mut file, 3, 3, palette).unwrap();
//! encoder.write_frame(&Frame::from_indices(3, 3, &glider)).unwrap();
//! encoder.into_inner().unwrap();
//!
//! let image = gifdec::decode(&file).unwrap();
//! assert_eq!(image.indices(), glider);
//! assert_eq!(image.pixels().row(2).unwrap(), [[0, 0, 0]; 3]);
//! ```
#![deny(missing_docs)]
#![allow(unknown_lints)] // Certain lints only apply to later versions of Rust
#![allow(clippy::manual_range_contains)]
#![allow(clippy::new_without_default)]
#![deny(clippy::alloc_instead_of_core)]
#![deny(clippy::std_instead_of_alloc)]
#![deny(clippy::std_instead_of_core)]
#![cfg_attr(not(feature = "std"), no_std)]

#[macro_use]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod common;
mod encoder;
/// I/O traits and types for no_std support.
pub mod io;
mod reader;
#[cfg(test)]
mod test_utils;
mod traits;

pub use crate::common::{
    Block, ColorTable, Frame, ImageDescriptor, LogicalScreenDescriptor, PixelGrid, Rgb, Version,
};

pub use crate::reader::{DecodeError, DecodeOptions, DecodedImage, MemoryLimit};

pub use crate::encoder::{Encoder, EncodingError, EncodingFormatError};

/// Decodes the first frame of a fully loaded GIF file with default options.
///
/// Shorthand for `DecodeOptions::new().decode(data)`.
pub fn decode(data: &[u8]) -> Result<DecodedImage, DecodeError> {
    DecodeOptions::new().decode(data)
}
