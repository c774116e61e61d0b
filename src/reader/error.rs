use core::fmt;

/// Decoding error.
///
/// Every error ends the decode. LZW state is cumulative, so nothing after a
/// bad code can be trusted and no recovery is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// The input is shorter than the 13-byte signature and screen descriptor.
    MalformedHeader {
        /// Number of bytes available.
        len: usize,
    },
    /// The signature is neither `GIF87a` nor `GIF89a`.
    InvalidSignature {
        /// The first six bytes of the input.
        signature: [u8; 6],
    },
    /// The input ends inside the global color table.
    TruncatedColorTable {
        /// Bytes the declared table size requires.
        expected: usize,
        /// Bytes left after the screen descriptor.
        available: usize,
    },
    /// No image separator was found before the end of input or the trailer.
    ImageDescriptorNotFound,
    /// The input ends inside the image descriptor.
    TruncatedImageDescriptor {
        /// Bytes left after the separator.
        available: usize,
    },
    /// The image descriptor declares a width or height of zero.
    ZeroSizedImage,
    /// The input ends inside a data sub-block, or before its terminator.
    ///
    /// A missing length byte is reported with `declared` and `available` both 0.
    TruncatedSubBlock {
        /// Offset of the length byte.
        offset: usize,
        /// Payload length the sub-block declares.
        declared: usize,
        /// Payload bytes actually left.
        available: usize,
    },
    /// The minimum LZW code size is outside `2..=8`.
    InvalidMinCodeSize(u8),
    /// The compressed data ended before the End Code.
    BitstreamExhausted {
        /// Width of the code that was being read.
        requested: u8,
        /// Bits left in the stream.
        remaining: usize,
    },
    /// The compressed data does not start with a Clear Code.
    UnexpectedFirstCode(u16),
    /// A code is neither in the table nor the next code to be defined.
    InvalidCode {
        /// The offending code.
        code: u16,
        /// The next free table slot at the time it was read.
        next_code: u16,
    },
    /// A new code was needed while the table already holds 4096 entries.
    CodeTableOverflow,
    /// A decoded index has no color in the color table.
    IndexOutOfPalette {
        /// The offending index.
        index: u8,
        /// Number of colors available.
        palette_len: usize,
    },
    /// The number of decoded indices differs from width × height.
    IndexStreamLengthMismatch {
        /// Pixels declared by the image descriptor.
        expected: usize,
        /// Indices decoded.
        actual: usize,
    },
    /// Decoding would need more memory than the configured limit.
    MemoryLimitExceeded {
        /// Bytes needed.
        requested: u64,
        /// The configured limit.
        limit: u64,
    },
}

impl fmt::Display for DecodeError {
    #[cold]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::MalformedHeader { len } => {
                write!(fmt, "header needs 13 bytes, input has {len}")
            }
            Self::InvalidSignature { signature } => {
                write!(fmt, "invalid GIF signature {signature:02x?}")
            }
            Self::TruncatedColorTable {
                expected,
                available,
            } => write!(
                fmt,
                "global color table needs {expected} bytes, {available} available"
            ),
            Self::ImageDescriptorNotFound => fmt.write_str("no image descriptor found"),
            Self::TruncatedImageDescriptor { available } => write!(
                fmt,
                "image descriptor needs 9 bytes, {available} available"
            ),
            Self::ZeroSizedImage => fmt.write_str("image has zero width or height"),
            Self::TruncatedSubBlock {
                offset,
                declared,
                available,
            } => write!(
                fmt,
                "sub-block at offset {offset} declares {declared} bytes, {available} available"
            ),
            Self::InvalidMinCodeSize(size) => {
                write!(fmt, "invalid minimum code size {size}")
            }
            Self::BitstreamExhausted {
                requested,
                remaining,
            } => write!(
                fmt,
                "image data ended before the end code: {requested}-bit code, {remaining} bits left"
            ),
            Self::UnexpectedFirstCode(code) => {
                write!(fmt, "image data starts with code {code} instead of a clear code")
            }
            Self::InvalidCode { code, next_code } => {
                write!(fmt, "invalid code {code}, next free code is {next_code}")
            }
            Self::CodeTableOverflow => fmt.write_str("code table overflow"),
            Self::IndexOutOfPalette { index, palette_len } => write!(
                fmt,
                "palette index {index} out of range for {palette_len} colors"
            ),
            Self::IndexStreamLengthMismatch { expected, actual } => write!(
                fmt,
                "decoded {actual} indices, image has {expected} pixels"
            ),
            Self::MemoryLimitExceeded { requested, limit } => write!(
                fmt,
                "decoding needs {requested} bytes, memory limit is {limit}"
            ),
        }
    }
}

impl core::error::Error for DecodeError {}

#[test]
fn error_cast() {
    use alloc::boxed::Box;
    let _: Box<dyn core::error::Error> = DecodeError::CodeTableOverflow.into();
}
