use crate::common::{Block, ImageDescriptor};
use crate::traits::ReadBytesExt;

use super::{blocks, DecodeError};

/// Finds the first image descriptor at or after `pos`.
///
/// Extension blocks are stepped over whole, so separator bytes inside their
/// payload don't count. Bytes that start no known block are skipped one at a
/// time. Returns the descriptor and the offset right after it.
pub(crate) fn locate(data: &[u8], mut pos: usize) -> Result<(ImageDescriptor, usize), DecodeError> {
    while let Some(&byte) = data.get(pos) {
        match Block::from_u8(byte) {
            Some(Block::Image) => {
                let start = pos + 1;
                let bytes = data
                    .array_at::<9>(start)
                    .ok_or(DecodeError::TruncatedImageDescriptor {
                        available: data.len() - start,
                    })?;
                let descriptor = ImageDescriptor::from_bytes(bytes);
                if descriptor.area() == 0 {
                    return Err(DecodeError::ZeroSizedImage);
                }
                return Ok((descriptor, start + 9));
            }
            // Label byte, then sub-blocks. A broken extension hides whatever follows it.
            Some(Block::Extension) => {
                pos = blocks::skip(data, pos + 2)
                    .map_err(|_| DecodeError::ImageDescriptorNotFound)?;
            }
            Some(Block::Trailer) => break,
            None => pos += 1,
        }
    }
    Err(DecodeError::ImageDescriptorNotFound)
}
