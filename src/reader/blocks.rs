use alloc::vec::Vec;

use super::DecodeError;

/// Walks a run of length-prefixed sub-blocks up to the zero-length terminator.
#[derive(Debug, Clone)]
pub(crate) struct SubBlocks<'a> {
    data: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> SubBlocks<'a> {
    /// Starts at the length byte of the first sub-block.
    pub(crate) fn new(data: &'a [u8], pos: usize) -> Self {
        Self {
            data,
            pos,
            done: false,
        }
    }

    /// Offset just past the terminator, once iteration has finished.
    pub(crate) fn end(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for SubBlocks<'a> {
    type Item = Result<&'a [u8], DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let offset = self.pos;
        let Some(&len) = self.data.get(offset) else {
            self.done = true;
            return Some(Err(DecodeError::TruncatedSubBlock {
                offset,
                declared: 0,
                available: 0,
            }));
        };
        if len == 0 {
            self.done = true;
            self.pos += 1;
            return None;
        }

        let start = offset + 1;
        let declared = usize::from(len);
        let available = self.data.len() - start;
        if available < declared {
            self.done = true;
            return Some(Err(DecodeError::TruncatedSubBlock {
                offset,
                declared,
                available,
            }));
        }
        self.pos = start + declared;
        Some(Ok(&self.data[start..self.pos]))
    }
}

/// Compressed data of one frame.
#[derive(Debug)]
pub(crate) struct ImageData {
    pub(crate) min_code_size: u8,
    /// Payload of every sub-block, concatenated.
    pub(crate) bytes: Vec<u8>,
}

/// Reads the minimum code size at `pos` and the sub-blocks following it.
pub(crate) fn read_image_data(data: &[u8], pos: usize) -> Result<ImageData, DecodeError> {
    let &min_code_size = data.get(pos).ok_or(DecodeError::TruncatedSubBlock {
        offset: pos,
        declared: 0,
        available: 0,
    })?;
    let mut bytes = Vec::new();
    for block in SubBlocks::new(data, pos + 1) {
        bytes.extend_from_slice(block?);
    }
    Ok(ImageData {
        min_code_size,
        bytes,
    })
}

/// Offset just past the sub-blocks starting at `pos`, without collecting them.
pub(crate) fn skip(data: &[u8], pos: usize) -> Result<usize, DecodeError> {
    let mut blocks = SubBlocks::new(data, pos);
    for block in blocks.by_ref() {
        block?;
    }
    Ok(blocks.end())
}
