use super::DecodeError;

/// Reads variable-width codes from a byte run, least significant bit first.
///
/// Bit 0 of byte 0 is the first bit of the stream and bit 7 of byte 0 comes
/// right before bit 0 of byte 1. The first bit read becomes the least
/// significant bit of the returned code.
#[derive(Debug, Clone)]
pub(crate) struct BitReader<'a> {
    data: &'a [u8],
    /// Offset in bits, only ever moves forward.
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bits consumed so far.
    #[cfg(test)]
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() * 8 - self.pos
    }

    /// Reads the next `width` bits, at most 16.
    pub(crate) fn read(&mut self, width: u8) -> Result<u16, DecodeError> {
        debug_assert!(width <= 16);
        let remaining = self.remaining();
        if remaining < usize::from(width) {
            return Err(DecodeError::BitstreamExhausted {
                requested: width,
                remaining,
            });
        }

        let width = usize::from(width);
        let mut code = 0u32;
        let mut filled = 0;
        while filled < width {
            let byte = u32::from(self.data[self.pos / 8]);
            let shift = self.pos % 8;
            let take = (8 - shift).min(width - filled);
            let bits = (byte >> shift) & ((1 << take) - 1);
            code |= bits << filled;
            filled += take;
            self.pos += take;
        }
        Ok(code as u16)
    }
}
