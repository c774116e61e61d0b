//! GIF flavoured LZW decompression.
//!
//! The code table is a fixed-capacity arena of 4096 slots. Slots below the
//! Clear Code hold the single palette indices, the next two are the Clear and
//! End sentinels, and every slot after that is a copy of an earlier slot with
//! one index appended.
//!
//! Code width starts at `min_code_size + 1` and grows by one bit as soon as
//! the next free code no longer fits, up to 12 bits:
//!
//! ```text
//! min_code_size = 2   clear = 4   end = 5
//! entries 6, 7      -> read at 3 bits
//! entries 8 ..= 15  -> read at 4 bits
//! ```

use alloc::vec::Vec;

use super::bits::BitReader;
use super::DecodeError;

/// Widest code the format allows.
pub(crate) const MAX_CODE_WIDTH: u8 = 12;
/// Capacity of the code table.
pub(crate) const MAX_CODES: usize = 1 << MAX_CODE_WIDTH;

/// Smallest accepted minimum code size.
pub(crate) const MIN_CODE_SIZE: u8 = 2;
/// Largest accepted minimum code size, palette indices are bytes.
pub(crate) const MAX_MIN_CODE_SIZE: u8 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Indices(Vec<u8>),
    Clear,
    End,
}

#[derive(Debug)]
struct CodeTable {
    entries: Vec<Entry>,
    first_free: usize,
}

impl CodeTable {
    fn new(min_code_size: u8) -> Self {
        let clear = 1usize << min_code_size;
        let mut entries = Vec::with_capacity(MAX_CODES);
        entries.extend((0..clear).map(|index| Entry::Indices(vec![index as u8])));
        entries.push(Entry::Clear);
        entries.push(Entry::End);
        Self {
            entries,
            first_free: clear + 2,
        }
    }

    /// Drops every dynamically defined entry. Literals never change, so they stay.
    fn reset(&mut self) {
        self.entries.truncate(self.first_free);
    }

    /// The next code to be defined.
    fn next_code(&self) -> u16 {
        self.entries.len() as u16
    }

    fn is_full(&self) -> bool {
        self.entries.len() == MAX_CODES
    }

    fn get(&self, code: u16) -> Option<&Entry> {
        self.entries.get(usize::from(code))
    }

    fn indices(&self, code: u16) -> Option<&[u8]> {
        match self.get(code) {
            Some(Entry::Indices(indices)) => Some(indices),
            _ => None,
        }
    }

    /// Appends the entry `prefix + [k]`. `None` if `prefix` is not a real entry.
    fn define(&mut self, prefix: u16, k: u8) -> Option<()> {
        let prefix = self.indices(prefix)?;
        let mut indices = Vec::with_capacity(prefix.len() + 1);
        indices.extend_from_slice(prefix);
        indices.push(k);
        self.entries.push(Entry::Indices(indices));
        Some(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum State {
    /// Nothing read yet, only a Clear Code is acceptable.
    ExpectClear,
    Steady,
    /// The End Code was read.
    Done,
}

/// Decompresses one frame's image data into palette indices.
#[derive(Debug)]
pub(crate) struct LzwDecoder {
    table: CodeTable,
    min_code_size: u8,
    code_width: u8,
    /// Last code read since the most recent Clear, always a real entry.
    prev: Option<u16>,
    state: State,
    deferred_clear: bool,
    output_limit: Option<usize>,
}

impl LzwDecoder {
    pub(crate) fn new(min_code_size: u8) -> Result<Self, DecodeError> {
        if !(MIN_CODE_SIZE..=MAX_MIN_CODE_SIZE).contains(&min_code_size) {
            return Err(DecodeError::InvalidMinCodeSize(min_code_size));
        }
        Ok(Self {
            table: CodeTable::new(min_code_size),
            min_code_size,
            code_width: min_code_size + 1,
            prev: None,
            state: State::ExpectClear,
            deferred_clear: false,
            output_limit: None,
        })
    }

    /// Keep decoding without new entries once the table is full, instead of failing.
    pub(crate) fn with_deferred_clear(mut self, allow: bool) -> Self {
        self.deferred_clear = allow;
        self
    }

    /// Fail once more than `limit` indices have been produced.
    pub(crate) fn with_output_limit(mut self, limit: Option<usize>) -> Self {
        self.output_limit = limit;
        self
    }

    fn clear_code(&self) -> u16 {
        1 << self.min_code_size
    }

    /// Reads codes until the End Code, appending the decoded indices to `out`.
    ///
    /// The End Code itself adds nothing. Running out of bits first is an error,
    /// it is the only sign of a missing End Code.
    pub(crate) fn decode(
        &mut self,
        bits: &mut BitReader<'_>,
        out: &mut Vec<u8>,
    ) -> Result<(), DecodeError> {
        while self.state != State::Done {
            let code = bits.read(self.code_width)?;
            self.step(code, out)?;
            if let Some(limit) = self.output_limit {
                if out.len() > limit {
                    return Err(DecodeError::MemoryLimitExceeded {
                        requested: out.len() as u64,
                        limit: limit as u64,
                    });
                }
            }
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.table.reset();
        self.code_width = self.min_code_size + 1;
        self.prev = None;
        self.state = State::Steady;
    }

    fn step(&mut self, code: u16, out: &mut Vec<u8>) -> Result<(), DecodeError> {
        match self.state {
            State::ExpectClear if code == self.clear_code() => {
                self.reset();
                return Ok(());
            }
            State::ExpectClear => return Err(DecodeError::UnexpectedFirstCode(code)),
            State::Done => return Ok(()),
            State::Steady => {}
        }

        let next_code = self.table.next_code();
        let first = match self.table.get(code) {
            Some(Entry::Clear) => {
                self.reset();
                return Ok(());
            }
            Some(Entry::End) => {
                self.state = State::Done;
                return Ok(());
            }
            Some(Entry::Indices(indices)) => {
                out.extend_from_slice(indices);
                indices[0]
            }
            None => {
                // The code is the entry this very step defines: prev + prev[0].
                let prefix = match self.prev {
                    Some(prev) if code == next_code => self.table.indices(prev),
                    _ => None,
                };
                let prefix = prefix.ok_or(DecodeError::InvalidCode { code, next_code })?;
                let k = prefix[0];
                out.extend_from_slice(prefix);
                out.push(k);
                k
            }
        };

        if let Some(prev) = self.prev {
            self.define(prev, first, next_code)?;
        }
        self.prev = Some(code);
        Ok(())
    }

    fn define(&mut self, prev: u16, k: u8, next_code: u16) -> Result<(), DecodeError> {
        if self.table.is_full() {
            return if self.deferred_clear {
                Ok(())
            } else {
                Err(DecodeError::CodeTableOverflow)
            };
        }
        self.table
            .define(prev, k)
            .ok_or(DecodeError::InvalidCode {
                code: prev,
                next_code,
            })?;
        if usize::from(self.table.next_code()) == 1 << self.code_width
            && self.code_width < MAX_CODE_WIDTH
        {
            self.code_width += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::CodeWriter;
    use alloc::vec::Vec;
    use weezl::{decode::Decoder as WeezlDecoder, encode::Encoder as WeezlEncoder, BitOrder};

    fn decode(min_code_size: u8, data: &[u8]) -> Result<Vec<u8>, DecodeError> {
        let mut out = Vec::new();
        LzwDecoder::new(min_code_size)?.decode(&mut BitReader::new(data), &mut out)?;
        Ok(out)
    }

    /// Writes literal codes at the widths a decoder expects, without ever
    /// reusing a table entry, and terminates with the End Code.
    fn literal_stream(min_code_size: u8, literals: &[u8]) -> Vec<u8> {
        let clear = 1u16 << min_code_size;
        let mut width = min_code_size + 1;
        let mut next = clear + 2;
        let mut w = CodeWriter::new();
        w.write(clear, width);
        for (i, &lit) in literals.iter().enumerate() {
            w.write(u16::from(lit), width);
            if i > 0 && usize::from(next) < MAX_CODES {
                next += 1;
                if next == 1 << width && width < MAX_CODE_WIDTH {
                    width += 1;
                }
            }
        }
        w.write(clear + 1, width);
        w.finish()
    }

    /// xorshift, enough to defeat long LZW matches.
    fn noise(len: usize, modulus: u8, mut seed: u32) -> Vec<u8> {
        (0..len)
            .map(|_| {
                seed ^= seed << 13;
                seed ^= seed >> 17;
                seed ^= seed << 5;
                (seed % u32::from(modulus)) as u8
            })
            .collect()
    }

    #[test]
    fn single_index() {
        assert_eq!(decode(2, &[0x44, 0x01]).unwrap(), [0]);
    }

    #[test]
    fn reference_frame() {
        // 10x10, four colors, image data of the well known sample_1.gif
        let data = [
            0x8C, 0x2D, 0x99, 0x87, 0x2A, 0x1C, 0xDC, 0x33, 0xA0, 0x02, 0x75, 0xEC, 0x95, 0xFA,
            0xA8, 0xDE, 0x60, 0x8C, 0x04, 0x91, 0x4C, 0x01,
        ];
        #[rustfmt::skip]
        let expected = [
            1, 1, 1, 1, 1, 2, 2, 2, 2, 2,
            1, 1, 1, 1, 1, 2, 2, 2, 2, 2,
            1, 1, 1, 1, 1, 2, 2, 2, 2, 2,
            1, 1, 1, 0, 0, 0, 0, 2, 2, 2,
            1, 1, 1, 0, 0, 0, 0, 2, 2, 2,
            2, 2, 2, 0, 0, 0, 0, 1, 1, 1,
            2, 2, 2, 0, 0, 0, 0, 1, 1, 1,
            2, 2, 2, 2, 2, 1, 1, 1, 1, 1,
            2, 2, 2, 2, 2, 1, 1, 1, 1, 1,
            2, 2, 2, 2, 2, 1, 1, 1, 1, 1,
        ];
        assert_eq!(decode(2, &data).unwrap(), expected);
    }

    #[test]
    fn code_not_yet_in_table() {
        let data = CodeWriter::new()
            .write(4, 3)
            .write(1, 3)
            .write(6, 3)
            .write(5, 3)
            .finish();
        assert_eq!(decode(2, &data).unwrap(), [1, 1, 1]);
    }

    #[test]
    fn clear_mid_stream_rearms_table() {
        let mut lzw = LzwDecoder::new(2).unwrap();
        let mut out = Vec::new();
        let snapshot = |lzw: &LzwDecoder| (lzw.code_width, lzw.table.next_code(), lzw.prev);

        lzw.step(4, &mut out).unwrap();
        let after_first_clear = snapshot(&lzw);
        assert_eq!(after_first_clear, (3, 6, None));

        for code in [1, 1, 1, 7, 8] {
            lzw.step(code, &mut out).unwrap();
        }
        assert_eq!(lzw.code_width, 4);
        assert_eq!(lzw.table.next_code(), 10);

        lzw.step(4, &mut out).unwrap();
        assert_eq!(snapshot(&lzw), after_first_clear);
        assert_eq!(lzw.table.entries.len(), 6);

        for code in [2, 2] {
            lzw.step(code, &mut out).unwrap();
        }
        lzw.step(5, &mut out).unwrap();
        assert_eq!(lzw.state, State::Done);
        assert_eq!(out, [1, 1, 1, 1, 1, 1, 1, 2, 2]);
    }

    #[test]
    fn clear_mid_stream_from_bits() {
        let data = CodeWriter::new()
            .write(4, 3)
            .write(3, 3)
            .write(3, 3)
            .write(3, 3)
            .write(4, 4)
            .write(0, 3)
            .write(6, 3)
            .write(5, 3)
            .finish();
        assert_eq!(decode(2, &data).unwrap(), [3, 3, 3, 0, 0, 0]);
    }

    #[test]
    fn missing_leading_clear() {
        let data = CodeWriter::new().write(1, 3).write(5, 3).finish();
        assert_eq!(decode(2, &data), Err(DecodeError::UnexpectedFirstCode(1)));
    }

    #[test]
    fn code_beyond_next_free() {
        let data = CodeWriter::new()
            .write(4, 3)
            .write(1, 3)
            .write(7, 3)
            .finish();
        assert_eq!(
            decode(2, &data),
            Err(DecodeError::InvalidCode {
                code: 7,
                next_code: 6
            })
        );
    }

    #[test]
    fn next_code_right_after_clear() {
        let data = CodeWriter::new().write(4, 3).write(6, 3).finish();
        assert_eq!(
            decode(2, &data),
            Err(DecodeError::InvalidCode {
                code: 6,
                next_code: 6
            })
        );
    }

    #[test]
    fn missing_end_code() {
        // the zero padding after the last code decodes as two more literals
        let data = CodeWriter::new()
            .write(4, 3)
            .write(1, 3)
            .write(2, 3)
            .finish();
        assert_eq!(
            decode(2, &data),
            Err(DecodeError::BitstreamExhausted {
                requested: 4,
                remaining: 0
            })
        );
    }

    #[test]
    fn invalid_min_code_size() {
        assert_eq!(
            LzwDecoder::new(1).unwrap_err(),
            DecodeError::InvalidMinCodeSize(1)
        );
        assert_eq!(
            LzwDecoder::new(9).unwrap_err(),
            DecodeError::InvalidMinCodeSize(9)
        );
    }

    #[test]
    fn width_growth_matches_reference_decoder() {
        // Literal codes only, so every code defines one entry and the width
        // walks through 3..=12 bits.
        let literals = noise(3000, 4, 0x2545_F491);
        let data = literal_stream(2, &literals);

        let ours = decode(2, &data).unwrap();
        let reference = WeezlDecoder::new(BitOrder::Lsb, 2).decode(&data).unwrap();
        assert_eq!(ours, reference);
        assert_eq!(ours, literals);
    }

    #[test]
    fn round_trip_with_reference_encoder() {
        for (min_code_size, len, seed) in [(2, 5000, 1), (3, 4000, 7), (5, 3000, 99), (8, 3000, 1234)] {
            let modulus = if min_code_size == 8 { 255 } else { 1 << min_code_size };
            let mut indices = noise(len, modulus, seed);
            // long runs exercise the code-not-yet-in-table case
            indices.extend(core::iter::repeat(1).take(500));
            let data = WeezlEncoder::new(BitOrder::Lsb, min_code_size)
                .encode(&indices)
                .unwrap();
            assert_eq!(decode(min_code_size, &data).unwrap(), indices);
        }
    }

    #[test]
    fn width_never_exceeds_twelve_bits() {
        let literals = noise(4091, 4, 42);
        let data = literal_stream(2, &literals);
        let mut lzw = LzwDecoder::new(2).unwrap();
        let mut out = Vec::new();
        lzw.decode(&mut BitReader::new(&data), &mut out).unwrap();
        assert_eq!(lzw.code_width, MAX_CODE_WIDTH);
        assert!(lzw.table.is_full());
        assert_eq!(out, literals);
    }

    #[test]
    fn table_overflow() {
        // 4091 literals fill the table, the next one needs slot 4096
        let literals = noise(4092, 4, 42);
        let data = literal_stream(2, &literals);
        assert_eq!(decode(2, &data), Err(DecodeError::CodeTableOverflow));

        let mut out = Vec::new();
        LzwDecoder::new(2)
            .unwrap()
            .with_deferred_clear(true)
            .decode(&mut BitReader::new(&data), &mut out)
            .unwrap();
        assert_eq!(out, literals);
    }

    #[test]
    fn output_limit() {
        let data = literal_stream(2, &[1; 20]);
        let mut out = Vec::new();
        let err = LzwDecoder::new(2)
            .unwrap()
            .with_output_limit(Some(10))
            .decode(&mut BitReader::new(&data), &mut out)
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::MemoryLimitExceeded {
                requested: 11,
                limit: 10
            }
        );
    }
}
