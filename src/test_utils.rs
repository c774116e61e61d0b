//! Builders for hand-made image data in unit tests.
use alloc::vec::Vec;

/// Packs codes of arbitrary width, least significant bit first.
#[derive(Default)]
pub(crate) struct CodeWriter {
    bytes: Vec<u8>,
    acc: u32,
    bits: u8,
}

impl CodeWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn write(&mut self, code: u16, width: u8) -> &mut Self {
        debug_assert!(u32::from(code) < 1 << width);
        self.acc |= u32::from(code) << self.bits;
        self.bits += width;
        while self.bits >= 8 {
            self.bytes.push(self.acc as u8);
            self.acc >>= 8;
            self.bits -= 8;
        }
        self
    }

    pub(crate) fn finish(&mut self) -> Vec<u8> {
        if self.bits > 0 {
            self.bytes.push(self.acc as u8);
            self.acc = 0;
            self.bits = 0;
        }
        core::mem::take(&mut self.bytes)
    }
}

/// Minimum code size followed by `data` in sub-blocks of at most 255 bytes.
pub(crate) fn image_data(min_code_size: u8, data: &[u8]) -> Vec<u8> {
    let mut out = vec![min_code_size];
    for chunk in data.chunks(0xFF) {
        out.push(chunk.len() as u8);
        out.extend_from_slice(chunk);
    }
    out.push(0);
    out
}

/// A complete single-frame file with a global color table of `2 << size` colors.
pub(crate) fn gif_file(size: u8, width: u16, height: u16, image_data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"GIF89a");
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&[0x80 | size, 0, 0]);
    for i in 0..(2u16 << size) {
        let v = i as u8;
        out.extend_from_slice(&[v, v, v]);
    }
    out.push(0x2C);
    out.extend_from_slice(&[0, 0, 0, 0]);
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.push(0);
    out.extend_from_slice(image_data);
    out.push(0x3B);
    out
}

#[test]
fn code_writer_packs_lsb_first() {
    let mut w = CodeWriter::new();
    w.write(4, 3).write(0, 3).write(5, 3);
    assert_eq!(w.finish(), [0x44, 0x01]);
}
