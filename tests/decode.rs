use std::num::NonZeroU64;

use gifdec::{DecodeError, DecodeOptions, Encoder, Frame, MemoryLimit, Version};

/// 1x1 screen, black and white global table, one 1x1 frame.
fn single_pixel(lzw: &[u8]) -> Vec<u8> {
    let mut file = b"GIF89a\x01\x00\x01\x00\x80\x00\x00".to_vec();
    file.extend_from_slice(&[0, 0, 0, 255, 255, 255]);
    file.extend_from_slice(&[0x2C, 0, 0, 0, 0, 1, 0, 1, 0, 0]);
    file.push(2);
    file.push(lzw.len() as u8);
    file.extend_from_slice(lzw);
    file.extend_from_slice(&[0, 0x3B]);
    file
}

fn encode(width: u16, height: u16, palette: &[u8], indices: &[u8]) -> Vec<u8> {
    let mut file: Vec<u8> = Vec::new();
    let mut encoder = Encoder::new(&mut file, width, height, palette).unwrap();
    encoder
        .write_frame(&Frame::from_indices(width, height, indices))
        .unwrap();
    encoder.into_inner().unwrap();
    file
}

fn gray_palette() -> Vec<u8> {
    (0..=255u8).flat_map(|v| [v, v, v]).collect()
}

fn noise(len: usize, colors: u32) -> Vec<u8> {
    let mut state = 0x9E37_79B9_u32;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state % colors) as u8
        })
        .collect()
}

#[test]
fn single_black_pixel() {
    // clear, 0, end at 3 bits
    let image = gifdec::decode(&single_pixel(&[0x44, 0x01])).unwrap();
    assert_eq!(image.version(), Version::V89a);
    assert_eq!(image.indices(), [0]);
    let rows: Vec<_> = image.pixels().rows().collect();
    assert_eq!(rows, [[[0, 0, 0]]]);
}

#[test]
fn header_only() {
    let file = b"GIF89a\x01\x00\x01\x00\x00\x00\x00";
    assert_eq!(
        gifdec::decode(file).unwrap_err(),
        DecodeError::ImageDescriptorNotFound
    );
}

#[test]
fn short_sub_block() {
    let mut file = single_pixel(&[]);
    file.truncate(30);
    file.extend_from_slice(&[10, 0x44, 0x01, 0x00]);
    assert_eq!(
        gifdec::decode(&file).unwrap_err(),
        DecodeError::TruncatedSubBlock {
            offset: 30,
            declared: 10,
            available: 3
        }
    );
}

#[test]
fn bad_signature() {
    let mut file = single_pixel(&[0x44, 0x01]);
    file[..3].copy_from_slice(b"PNG");
    assert!(matches!(
        gifdec::decode(&file),
        Err(DecodeError::InvalidSignature { .. })
    ));
}

#[test]
fn index_past_two_colors() {
    // clear, 3, end
    assert_eq!(
        gifdec::decode(&single_pixel(&[0x5C, 0x01])).unwrap_err(),
        DecodeError::IndexOutOfPalette {
            index: 3,
            palette_len: 2
        }
    );
}

#[test]
fn too_many_indices() {
    // clear, 0, 0, end
    assert_eq!(
        gifdec::decode(&single_pixel(&[0x04, 0x0A])).unwrap_err(),
        DecodeError::IndexStreamLengthMismatch {
            expected: 1,
            actual: 2
        }
    );
}

#[test]
fn grid_matches_descriptor() {
    let palette = gray_palette();
    for (width, height) in [(1, 1), (3, 7), (17, 5), (255, 2), (64, 64)] {
        let indices = noise(usize::from(width) * usize::from(height), 256);
        let image = gifdec::decode(&encode(width, height, &palette, &indices)).unwrap();
        let pixels = image.pixels();
        assert_eq!(
            (pixels.width(), pixels.height()),
            (usize::from(width), usize::from(height))
        );
        assert_eq!(pixels.pixels().len(), image.descriptor().area());
        assert_eq!(image.indices(), indices);
    }
}

#[test]
fn several_sub_blocks() {
    let indices = noise(128 * 128, 16);
    let file = encode(128, 128, &gray_palette()[..48], &indices);
    // the compressed data alone spans many sub-blocks
    assert!(file.len() > 4 * 255);

    let image = gifdec::decode(&file).unwrap();
    assert_eq!(image.global_color_table().map(|t| t.len()), Some(16));
    for (pixel, &index) in image.pixels().pixels().iter().zip(&indices) {
        assert_eq!(*pixel, [index; 3]);
    }

    let mut options = DecodeOptions::new();
    options.allow_deferred_clear(true);
    assert_eq!(options.decode(&file).unwrap().indices(), indices);
}

#[test]
fn extension_before_frame() {
    let indices = [1, 0, 1, 0, 1, 0];
    let mut file: Vec<u8> = Vec::new();
    let mut encoder = Encoder::new(&mut file, 3, 2, &[0, 0, 0, 255, 255, 255]).unwrap();
    // a graphic control extension whose delay bytes look like a separator
    encoder
        .write_raw_extension(0xF9, &[&[0, 0x2C, 0x2C, 0]])
        .unwrap();
    encoder
        .write_raw_extension(0xFE, &[b"made by hand"])
        .unwrap();
    encoder
        .write_frame(&Frame::from_indices(3, 2, &indices))
        .unwrap();
    encoder.into_inner().unwrap();

    let image = gifdec::decode(&file).unwrap();
    assert_eq!(image.indices(), indices);
    assert_eq!(
        image.pixels().row(0).unwrap(),
        [[255, 255, 255], [0, 0, 0], [255, 255, 255]]
    );
}

#[test]
fn memory_limit() {
    let file = encode(100, 100, &gray_palette(), &[7; 100 * 100]);
    let mut options = DecodeOptions::new();
    options.set_memory_limit(MemoryLimit::Bytes(NonZeroU64::new(1_000).unwrap()));
    assert_eq!(
        options.decode(&file).unwrap_err(),
        DecodeError::MemoryLimitExceeded {
            requested: 30_000,
            limit: 1_000
        }
    );

    options.set_memory_limit(MemoryLimit::Unlimited);
    let pixels = options.decode(&file).unwrap().into_pixels();
    assert!(pixels.pixels().iter().all(|&p| p == [7, 7, 7]));
}
