use alloc::vec::Vec;

use crate::common::{ColorTable, PixelGrid};

use super::DecodeError;

/// Resolves every index against `palette` and shapes the result into rows.
///
/// Every index is checked against the palette before the length is compared
/// with `width * height`.
pub(crate) fn compose(
    indices: &[u8],
    palette: &ColorTable,
    width: u16,
    height: u16,
) -> Result<PixelGrid, DecodeError> {
    let pixels = indices
        .iter()
        .map(|&index| {
            palette.get(index).ok_or(DecodeError::IndexOutOfPalette {
                index,
                palette_len: palette.len(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let (width, height) = (usize::from(width), usize::from(height));
    let expected = width * height;
    if pixels.len() != expected {
        return Err(DecodeError::IndexStreamLengthMismatch {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(PixelGrid::new(width, height, pixels))
}
