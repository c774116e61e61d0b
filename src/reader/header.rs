use crate::common::{ColorTable, LogicalScreenDescriptor, Version};
use crate::traits::ReadBytesExt;

use super::DecodeError;

/// Signature plus logical screen descriptor.
pub(crate) const HEADER_LEN: usize = 13;

/// Everything in front of the first block.
#[derive(Debug)]
pub(crate) struct Header {
    pub(crate) version: Version,
    pub(crate) screen: LogicalScreenDescriptor,
    pub(crate) global_color_table: Option<ColorTable>,
    /// Offset of the first byte after the global color table.
    pub(crate) end: usize,
}

pub(crate) fn parse(data: &[u8]) -> Result<Header, DecodeError> {
    let (Some(signature), Some(screen)) = (data.array_at::<6>(0), data.array_at::<7>(6)) else {
        return Err(DecodeError::MalformedHeader { len: data.len() });
    };
    let version =
        Version::from_signature(&signature).ok_or(DecodeError::InvalidSignature { signature })?;
    let screen = LogicalScreenDescriptor::from_bytes(screen);

    let table_bytes = screen.global_color_table_len() * 3;
    let available = data.len() - HEADER_LEN;
    if available < table_bytes {
        return Err(DecodeError::TruncatedColorTable {
            expected: table_bytes,
            available,
        });
    }
    let global_color_table = screen
        .global_color_table
        .then(|| ColorTable::from_rgb_bytes(&data[HEADER_LEN..HEADER_LEN + table_bytes]));

    Ok(Header {
        version,
        screen,
        global_color_table,
        end: HEADER_LEN + table_bytes,
    })
}
