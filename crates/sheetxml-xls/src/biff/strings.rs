//! BIFF8 string decoding.
//!
//! A BIFF8 Unicode string is a character count (1 or 2 bytes), an option
//! byte, optional rich-text run and phonetic block sizes, the characters,
//! then the run and phonetic data. Option bit 0 selects UTF-16LE over
//! compressed 8-bit characters; bit 2 marks phonetic data and bit 3 rich
//! text runs.
//!
//! When a string in the SST crosses into a CONTINUE record, the
//! continuation starts with a fresh option byte and the remaining
//! characters may switch encoding.

use super::parser::{read_u16, read_u32, read_u8};
use crate::error::{XlsError, XlsResult};

const FLAG_WIDE: u8 = 0x01;
const FLAG_PHONETIC: u8 = 0x04;
const FLAG_RICH: u8 = 0x08;

/// Read a string with a 1-byte character count (BOUNDSHEET names)
pub fn read_short_string(data: &[u8], offset: &mut usize) -> XlsResult<String> {
    let char_count = read_u8(data, offset)? as usize;
    let flags = read_u8(data, offset)?;
    read_characters(data, offset, char_count, flags, &[])
}

/// Read a string with a 2-byte character count from a single record body
pub fn read_unicode_string(data: &[u8], offset: &mut usize) -> XlsResult<String> {
    read_continued_string(data, offset, &[])
}

/// Read a string with a 2-byte character count whose characters may cross
/// the given CONTINUE boundaries
pub fn read_continued_string(
    data: &[u8],
    offset: &mut usize,
    boundaries: &[usize],
) -> XlsResult<String> {
    let char_count = read_u16(data, offset)? as usize;
    let flags = read_u8(data, offset)?;

    let run_count = if flags & FLAG_RICH != 0 {
        read_u16(data, offset)? as usize
    } else {
        0
    };
    let phonetic_size = if flags & FLAG_PHONETIC != 0 {
        read_u32(data, offset)? as usize
    } else {
        0
    };

    let text = read_characters(data, offset, char_count, flags, boundaries)?;

    // Each run is a 2-byte character position and a 2-byte font index
    *offset += run_count * 4 + phonetic_size;
    Ok(text)
}

fn read_characters(
    data: &[u8],
    offset: &mut usize,
    char_count: usize,
    flags: u8,
    boundaries: &[usize],
) -> XlsResult<String> {
    let mut wide = flags & FLAG_WIDE != 0;
    let mut units: Vec<u16> = Vec::with_capacity(char_count);

    while units.len() < char_count {
        if boundaries.binary_search(offset).is_ok() {
            wide = read_u8(data, offset)? & FLAG_WIDE != 0;
        }

        let limit = boundaries
            .iter()
            .copied()
            .find(|&b| b > *offset)
            .unwrap_or(data.len());
        let width = if wide { 2 } else { 1 };
        let fit = (limit.saturating_sub(*offset) / width).min(char_count - units.len());
        if fit == 0 {
            return Err(XlsError::Parse(format!(
                "string data too short: {} of {} characters read at offset {}",
                units.len(),
                char_count,
                *offset
            )));
        }

        for _ in 0..fit {
            let unit = if wide {
                read_u16(data, offset)?
            } else {
                read_u8(data, offset)? as u16
            };
            units.push(unit);
        }
    }

    // Compressed characters are UTF-16 code units with a zero high byte
    String::from_utf16(&units).map_err(|e| XlsError::Parse(format!("invalid UTF-16 string: {e}")))
}

/// Parse a shared string table.
///
/// The body starts with the total reference count and the unique string
/// count (4 bytes each), followed by the unique strings. A table that ends
/// early keeps the strings read so far.
pub fn parse_sst(data: &[u8], boundaries: &[usize]) -> XlsResult<Vec<String>> {
    let mut offset = 0;

    let _total_refs = read_u32(data, &mut offset)?;
    let unique_count = read_u32(data, &mut offset)? as usize;

    // The count comes from the file; cap the preallocation
    let mut strings = Vec::with_capacity(unique_count.min(data.len()));

    for i in 0..unique_count {
        match read_continued_string(data, &mut offset, boundaries) {
            Ok(s) => strings.push(s),
            Err(e) => {
                log::warn!("SST truncated at string {i}/{unique_count}: {e}");
                break;
            }
        }
    }

    Ok(strings)
}
