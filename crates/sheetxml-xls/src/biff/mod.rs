//! BIFF8 record stream.
//!
//! A BIFF8 stream is a flat sequence of records: a 2-byte type, a 2-byte
//! body length, then the body. Bodies longer than 8224 bytes continue in
//! CONTINUE records, which are merged into the record they extend. The
//! offsets where each continuation started are kept because string data in
//! the SST restarts its encoding flags at those points.

pub mod parser;
pub mod records;
pub mod strings;

use std::io::Read;

use crate::error::{XlsError, XlsResult};
use parser::read_u16;

/// A record with its CONTINUE bodies appended
#[derive(Debug, Clone)]
pub struct BiffRecord {
    /// Record type (see [`records`])
    pub record_type: u16,
    /// Record body including continuations
    pub data: Vec<u8>,
    /// Offsets into `data` where a CONTINUE body begins
    pub continue_offsets: Vec<usize>,
    /// Offset of the record header in the stream
    pub stream_offset: u64,
}

/// Read every record of a stream in order
pub fn read_all_records<R: Read>(stream: &mut R) -> XlsResult<Vec<BiffRecord>> {
    let mut records: Vec<BiffRecord> = Vec::new();
    let mut header = [0u8; 4];
    let mut position: u64 = 0;

    loop {
        match stream.read_exact(&mut header) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(XlsError::Io(e)),
        }

        let record_type = u16::from_le_bytes([header[0], header[1]]);
        let body_len = u16::from_le_bytes([header[2], header[3]]) as usize;

        let mut body = vec![0u8; body_len];
        stream.read_exact(&mut body)?;

        if record_type == records::CONTINUE {
            match records.last_mut() {
                Some(prev) => {
                    prev.continue_offsets.push(prev.data.len());
                    prev.data.extend_from_slice(&body);
                }
                None => log::warn!("CONTINUE record at stream start ignored"),
            }
        } else {
            records.push(BiffRecord {
                record_type,
                data: body,
                continue_offsets: Vec::new(),
                stream_offset: position,
            });
        }

        position += 4 + body_len as u64;
    }

    Ok(records)
}

/// BOF record fields: `(version, substream_type)`
pub fn parse_bof(data: &[u8]) -> XlsResult<(u16, u16)> {
    let mut offset = 0;
    let version = read_u16(data, &mut offset)?;
    let substream = read_u16(data, &mut offset)?;
    Ok((version, substream))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn raw(record_type: u16, body: &[u8]) -> Vec<u8> {
        let mut out = record_type.to_le_bytes().to_vec();
        out.extend_from_slice(&(body.len() as u16).to_le_bytes());
        out.extend_from_slice(body);
        out
    }

    #[test]
    fn test_continue_records_are_merged() {
        let mut stream = raw(records::BOF, &[0x00, 0x06, 0x05, 0x00]);
        stream.extend(raw(records::SST, &[1, 2, 3]));
        stream.extend(raw(records::CONTINUE, &[4, 5]));
        stream.extend(raw(records::CONTINUE, &[6]));
        stream.extend(raw(records::EOF, &[]));

        let records = read_all_records(&mut Cursor::new(stream)).unwrap();
        assert_eq!(records.len(), 3);

        let sst = &records[1];
        assert_eq!(sst.data, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(sst.continue_offsets, vec![3, 5]);
        assert_eq!(sst.stream_offset, 8);
        assert_eq!(records[2].stream_offset, 8 + 7 + 6 + 5);
    }

    #[test]
    fn test_truncated_body_is_an_error() {
        let mut stream = raw(records::NUMBER, &[0; 14]);
        stream.truncate(10);
        assert!(read_all_records(&mut Cursor::new(stream)).is_err());
    }

    #[test]
    fn test_parse_bof() {
        assert_eq!(
            parse_bof(&[0x00, 0x06, 0x10, 0x00, 0xFF]).unwrap(),
            (records::BIFF8_VERSION, records::BOF_WORKSHEET)
        );
        assert!(parse_bof(&[0x00]).is_err());
    }
}
