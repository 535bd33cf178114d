//! XLS (BIFF8) reader.
//!
//! Opens the Compound File Binary container, reads the `Workbook` stream,
//! collects the shared string table and sheet directory from the globals
//! substream, then fills one worksheet per worksheet substream.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use sheetxml_core::{CellError, CellValue, Workbook, Worksheet};

use crate::biff::parser::{read_bytes8, read_f64, read_rk, read_u16, read_u32, read_u8};
use crate::biff::records;
use crate::biff::strings::{parse_sst, read_short_string, read_unicode_string};
use crate::biff::{self, BiffRecord};
use crate::error::{XlsError, XlsResult};

/// Row height in twips Excel assumes for BIFF8 sheets without a
/// DEFAULTROWHEIGHT record (12.75 points)
pub const XLS_DEFAULT_ROW_HEIGHT: i16 = 255;

/// XLS file reader
pub struct XlsReader;

/// A BOUNDSHEET entry
#[derive(Debug)]
struct SheetInfo {
    /// Stream offset of the sheet's BOF record
    offset: u32,
    /// 0 = worksheet, 2 = chart, 6 = VBA module
    sheet_type: u8,
    name: String,
}

/// The records between one BOF and its matching EOF
#[derive(Debug)]
struct Substream<'a> {
    offset: u64,
    substream_type: u16,
    records: Vec<&'a BiffRecord>,
}

impl XlsReader {
    /// Read an XLS file from a filesystem path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsResult<Workbook> {
        let path = path.as_ref();
        log::debug!("reading XLS workbook from {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::read(file)
    }

    /// Read an XLS file from any `Read + Seek` source
    pub fn read<R: Read + Seek>(reader: R) -> XlsResult<Workbook> {
        let mut cfb = cfb::CompoundFile::open(reader)?;

        let stream_path = ["/Workbook", "/Book"]
            .into_iter()
            .find(|path| cfb.exists(path))
            .ok_or_else(|| {
                XlsError::InvalidFormat("no Workbook or Book stream found in CFB".into())
            })?;

        let mut stream_data = Vec::new();
        cfb.open_stream(stream_path)?.read_to_end(&mut stream_data)?;

        let all_records = biff::read_all_records(&mut Cursor::new(&stream_data))?;
        log::trace!("{} BIFF records in {}", all_records.len(), stream_path);

        let (sst, sheets, globals_end) = Self::read_globals(&all_records)?;
        let substreams = Self::split_substreams(&all_records[globals_end + 1..]);

        let mut workbook = Workbook::new();
        for (position, info) in sheets.iter().enumerate() {
            if info.sheet_type != records::SHEET_TYPE_WORKSHEET {
                log::debug!(
                    "skipping sheet '{}' of type {}",
                    info.name,
                    info.sheet_type
                );
                continue;
            }

            // BOUNDSHEET offsets locate the substream; fall back to order
            let substream = substreams
                .iter()
                .find(|s| s.offset == info.offset as u64)
                .or_else(|| substreams.get(position));

            let ws = workbook.add_worksheet(info.name.as_str());
            ws.set_default_row_height(XLS_DEFAULT_ROW_HEIGHT);

            match substream {
                Some(s) if s.substream_type == records::BOF_WORKSHEET => {
                    Self::read_sheet(&s.records, ws, &sst)?;
                    log::debug!(
                        "read sheet '{}': {} rows, {} cells",
                        info.name,
                        ws.row_count(),
                        ws.cell_count()
                    );
                }
                Some(s) => log::warn!(
                    "sheet '{}' points at a substream of type 0x{:04X}; left empty",
                    info.name,
                    s.substream_type
                ),
                None => log::warn!("sheet '{}' has no substream; left empty", info.name),
            }
        }

        Ok(workbook)
    }

    /// Read the workbook globals substream.
    ///
    /// Returns the shared strings, the sheet directory and the index of the
    /// globals EOF record.
    fn read_globals(all_records: &[BiffRecord]) -> XlsResult<(Vec<String>, Vec<SheetInfo>, usize)> {
        let first = all_records
            .first()
            .filter(|rec| rec.record_type == records::BOF)
            .ok_or_else(|| XlsError::InvalidFormat("stream does not start with BOF".into()))?;

        let (version, substream) = biff::parse_bof(&first.data)?;
        if substream != records::BOF_WORKBOOK_GLOBALS {
            return Err(XlsError::InvalidFormat(format!(
                "first substream has type 0x{substream:04X}, expected workbook globals"
            )));
        }
        if version != records::BIFF8_VERSION {
            return Err(XlsError::UnsupportedVersion(format!(
                "expected BIFF8 (0x0600), got 0x{version:04X}"
            )));
        }

        let mut sst = Vec::new();
        let mut sheets = Vec::new();

        for (idx, rec) in all_records.iter().enumerate().skip(1) {
            match rec.record_type {
                records::EOF => return Ok((sst, sheets, idx)),
                records::SST => {
                    sst = parse_sst(&rec.data, &rec.continue_offsets)
                        .map_err(|e| Self::in_record(e, rec))?;
                }
                records::BOUNDSHEET => {
                    sheets.push(Self::parse_boundsheet(&rec.data).map_err(|e| Self::in_record(e, rec))?);
                }
                _ => {}
            }
        }

        Err(XlsError::InvalidFormat(
            "workbook globals substream has no EOF".into(),
        ))
    }

    /// BOUNDSHEET: bof_offset(4) + visibility(1) + type(1) + short string
    fn parse_boundsheet(data: &[u8]) -> XlsResult<SheetInfo> {
        let mut offset = 0;
        let bof_offset = read_u32(data, &mut offset)?;
        let _visibility = read_u8(data, &mut offset)?;
        let sheet_type = read_u8(data, &mut offset)?;
        let name = read_short_string(data, &mut offset)?;

        Ok(SheetInfo {
            offset: bof_offset,
            sheet_type,
            name,
        })
    }

    /// Group the records after the globals into BOF..EOF substreams.
    /// Nested substreams (embedded charts) stay inside their parent.
    fn split_substreams(records: &[BiffRecord]) -> Vec<Substream<'_>> {
        let mut groups = Vec::new();
        let mut current: Option<Substream<'_>> = None;
        let mut depth = 0usize;

        for rec in records {
            match rec.record_type {
                records::BOF => {
                    if depth == 0 {
                        let substream_type = biff::parse_bof(&rec.data).map_or(0, |(_, dt)| dt);
                        current = Some(Substream {
                            offset: rec.stream_offset,
                            substream_type,
                            records: Vec::new(),
                        });
                    }
                    depth += 1;
                }
                records::EOF => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        groups.extend(current.take());
                    }
                }
                _ if depth == 1 => {
                    if let Some(group) = current.as_mut() {
                        group.records.push(rec);
                    }
                }
                _ => {}
            }
        }

        groups.extend(current.take());
        groups
    }

    /// Fill a worksheet from its substream records
    fn read_sheet(sheet_records: &[&BiffRecord], ws: &mut Worksheet, sst: &[String]) -> XlsResult<()> {
        // Cell awaiting the STRING record that carries its formula result
        let mut pending_formula: Option<(u32, u16)> = None;

        for rec in sheet_records {
            let result = match rec.record_type {
                records::STRING => match pending_formula.take() {
                    Some((row, col)) => Self::parse_formula_string(&rec.data, ws, row, col),
                    None => Ok(()),
                },
                records::FORMULA => {
                    Self::parse_formula(&rec.data, ws).map(|pending| pending_formula = pending)
                }
                other => {
                    pending_formula = None;
                    match other {
                        records::DEFAULTROWHEIGHT => Self::parse_default_row_height(&rec.data, ws),
                        records::ROW => Self::parse_row(&rec.data, ws),
                        records::LABELSST => Self::parse_labelsst(&rec.data, ws, sst),
                        records::LABEL | records::RSTRING => Self::parse_label(&rec.data, ws),
                        records::NUMBER => Self::parse_number(&rec.data, ws),
                        records::RK => Self::parse_rk(&rec.data, ws),
                        records::MULRK => Self::parse_mulrk(&rec.data, ws),
                        records::BLANK => Self::parse_blank(&rec.data, ws),
                        records::MULBLANK => Self::parse_mulblank(&rec.data, ws),
                        records::BOOLERR => Self::parse_boolerr(&rec.data, ws),
                        _ => Ok(()),
                    }
                }
            };
            result.map_err(|e| Self::in_record(e, rec))?;
        }

        Ok(())
    }

    /// Attach the failing record to a low-level parse error
    fn in_record(err: XlsError, rec: &BiffRecord) -> XlsError {
        match err {
            XlsError::Parse(message) => XlsError::Truncated {
                record: records::name(rec.record_type),
                offset: rec.stream_offset,
                message,
            },
            other => other,
        }
    }

    /// Leading row(2) + col(2) + xf(2) of every cell record
    fn cell_header(data: &[u8], off: &mut usize) -> XlsResult<(u32, u16)> {
        let row = read_u16(data, off)? as u32;
        let col = read_u16(data, off)?;
        let _xf = read_u16(data, off)?;
        Ok((row, col))
    }

    // Structure records

    /// DEFAULTROWHEIGHT: options(2) + height(2)
    fn parse_default_row_height(data: &[u8], ws: &mut Worksheet) -> XlsResult<()> {
        let mut off = 0;
        let _options = read_u16(data, &mut off)?;
        let height = read_u16(data, &mut off)?;
        ws.set_default_row_height((height & 0x7FFF) as i16);
        Ok(())
    }

    /// ROW: row(2) + first_col(2) + last_col_plus1(2) + height(2) + ...
    ///
    /// Bits 0-14 of the height are twips; bit 15 means the row uses the
    /// sheet's default height.
    fn parse_row(data: &[u8], ws: &mut Worksheet) -> XlsResult<()> {
        let mut off = 0;
        let row = read_u16(data, &mut off)? as u32;
        let _first_col = read_u16(data, &mut off)?;
        let _last_col_plus1 = read_u16(data, &mut off)?;
        let raw_height = read_u16(data, &mut off)?;

        let height = if raw_height & 0x8000 != 0 {
            ws.default_row_height()
        } else {
            (raw_height & 0x7FFF) as i16
        };
        ws.row_or_create(row).height = height;
        Ok(())
    }

    // Cell records

    /// LABELSST: header + sst_index(4)
    fn parse_labelsst(data: &[u8], ws: &mut Worksheet, sst: &[String]) -> XlsResult<()> {
        let mut off = 0;
        let (row, col) = Self::cell_header(data, &mut off)?;
        let index = read_u32(data, &mut off)? as usize;

        match sst.get(index) {
            Some(s) => ws.set_cell_value_at(row, col, CellValue::String(s.clone()))?,
            None => log::warn!(
                "cell ({row}, {col}) refers to shared string {index} of {}; skipped",
                sst.len()
            ),
        }
        Ok(())
    }

    /// LABEL / RSTRING: header + unicode string (+ runs for RSTRING)
    fn parse_label(data: &[u8], ws: &mut Worksheet) -> XlsResult<()> {
        let mut off = 0;
        let (row, col) = Self::cell_header(data, &mut off)?;
        let text = read_unicode_string(data, &mut off)?;
        ws.set_cell_value_at(row, col, CellValue::String(text))?;
        Ok(())
    }

    /// NUMBER: header + f64(8)
    fn parse_number(data: &[u8], ws: &mut Worksheet) -> XlsResult<()> {
        let mut off = 0;
        let (row, col) = Self::cell_header(data, &mut off)?;
        let value = read_f64(data, &mut off)?;
        ws.set_cell_value_at(row, col, CellValue::Number(value))?;
        Ok(())
    }

    /// RK: header + rk(4)
    fn parse_rk(data: &[u8], ws: &mut Worksheet) -> XlsResult<()> {
        let mut off = 0;
        let (row, col) = Self::cell_header(data, &mut off)?;
        let value = read_rk(data, &mut off)?;
        ws.set_cell_value_at(row, col, CellValue::Number(value))?;
        Ok(())
    }

    /// The trailing last_col(2) of MULRK / MULBLANK, and where the
    /// repeated entries end
    fn last_col(data: &[u8]) -> XlsResult<(u16, usize)> {
        let end = data
            .len()
            .checked_sub(2)
            .filter(|&end| end >= 4)
            .ok_or_else(|| XlsError::Parse(format!("record too short: {} bytes", data.len())))?;
        let mut off = end;
        Ok((read_u16(data, &mut off)?, end))
    }

    /// MULRK: row(2) + first_col(2) + [xf(2) + rk(4)]* + last_col(2)
    fn parse_mulrk(data: &[u8], ws: &mut Worksheet) -> XlsResult<()> {
        let mut off = 0;
        let row = read_u16(data, &mut off)? as u32;
        let first_col = read_u16(data, &mut off)?;
        let (last_col, end) = Self::last_col(data)?;

        for col in first_col..=last_col {
            if off + 6 > end {
                break;
            }
            let _xf = read_u16(data, &mut off)?;
            let value = read_rk(data, &mut off)?;
            ws.set_cell_value_at(row, col, CellValue::Number(value))?;
        }
        Ok(())
    }

    /// BLANK: header only; the cell exists but holds nothing
    fn parse_blank(data: &[u8], ws: &mut Worksheet) -> XlsResult<()> {
        let mut off = 0;
        let (row, col) = Self::cell_header(data, &mut off)?;
        ws.set_cell_value_at(row, col, CellValue::Empty)?;
        Ok(())
    }

    /// MULBLANK: row(2) + first_col(2) + [xf(2)]* + last_col(2)
    fn parse_mulblank(data: &[u8], ws: &mut Worksheet) -> XlsResult<()> {
        let mut off = 0;
        let row = read_u16(data, &mut off)? as u32;
        let first_col = read_u16(data, &mut off)?;
        let (last_col, end) = Self::last_col(data)?;

        for col in first_col..=last_col {
            if off + 2 > end {
                break;
            }
            let _xf = read_u16(data, &mut off)?;
            ws.set_cell_value_at(row, col, CellValue::Empty)?;
        }
        Ok(())
    }

    /// BOOLERR: header + value(1) + is_error(1)
    fn parse_boolerr(data: &[u8], ws: &mut Worksheet) -> XlsResult<()> {
        let mut off = 0;
        let (row, col) = Self::cell_header(data, &mut off)?;
        let value = read_u8(data, &mut off)?;
        let is_error = read_u8(data, &mut off)?;

        let cell_value = if is_error != 0 {
            CellValue::Error(CellError::from_code(value))
        } else {
            CellValue::Boolean(value != 0)
        };
        ws.set_cell_value_at(row, col, cell_value)?;
        Ok(())
    }

    /// FORMULA: header + result(8) + options(2) + reserved(4) + parsed expression
    ///
    /// Only the cached result is kept. Returns the cell position when the
    /// result is a string, which arrives in the next STRING record.
    fn parse_formula(data: &[u8], ws: &mut Worksheet) -> XlsResult<Option<(u32, u16)>> {
        let mut off = 0;
        let (row, col) = Self::cell_header(data, &mut off)?;
        let result = read_bytes8(data, &mut off)?;

        let mut pending = None;
        let cached = if result[6] == 0xFF && result[7] == 0xFF {
            match result[0] {
                0x00 => {
                    pending = Some((row, col));
                    None
                }
                0x01 => Some(CellValue::Boolean(result[2] != 0)),
                0x02 => Some(CellValue::Error(CellError::from_code(result[2]))),
                0x03 => Some(CellValue::String(String::new())),
                other => {
                    log::debug!("cell ({row}, {col}): formula result type 0x{other:02X}, read as blank");
                    ws.set_cell_value_at(row, col, CellValue::Empty)?;
                    return Ok(None);
                }
            }
        } else {
            Some(CellValue::Number(f64::from_le_bytes(result)))
        };

        ws.set_cell_value_at(
            row,
            col,
            CellValue::Formula {
                text: String::new(),
                cached_value: cached.map(Box::new),
            },
        )?;
        Ok(pending)
    }

    /// STRING: unicode string result of the preceding FORMULA
    fn parse_formula_string(data: &[u8], ws: &mut Worksheet, row: u32, col: u16) -> XlsResult<()> {
        let mut off = 0;
        let text = read_unicode_string(data, &mut off)?;
        ws.set_cell_value_at(
            row,
            col,
            CellValue::Formula {
                text: String::new(),
                cached_value: Some(Box::new(CellValue::String(text))),
            },
        )?;
        Ok(())
    }
}
