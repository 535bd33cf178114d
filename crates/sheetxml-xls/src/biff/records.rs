//! BIFF8 record type constants (MS-XLS 2.3)

// Stream structure
pub const BOF: u16 = 0x0809;
pub const EOF: u16 = 0x000A;
pub const CONTINUE: u16 = 0x003C;

// Workbook globals
pub const BOUNDSHEET: u16 = 0x0085; // sheet name, type and BOF offset
pub const SST: u16 = 0x00FC; // shared string table

// Cell records
pub const LABELSST: u16 = 0x00FD;
pub const LABEL: u16 = 0x0204;
pub const RSTRING: u16 = 0x00D6;
pub const NUMBER: u16 = 0x0203;
pub const RK: u16 = 0x027E;
pub const MULRK: u16 = 0x00BD;
pub const BLANK: u16 = 0x0201;
pub const MULBLANK: u16 = 0x00BE;
pub const BOOLERR: u16 = 0x0205;
pub const FORMULA: u16 = 0x0006;
pub const STRING: u16 = 0x0207; // cached string result of the preceding FORMULA

// Sheet structure
pub const ROW: u16 = 0x0208;
pub const DEFAULTROWHEIGHT: u16 = 0x0225;

// BOF substream types
pub const BOF_WORKBOOK_GLOBALS: u16 = 0x0005;
pub const BOF_WORKSHEET: u16 = 0x0010;

pub const BIFF8_VERSION: u16 = 0x0600;

/// BOUNDSHEET sheet type of an ordinary worksheet
pub const SHEET_TYPE_WORKSHEET: u8 = 0x00;

/// Record name for diagnostics
pub fn name(record_type: u16) -> &'static str {
    match record_type {
        BOF => "BOF",
        EOF => "EOF",
        CONTINUE => "CONTINUE",
        BOUNDSHEET => "BOUNDSHEET",
        SST => "SST",
        LABELSST => "LABELSST",
        LABEL => "LABEL",
        RSTRING => "RSTRING",
        NUMBER => "NUMBER",
        RK => "RK",
        MULRK => "MULRK",
        BLANK => "BLANK",
        MULBLANK => "MULBLANK",
        BOOLERR => "BOOLERR",
        FORMULA => "FORMULA",
        STRING => "STRING",
        ROW => "ROW",
        DEFAULTROWHEIGHT => "DEFAULTROWHEIGHT",
        _ => "unknown",
    }
}
