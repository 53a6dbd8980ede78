use winnow::{
    Parser,
    binary::{le_f32, le_i16, le_i32, le_u16, le_u64},
    error::ContextError,
};

use crate::error::{Result, SpeError};
use crate::types::header::{
    FOOTER_OFFSET_POS, HEADER_SIZE, Header, LEGACY_DATATYPE_POS, LEGACY_FRAME_COUNT_POS,
    LEGACY_HEIGHT_POS, LEGACY_WIDTH_POS, LegacyHeader, VERSION_POS,
};

/// Runs `parser` on the header bytes starting at `offset`.
fn field_at<'a, O>(
    header: &'a [u8],
    offset: usize,
    name: &str,
    mut parser: impl Parser<&'a [u8], O, ContextError>,
) -> Result<O> {
    let mut input = header.get(offset..).unwrap_or_default();
    parser
        .parse_next(&mut input)
        .map_err(|e| SpeError::format(format!("cannot read {name} at byte {offset}: {e}")))
}

fn ensure_full_header(header: &[u8]) -> Result<()> {
    if header.len() < HEADER_SIZE {
        return Err(SpeError::format(format!(
            "file is {} bytes, shorter than the {HEADER_SIZE}-byte header",
            header.len()
        )));
    }
    Ok(())
}

/// Parses the fields shared by every revision of the fixed header:
/// - byte 678: little-endian u64 offset of the XML footer
/// - byte 1992: little-endian f32 format revision
pub fn parse_header(header: &[u8]) -> Result<Header> {
    ensure_full_header(header)?;
    let footer_offset = field_at(header, FOOTER_OFFSET_POS, "footer offset", le_u64)?;
    let version = field_at(header, VERSION_POS, "format version", le_f32)?;

    Ok(Header::builder()
        .footer_offset(footer_offset)
        .version(version)
        .build())
}

/// Parses the frame geometry of a pre-3.0 header:
/// - byte 42: u16 frame width
/// - byte 108: i16 datatype code
/// - byte 656: u16 frame height
/// - byte 1446: i32 frame count
pub fn parse_legacy_header(header: &[u8]) -> Result<LegacyHeader> {
    ensure_full_header(header)?;
    let datatype = field_at(header, LEGACY_DATATYPE_POS, "datatype", le_i16)?;
    let width = field_at(header, LEGACY_WIDTH_POS, "frame width", le_u16)?;
    let height = field_at(header, LEGACY_HEIGHT_POS, "frame height", le_u16)?;
    let frame_count = field_at(header, LEGACY_FRAME_COUNT_POS, "frame count", le_i32)?;

    Ok(LegacyHeader::builder()
        .datatype(datatype)
        .width(width)
        .height(height)
        .frame_count(frame_count)
        .build())
}
