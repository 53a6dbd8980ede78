//! Builders for synthetic SPE files used across the test suites

use itertools::Itertools;

use crate::types::header::{
    FOOTER_OFFSET_POS, HEADER_SIZE, LEGACY_DATATYPE_POS, LEGACY_FRAME_COUNT_POS,
    LEGACY_HEIGHT_POS, LEGACY_WIDTH_POS, VERSION_POS,
};

pub fn u16_bytes(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// A revision 3 file: header, `data`, then `footer`.
pub fn modern_file(data: &[u8], footer: &str) -> Vec<u8> {
    let mut bytes = vec![0u8; HEADER_SIZE];
    let footer_offset = (HEADER_SIZE + data.len()) as u64;
    bytes[FOOTER_OFFSET_POS..FOOTER_OFFSET_POS + 8].copy_from_slice(&footer_offset.to_le_bytes());
    bytes[VERSION_POS..VERSION_POS + 4].copy_from_slice(&3.0f32.to_le_bytes());
    bytes.extend_from_slice(data);
    bytes.extend_from_slice(footer.as_bytes());
    bytes
}

pub fn legacy_file(datatype: i16, width: u16, height: u16, frames: i32, data: &[u8]) -> Vec<u8> {
    let mut bytes = vec![0u8; HEADER_SIZE];
    bytes[VERSION_POS..VERSION_POS + 4].copy_from_slice(&2.0f32.to_le_bytes());
    bytes[LEGACY_DATATYPE_POS..LEGACY_DATATYPE_POS + 2].copy_from_slice(&datatype.to_le_bytes());
    bytes[LEGACY_WIDTH_POS..LEGACY_WIDTH_POS + 2].copy_from_slice(&width.to_le_bytes());
    bytes[LEGACY_HEIGHT_POS..LEGACY_HEIGHT_POS + 2].copy_from_slice(&height.to_le_bytes());
    bytes[LEGACY_FRAME_COUNT_POS..LEGACY_FRAME_COUNT_POS + 4].copy_from_slice(&frames.to_le_bytes());
    bytes.extend_from_slice(data);
    bytes
}

/// Footer declaring `regions` as `(width, height, stride)` triples. `extra`
/// is inserted after `DataFormat` (calibrations, histories, ...).
pub fn footer_xml(
    regions: &[(usize, usize, usize)],
    readout_stride: usize,
    frames: usize,
    pixel_format: &str,
    extra: &str,
) -> String {
    let blocks = regions
        .iter()
        .map(|(w, h, s)| {
            format!(r#"<DataBlock type="Region" width="{w}" height="{h}" size="{s}" stride="{s}" />"#)
        })
        .join("\n      ");
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<SpeFormat version="3.0" xmlns="http://www.princetoninstruments.com/spe/2009">
  <DataFormat>
    <DataBlock type="Readout" count="{frames}" pixelFormat="{pixel_format}" stride="{readout_stride}">
      {blocks}
    </DataBlock>
  </DataFormat>
  {extra}
</SpeFormat>"#
    )
}
