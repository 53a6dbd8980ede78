use bon::Builder;
use serde::Serialize;

/// Size in bytes of the fixed binary header that precedes the data block.
pub const HEADER_SIZE: usize = 4100;

/// Byte offset of the little-endian `u64` XML footer location.
pub const FOOTER_OFFSET_POS: usize = 678;
/// Byte offset of the little-endian `f32` format revision.
pub const VERSION_POS: usize = 1992;

// Legacy (revision < 3) field locations.
pub const LEGACY_DATATYPE_POS: usize = 108;
pub const LEGACY_WIDTH_POS: usize = 42;
pub const LEGACY_HEIGHT_POS: usize = 656;
pub const LEGACY_FRAME_COUNT_POS: usize = 1446;

/// The two fields every SPE file carries in its fixed header.
#[derive(Debug, Clone, Copy, PartialEq, Builder, Serialize)]
pub struct Header {
    pub footer_offset: u64,
    pub version: f32,
}

impl Header {
    pub fn revision(&self) -> Option<Revision> {
        Revision::from_version(self.version)
    }
}

/// Frame geometry stored directly in the header of pre-3.0 files.
#[derive(Debug, Clone, Copy, PartialEq, Builder, Serialize)]
pub struct LegacyHeader {
    pub datatype: i16,
    pub width: u16,
    pub height: u16,
    pub frame_count: i32,
}

/// The two incompatible layouts of the format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Revision {
    /// Fixed binary header only, single implicit region.
    Legacy,
    /// Fixed header followed by data and an XML footer.
    Modern,
}

impl Revision {
    pub fn from_version(version: f32) -> Option<Self> {
        if version.is_nan() {
            None
        } else if version < 3.0 {
            Some(Revision::Legacy)
        } else if version < 4.0 {
            Some(Revision::Modern)
        } else {
            None
        }
    }
}
