//! Sample formats and the code tables that name them

use serde::Serialize;
use std::fmt;

/// Numeric type of one image sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PixelFormat {
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
    F64,
}

/// `pixelFormat` attribute values found in XML footers.
const FOOTER_PIXEL_FORMATS: &[(&str, PixelFormat)] = &[
    ("MonochromeUnsigned16", PixelFormat::U16),
    ("MonochromeUnsigned32", PixelFormat::U32),
    ("MonochromeFloating32", PixelFormat::F32),
];

/// Datatype codes stored at byte 108 of legacy headers.
const LEGACY_DATATYPES: &[(i16, PixelFormat)] = &[
    (0, PixelFormat::F32),
    (1, PixelFormat::I32),
    (2, PixelFormat::I16),
    (3, PixelFormat::U16),
    (5, PixelFormat::F64),
    (6, PixelFormat::U8),
    (8, PixelFormat::U32),
];

impl PixelFormat {
    /// Size of one sample in bytes.
    pub const fn byte_size(self) -> usize {
        match self {
            PixelFormat::U8 => 1,
            PixelFormat::I16 | PixelFormat::U16 => 2,
            PixelFormat::I32 | PixelFormat::U32 | PixelFormat::F32 => 4,
            PixelFormat::F64 => 8,
        }
    }

    pub fn from_footer_name(name: &str) -> Option<Self> {
        FOOTER_PIXEL_FORMATS
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name.trim()))
            .map(|&(_, format)| format)
    }

    pub fn from_legacy_code(code: i16) -> Option<Self> {
        LEGACY_DATATYPES
            .iter()
            .find(|(key, _)| *key == code)
            .map(|&(_, format)| format)
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixelFormat::U8 => "u8",
            PixelFormat::I16 => "i16",
            PixelFormat::U16 => "u16",
            PixelFormat::I32 => "i32",
            PixelFormat::U32 => "u32",
            PixelFormat::F32 => "f32",
            PixelFormat::F64 => "f64",
        };
        f.write_str(name)
    }
}
