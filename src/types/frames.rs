//! Typed frame stacks returned by the readers

use ndarray::Array3;

use super::pixel_format::PixelFormat;

/// Frames of one region, shaped `(frames, height, width)`, in the file's
/// native sample type.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionFrames {
    U8(Array3<u8>),
    I16(Array3<i16>),
    U16(Array3<u16>),
    I32(Array3<i32>),
    U32(Array3<u32>),
    F32(Array3<f32>),
    F64(Array3<f64>),
}

macro_rules! with_array {
    ($value:expr, $array:ident => $body:expr) => {
        match $value {
            RegionFrames::U8($array) => $body,
            RegionFrames::I16($array) => $body,
            RegionFrames::U16($array) => $body,
            RegionFrames::I32($array) => $body,
            RegionFrames::U32($array) => $body,
            RegionFrames::F32($array) => $body,
            RegionFrames::F64($array) => $body,
        }
    };
}

impl RegionFrames {
    pub fn pixel_format(&self) -> PixelFormat {
        match self {
            RegionFrames::U8(_) => PixelFormat::U8,
            RegionFrames::I16(_) => PixelFormat::I16,
            RegionFrames::U16(_) => PixelFormat::U16,
            RegionFrames::I32(_) => PixelFormat::I32,
            RegionFrames::U32(_) => PixelFormat::U32,
            RegionFrames::F32(_) => PixelFormat::F32,
            RegionFrames::F64(_) => PixelFormat::F64,
        }
    }

    /// `(frames, height, width)`
    pub fn shape(&self) -> (usize, usize, usize) {
        with_array!(self, a => a.dim())
    }

    pub fn frame_count(&self) -> usize {
        self.shape().0
    }

    /// Widens every sample to `f64`. All supported sample types convert
    /// losslessly.
    pub fn as_f64(&self) -> Array3<f64> {
        with_array!(self, a => a.mapv(f64::from))
    }

    pub fn as_u16(&self) -> Option<&Array3<u16>> {
        match self {
            RegionFrames::U16(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<&Array3<u32>> {
        match self {
            RegionFrames::U32(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<&Array3<f32>> {
        match self {
            RegionFrames::F32(a) => Some(a),
            _ => None,
        }
    }
}

/// A fully loaded file: every region's frames plus the auxiliary values
/// the file carries.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeData {
    pub regions: Vec<RegionFrames>,
    /// Raw XML footer, modern files only.
    pub footer: Option<String>,
    /// Sensor-wide wavelength calibration, when present.
    pub wavelengths: Option<Vec<f64>>,
}
