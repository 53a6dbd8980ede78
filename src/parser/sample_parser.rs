//! Decoding of little-endian image samples

use ndarray::Array3;
use winnow::{
    Parser,
    binary::{le_f32, le_f64, le_i16, le_i32, le_u8, le_u16, le_u32},
    combinator::repeat,
    error::ContextError,
};

use crate::error::{Result, SpeError};
use crate::types::{PixelFormat, RegionFrames};

/// Parses exactly `count` values with `parser` and appends them to `out`.
fn decode_into<'a, O>(
    bytes: &'a [u8],
    count: usize,
    out: &mut Vec<O>,
    parser: impl Parser<&'a [u8], O, ContextError>,
) -> Result<()> {
    let mut input = bytes;
    let values: Vec<O> = repeat(count, parser)
        .parse_next(&mut input)
        .map_err(|e| {
            SpeError::format(format!(
                "expected {count} samples in {} bytes: {e}",
                bytes.len()
            ))
        })?;
    out.extend(values);
    Ok(())
}

/// Growable sample storage in the file's native type.
#[derive(Debug)]
pub enum SampleBuffer {
    U8(Vec<u8>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl SampleBuffer {
    pub fn with_capacity(format: PixelFormat, capacity: usize) -> Self {
        match format {
            PixelFormat::U8 => SampleBuffer::U8(Vec::with_capacity(capacity)),
            PixelFormat::I16 => SampleBuffer::I16(Vec::with_capacity(capacity)),
            PixelFormat::U16 => SampleBuffer::U16(Vec::with_capacity(capacity)),
            PixelFormat::I32 => SampleBuffer::I32(Vec::with_capacity(capacity)),
            PixelFormat::U32 => SampleBuffer::U32(Vec::with_capacity(capacity)),
            PixelFormat::F32 => SampleBuffer::F32(Vec::with_capacity(capacity)),
            PixelFormat::F64 => SampleBuffer::F64(Vec::with_capacity(capacity)),
        }
    }

    /// Decodes the first `count` samples of `bytes`.
    pub fn extend_from_le_bytes(&mut self, bytes: &[u8], count: usize) -> Result<()> {
        match self {
            SampleBuffer::U8(out) => decode_into(bytes, count, out, le_u8),
            SampleBuffer::I16(out) => decode_into(bytes, count, out, le_i16),
            SampleBuffer::U16(out) => decode_into(bytes, count, out, le_u16),
            SampleBuffer::I32(out) => decode_into(bytes, count, out, le_i32),
            SampleBuffer::U32(out) => decode_into(bytes, count, out, le_u32),
            SampleBuffer::F32(out) => decode_into(bytes, count, out, le_f32),
            SampleBuffer::F64(out) => decode_into(bytes, count, out, le_f64),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SampleBuffer::U8(v) => v.len(),
            SampleBuffer::I16(v) => v.len(),
            SampleBuffer::U16(v) => v.len(),
            SampleBuffer::I32(v) => v.len(),
            SampleBuffer::U32(v) => v.len(),
            SampleBuffer::F32(v) => v.len(),
            SampleBuffer::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reshapes the samples into a `(frames, height, width)` stack.
    pub fn into_frames(self, shape: (usize, usize, usize)) -> Result<RegionFrames> {
        let reshape_error = |e: ndarray::ShapeError| {
            SpeError::format(format!("cannot shape samples as {shape:?}: {e}"))
        };
        macro_rules! shaped {
            ($variant:ident, $v:expr) => {
                RegionFrames::$variant(Array3::from_shape_vec(shape, $v).map_err(reshape_error)?)
            };
        }
        Ok(match self {
            SampleBuffer::U8(v) => shaped!(U8, v),
            SampleBuffer::I16(v) => shaped!(I16, v),
            SampleBuffer::U16(v) => shaped!(U16, v),
            SampleBuffer::I32(v) => shaped!(I32, v),
            SampleBuffer::U32(v) => shaped!(U32, v),
            SampleBuffer::F32(v) => shaped!(F32, v),
            SampleBuffer::F64(v) => shaped!(F64, v),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_little_endian_samples() {
        let bytes: Vec<u8> = [1u16, 2, 3, 0xABCD]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let mut buffer = SampleBuffer::with_capacity(PixelFormat::U16, 4);
        buffer.extend_from_le_bytes(&bytes, 4).unwrap();
        assert_eq!(buffer.len(), 4);

        let frames = buffer.into_frames((1, 2, 2)).unwrap();
        assert_eq!(frames.as_u16().unwrap()[[0, 1, 1]], 0xABCD);
    }

    #[test]
    fn trailing_padding_is_ignored() {
        let bytes: Vec<u8> = [1.5f32, -2.0, 99.0]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let mut buffer = SampleBuffer::with_capacity(PixelFormat::F32, 2);
        buffer.extend_from_le_bytes(&bytes, 2).unwrap();
        let frames = buffer.into_frames((1, 1, 2)).unwrap();
        assert_eq!(frames.as_f32().unwrap().as_slice().unwrap(), &[1.5, -2.0]);
    }

    #[test]
    fn short_input_is_an_error() {
        let mut buffer = SampleBuffer::with_capacity(PixelFormat::I32, 2);
        assert!(buffer.extend_from_le_bytes(&[0u8; 6], 2).is_err());
        assert!(buffer.is_empty());
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        let mut buffer = SampleBuffer::with_capacity(PixelFormat::U8, 3);
        buffer.extend_from_le_bytes(&[1, 2, 3], 3).unwrap();
        assert!(buffer.into_frames((1, 2, 2)).is_err());
    }
}
