//! Slicing of frame stacks out of an in-memory data block

use log::trace;

use crate::error::{Result, SpeError};
use crate::parser::SampleBuffer;
use crate::types::{PixelFormat, RegionDescriptor, RegionFrames, region_offset, validate_layout};
use crate::utils::{resolve_frames, resolve_regions};

/// Extracts the selected regions and frames from `data`, a data block whose
/// first byte is the first byte of frame 0. Selections must already be
/// validated.
pub(crate) fn slice_frames(
    data: &[u8],
    regions: &[RegionDescriptor],
    readout_stride: usize,
    format: PixelFormat,
    region_indices: &[usize],
    frame_indices: &[usize],
) -> Result<Vec<RegionFrames>> {
    let sample_size = format.byte_size();

    region_indices
        .iter()
        .map(|&r| {
            let region = &regions[r];
            let pixels = region.pixel_count();
            let base = region_offset(regions, r);
            let mut samples = SampleBuffer::with_capacity(format, pixels * frame_indices.len());

            for &frame in frame_indices {
                let start = base + frame * readout_stride;
                let end = start + pixels * sample_size;
                let block = data.get(start..end).ok_or_else(|| {
                    SpeError::format(format!(
                        "region {r} of frame {frame} (bytes {start}..{end}) lies outside the \
                         {}-byte data block",
                        data.len()
                    ))
                })?;
                trace!("Slicing region {r} frame {frame} at data offset {start}");
                samples.extend_from_le_bytes(block, pixels)?;
            }

            samples.into_frames((frame_indices.len(), region.height, region.width))
        })
        .collect()
}

/// Reinterprets a raw acquisition buffer holding `readout_count` readouts of
/// `readout_stride` bytes each, returning one `(frames, height, width)`
/// stack per region.
pub fn frames_from_buffer(
    buffer: &[u8],
    readout_count: usize,
    readout_stride: usize,
    regions: &[RegionDescriptor],
    format: PixelFormat,
) -> Result<Vec<RegionFrames>> {
    let needed = validate_layout(regions, readout_stride, readout_count, format)?;
    if buffer.len() < needed {
        return Err(SpeError::format(format!(
            "{readout_count} readouts of {readout_stride} bytes need {needed} bytes but the \
             buffer holds {}",
            buffer.len()
        )));
    }
    let region_indices = resolve_regions(&[], regions.len())?;
    let frame_indices = resolve_frames(&[], readout_count)?;
    slice_frames(
        buffer,
        regions,
        readout_stride,
        format,
        &region_indices,
        &frame_indices,
    )
}
