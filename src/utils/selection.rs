//! Resolution and validation of region/frame selections

use crate::error::{Result, SpeError};

fn check(
    selection: &[usize],
    count: usize,
    out_of_range: impl Fn(usize) -> SpeError,
) -> Result<()> {
    match selection.iter().find(|&&index| index >= count) {
        Some(&index) => Err(out_of_range(index)),
        None => Ok(()),
    }
}

fn resolve(
    selection: &[usize],
    count: usize,
    out_of_range: impl Fn(usize) -> SpeError,
) -> Result<Vec<usize>> {
    check(selection, count, out_of_range)?;
    if selection.is_empty() {
        return Ok((0..count).collect());
    }
    Ok(selection.to_vec())
}

/// Validates a frame selection without materialising it.
pub fn check_frames(selection: &[usize], count: usize) -> Result<()> {
    check(selection, count, |index| SpeError::FrameOutOfRange { index, count })
}

/// Number of leading readouts a frame selection touches.
pub fn frames_spanned(selection: &[usize], count: usize) -> usize {
    selection.iter().max().map_or(count, |&last| last + 1)
}

/// An empty selection means every region in declaration order.
pub fn resolve_regions(selection: &[usize], count: usize) -> Result<Vec<usize>> {
    resolve(selection, count, |index| SpeError::RegionOutOfRange { index, count })
}

/// An empty selection means every frame in ascending order.
pub fn resolve_frames(selection: &[usize], count: usize) -> Result<Vec<usize>> {
    resolve(selection, count, |index| SpeError::FrameOutOfRange { index, count })
}
