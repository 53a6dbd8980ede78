//! The per-file descriptor assembled at open time

use bon::Builder;
use itertools::Itertools;
use serde::Serialize;

use super::header::{HEADER_SIZE, Revision};
use super::metadata_channel::MetadataChannel;
use super::pixel_format::PixelFormat;
use super::region::{RegionDescriptor, SensorDimensions, region_offset};
use crate::error::{Result, SpeError};

/// Everything known about an SPE file's layout. Built once when the file
/// is opened and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Builder, Serialize)]
pub struct FileDescriptor {
    pub revision: Revision,
    pub version: f32,
    /// Byte offset of the XML footer; absent for legacy files.
    pub footer_offset: Option<u64>,
    pub regions: Vec<RegionDescriptor>,
    /// Bytes per full multi-region frame.
    pub readout_stride: usize,
    pub frame_count: usize,
    pub pixel_format: PixelFormat,
    #[builder(default)]
    pub metadata_channels: Vec<MetadataChannel>,
    /// Sensor-wide wavelength calibration, one value per sensor column.
    pub wavelengths: Option<Vec<f64>>,
    pub sensor: Option<SensorDimensions>,
    /// Raw XML footer text.
    #[serde(skip)]
    pub footer: Option<String>,
}

/// Checks that every region fits in its stride, that the regions together
/// fit in one readout and that `frame_count` readouts are addressable.
/// Returns the data block size, `frame_count * readout_stride`.
pub fn validate_layout(
    regions: &[RegionDescriptor],
    readout_stride: usize,
    frame_count: usize,
    format: PixelFormat,
) -> Result<usize> {
    if readout_stride == 0 {
        return Err(SpeError::format("readout stride is zero"));
    }

    let sample_size = format.byte_size();
    let mut total: usize = 0;
    for (index, region) in regions.iter().enumerate() {
        let needed = region.image_bytes(sample_size).ok_or_else(|| {
            SpeError::format(format!(
                "region {index} ({}x{}) is too large to address",
                region.width, region.height
            ))
        })?;
        if region.stride < needed {
            return Err(SpeError::format(format!(
                "region {index} ({}x{} {format}) needs {needed} bytes but its stride is {}",
                region.width, region.height, region.stride
            )));
        }
        total = total
            .checked_add(region.stride)
            .filter(|&sum| sum <= readout_stride)
            .ok_or_else(|| {
                SpeError::format(format!(
                    "region strides exceed the readout stride of {readout_stride}"
                ))
            })?;
    }

    frame_count.checked_mul(readout_stride).ok_or_else(|| {
        SpeError::format(format!(
            "{frame_count} readouts of {readout_stride} bytes do not fit in memory"
        ))
    })
}

impl FileDescriptor {
    /// Byte offset of `region` within one frame, i.e. the sum of the strides
    /// of every region declared before it.
    pub fn region_offset(&self, region: usize) -> usize {
        region_offset(&self.regions, region)
    }

    /// Absolute file offset of one region block.
    pub fn block_offset(&self, region: usize, frame: usize) -> u64 {
        (HEADER_SIZE + self.region_offset(region)) as u64
            + frame as u64 * self.readout_stride as u64
    }

    /// Checks the declared geometry and returns the size in bytes of the
    /// data block it implies.
    pub fn validate_geometry(&self) -> Result<usize> {
        validate_layout(
            &self.regions,
            self.readout_stride,
            self.frame_count,
            self.pixel_format,
        )
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human readable description of the layout.
    pub fn summary(&self) -> String {
        let mut result = String::new();

        result.push_str("SPE File:\n");
        result.push_str(&format!("  Version: {:.1} ({:?})\n", self.version, self.revision));
        result.push_str(&format!("  Frames: {}\n", self.frame_count));
        result.push_str(&format!("  Pixel format: {}\n", self.pixel_format));
        result.push_str(&format!("  Readout stride: {} bytes\n", self.readout_stride));
        if let Some(sensor) = &self.sensor {
            result.push_str(&format!("  Sensor: {}x{}\n", sensor.width, sensor.height));
        }

        result.push_str(&format!("\nRegions ({}):\n", self.regions.len()));
        for (i, region) in self.regions.iter().enumerate() {
            result.push_str(&format!(
                "  {i}: {}x{} at ({}, {}), binning {}x{}, stride {}\n",
                region.width,
                region.height,
                region.x,
                region.y,
                region.x_binning,
                region.y_binning,
                region.stride
            ));
        }

        if !self.metadata_channels.is_empty() {
            let kinds = self.metadata_channels.iter().map(|m| &m.kind).join(", ");
            result.push_str(&format!("\nMetadata channels: {kinds}\n"));
        }

        match &self.wavelengths {
            Some(curve) => {
                let first = curve.first().copied().unwrap_or_default();
                let last = curve.last().copied().unwrap_or_default();
                result.push_str(&format!(
                    "\nWavelength calibration: {} points, {first:.3} to {last:.3} nm\n",
                    curve.len()
                ));
            }
            None => result.push_str("\nWavelength calibration: none\n"),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_region_descriptor() -> FileDescriptor {
        FileDescriptor::builder()
            .revision(Revision::Modern)
            .version(3.0)
            .footer_offset(5000)
            .regions(vec![
                RegionDescriptor::builder().width(2).height(2).stride(8).build(),
                RegionDescriptor::builder().width(3).height(1).stride(6).build(),
            ])
            .readout_stride(14)
            .frame_count(3)
            .pixel_format(PixelFormat::U16)
            .build()
    }

    #[test]
    fn offsets_accumulate_in_declaration_order() {
        let descriptor = two_region_descriptor();
        assert_eq!(descriptor.region_offset(0), 0);
        assert_eq!(descriptor.region_offset(1), 8);
        assert_eq!(descriptor.block_offset(1, 2), 4100 + 8 + 28);
    }

    #[test]
    fn geometry_validation() {
        let descriptor = two_region_descriptor();
        assert_eq!(descriptor.validate_geometry().unwrap(), 3 * 14);

        let mut narrow = descriptor.clone();
        narrow.regions[1].stride = 4;
        assert!(narrow.validate_geometry().is_err());

        let mut crowded = descriptor.clone();
        crowded.readout_stride = 10;
        assert!(crowded.validate_geometry().is_err());

        let mut empty = descriptor;
        empty.readout_stride = 0;
        assert!(empty.validate_geometry().is_err());
    }

    #[test]
    fn oversized_geometry_is_a_format_error() {
        let mut descriptor = two_region_descriptor();
        descriptor.regions[0].width = 1 << 32;
        descriptor.regions[0].height = 1 << 32;
        assert!(matches!(descriptor.validate_geometry(), Err(SpeError::Format(_))));

        let mut descriptor = two_region_descriptor();
        descriptor.regions[1].stride = usize::MAX;
        assert!(matches!(descriptor.validate_geometry(), Err(SpeError::Format(_))));

        let mut descriptor = two_region_descriptor();
        descriptor.frame_count = usize::MAX;
        assert!(matches!(descriptor.validate_geometry(), Err(SpeError::Format(_))));
    }

    #[test]
    fn summary_and_json() {
        let descriptor = two_region_descriptor();
        let summary = descriptor.summary();
        assert!(summary.contains("Regions (2)"));
        assert!(summary.contains("1: 3x1 at (0, 0)"));
        assert!(summary.contains("Wavelength calibration: none"));

        let json = descriptor.to_json().unwrap();
        assert!(json.contains("\"readout_stride\": 14"));
        assert!(!json.contains("footer\":"));
    }
}
