//! Region-of-interest geometry

use bon::Builder;
use serde::Serialize;

use crate::error::{Result, SpeError};

/// One rectangular readout block within each frame.
///
/// `width` and `height` are post-binning pixel counts. `stride` is the
/// declared byte length of the region's block, which may include padding.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize)]
pub struct RegionDescriptor {
    pub width: usize,
    pub height: usize,
    pub stride: usize,
    #[builder(default)]
    pub x: usize,
    #[builder(default)]
    pub y: usize,
    #[builder(default = 1)]
    pub x_binning: usize,
    #[builder(default = 1)]
    pub y_binning: usize,
}

/// Placement of a region on the physical sensor, from a `SensorMapping`
/// element. `width`/`height` are in raw sensor pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder, Serialize)]
pub struct SensorMapping {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    pub x_binning: usize,
    pub y_binning: usize,
}

/// Full sensor size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SensorDimensions {
    pub width: usize,
    pub height: usize,
}

/// Byte offset of region `index` within one readout: the sum of the
/// strides of the regions declared before it.
pub fn region_offset(regions: &[RegionDescriptor], index: usize) -> usize {
    regions[..index].iter().map(|r| r.stride).sum()
}

impl RegionDescriptor {
    /// `width * height`, saturating on overflow.
    pub fn pixel_count(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Bytes of image data in one block, `None` on overflow.
    pub fn image_bytes(&self, sample_size: usize) -> Option<usize> {
        self.width.checked_mul(self.height)?.checked_mul(sample_size)
    }

    /// Applies a sensor mapping: offset and binning are taken as is, and the
    /// raw sensor extent is divided by the binning factors.
    pub fn with_sensor_mapping(self, mapping: &SensorMapping) -> Result<Self> {
        if mapping.x_binning == 0 || mapping.y_binning == 0 {
            return Err(SpeError::format(format!(
                "sensor mapping has zero binning ({}x{})",
                mapping.x_binning, mapping.y_binning
            )));
        }
        Ok(Self {
            width: mapping.width / mapping.x_binning,
            height: mapping.height / mapping.y_binning,
            x: mapping.x,
            y: mapping.y,
            x_binning: mapping.x_binning,
            y_binning: mapping.y_binning,
            ..self
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_to_unbinned_origin() {
        let region = RegionDescriptor::builder()
            .width(4)
            .height(3)
            .stride(24)
            .build();
        assert_eq!((region.x, region.y), (0, 0));
        assert_eq!((region.x_binning, region.y_binning), (1, 1));
        assert_eq!(region.pixel_count(), 12);
        assert_eq!(region.image_bytes(2), Some(24));
    }

    #[test]
    fn huge_geometry_does_not_overflow() {
        let region = RegionDescriptor::builder()
            .width(1 << 32)
            .height(1 << 32)
            .stride(8)
            .build();
        assert_eq!(region.pixel_count(), usize::MAX);
        assert_eq!(region.image_bytes(1), None);
    }

    #[test]
    fn sensor_mapping_divides_by_binning() {
        let region = RegionDescriptor::builder()
            .width(100)
            .height(100)
            .stride(200)
            .build();
        let mapping = SensorMapping::builder()
            .x(10)
            .y(20)
            .width(200)
            .height(7)
            .x_binning(2)
            .y_binning(7)
            .build();

        let region = region.with_sensor_mapping(&mapping).unwrap();
        assert_eq!((region.width, region.height), (100, 1));
        assert_eq!((region.x, region.y), (10, 20));
        assert_eq!(region.stride, 200);
    }

    #[test]
    fn zero_binning_is_rejected() {
        let region = RegionDescriptor::builder().width(1).height(1).stride(2).build();
        let mapping = SensorMapping::builder()
            .x(0)
            .y(0)
            .width(1)
            .height(1)
            .x_binning(0)
            .y_binning(1)
            .build();
        assert!(matches!(
            region.with_sensor_mapping(&mapping),
            Err(SpeError::Format(_))
        ));
    }
}
