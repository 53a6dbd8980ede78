//! Projection of the sensor-wide wavelength calibration onto regions

use crate::error::{Result, SpeError};
use crate::types::RegionDescriptor;

/// Wavelengths of the columns covered by `region`: every `x_binning`-th
/// calibration value starting at the region's sensor offset. A region of
/// width zero covers the whole sensor and gets the full curve.
pub fn region_wavelengths(curve: &[f64], region: &RegionDescriptor) -> Result<Vec<f64>> {
    if region.width == 0 {
        return Ok(curve.to_vec());
    }

    let step = region.x_binning.max(1);
    let last = region.x + (region.width - 1) * step;
    if last >= curve.len() {
        return Err(SpeError::format(format!(
            "region at x={} with width {} and binning {} needs calibration column {last}, \
             but the curve has {} points",
            region.x,
            region.width,
            region.x_binning,
            curve.len()
        )));
    }

    Ok(curve[region.x..=last].iter().step_by(step).copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve() -> Vec<f64> {
        (0..10).map(f64::from).collect()
    }

    #[test]
    fn slices_with_offset_and_binning() {
        let region = RegionDescriptor::builder()
            .width(3)
            .height(1)
            .stride(6)
            .x(2)
            .x_binning(2)
            .build();
        assert_eq!(region_wavelengths(&curve(), &region).unwrap(), vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn zero_width_returns_full_curve() {
        let region = RegionDescriptor::builder().width(0).height(0).stride(0).build();
        assert_eq!(region_wavelengths(&curve(), &region).unwrap(), curve());
    }

    #[test]
    fn slice_must_stay_inside_the_curve() {
        let region = RegionDescriptor::builder()
            .width(5)
            .height(1)
            .stride(10)
            .x(2)
            .x_binning(2)
            .build();
        assert!(matches!(
            region_wavelengths(&curve(), &region),
            Err(SpeError::Format(_))
        ));
    }
}
