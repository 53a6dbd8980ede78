use crate::types::RegionDescriptor;
use polars::prelude::*;

/// One row per region with its geometry and sensor placement.
pub fn region_table(regions: &[RegionDescriptor]) -> Result<DataFrame, PolarsError> {
    let column = |f: fn(&RegionDescriptor) -> usize| -> Vec<u64> {
        regions.iter().map(|r| f(r) as u64).collect()
    };
    let index: Vec<u32> = (0..regions.len() as u32).collect();

    DataFrame::new(vec![
        Series::new("index".into(), &index).into(),
        Series::new("width".into(), &column(|r| r.width)).into(),
        Series::new("height".into(), &column(|r| r.height)).into(),
        Series::new("stride".into(), &column(|r| r.stride)).into(),
        Series::new("x".into(), &column(|r| r.x)).into(),
        Series::new("y".into(), &column(|r| r.y)).into(),
        Series::new("x_binning".into(), &column(|r| r.x_binning)).into(),
        Series::new("y_binning".into(), &column(|r| r.y_binning)).into(),
    ])
}
