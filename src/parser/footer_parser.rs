//! Parser for the XML footer of revision 3 files

use std::str::FromStr;

use bon::Builder;
use log::{debug, warn};

use super::xml_tree::{XmlElement, parse_document};
use crate::error::{Result, SpeError};
use crate::types::{
    MetadataChannel, PixelFormat, RegionDescriptor, SensorDimensions, SensorMapping,
};

/// Layout information recovered from the footer.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct Footer {
    pub regions: Vec<RegionDescriptor>,
    pub readout_stride: usize,
    pub frame_count: usize,
    pub pixel_format: PixelFormat,
    #[builder(default)]
    pub metadata_channels: Vec<MetadataChannel>,
    pub wavelengths: Option<Vec<f64>>,
    pub sensor: Option<SensorDimensions>,
}

fn required_attr<T: FromStr>(element: &XmlElement, key: &str) -> Result<T> {
    let raw = element.attr(key).ok_or_else(|| {
        SpeError::format(format!("<{}> is missing the '{key}' attribute", element.name))
    })?;
    raw.trim().parse().map_err(|_| {
        SpeError::format(format!(
            "<{}> has an invalid '{key}' attribute: {raw:?}",
            element.name
        ))
    })
}

fn optional_attr<T: FromStr>(element: &XmlElement, key: &str) -> Result<Option<T>> {
    match element.attr(key) {
        Some(_) => required_attr(element, key).map(Some),
        None => Ok(None),
    }
}

/// Parses the footer text into the file layout.
pub fn parse_footer(text: &str) -> Result<Footer> {
    let root = parse_document(text)?;

    let (readout_stride, frame_count, pixel_format, mut regions) = parse_data_format(&root)?;
    let metadata_channels = parse_meta_format(&root)?;

    let mut wavelengths = None;
    let mut sensor = None;
    if let Some(calibrations) = root.child("calibrations") {
        wavelengths = parse_wavelength_mapping(calibrations)?;
        if let Some(info) = calibrations.child("sensorinformation") {
            sensor = Some(SensorDimensions {
                width: required_attr(info, "width")?,
                height: required_attr(info, "height")?,
            });
        }
        regions = apply_sensor_mappings(regions, calibrations)?;
    }

    debug!(
        "Footer declares {} region(s), {} frame(s) of {} with readout stride {}",
        regions.len(),
        frame_count,
        pixel_format,
        readout_stride
    );

    Ok(Footer::builder()
        .regions(regions)
        .readout_stride(readout_stride)
        .frame_count(frame_count)
        .pixel_format(pixel_format)
        .metadata_channels(metadata_channels)
        .maybe_wavelengths(wavelengths)
        .maybe_sensor(sensor)
        .build())
}

/// `DataFormat/DataBlock` carries the readout geometry; its `DataBlock`
/// children are the regions in storage order.
fn parse_data_format(
    root: &XmlElement,
) -> Result<(usize, usize, PixelFormat, Vec<RegionDescriptor>)> {
    let readout = root
        .find(&["dataformat", "datablock"])
        .ok_or_else(|| SpeError::format("XML footer has no DataFormat/DataBlock element"))?;

    let readout_stride = required_attr(readout, "stride")?;
    let frame_count = required_attr(readout, "count")?;
    let format_name: String = required_attr(readout, "pixelformat")?;
    let pixel_format = PixelFormat::from_footer_name(&format_name).ok_or_else(|| {
        SpeError::format(format!("unsupported pixel format {format_name:?}"))
    })?;

    let regions = readout
        .children_named("datablock")
        .map(|block| -> Result<RegionDescriptor> {
            Ok(RegionDescriptor::builder()
                .stride(required_attr(block, "stride")?)
                .width(required_attr(block, "width")?)
                .height(required_attr(block, "height")?)
                .build())
        })
        .collect::<Result<Vec<_>>>()?;
    if regions.is_empty() {
        return Err(SpeError::format("readout DataBlock declares no regions"));
    }

    Ok((readout_stride, frame_count, pixel_format, regions))
}

/// Each child of a `MetaFormat/MetaBlock` is one per-frame metadata channel.
/// Channels of every `MetaBlock` are collected in document order.
fn parse_meta_format(root: &XmlElement) -> Result<Vec<MetadataChannel>> {
    let Some(meta_format) = root.child("metaformat") else {
        return Ok(Vec::new());
    };

    meta_format
        .children_named("metablock")
        .flat_map(|block| block.children.iter())
        .map(|element| -> Result<MetadataChannel> {
            let bit_depth: usize = required_attr(element, "bitdepth")?;
            let event = element.attr("event").map(str::to_owned);
            let resolution: Option<i64> = optional_attr(element, "resolution")?;
            let (event, resolution) = match (event, resolution) {
                (Some(event), Some(resolution)) => (Some(event), Some(resolution)),
                _ => (None, None),
            };
            Ok(MetadataChannel::builder()
                .kind(element.name.as_str())
                .byte_width(bit_depth / 8)
                .maybe_event(event)
                .maybe_resolution(resolution)
                .build())
        })
        .collect()
}

/// The calibration curve comes from `WavelengthError` when present (keeping
/// only the wavelength of each `wavelength,error` pair), otherwise from the
/// plain comma separated `Wavelength` list.
fn parse_wavelength_mapping(calibrations: &XmlElement) -> Result<Option<Vec<f64>>> {
    let Some(mapping) = calibrations.child("wavelengthmapping") else {
        return Ok(None);
    };

    let curve = if let Some(with_error) = mapping.child("wavelengtherror") {
        parse_wavelength_error_list(&with_error.text)?
    } else if let Some(plain) = mapping
        .child("wavelength")
        .or_else(|| mapping.children.first())
    {
        parse_wavelength_list(&plain.text)?
    } else {
        Vec::new()
    };

    Ok((!curve.is_empty()).then_some(curve))
}

fn parse_float(token: &str) -> Result<f64> {
    token
        .trim()
        .parse()
        .map_err(|_| SpeError::format(format!("invalid wavelength value {token:?}")))
}

/// `"500.0,500.5,501.0"`
pub fn parse_wavelength_list(text: &str) -> Result<Vec<f64>> {
    text.split(',')
        .filter(|token| !token.trim().is_empty())
        .map(parse_float)
        .collect()
}

/// `"500.0,0.01 500.5,0.01"`; the error term of each pair is dropped.
pub fn parse_wavelength_error_list(text: &str) -> Result<Vec<f64>> {
    text.split_whitespace()
        .filter_map(|pair| pair.split(',').find(|token| !token.trim().is_empty()))
        .map(parse_float)
        .collect()
}

/// Refines regions with the `SensorMapping` elements, pairing them in
/// order. Regions without a mapping keep their `DataBlock` geometry.
fn apply_sensor_mappings(
    regions: Vec<RegionDescriptor>,
    calibrations: &XmlElement,
) -> Result<Vec<RegionDescriptor>> {
    let mappings = calibrations
        .children_named("sensormapping")
        .map(|element| -> Result<SensorMapping> {
            Ok(SensorMapping::builder()
                .x(required_attr(element, "x")?)
                .y(required_attr(element, "y")?)
                .width(required_attr(element, "width")?)
                .height(required_attr(element, "height")?)
                .x_binning(required_attr(element, "xbinning")?)
                .y_binning(required_attr(element, "ybinning")?)
                .build())
        })
        .collect::<Result<Vec<_>>>()?;

    if mappings.is_empty() {
        return Ok(regions);
    }
    if mappings.len() < regions.len() {
        warn!(
            "Footer has {} SensorMapping element(s) for {} regions; regions {}.. keep unbinned geometry",
            mappings.len(),
            regions.len(),
            mappings.len()
        );
    } else if mappings.len() > regions.len() {
        warn!(
            "Footer has {} SensorMapping element(s) for {} regions; the extra mappings are ignored",
            mappings.len(),
            regions.len()
        );
    }

    let mut mappings = mappings.iter();
    regions
        .into_iter()
        .map(|region| match mappings.next() {
            Some(mapping) => region.with_sensor_mapping(mapping),
            None => Ok(region),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOOTER: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<SpeFormat version="3.0" xmlns="http://www.princetoninstruments.com/spe/2009">
  <DataFormat>
    <DataBlock type="Readout" count="5" pixelFormat="MonochromeUnsigned16" size="60" stride="76">
      <DataBlock type="Region" calibrations="1" count="1" width="10" height="2" size="40" stride="40" />
      <DataBlock type="Region" calibrations="2" count="1" width="5" height="2" size="20" stride="20" />
    </DataBlock>
  </DataFormat>
  <MetaFormat>
    <MetaBlock type="TimeStamp">
      <TimeStamp event="ExposureStarted" type="Int64" bitDepth="64" resolution="1000000" />
      <TimeStamp event="ExposureEnded" type="Int64" bitDepth="64" />
      <FrameTrackingNumber type="Int64" bitDepth="64" />
    </MetaBlock>
  </MetaFormat>
  <Calibrations>
    <WavelengthMapping id="1">
      <Wavelength xml:space="preserve">500,501,502,503,504,505,506,507,508,509</Wavelength>
    </WavelengthMapping>
    <SensorInformation id="1" width="10" height="4" />
    <SensorMapping id="1" x="0" y="0" width="10" height="2" xBinning="1" yBinning="1" />
    <SensorMapping id="2" x="0" y="2" width="10" height="2" xBinning="2" yBinning="1" />
  </Calibrations>
</SpeFormat>"#;

    #[test]
    fn parses_data_format() {
        let footer = parse_footer(FOOTER).unwrap();
        assert_eq!(footer.readout_stride, 76);
        assert_eq!(footer.frame_count, 5);
        assert_eq!(footer.pixel_format, PixelFormat::U16);
        assert_eq!(footer.regions.len(), 2);
        assert_eq!(footer.regions[0].stride, 40);
    }

    #[test]
    fn parses_metadata_channels() {
        let footer = parse_footer(FOOTER).unwrap();
        let channels = &footer.metadata_channels;
        assert_eq!(channels.len(), 3);
        assert_eq!(channels[0].kind, "TimeStamp");
        assert_eq!(channels[0].byte_width, 8);
        assert_eq!(channels[0].event.as_deref(), Some("ExposureStarted"));
        assert_eq!(channels[0].resolution, Some(1_000_000));
        // An event without a resolution is not recorded.
        assert_eq!(channels[1].event, None);
        assert_eq!(channels[1].resolution, None);
        assert_eq!(channels[2].kind, "FrameTrackingNumber");
    }

    #[test]
    fn channels_from_every_meta_block() {
        let text = FOOTER.replace(
            r#"      <FrameTrackingNumber type="Int64" bitDepth="64" />
    </MetaBlock>"#,
            r#"    </MetaBlock>
    <metaBlock type="FrameTrackingNumber">
      <FrameTrackingNumber type="Int32" bitDepth="32" />
    </metaBlock>"#,
        );
        let footer = parse_footer(&text).unwrap();
        let kinds: Vec<&str> = footer
            .metadata_channels
            .iter()
            .map(|c| c.kind.as_str())
            .collect();
        assert_eq!(kinds, ["TimeStamp", "TimeStamp", "FrameTrackingNumber"]);
        assert_eq!(footer.metadata_channels[2].byte_width, 4);
    }

    #[test]
    fn applies_sensor_mapping_and_calibration() {
        let footer = parse_footer(FOOTER).unwrap();
        assert_eq!(
            footer.sensor,
            Some(SensorDimensions { width: 10, height: 4 })
        );
        let second = &footer.regions[1];
        assert_eq!((second.width, second.height), (5, 2));
        assert_eq!((second.x, second.y), (0, 2));
        assert_eq!(second.x_binning, 2);
        assert_eq!(footer.wavelengths.as_ref().map(Vec::len), Some(10));
        assert_eq!(footer.wavelengths.as_ref().unwrap()[3], 503.0);
    }

    #[test]
    fn fewer_sensor_mappings_than_regions() {
        let text = FOOTER.replace(
            r#"<SensorMapping id="2" x="0" y="2" width="10" height="2" xBinning="2" yBinning="1" />"#,
            "",
        );
        let footer = parse_footer(&text).unwrap();
        let unmapped = &footer.regions[1];
        assert_eq!((unmapped.width, unmapped.height), (5, 2));
        assert_eq!((unmapped.x, unmapped.y), (0, 0));
        assert_eq!((unmapped.x_binning, unmapped.y_binning), (1, 1));
    }

    #[test]
    fn optional_sections_may_be_absent() {
        let text = r#"<SpeFormat><DataFormat>
            <DataBlock count="1" pixelFormat="MonochromeFloating32" stride="16">
              <DataBlock width="2" height="2" stride="16"/>
            </DataBlock></DataFormat></SpeFormat>"#;
        let footer = parse_footer(text).unwrap();
        assert_eq!(footer.pixel_format, PixelFormat::F32);
        assert!(footer.metadata_channels.is_empty());
        assert!(footer.wavelengths.is_none());
        assert!(footer.sensor.is_none());
    }

    #[test]
    fn wavelength_error_pairs_keep_the_wavelength() {
        assert_eq!(
            parse_wavelength_error_list("500.5,0.01 501.25,0.02\n502,0.5").unwrap(),
            vec![500.5, 501.25, 502.0]
        );
        let text = FOOTER.replace(
            r#"<Wavelength xml:space="preserve">500,501,502,503,504,505,506,507,508,509</Wavelength>"#,
            "<Wavelength>1,2</Wavelength><WavelengthError>7,0.1 8,0.1 9,0.1</WavelengthError>",
        );
        let footer = parse_footer(&text).unwrap();
        assert_eq!(footer.wavelengths, Some(vec![7.0, 8.0, 9.0]));
    }

    #[test]
    fn wavelength_list_tolerates_whitespace() {
        assert_eq!(
            parse_wavelength_list(" 1.5, 2.5 ,3,").unwrap(),
            vec![1.5, 2.5, 3.0]
        );
        assert!(parse_wavelength_list("").unwrap().is_empty());
        assert!(parse_wavelength_list("1,x").is_err());
    }

    #[test]
    fn rejects_unknown_pixel_format_and_missing_geometry() {
        let unknown = FOOTER.replace("MonochromeUnsigned16", "RgbUnsigned8");
        assert!(matches!(parse_footer(&unknown), Err(SpeError::Format(_))));

        let missing = FOOTER.replace(r#"stride="76""#, "");
        assert!(matches!(parse_footer(&missing), Err(SpeError::Format(_))));

        assert!(matches!(
            parse_footer("<SpeFormat></SpeFormat>"),
            Err(SpeError::Format(_))
        ));
    }
}
