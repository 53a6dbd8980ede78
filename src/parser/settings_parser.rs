//! Best-effort extraction of camera settings from the footer's data history

use super::xml_tree::{XmlElement, parse_document};
use crate::error::Result;
use crate::types::CameraSettings;

const CAMERA_PATH: &[&str] = &[
    "datahistories",
    "datahistory",
    "origin",
    "experiment",
    "devices",
    "cameras",
    "camera",
];

/// `relevance="False"` marks a setting that does not apply to the camera.
fn is_relevant(element: &XmlElement) -> bool {
    !element
        .attr("relevance")
        .is_some_and(|value| value.trim().eq_ignore_ascii_case("false"))
}

fn relevant_text<'a>(camera: &'a XmlElement, path: &[&str]) -> Option<&'a str> {
    camera
        .find(path)
        .filter(|element| is_relevant(element))
        .map(|element| element.text.trim())
        .filter(|text| !text.is_empty())
}

fn relevant_number(camera: &XmlElement, path: &[&str]) -> Option<f64> {
    relevant_text(camera, path).and_then(|text| text.parse().ok())
}

/// Reads exposure time, analog gain, ADC speed and sensor temperature. A
/// missing element leaves the corresponding value unset; only an unparsable
/// document is an error.
pub fn parse_camera_settings(footer: &str) -> Result<CameraSettings> {
    let root = parse_document(footer)?;
    let Some(camera) = root.find(CAMERA_PATH) else {
        return Ok(CameraSettings::default());
    };

    Ok(CameraSettings {
        exposure: relevant_number(camera, &["shuttertiming", "exposuretime"]),
        analog_gain: relevant_text(camera, &["adc", "analoggain"]).map(str::to_owned),
        adc_speed: relevant_number(camera, &["adc", "speed"]),
        sensor_temperature: relevant_number(camera, &["sensor", "temperature", "reading"]),
    })
}
