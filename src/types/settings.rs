use serde::Serialize;

/// Acquisition settings recovered from the footer's data history. Any value
/// the footer does not carry, or marks as not relevant, is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CameraSettings {
    /// Exposure time as written by the acquisition software (ms).
    pub exposure: Option<f64>,
    /// Gain setting name, e.g. `High`.
    pub analog_gain: Option<String>,
    /// ADC speed (MHz).
    pub adc_speed: Option<f64>,
    /// Sensor temperature reading (°C).
    pub sensor_temperature: Option<f64>,
}

impl CameraSettings {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
