//! Python bindings, built with the `python` feature.

use crate::{SpeError, SpeFile};
use pyo3::{
    Bound, PyErr, PyResult, pyfunction, pymodule, types::PyModule, types::PyModuleMethods,
    wrap_pyfunction,
};
use pyo3_polars::PyDataFrame;
use std::path::PathBuf;

impl From<SpeError> for PyErr {
    fn from(err: SpeError) -> PyErr {
        match err {
            SpeError::Format(_) => pyo3::exceptions::PyValueError::new_err(err.to_string()),
            SpeError::RegionOutOfRange { .. } | SpeError::FrameOutOfRange { .. } => {
                pyo3::exceptions::PyIndexError::new_err(err.to_string())
            }
            SpeError::Io(e) => pyo3::exceptions::PyIOError::new_err(e.to_string()),
        }
    }
}

fn json_error(err: serde_json::Error) -> PyErr {
    pyo3::exceptions::PyRuntimeError::new_err(err.to_string())
}

/// Returns a human readable description of an SPE file's layout.
#[pyfunction]
fn spe_summary(file_path: PathBuf) -> PyResult<String> {
    Ok(SpeFile::open(&file_path)?.summary())
}

/// Returns the camera settings of an SPE file as a JSON object with the
/// keys exposure, analog_gain, adc_speed and sensor_temperature.
#[pyfunction]
fn spe_camera_settings(file_path: PathBuf) -> PyResult<String> {
    let settings = SpeFile::open(&file_path)?.get_camera_settings()?;
    serde_json::to_string(&settings).map_err(json_error)
}

/// Returns the regions of an SPE file as a Polars DataFrame.
#[pyfunction]
fn spe_regions_to_py_df(file_path: PathBuf) -> PyResult<PyDataFrame> {
    let spe = SpeFile::open(&file_path)?;
    let df = spe
        .region_table()
        .map_err(|e| pyo3::exceptions::PyRuntimeError::new_err(e.to_string()))?;
    Ok(PyDataFrame(df))
}

/// The module name must match the `lib.name` setting in `Cargo.toml`.
#[pymodule]
fn rspe(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(spe_summary, m)?)?;
    m.add_function(wrap_pyfunction!(spe_camera_settings, m)?)?;
    m.add_function(wrap_pyfunction!(spe_regions_to_py_df, m)?)?;
    Ok(())
}
