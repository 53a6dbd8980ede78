//! Reader for SPE scientific camera files.
//!
//! Both layouts of the format are supported: pre-3.0 files with a fixed
//! binary header only, and 3.x files whose layout, calibration and
//! acquisition history live in an XML footer after the data block.
//!
//! ```no_run
//! use rspe::SpeFile;
//!
//! let mut spe = SpeFile::open("spectrum.spe")?;
//! // Frame 0 of the first region
//! let frames = spe.get_data(&[0], &[0])?;
//! let wavelengths = spe.get_wavelengths(&[0])?;
//! # Ok::<(), rspe::SpeError>(())
//! ```

pub mod error;
pub mod parser;
pub mod processing;
#[cfg(feature = "python")]
mod python;
pub mod spe_file;
#[cfg(test)]
mod test_utils;
pub mod types;
pub mod utils;

pub use error::{Result, SpeError};
pub use processing::frames_from_buffer;
pub use spe_file::{ReadMode, SpeFile, read_spe};
pub use types::{
    CameraSettings, FileDescriptor, MetadataChannel, PixelFormat, RegionDescriptor,
    RegionFrames, Revision, SensorDimensions, SpeData,
};
