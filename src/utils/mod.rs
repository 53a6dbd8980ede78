//! Utility functions for file handling, selections and calibration

pub mod file_utils;
#[cfg(feature = "dataframe")]
pub mod region_table;
pub mod selection;
pub mod wavelength;

// Re-export commonly used utility functions for convenience
pub use file_utils::map_spe_file;
#[cfg(feature = "dataframe")]
pub use region_table::region_table;
pub use selection::{check_frames, frames_spanned, resolve_frames, resolve_regions};
pub use wavelength::region_wavelengths;
