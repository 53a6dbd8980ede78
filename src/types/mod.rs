//! Type definitions for the SPE file format

pub mod descriptor;
pub mod frames;
pub mod header;
pub mod metadata_channel;
pub mod pixel_format;
pub mod region;
pub mod settings;

// Re-export the main types for convenience
pub use descriptor::{FileDescriptor, validate_layout};
pub use frames::{RegionFrames, SpeData};
pub use header::{HEADER_SIZE, Header, LegacyHeader, Revision};
pub use metadata_channel::MetadataChannel;
pub use pixel_format::PixelFormat;
pub use region::{RegionDescriptor, SensorDimensions, SensorMapping, region_offset};
pub use settings::CameraSettings;
