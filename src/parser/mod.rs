//! SPE file parsing functionality

mod footer_parser;
mod header_parser;
pub mod sample_parser;
mod settings_parser;
pub mod xml_tree;

// Re-export the parsing functions
pub use footer_parser::{Footer, parse_footer, parse_wavelength_error_list, parse_wavelength_list};
pub use header_parser::{parse_header, parse_legacy_header};
pub use sample_parser::SampleBuffer;
pub use settings_parser::parse_camera_settings;
