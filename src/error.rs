//! Error types for SPE reading

use thiserror::Error;

/// Result type for SPE operations.
pub type Result<T> = std::result::Result<T, SpeError>;

#[derive(Error, Debug)]
pub enum SpeError {
    /// The file does not follow the SPE layout: too short, unparsable footer,
    /// unknown pixel format, inconsistent geometry.
    #[error("invalid SPE file: {0}")]
    Format(String),

    #[error("region index {index} outside of allowed range (0 through {})", .count.saturating_sub(1))]
    RegionOutOfRange { index: usize, count: usize },

    #[error("frame index {index} outside of allowed range (0 through {})", .count.saturating_sub(1))]
    FrameOutOfRange { index: usize, count: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpeError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        SpeError::Format(msg.into())
    }

    pub fn is_range_error(&self) -> bool {
        matches!(
            self,
            SpeError::RegionOutOfRange { .. } | SpeError::FrameOutOfRange { .. }
        )
    }
}

impl From<quick_xml::Error> for SpeError {
    fn from(err: quick_xml::Error) -> Self {
        SpeError::Format(format!("malformed XML footer: {err}"))
    }
}

impl From<quick_xml::events::attributes::AttrError> for SpeError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        SpeError::Format(format!("malformed XML attribute: {err}"))
    }
}
