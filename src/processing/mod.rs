//! Frame extraction from buffers already held in memory

mod extract;

pub use extract::frames_from_buffer;
pub(crate) use extract::slice_frames;
