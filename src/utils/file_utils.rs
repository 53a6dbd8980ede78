//! Memory-mapped access to whole SPE files

use log::debug;
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

use crate::error::Result;

/// Maps an SPE file read-only so the data block can be sliced without
/// copying it first.
pub fn map_spe_file(path: impl AsRef<Path>) -> Result<Mmap> {
    let path = path.as_ref();
    let file = File::open(path)?;
    // Safety: mapped read-only; the file must not be truncated while mapped.
    let mmap = unsafe { Mmap::map(&file) }?;
    debug!("Mapped {} ({} bytes)", path.display(), mmap.len());
    Ok(mmap)
}
