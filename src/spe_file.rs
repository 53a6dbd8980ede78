use crate::error::{Result, SpeError};
use crate::parser::{
    SampleBuffer, parse_camera_settings, parse_footer, parse_header, parse_legacy_header,
};
use crate::processing::slice_frames;
use crate::types::{
    CameraSettings, FileDescriptor, HEADER_SIZE, PixelFormat, RegionDescriptor, RegionFrames,
    Revision, SpeData,
};
use crate::utils::{
    check_frames, frames_spanned, map_spe_file, region_wavelengths, resolve_frames,
    resolve_regions,
};
use log::{debug, trace};
use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

/// How [`SpeFile::get_data_with`] fetches samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadMode {
    /// One seek and read per requested region block.
    #[default]
    Streaming,
    /// Read the whole data block once and slice it in memory.
    Eager,
}

/// An open SPE file with random access to its frames.
///
/// The layout is parsed once when the file is opened. Every read seeks to
/// its own offset first, so the source position carries no state between
/// calls.
pub struct SpeFile<R = File> {
    source: R,
    descriptor: FileDescriptor,
}

impl SpeFile<File> {
    /// Open and parse an SPE file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        debug!("Opening SPE file {}", path.display());
        Self::from_reader(file)
    }
}

impl<R: Read + Seek> SpeFile<R> {
    /// Parse an SPE file from any seekable source.
    pub fn from_reader(mut source: R) -> Result<Self> {
        let descriptor = read_descriptor(&mut source)?;
        debug!(
            "SPE {:.1}: {} region(s), {} frame(s), {} samples",
            descriptor.version,
            descriptor.regions.len(),
            descriptor.frame_count,
            descriptor.pixel_format
        );
        Ok(Self { source, descriptor })
    }

    /// Layout parsed when the file was opened.
    pub fn descriptor(&self) -> &FileDescriptor {
        &self.descriptor
    }

    /// Regions in declaration order.
    pub fn regions(&self) -> &[RegionDescriptor] {
        &self.descriptor.regions
    }

    /// Number of frames declared by the file.
    pub fn frame_count(&self) -> usize {
        self.descriptor.frame_count
    }

    /// Raw XML footer; `None` for legacy files.
    pub fn footer(&self) -> Option<&str> {
        self.descriptor.footer.as_deref()
    }

    /// Reads the selected frames of the selected regions, one
    /// `(frames, height, width)` stack per region in selection order. Empty
    /// selections mean all regions / all frames. Every index is validated
    /// before anything is read.
    pub fn get_data(&mut self, regions: &[usize], frames: &[usize]) -> Result<Vec<RegionFrames>> {
        self.get_data_with(regions, frames, ReadMode::Streaming)
    }

    pub fn get_data_with(
        &mut self,
        regions: &[usize],
        frames: &[usize],
        mode: ReadMode,
    ) -> Result<Vec<RegionFrames>> {
        let frame_count = self.descriptor.frame_count;
        let region_indices = resolve_regions(regions, self.descriptor.regions.len())?;
        check_frames(frames, frame_count)?;
        let available = self.data_block_len()?;
        ensure_readouts(&self.descriptor, available, frames_spanned(frames, frame_count))?;

        let frame_indices = resolve_frames(frames, frame_count)?;
        match mode {
            ReadMode::Streaming => self.read_streaming(&region_indices, &frame_indices),
            ReadMode::Eager => self.read_eager(&region_indices, &frame_indices),
        }
    }

    fn read_streaming(
        &mut self,
        region_indices: &[usize],
        frame_indices: &[usize],
    ) -> Result<Vec<RegionFrames>> {
        let format = self.descriptor.pixel_format;
        let mut result = Vec::with_capacity(region_indices.len());
        let mut block = Vec::new();

        for &r in region_indices {
            let region = &self.descriptor.regions[r];
            let pixels = region.pixel_count();
            let mut samples = SampleBuffer::with_capacity(format, pixels * frame_indices.len());

            for &frame in frame_indices {
                block.resize(region.stride, 0);
                let offset = self.descriptor.block_offset(r, frame);
                trace!("Reading region {r} frame {frame} at byte {offset}");
                self.source.seek(SeekFrom::Start(offset))?;
                self.source.read_exact(&mut block)?;
                samples.extend_from_le_bytes(&block, pixels)?;
            }

            result.push(samples.into_frames((frame_indices.len(), region.height, region.width))?);
        }

        Ok(result)
    }

    fn read_eager(
        &mut self,
        region_indices: &[usize],
        frame_indices: &[usize],
    ) -> Result<Vec<RegionFrames>> {
        let len = self.data_block_len()?;
        debug!("Loading {len}-byte data block");

        let mut data = Vec::with_capacity(len as usize);
        self.source.seek(SeekFrom::Start(HEADER_SIZE as u64))?;
        self.source.by_ref().take(len).read_to_end(&mut data)?;
        if (data.len() as u64) < len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("data block ended after {} of {len} bytes", data.len()),
            )
            .into());
        }

        slice_frames(
            &data,
            &self.descriptor.regions,
            self.descriptor.readout_stride,
            self.descriptor.pixel_format,
            region_indices,
            frame_indices,
        )
    }

    /// Bytes between the fixed header and the footer, or the end of the
    /// source for legacy files.
    fn data_block_len(&mut self) -> Result<u64> {
        let end = match self.descriptor.footer_offset {
            Some(offset) => offset,
            None => self.source.seek(SeekFrom::End(0))?,
        };
        Ok(end.saturating_sub(HEADER_SIZE as u64))
    }

    /// Wavelength of every column of the selected regions. `None` when the
    /// file carries no wavelength calibration.
    pub fn get_wavelengths(&self, regions: &[usize]) -> Result<Option<Vec<Vec<f64>>>> {
        let region_indices = resolve_regions(regions, self.descriptor.regions.len())?;
        let Some(curve) = &self.descriptor.wavelengths else {
            return Ok(None);
        };
        region_indices
            .iter()
            .map(|&r| region_wavelengths(curve, &self.descriptor.regions[r]))
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    /// Acquisition settings from the footer. Legacy files carry none.
    pub fn get_camera_settings(&self) -> Result<CameraSettings> {
        match &self.descriptor.footer {
            Some(footer) => parse_camera_settings(footer),
            None => Ok(CameraSettings::default()),
        }
    }

    pub fn summary(&self) -> String {
        self.descriptor.summary()
    }

    #[cfg(feature = "dataframe")]
    pub fn region_table(
        &self,
    ) -> std::result::Result<polars::prelude::DataFrame, polars::prelude::PolarsError> {
        crate::utils::region_table(&self.descriptor.regions)
    }

    pub fn into_inner(self) -> R {
        self.source
    }
}

/// Reads the fixed header and, for revision 3 files, the XML footer.
fn read_descriptor<R: Read + Seek>(source: &mut R) -> Result<FileDescriptor> {
    let mut header_bytes = Vec::with_capacity(HEADER_SIZE);
    source.seek(SeekFrom::Start(0))?;
    source
        .by_ref()
        .take(HEADER_SIZE as u64)
        .read_to_end(&mut header_bytes)?;

    let header = parse_header(&header_bytes)?;
    let revision = header.revision().ok_or_else(|| {
        SpeError::format(format!("unsupported format version {}", header.version))
    })?;

    let descriptor = match revision {
        Revision::Modern => {
            let file_len = source.seek(SeekFrom::End(0))?;
            if header.footer_offset < HEADER_SIZE as u64 || header.footer_offset > file_len {
                return Err(SpeError::format(format!(
                    "footer offset {} lies outside the data area (file is {file_len} bytes)",
                    header.footer_offset
                )));
            }

            let mut raw = Vec::new();
            source.seek(SeekFrom::Start(header.footer_offset))?;
            source.read_to_end(&mut raw)?;
            let footer_text = String::from_utf8(raw)
                .map_err(|e| SpeError::format(format!("XML footer is not UTF-8: {e}")))?;
            let footer = parse_footer(&footer_text)?;

            FileDescriptor::builder()
                .revision(revision)
                .version(header.version)
                .footer_offset(header.footer_offset)
                .regions(footer.regions)
                .readout_stride(footer.readout_stride)
                .frame_count(footer.frame_count)
                .pixel_format(footer.pixel_format)
                .metadata_channels(footer.metadata_channels)
                .maybe_wavelengths(footer.wavelengths)
                .maybe_sensor(footer.sensor)
                .footer(footer_text)
                .build()
        }
        Revision::Legacy => {
            let legacy = parse_legacy_header(&header_bytes)?;
            let pixel_format = PixelFormat::from_legacy_code(legacy.datatype).ok_or_else(|| {
                SpeError::format(format!("unknown legacy datatype code {}", legacy.datatype))
            })?;
            let frame_count = usize::try_from(legacy.frame_count).map_err(|_| {
                SpeError::format(format!("negative frame count {}", legacy.frame_count))
            })?;
            let width = usize::from(legacy.width);
            let height = usize::from(legacy.height);
            let stride = width * height * pixel_format.byte_size();

            FileDescriptor::builder()
                .revision(revision)
                .version(header.version)
                .regions(vec![
                    RegionDescriptor::builder()
                        .width(width)
                        .height(height)
                        .stride(stride)
                        .build(),
                ])
                .readout_stride(stride)
                .frame_count(frame_count)
                .pixel_format(pixel_format)
                .build()
        }
    };

    let data_len = descriptor.validate_geometry()?;
    if let Some(offset) = descriptor.footer_offset {
        let room = offset - HEADER_SIZE as u64;
        if data_len as u64 > room {
            return Err(SpeError::format(format!(
                "{} readouts of {} bytes do not fit in the {room}-byte data block",
                descriptor.frame_count, descriptor.readout_stride
            )));
        }
    }
    Ok(descriptor)
}

/// Fails with `UnexpectedEof` when fewer than `readouts` whole readouts are
/// available. `readouts` never exceeds the validated frame count.
fn ensure_readouts(descriptor: &FileDescriptor, available: u64, readouts: usize) -> Result<()> {
    let needed = (readouts * descriptor.readout_stride) as u64;
    if needed > available {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "{readouts} readout(s) need {needed} bytes but the data block holds {available}"
            ),
        )
        .into());
    }
    Ok(())
}

/// Loads a whole file in one pass: the file is memory-mapped and every
/// frame of every region is sliced out of the mapped data block.
pub fn read_spe(path: impl AsRef<Path>) -> Result<SpeData> {
    let mmap = map_spe_file(path)?;
    let descriptor = read_descriptor(&mut Cursor::new(&mmap[..]))?;

    let end = descriptor
        .footer_offset
        .map_or(mmap.len(), |offset| offset as usize);
    let data = &mmap[HEADER_SIZE..end];
    ensure_readouts(&descriptor, data.len() as u64, descriptor.frame_count)?;

    let region_indices = resolve_regions(&[], descriptor.regions.len())?;
    let frame_indices = resolve_frames(&[], descriptor.frame_count)?;
    let regions = slice_frames(
        data,
        &descriptor.regions,
        descriptor.readout_stride,
        descriptor.pixel_format,
        &region_indices,
        &frame_indices,
    )?;

    Ok(SpeData {
        regions,
        footer: descriptor.footer,
        wavelengths: descriptor.wavelengths,
    })
}
