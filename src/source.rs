//! Input readers: the compression side pulls pixel rows through
//! [`PixelSource`].

use std::io::Read;

use crate::error::ToolError;
use crate::limits::Limits;
use crate::pixel::ColorSpace;
use crate::sniff::{Capabilities, InputFormat};

/// Image properties discovered by a reader's header parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceInfo {
    pub width: u32,
    pub height: u32,
    pub in_color_space: ColorSpace,
    pub input_components: usize,
}

impl SourceInfo {
    /// Bytes in one row handed out by [`PixelSource::read_row`].
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.input_components
    }
}

/// A reader that yields 8-bit samples one row at a time, top to bottom.
pub trait PixelSource {
    /// Parse the file header. Called once, before any row.
    fn start_input(&mut self) -> Result<SourceInfo, ToolError>;

    /// Fill `row` (exactly [`SourceInfo::row_bytes`] long) with the next row.
    fn read_row(&mut self, row: &mut [u8]) -> Result<(), ToolError>;

    /// Called once after the last row.
    fn finish_input(&mut self) -> Result<(), ToolError> {
        Ok(())
    }
}

/// Install the reader for `format` on `src`.
///
/// `src` must still be positioned at the first byte of the file.
pub fn open_source<'a, R: Read + 'a>(
    format: InputFormat,
    src: R,
    caps: &Capabilities,
    limits: Option<Limits>,
) -> Result<Box<dyn PixelSource + 'a>, ToolError> {
    if !caps.supports(format) {
        return Err(ToolError::UnsupportedFormat(format));
    }
    match format {
        InputFormat::Ppm => Ok(Box::new(crate::pnm::PpmReader::new(src, limits))),
        InputFormat::Targa => Ok(Box::new(crate::tga::TargaReader::new(src, limits))),
        other => Err(ToolError::UnsupportedFormat(other)),
    }
}

/// Check that a caller-supplied row buffer has the expected length.
pub(crate) fn check_row_len(row: &[u8], expected: usize) -> Result<(), ToolError> {
    if row.len() != expected {
        return Err(ToolError::RowLength {
            expected,
            actual: row.len(),
        });
    }
    Ok(())
}
