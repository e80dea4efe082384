//! Streaming PPM/PGM writer.
//!
//! Rows arrive one at a time from the decompression engine and go straight to
//! the output stream. When the engine quantizes, rows hold palette indices
//! and are expanded through the colormap into a per-row buffer first.

use std::io::Write;

use log::{debug, trace, warn};

use super::{PnmFormat, header};
use crate::colormap::{ColorMap, demap_gray, demap_rgb};
use crate::dest::{DecompressInfo, DestinationWriter};
use crate::error::ToolError;
use crate::limits::Limits;
use crate::pixel::{ColorSpace, row_bytes};
use crate::source::check_row_len;

/// How each row reaches the stream. Chosen once, at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RowStrategy {
    /// Samples are already direct values; write them verbatim.
    Direct,
    /// Palette indices expanded through three planes.
    DemapRgb,
    /// Palette indices expanded through one plane.
    DemapGray,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WriterState {
    Created,
    HeaderWritten,
    Finished,
}

/// PPM (P6) / PGM (P5) destination.
///
/// ```
/// use zenjpeg_tools::{ColorSpace, DecompressInfo, DestinationWriter, PpmWriter};
///
/// let info = DecompressInfo::new(2, 1, ColorSpace::Grayscale);
/// let mut writer = PpmWriter::new(Vec::new(), &info)?;
/// writer.start_output(&info)?;
/// writer.put_pixel_rows(&info, &[&[0, 255]])?;
/// writer.finish_output(&info)?;
/// assert_eq!(writer.into_inner(), b"P5\n2 1\n255\n\x00\xff");
/// # Ok::<(), zenjpeg_tools::ToolError>(())
/// ```
#[derive(Debug)]
pub struct PpmWriter<W: Write> {
    output: W,
    /// Demapped row, reused for every row. Empty for direct output.
    buffer: Vec<u8>,
    /// Bytes written per row: `width * components`.
    buffer_width: usize,
    strategy: RowStrategy,
    state: WriterState,
    rows_written: u32,
}

impl<W: Write> PpmWriter<W> {
    pub fn new(output: W, info: &DecompressInfo) -> Result<Self, ToolError> {
        Self::with_limits(output, info, None)
    }

    /// Validate the output setup and size the row buffer.
    ///
    /// Fails here, not per row, when samples are not 8 bits wide.
    pub fn with_limits(
        output: W,
        info: &DecompressInfo,
        limits: Option<&Limits>,
    ) -> Result<Self, ToolError> {
        if info.data_precision != 8 {
            return Err(ToolError::SampleSize(info.data_precision));
        }
        if let Some(limits) = limits {
            limits.check_dimensions(info.output_width, info.output_height)?;
        }

        let strategy = if !info.quantize_colors {
            RowStrategy::Direct
        } else if info.out_color_space == ColorSpace::Rgb {
            RowStrategy::DemapRgb
        } else {
            RowStrategy::DemapGray
        };

        let components = match strategy {
            RowStrategy::Direct => info.out_color_components,
            RowStrategy::DemapRgb => 3,
            RowStrategy::DemapGray => 1,
        };
        let buffer_width = row_bytes(info.output_width, info.output_height, components)?;

        let buffer = if strategy == RowStrategy::Direct {
            Vec::new()
        } else {
            if let Some(limits) = limits {
                limits.check_buffer(buffer_width)?;
            }
            vec![0u8; buffer_width]
        };

        debug!(
            "PPM writer: {}x{}, {:?}, {:?}, {buffer_width} bytes per row",
            info.output_width, info.output_height, info.out_color_space, strategy
        );

        Ok(Self {
            output,
            buffer,
            buffer_width,
            strategy,
            state: WriterState::Created,
            rows_written: 0,
        })
    }

    /// Bytes emitted for every row.
    pub fn buffer_width(&self) -> usize {
        self.buffer_width
    }

    pub fn rows_written(&self) -> u32 {
        self.rows_written
    }

    pub fn get_ref(&self) -> &W {
        &self.output
    }

    /// Take back the output stream.
    pub fn into_inner(self) -> W {
        self.output
    }

    fn put_row(&mut self, colormap: Option<&ColorMap>, row: &[u8]) -> Result<(), ToolError> {
        match self.strategy {
            RowStrategy::Direct => {
                check_row_len(row, self.buffer_width)?;
                self.output.write_all(row).map_err(ToolError::FileWrite)?;
            }
            RowStrategy::DemapRgb => {
                check_row_len(row, self.buffer_width / 3)?;
                let colormap = colormap.ok_or(ToolError::MissingColorMap)?;
                demap_rgb(colormap, row, &mut self.buffer)?;
                self.output.write_all(&self.buffer).map_err(ToolError::FileWrite)?;
            }
            RowStrategy::DemapGray => {
                check_row_len(row, self.buffer_width)?;
                let colormap = colormap.ok_or(ToolError::MissingColorMap)?;
                demap_gray(colormap, row, &mut self.buffer)?;
                self.output.write_all(&self.buffer).map_err(ToolError::FileWrite)?;
            }
        }
        Ok(())
    }
}

impl<W: Write> DestinationWriter for PpmWriter<W> {
    fn start_output(&mut self, info: &DecompressInfo) -> Result<(), ToolError> {
        if self.state != WriterState::Created {
            return Err(ToolError::InvalidState("start_output"));
        }
        let format = PnmFormat::for_color_space(info.out_color_space)
            .ok_or(ToolError::UnsupportedColorSpace(info.out_color_space))?;
        if self.buffer_width != info.output_width as usize * format.components() {
            return Err(ToolError::UnsupportedVariant(format!(
                "{} output with {} components per pixel",
                format.magic(),
                info.out_color_components
            )));
        }

        let head = header(format, info.output_width, info.output_height);
        self.output
            .write_all(head.as_bytes())
            .map_err(ToolError::FileWrite)?;
        self.state = WriterState::HeaderWritten;
        Ok(())
    }

    fn put_pixel_rows(&mut self, info: &DecompressInfo, rows: &[&[u8]]) -> Result<(), ToolError> {
        if self.state != WriterState::HeaderWritten {
            return Err(ToolError::InvalidState("put_pixel_rows"));
        }
        for row in rows {
            if self.rows_written >= info.output_height {
                return Err(ToolError::TooManyRows {
                    height: info.output_height,
                });
            }
            self.put_row(info.colormap.as_ref(), row)?;
            self.rows_written += 1;
            trace!("PPM row {} written", self.rows_written);
        }
        Ok(())
    }

    fn finish_output(&mut self, info: &DecompressInfo) -> Result<(), ToolError> {
        if self.state != WriterState::HeaderWritten {
            return Err(ToolError::InvalidState("finish_output"));
        }
        if self.rows_written != info.output_height {
            warn!(
                "PPM output has {} of {} rows",
                self.rows_written, info.output_height
            );
        }
        self.output.flush().map_err(ToolError::FileWrite)?;
        self.state = WriterState::Finished;
        Ok(())
    }
}

/// Encode a whole in-memory image as PGM (grayscale) or PPM (RGB).
pub fn encode_pnm(
    pixels: &[u8],
    width: u32,
    height: u32,
    color_space: ColorSpace,
) -> Result<Vec<u8>, ToolError> {
    let info = DecompressInfo::new(width, height, color_space);
    let row_len = row_bytes(width, height, color_space.components())?;
    let expected = row_len
        .checked_mul(height as usize)
        .ok_or(ToolError::DimensionsTooLarge { width, height })?;
    if pixels.len() < expected {
        return Err(ToolError::RowLength {
            expected,
            actual: pixels.len(),
        });
    }

    let head_len = header(PnmFormat::Pgm, width, height).len();
    let mut writer = PpmWriter::new(Vec::with_capacity(head_len + expected), &info)?;
    writer.start_output(&info)?;
    if row_len > 0 {
        for row in pixels[..expected].chunks_exact(row_len) {
            writer.put_pixel_rows(&info, &[row])?;
        }
    }
    writer.finish_output(&info)?;
    Ok(writer.into_inner())
}
