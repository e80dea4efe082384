//! Compression control flow: reader header → method selection → engine.

use std::io::Write;

use log::{debug, info};

use crate::error::ToolError;
use crate::pixel::ColorSpace;
use crate::source::{PixelSource, SourceInfo};

/// Default JPEG quality.
pub const DEFAULT_QUALITY: u8 = 75;

/// Settings handed to the compression engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompressParams {
    /// 1..=100.
    pub quality: u8,
    /// Compute optimal Huffman tables (`-o`).
    pub optimize_coding: bool,
    /// Single interleaved scan; `false` asks for one scan per component (`-I`).
    pub interleave: bool,
    /// Arithmetic instead of Huffman entropy coding (`-a`).
    pub arith_code: bool,
    /// Color space of the JPEG file.
    pub jpeg_color_space: ColorSpace,
    /// Verbosity requested on the command line (`-d` count).
    pub trace_level: u8,
}

impl Default for CompressParams {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            optimize_coding: false,
            interleave: true,
            arith_code: false,
            jpeg_color_space: ColorSpace::YCbCr,
            trace_level: 0,
        }
    }
}

impl CompressParams {
    /// Set quality from a user value; 0 is treated as 1, above 100 as 100.
    pub fn set_quality(&mut self, quality: u32) {
        self.quality = quality.clamp(1, 100) as u8;
    }

    /// Single-component output for grayscale input.
    pub fn monochrome_default(&mut self) {
        self.jpeg_color_space = ColorSpace::Grayscale;
    }
}

/// Called once the input header is known; adjusts parameters to the image.
pub fn select_methods(params: &mut CompressParams, source: &SourceInfo) {
    if source.in_color_space == ColorSpace::Grayscale {
        debug!("Grayscale input, writing a monochrome JPEG");
        params.monochrome_default();
    }
}

/// The JPEG compression engine.
pub trait Compressor {
    /// Pull `info.height` rows from `source` and write a JFIF stream.
    fn compress(
        &mut self,
        params: &CompressParams,
        source: &mut dyn PixelSource,
        info: &SourceInfo,
        output: &mut dyn Write,
    ) -> Result<(), ToolError>;
}

/// Run a full compression pass.
///
/// `source` must not have been started; its header is parsed here.
pub fn jpeg_compress<C: Compressor + ?Sized>(
    engine: &mut C,
    params: &mut CompressParams,
    source: &mut dyn PixelSource,
    output: &mut dyn Write,
) -> Result<(), ToolError> {
    let info = source.start_input()?;
    info!(
        "Input {}x{} {:?}, quality {}",
        info.width, info.height, info.in_color_space, params.quality
    );
    select_methods(params, &info);
    engine.compress(params, source, &info, output)?;
    source.finish_input()?;
    output.flush().map_err(ToolError::FileWrite)
}

/// Read every remaining row of `source` into one buffer.
pub fn read_all_rows(source: &mut dyn PixelSource, info: &SourceInfo) -> Result<Vec<u8>, ToolError> {
    let total = crate::pixel::image_bytes(info.width, info.height, info.input_components)?;
    let row_len = info.row_bytes();
    let mut pixels = vec![0u8; total];
    if row_len > 0 {
        for row in pixels.chunks_exact_mut(row_len) {
            source.read_row(row)?;
        }
    }
    Ok(pixels)
}
