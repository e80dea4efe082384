//! Output writers: the decompression side pushes pixel rows through
//! [`DestinationWriter`].

use crate::colormap::ColorMap;
use crate::pixel::ColorSpace;

/// What the decompression engine tells a destination about its output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecompressInfo {
    pub output_width: u32,
    pub output_height: u32,
    pub out_color_space: ColorSpace,
    /// Samples per pixel after color conversion.
    pub out_color_components: usize,
    /// Bits per sample.
    pub data_precision: u8,
    /// Rows carry palette indices into [`Self::colormap`].
    pub quantize_colors: bool,
    pub colormap: Option<ColorMap>,
}

impl DecompressInfo {
    /// Direct (unquantized) 8-bit output in `color_space`.
    pub fn new(width: u32, height: u32, color_space: ColorSpace) -> Self {
        Self {
            output_width: width,
            output_height: height,
            out_color_space: color_space,
            out_color_components: color_space.components(),
            data_precision: 8,
            quantize_colors: false,
            colormap: None,
        }
    }

    /// Quantized output: rows hold one palette index per pixel.
    pub fn quantized(width: u32, height: u32, color_space: ColorSpace, colormap: ColorMap) -> Self {
        Self {
            quantize_colors: true,
            colormap: Some(colormap),
            ..Self::new(width, height, color_space)
        }
    }

    /// Samples per row as delivered by the engine: one index per pixel when
    /// quantizing, otherwise one sample per component.
    pub fn samples_per_row(&self) -> usize {
        if self.quantize_colors {
            self.output_width as usize
        } else {
            self.output_width as usize * self.out_color_components
        }
    }
}

/// The start / put-rows / finish contract every output format implements.
///
/// The engine calls `start_output` once, `put_pixel_rows` once per decoded
/// row, then `finish_output` once.
pub trait DestinationWriter {
    fn start_output(&mut self, info: &DecompressInfo) -> Result<(), crate::ToolError>;

    /// Write `rows`, each [`DecompressInfo::samples_per_row`] long.
    fn put_pixel_rows(&mut self, info: &DecompressInfo, rows: &[&[u8]]) -> Result<(), crate::ToolError>;

    fn finish_output(&mut self, info: &DecompressInfo) -> Result<(), crate::ToolError>;

    /// Rows the engine should hand over per `put_pixel_rows` call.
    fn buffer_height(&self) -> usize {
        1
    }
}
