use std::io::Write;

use jpeg_encoder::{ColorType, Encoder};
use log::debug;

use crate::compress::{CompressParams, Compressor, read_all_rows};
use crate::error::ToolError;
use crate::pixel::ColorSpace;
use crate::source::{PixelSource, SourceInfo};

/// Baseline JFIF encoder backed by `jpeg-encoder`.
///
/// Supports Huffman table optimization; multi-scan (non-interleaved) output
/// and arithmetic coding are rejected.
#[derive(Debug, Default)]
pub struct JpegEncoderCompressor;

impl JpegEncoderCompressor {
    pub fn new() -> Self {
        Self
    }
}

impl Compressor for JpegEncoderCompressor {
    fn compress(
        &mut self,
        params: &CompressParams,
        source: &mut dyn PixelSource,
        info: &SourceInfo,
        output: &mut dyn Write,
    ) -> Result<(), ToolError> {
        if !params.interleave {
            return Err(ToolError::UnsupportedVariant(
                "multiple-scan output is not supported".into(),
            ));
        }
        if params.arith_code {
            return Err(ToolError::UnsupportedVariant(
                "arithmetic coding is not supported".into(),
            ));
        }

        let too_large = || ToolError::DimensionsTooLarge {
            width: info.width,
            height: info.height,
        };
        let width = u16::try_from(info.width).map_err(|_| too_large())?;
        let height = u16::try_from(info.height).map_err(|_| too_large())?;

        let color_type = match (params.jpeg_color_space, info.in_color_space) {
            (ColorSpace::Grayscale, ColorSpace::Grayscale) => ColorType::Luma,
            (ColorSpace::YCbCr, ColorSpace::Rgb) => ColorType::Rgb,
            (jpeg, input) => {
                return Err(ToolError::UnsupportedVariant(format!(
                    "{input:?} input to {jpeg:?} JPEG"
                )));
            }
        };

        let pixels = read_all_rows(source, info)?;

        let mut encoder = Encoder::new(output, params.quality);
        encoder.set_optimized_huffman_tables(params.optimize_coding);
        debug!(
            "jpeg-encoder: {width}x{height} {:?}, quality {}, optimize {}",
            params.jpeg_color_space, params.quality, params.optimize_coding
        );
        encoder
            .encode(&pixels, width, height, color_type)
            .map_err(|e| ToolError::Engine(e.to_string()))
    }
}
