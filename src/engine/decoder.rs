use log::debug;
use zune_core::colorspace::ColorSpace as ZuneColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

use crate::decompress::Decompressor;
use crate::dest::DecompressInfo;
use crate::error::ToolError;
use crate::pixel::{ColorSpace, image_bytes};
use crate::source::check_row_len;

/// JPEG decompression backed by `zune-jpeg`.
///
/// The whole image is decoded in `start_decompress`; scanlines are then
/// handed out top to bottom.
pub struct ZuneJpegDecompressor {
    data: Vec<u8>,
    grayscale: bool,
    pixels: Vec<u8>,
    row_len: usize,
    next_row: usize,
}

impl ZuneJpegDecompressor {
    /// `data` is a complete JPEG file.
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            grayscale: false,
            pixels: Vec::new(),
            row_len: 0,
            next_row: 0,
        }
    }

    /// Force single-channel output even for color files.
    pub fn set_grayscale(&mut self, grayscale: bool) {
        self.grayscale = grayscale;
    }
}

fn engine_error(e: zune_jpeg::errors::DecodeErrors) -> ToolError {
    ToolError::Engine(format!("{e:?}"))
}

impl Decompressor for ZuneJpegDecompressor {
    fn start_decompress(&mut self) -> Result<DecompressInfo, ToolError> {
        let mut header_pass = JpegDecoder::new(&self.data);
        header_pass.decode_headers().map_err(engine_error)?;
        let header = header_pass
            .info()
            .ok_or_else(|| ToolError::Engine("no image header after decode_headers".into()))?;
        // single-component files would otherwise be expanded to RGB
        let options = if self.grayscale || header.components == 1 {
            DecoderOptions::default().jpeg_set_out_colorspace(ZuneColorSpace::Luma)
        } else {
            DecoderOptions::default()
        };

        let mut decoder = JpegDecoder::new_with_options(&self.data, options);
        let pixels = decoder.decode().map_err(engine_error)?;
        let (width, height) = decoder
            .info()
            .map(|i| (u32::from(i.width), u32::from(i.height)))
            .ok_or_else(|| ToolError::Engine("decoder reported no image size".into()))?;

        let pixel_count = image_bytes(width, height, 1)?;
        let color_space = match pixels.len().checked_div(pixel_count) {
            Some(1) => ColorSpace::Grayscale,
            Some(3) => ColorSpace::Rgb,
            Some(4) => ColorSpace::Cmyk,
            _ => ColorSpace::Unknown,
        };
        if color_space.components() == 0
            || pixels.len() != image_bytes(width, height, color_space.components())?
        {
            return Err(ToolError::Engine(format!(
                "decoder returned {} bytes for a {width}x{height} image",
                pixels.len()
            )));
        }
        debug!("zune-jpeg: {width}x{height} {color_space:?}");

        let info = DecompressInfo::new(width, height, color_space);
        self.row_len = info.samples_per_row();
        self.pixels = pixels;
        self.next_row = 0;
        Ok(info)
    }

    fn read_scanline(&mut self, row: &mut [u8]) -> Result<(), ToolError> {
        check_row_len(row, self.row_len)?;
        let start = self.next_row * self.row_len;
        let src = self
            .pixels
            .get(start..start + self.row_len)
            .ok_or(ToolError::InvalidState("read_scanline"))?;
        row.copy_from_slice(src);
        self.next_row += 1;
        Ok(())
    }
}
