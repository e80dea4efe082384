//! Decompression control flow: engine → destination writer.

use log::info;

use crate::dest::{DecompressInfo, DestinationWriter};
use crate::error::ToolError;

/// The JPEG decompression engine.
pub trait Decompressor {
    /// Parse the stream header and fix the output geometry.
    fn start_decompress(&mut self) -> Result<DecompressInfo, ToolError>;

    /// Produce the next output row, top to bottom.
    ///
    /// `row` is [`DecompressInfo::samples_per_row`] long.
    fn read_scanline(&mut self, row: &mut [u8]) -> Result<(), ToolError>;
}

/// Stream every row from `engine` into `dest`.
///
/// Calls `start_output` once, `put_pixel_rows` with at most
/// `dest.buffer_height()` rows at a time, then `finish_output` once.
pub fn jpeg_decompress<D: Decompressor + ?Sized>(
    engine: &mut D,
    info: &DecompressInfo,
    dest: &mut dyn DestinationWriter,
) -> Result<(), ToolError> {
    info!(
        "Output {}x{} {:?}{}",
        info.output_width,
        info.output_height,
        info.out_color_space,
        if info.quantize_colors { ", quantized" } else { "" }
    );
    dest.start_output(info)?;

    let row_len = info.samples_per_row();
    let batch = dest.buffer_height().max(1);
    let mut rows = vec![vec![0u8; row_len]; batch];
    let mut remaining = info.output_height as usize;

    while remaining > 0 {
        let n = remaining.min(batch);
        for row in rows.iter_mut().take(n) {
            engine.read_scanline(row)?;
        }
        let slices: Vec<&[u8]> = rows[..n].iter().map(Vec::as_slice).collect();
        dest.put_pixel_rows(info, &slices)?;
        remaining -= n;
    }

    dest.finish_output(info)
}
