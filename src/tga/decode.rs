//! Targa reader: colormapped, true-color and grayscale images, raw or RLE.

use std::io::Read;

use log::debug;

use crate::error::ToolError;
use crate::input::{read_exact, read_u8};
use crate::limits::Limits;
use crate::pixel::{ColorSpace, image_bytes};
use crate::source::{PixelSource, SourceInfo, check_row_len};

// ── Header ──────────────────────────────────────────────────────────

const HEADER_LEN: usize = 18;

/// Bit 5 of the descriptor byte: origin at the top-left corner.
const TOP_DOWN: u8 = 0x20;
/// Bits 6-7 of the descriptor byte: scanline interleaving.
const INTERLEAVE_MASK: u8 = 0xc0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TgaKind {
    /// 8-bit indices into a 24/32-bit colormap.
    Mapped,
    /// 15/16, 24 or 32 bits per pixel, BGR(A) order.
    TrueColor,
    /// 8-bit luminance.
    Gray,
}

#[derive(Clone, Copy, Debug)]
struct TgaHeader {
    id_length: u8,
    cmap_type: u8,
    kind: TgaKind,
    rle: bool,
    cmap_first: u16,
    cmap_length: u16,
    cmap_entry_bits: u8,
    width: u16,
    height: u16,
    pixel_bits: u8,
    descriptor: u8,
}

impl TgaHeader {
    fn parse(raw: &[u8; HEADER_LEN]) -> Result<Self, ToolError> {
        let le16 = |i: usize| u16::from_le_bytes([raw[i], raw[i + 1]]);
        let subtype = raw[2];
        let (kind, rle) = match subtype {
            1 => (TgaKind::Mapped, false),
            2 => (TgaKind::TrueColor, false),
            3 => (TgaKind::Gray, false),
            9 => (TgaKind::Mapped, true),
            10 => (TgaKind::TrueColor, true),
            11 => (TgaKind::Gray, true),
            other => {
                return Err(ToolError::UnsupportedVariant(format!(
                    "Targa image type {other}"
                )));
            }
        };
        Ok(Self {
            id_length: raw[0],
            cmap_type: raw[1],
            kind,
            rle,
            cmap_first: le16(3),
            cmap_length: le16(5),
            cmap_entry_bits: raw[7],
            width: le16(12),
            height: le16(14),
            pixel_bits: raw[16],
            descriptor: raw[17],
        })
    }

    fn validate(&self) -> Result<(), ToolError> {
        if self.cmap_type > 1 {
            return Err(ToolError::InvalidHeader(format!(
                "Targa colormap type {}",
                self.cmap_type
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ToolError::InvalidHeader(format!(
                "Targa dimensions {}x{} must be nonzero",
                self.width, self.height
            )));
        }
        if self.descriptor & INTERLEAVE_MASK != 0 {
            return Err(ToolError::UnsupportedVariant(
                "interlaced Targa scanlines".into(),
            ));
        }
        let pixel_ok = match self.kind {
            TgaKind::Mapped => self.pixel_bits == 8 && self.cmap_type == 1,
            TgaKind::Gray => self.pixel_bits == 8,
            TgaKind::TrueColor => matches!(self.pixel_bits, 15 | 16 | 24 | 32),
        };
        if !pixel_ok {
            return Err(ToolError::UnsupportedVariant(format!(
                "{}-bit {:?} Targa",
                self.pixel_bits, self.kind
            )));
        }
        if self.cmap_type == 1 && !matches!(self.cmap_entry_bits, 24 | 32) {
            return Err(ToolError::UnsupportedVariant(format!(
                "Targa colormap with {}-bit entries",
                self.cmap_entry_bits
            )));
        }
        Ok(())
    }

    fn color_space(&self) -> ColorSpace {
        match self.kind {
            TgaKind::Gray => ColorSpace::Grayscale,
            TgaKind::Mapped | TgaKind::TrueColor => ColorSpace::Rgb,
        }
    }

    fn pixel_bytes(&self) -> usize {
        usize::from(self.pixel_bits).div_ceil(8)
    }
}

/// Expand a 5-bit channel to 8 bits.
fn c5_to_8(v: u16) -> u8 {
    ((u32::from(v) * 255 + 15) / 31) as u8
}

// ── Reader ──────────────────────────────────────────────────────────

/// Targa [`PixelSource`].
///
/// Bottom-up files (the common case) are decoded whole on the first row
/// request and then served top to bottom.
pub struct TargaReader<R> {
    src: R,
    limits: Option<Limits>,
    header: Option<TgaHeader>,
    info: Option<SourceInfo>,
    colormap: Vec<[u8; 3]>,
    /// Pixels left in the current run-length packet.
    run_left: u32,
    /// Pixels left in the current literal packet.
    literal_left: u32,
    run_pixel: [u8; 4],
    /// Whole image, top row first, for bottom-up files.
    flipped: Option<Vec<u8>>,
    next_row: u32,
}

impl<R: Read> TargaReader<R> {
    pub fn new(src: R, limits: Option<Limits>) -> Self {
        Self {
            src,
            limits,
            header: None,
            info: None,
            colormap: Vec::new(),
            run_left: 0,
            literal_left: 0,
            run_pixel: [0; 4],
            flipped: None,
            next_row: 0,
        }
    }

    fn read_colormap(&mut self, header: &TgaHeader) -> Result<(), ToolError> {
        let entry_bytes = usize::from(header.cmap_entry_bits / 8);
        let mut entry = [0u8; 4];
        self.colormap = Vec::with_capacity(usize::from(header.cmap_length));
        for _ in 0..header.cmap_length {
            read_exact(&mut self.src, &mut entry[..entry_bytes])?;
            // stored B, G, R(, A)
            self.colormap.push([entry[2], entry[1], entry[0]]);
        }
        Ok(())
    }

    /// Next raw pixel in file order, undoing RLE packets.
    fn read_pixel(&mut self, rle: bool, n: usize) -> Result<[u8; 4], ToolError> {
        if !rle {
            let mut px = [0u8; 4];
            read_exact(&mut self.src, &mut px[..n])?;
            return Ok(px);
        }
        if self.run_left > 0 {
            self.run_left -= 1;
            return Ok(self.run_pixel);
        }
        if self.literal_left == 0 {
            let packet = read_u8(&mut self.src)?;
            let count = u32::from(packet & 0x7f);
            if packet & 0x80 != 0 {
                let mut px = [0u8; 4];
                read_exact(&mut self.src, &mut px[..n])?;
                self.run_pixel = px;
                self.run_left = count;
                return Ok(px);
            }
            self.literal_left = count + 1;
        }
        self.literal_left -= 1;
        let mut px = [0u8; 4];
        read_exact(&mut self.src, &mut px[..n])?;
        Ok(px)
    }

    /// Decode one scanline in file order into output samples.
    fn decode_row(&mut self, header: &TgaHeader, row: &mut [u8]) -> Result<(), ToolError> {
        let n = header.pixel_bytes();
        match header.kind {
            TgaKind::Gray => {
                for dst in row.iter_mut() {
                    *dst = self.read_pixel(header.rle, n)?[0];
                }
            }
            TgaKind::Mapped => {
                for dst in row.chunks_exact_mut(3) {
                    let code = u16::from(self.read_pixel(header.rle, n)?[0]);
                    let index = code
                        .checked_sub(header.cmap_first)
                        .map(usize::from)
                        .filter(|&i| i < self.colormap.len())
                        .ok_or_else(|| {
                            ToolError::InvalidData(format!(
                                "Targa colormap index {code} out of range"
                            ))
                        })?;
                    dst.copy_from_slice(&self.colormap[index]);
                }
            }
            TgaKind::TrueColor => {
                for dst in row.chunks_exact_mut(3) {
                    let px = self.read_pixel(header.rle, n)?;
                    if n == 2 {
                        let v = u16::from_le_bytes([px[0], px[1]]);
                        dst[0] = c5_to_8((v >> 10) & 0x1f);
                        dst[1] = c5_to_8((v >> 5) & 0x1f);
                        dst[2] = c5_to_8(v & 0x1f);
                    } else {
                        dst[0] = px[2];
                        dst[1] = px[1];
                        dst[2] = px[0];
                    }
                }
            }
        }
        Ok(())
    }

    /// Read every scanline and store it top row first.
    fn decode_flipped(&mut self, header: &TgaHeader, info: &SourceInfo) -> Result<Vec<u8>, ToolError> {
        let total = image_bytes(info.width, info.height, info.input_components)?;
        if let Some(limits) = &self.limits {
            limits.check_buffer(total)?;
        }
        let row_len = info.row_bytes();
        let mut image = vec![0u8; total];
        for file_row in 0..info.height as usize {
            let dest_row = info.height as usize - 1 - file_row;
            let start = dest_row * row_len;
            self.decode_row(header, &mut image[start..start + row_len])?;
        }
        Ok(image)
    }
}

impl<R: Read> PixelSource for TargaReader<R> {
    fn start_input(&mut self) -> Result<SourceInfo, ToolError> {
        if self.header.is_some() {
            return Err(ToolError::InvalidState("start_input"));
        }
        let mut raw = [0u8; HEADER_LEN];
        read_exact(&mut self.src, &mut raw)?;
        let header = TgaHeader::parse(&raw)?;
        header.validate()?;

        let width = u32::from(header.width);
        let height = u32::from(header.height);
        if let Some(limits) = &self.limits {
            limits.check_dimensions(width, height)?;
        }

        // image ID field, unused
        let mut id = [0u8; 255];
        read_exact(&mut self.src, &mut id[..usize::from(header.id_length)])?;

        if header.cmap_type == 1 {
            self.read_colormap(&header)?;
        }

        debug!(
            "Targa input: {:?}{}, {width}x{height}, {} bpp, {}",
            header.kind,
            if header.rle { " RLE" } else { "" },
            header.pixel_bits,
            if header.descriptor & TOP_DOWN != 0 { "top-down" } else { "bottom-up" }
        );

        let color_space = header.color_space();
        let info = SourceInfo {
            width,
            height,
            in_color_space: color_space,
            input_components: color_space.components(),
        };
        self.header = Some(header);
        self.info = Some(info);
        Ok(info)
    }

    fn read_row(&mut self, row: &mut [u8]) -> Result<(), ToolError> {
        let (header, info) = match (self.header, self.info) {
            (Some(h), Some(i)) => (h, i),
            _ => return Err(ToolError::InvalidState("read_row")),
        };
        check_row_len(row, info.row_bytes())?;
        if self.next_row >= info.height {
            return Err(ToolError::TooManyRows { height: info.height });
        }

        if header.descriptor & TOP_DOWN != 0 {
            self.decode_row(&header, row)?;
        } else {
            if self.flipped.is_none() {
                self.flipped = Some(self.decode_flipped(&header, &info)?);
            }
            if let Some(image) = &self.flipped {
                let start = self.next_row as usize * row.len();
                row.copy_from_slice(&image[start..start + row.len()]);
            }
        }
        self.next_row += 1;
        Ok(())
    }

    fn finish_input(&mut self) -> Result<(), ToolError> {
        self.flipped = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn header(subtype: u8, width: u16, height: u16, bits: u8, descriptor: u8) -> Vec<u8> {
        let mut h = vec![0u8; HEADER_LEN];
        h[2] = subtype;
        h[12..14].copy_from_slice(&width.to_le_bytes());
        h[14..16].copy_from_slice(&height.to_le_bytes());
        h[16] = bits;
        h[17] = descriptor;
        h
    }

    fn read_all(data: Vec<u8>) -> Result<(SourceInfo, Vec<u8>), ToolError> {
        let mut reader = TargaReader::new(Cursor::new(data), None);
        let info = reader.start_input()?;
        let mut row = vec![0u8; info.row_bytes()];
        let mut pixels = Vec::new();
        for _ in 0..info.height {
            reader.read_row(&mut row)?;
            pixels.extend_from_slice(&row);
        }
        reader.finish_input()?;
        Ok((info, pixels))
    }

    #[test]
    fn bottom_up_bgr_is_flipped_and_swizzled() {
        let mut data = header(2, 1, 2, 24, 0);
        data.extend_from_slice(&[1, 2, 3]); // bottom row, BGR
        data.extend_from_slice(&[4, 5, 6]); // top row
        let (info, pixels) = read_all(data).unwrap();
        assert_eq!(info.in_color_space, ColorSpace::Rgb);
        assert_eq!(pixels, [6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn rle_gray_packets_cross_rows() {
        let mut data = header(11, 3, 2, 8, TOP_DOWN);
        // run of 4 × 9, then 2 literals
        data.extend_from_slice(&[0x83, 9, 0x01, 7, 8]);
        let (info, pixels) = read_all(data).unwrap();
        assert_eq!(info.in_color_space, ColorSpace::Grayscale);
        assert_eq!(pixels, [9, 9, 9, 9, 7, 8]);
    }

    #[test]
    fn colormapped_with_id_field() {
        let mut data = header(1, 2, 1, 8, TOP_DOWN);
        data[0] = 3; // id length
        data[1] = 1; // has colormap
        data[5..7].copy_from_slice(&2u16.to_le_bytes());
        data[7] = 24;
        data.extend_from_slice(b"abc");
        data.extend_from_slice(&[30, 20, 10, 60, 50, 40]); // BGR entries
        data.extend_from_slice(&[1, 0]);
        let (_, pixels) = read_all(data).unwrap();
        assert_eq!(pixels, [40, 50, 60, 10, 20, 30]);
    }

    #[test]
    fn sixteen_bit_expands_channels() {
        let mut data = header(2, 1, 1, 16, TOP_DOWN);
        data.extend_from_slice(&0x7c00u16.to_le_bytes()); // pure red
        let (_, pixels) = read_all(data).unwrap();
        assert_eq!(pixels, [255, 0, 0]);
    }

    #[test]
    fn unknown_image_type() {
        let data = header(32, 1, 1, 8, 0);
        assert!(matches!(read_all(data), Err(ToolError::UnsupportedVariant(_))));
    }

    #[test]
    fn truncated_pixels() {
        let mut data = header(3, 4, 4, 8, TOP_DOWN);
        data.extend_from_slice(&[1, 2, 3]);
        assert!(matches!(read_all(data), Err(ToolError::UnexpectedEof)));
    }
}
