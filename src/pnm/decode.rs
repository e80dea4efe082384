//! Streaming PPM/PGM reader: P2, P3 (text) and P5, P6 (raw), maxval up to 255.
//!
//! Rows are produced one at a time; the input is never seeked or buffered
//! beyond a single row.

use std::io::Read;

use log::debug;

use crate::error::ToolError;
use crate::input::{read_exact, read_u8};
use crate::limits::Limits;
use crate::pixel::{ColorSpace, row_bytes};
use crate::source::{PixelSource, SourceInfo, check_row_len};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PpmKind {
    TextGray,
    TextRgb,
    RawGray,
    RawRgb,
}

impl PpmKind {
    fn from_magic(digit: u8) -> Result<Self, ToolError> {
        match digit {
            b'2' => Ok(Self::TextGray),
            b'3' => Ok(Self::TextRgb),
            b'5' => Ok(Self::RawGray),
            b'6' => Ok(Self::RawRgb),
            b'1' | b'4' => Err(ToolError::UnsupportedVariant(
                "PBM bitmaps are not supported".into(),
            )),
            b'7' => Err(ToolError::UnsupportedVariant("PAM is not supported".into())),
            b'F' | b'f' => Err(ToolError::UnsupportedVariant("PFM is not supported".into())),
            other => Err(ToolError::InvalidHeader(format!(
                "not a PPM/PGM file (magic P{})",
                other.escape_ascii()
            ))),
        }
    }

    fn color_space(self) -> ColorSpace {
        match self {
            Self::TextGray | Self::RawGray => ColorSpace::Grayscale,
            Self::TextRgb | Self::RawRgb => ColorSpace::Rgb,
        }
    }

    fn is_text(self) -> bool {
        matches!(self, Self::TextGray | Self::TextRgb)
    }
}

/// PPM/PGM [`PixelSource`].
pub struct PpmReader<R> {
    src: R,
    limits: Option<Limits>,
    kind: PpmKind,
    maxval: u32,
    /// Maps `0..=maxval` to `0..=255`; `None` when maxval is 255.
    rescale: Option<Vec<u8>>,
    info: Option<SourceInfo>,
}

impl<R: Read> PpmReader<R> {
    pub fn new(src: R, limits: Option<Limits>) -> Self {
        Self {
            src,
            limits,
            kind: PpmKind::RawRgb,
            maxval: 255,
            rescale: None,
            info: None,
        }
    }

    /// Next header character, with `#` comments folded into a newline.
    fn header_char(&mut self) -> Result<u8, ToolError> {
        let ch = read_u8(&mut self.src)?;
        if ch == b'#' {
            loop {
                let c = read_u8(&mut self.src)?;
                if c == b'\n' || c == b'\r' {
                    return Ok(c);
                }
            }
        }
        Ok(ch)
    }

    /// Read an unsigned decimal, skipping leading whitespace and comments.
    ///
    /// The single character that terminates the number is consumed.
    fn read_number(&mut self) -> Result<u32, ToolError> {
        let mut ch = self.header_char()?;
        while ch.is_ascii_whitespace() {
            ch = self.header_char()?;
        }
        if !ch.is_ascii_digit() {
            return Err(ToolError::InvalidData(format!(
                "nonnumeric data in PPM file: {:?}",
                ch as char
            )));
        }
        let mut val = u32::from(ch - b'0');
        loop {
            ch = match self.header_char() {
                Ok(c) => c,
                // a number may end the file in text formats
                Err(ToolError::UnexpectedEof) => break,
                Err(e) => return Err(e),
            };
            if !ch.is_ascii_digit() {
                break;
            }
            val = val
                .checked_mul(10)
                .and_then(|v| v.checked_add(u32::from(ch - b'0')))
                .ok_or_else(|| ToolError::InvalidData("number too large in PPM file".into()))?;
        }
        Ok(val)
    }

    fn scale(&self, value: u32) -> Result<u8, ToolError> {
        if value > self.maxval {
            return Err(ToolError::InvalidData(format!(
                "sample {value} exceeds maxval {}",
                self.maxval
            )));
        }
        Ok(match &self.rescale {
            Some(table) => table[value as usize],
            None => value as u8,
        })
    }
}

impl<R: Read> PixelSource for PpmReader<R> {
    fn start_input(&mut self) -> Result<SourceInfo, ToolError> {
        if self.info.is_some() {
            return Err(ToolError::InvalidState("start_input"));
        }
        let magic = read_u8(&mut self.src)?;
        if magic != b'P' {
            return Err(ToolError::InvalidHeader("not a PPM/PGM file".into()));
        }
        self.kind = PpmKind::from_magic(read_u8(&mut self.src)?)?;

        let width = self.read_number()?;
        let height = self.read_number()?;
        let maxval = self.read_number()?;

        if width == 0 || height == 0 {
            return Err(ToolError::InvalidHeader(format!(
                "PPM dimensions {width}x{height} must be nonzero"
            )));
        }
        if maxval == 0 {
            return Err(ToolError::InvalidHeader("PPM maxval is zero".into()));
        }
        if maxval > 255 {
            return Err(ToolError::UnsupportedVariant(format!(
                "PPM maxval {maxval} needs 16-bit samples"
            )));
        }
        if let Some(limits) = &self.limits {
            limits.check_dimensions(width, height)?;
        }

        let color_space = self.kind.color_space();
        let components = color_space.components();
        let row_len = row_bytes(width, height, components)?;
        if let Some(limits) = &self.limits {
            limits.check_buffer(row_len)?;
        }

        self.maxval = maxval;
        self.rescale = (maxval != 255).then(|| {
            let half = maxval / 2;
            (0..=maxval)
                .map(|v| ((v * 255 + half) / maxval) as u8)
                .collect()
        });

        debug!(
            "PPM input: {:?}, {width}x{height}, maxval {maxval}",
            self.kind
        );

        let info = SourceInfo {
            width,
            height,
            in_color_space: color_space,
            input_components: components,
        };
        self.info = Some(info);
        Ok(info)
    }

    fn read_row(&mut self, row: &mut [u8]) -> Result<(), ToolError> {
        let info = self.info.ok_or(ToolError::InvalidState("read_row"))?;
        check_row_len(row, info.row_bytes())?;

        if self.kind.is_text() {
            for sample in row.iter_mut() {
                let value = self.read_number()?;
                *sample = self.scale(value)?;
            }
        } else {
            read_exact(&mut self.src, row)?;
            if self.rescale.is_some() {
                for sample in row.iter_mut() {
                    *sample = self.scale(u32::from(*sample))?;
                }
            }
        }
        Ok(())
    }
}
