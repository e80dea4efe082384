//! PNM family: P5 (PGM) and P6 (PPM) output, P2/P3/P5/P6 input.
//!
//! Credits: header handling draws from [zune-ppm](https://github.com/etemesi254/zune-image)
//! by Caleb Etemesi (MIT/Apache-2.0/Zlib licensed).

mod decode;
mod encode;

pub use decode::PpmReader;
pub use encode::{PpmWriter, encode_pnm};

use crate::pixel::ColorSpace;

/// Which binary PNM sub-format to write.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PnmFormat {
    /// P5, binary grayscale (PGM).
    Pgm,
    /// P6, binary RGB (PPM).
    Ppm,
}

impl PnmFormat {
    /// Output sub-format for a color space, if PNM can carry it.
    pub fn for_color_space(color_space: ColorSpace) -> Option<Self> {
        match color_space {
            ColorSpace::Grayscale => Some(Self::Pgm),
            ColorSpace::Rgb => Some(Self::Ppm),
            _ => None,
        }
    }

    pub fn magic(&self) -> &'static str {
        match self {
            Self::Pgm => "P5",
            Self::Ppm => "P6",
        }
    }

    pub fn components(&self) -> usize {
        match self {
            Self::Pgm => 1,
            Self::Ppm => 3,
        }
    }
}

/// Largest sample value written in output headers.
pub(crate) const MAXVAL: u32 = 255;

/// `MAGIC\nWIDTH HEIGHT\nMAXVAL\n`
pub(crate) fn header(format: PnmFormat, width: u32, height: u32) -> String {
    format!("{}\n{width} {height}\n{MAXVAL}\n", format.magic())
}
