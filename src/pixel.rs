/// Color space of a pixel stream, as seen by readers, writers and engines.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    /// Single channel luminance.
    Grayscale,
    /// 3 channels, interleaved R, G, B.
    Rgb,
    /// 3 channels, JFIF YCbCr.
    YCbCr,
    /// 4 channels, C, M, Y, K.
    Cmyk,
    /// 4 channels, Adobe YCCK.
    Ycck,
    /// Anything the engine reports that this crate has no name for.
    Unknown,
}

impl ColorSpace {
    /// Samples per pixel.
    pub fn components(&self) -> usize {
        match self {
            Self::Grayscale => 1,
            Self::Rgb | Self::YCbCr => 3,
            Self::Cmyk | Self::Ycck => 4,
            Self::Unknown => 0,
        }
    }
}

/// Bytes needed for one row of `width` pixels with `components` samples each.
pub(crate) fn row_bytes(width: u32, height: u32, components: usize) -> Result<usize, crate::ToolError> {
    (width as usize)
        .checked_mul(components)
        .ok_or(crate::ToolError::DimensionsTooLarge { width, height })
}

/// Bytes needed for a whole image, checked for overflow.
pub(crate) fn image_bytes(width: u32, height: u32, components: usize) -> Result<usize, crate::ToolError> {
    row_bytes(width, height, components)?
        .checked_mul(height as usize)
        .ok_or(crate::ToolError::DimensionsTooLarge { width, height })
}
