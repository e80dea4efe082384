//! Caps on what a single pass may read or allocate.
//!
//! Readers consult these after parsing a header and before sizing row or
//! image buffers; the PPM writer consults them before sizing its demap row.

use crate::error::ToolError;

/// Size caps for one compression or decompression pass. `None` disables a cap.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Cap on `width * height`.
    pub max_pixels: Option<u64>,
    /// Cap on any one row or whole-image buffer, in bytes.
    pub max_memory_bytes: Option<u64>,
}

fn over(what: &str, value: u64, cap: Option<u64>) -> Result<(), ToolError> {
    match cap {
        Some(cap) if value > cap => Err(ToolError::LimitExceeded(format!(
            "{what} {value} is over the cap of {cap}"
        ))),
        _ => Ok(()),
    }
}

impl Limits {
    /// Reject an image header whose geometry is over a cap.
    pub(crate) fn check_dimensions(&self, width: u32, height: u32) -> Result<(), ToolError> {
        let (w, h) = (u64::from(width), u64::from(height));
        over("image width", w, self.max_width)?;
        over("image height", h, self.max_height)?;
        over("pixel count", w * h, self.max_pixels)
    }

    /// Reject a buffer before it is allocated.
    pub(crate) fn check_buffer(&self, bytes: usize) -> Result<(), ToolError> {
        over("buffer of bytes", bytes as u64, self.max_memory_bytes)
    }
}
