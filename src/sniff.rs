//! Input format detection from the first byte of the stream.
//!
//! Only one byte is inspected because the input may be a pipe. Formats that
//! cannot be told apart that way need an explicit override; Targa is the one
//! such format, since its first byte is the length of an optional ID field
//! and is only *usually* zero.

use core::fmt;

use log::debug;

use crate::error::ToolError;
use crate::input::PeekByte;

/// Input file families the dispatcher knows about.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputFormat {
    /// CompuServe GIF, first byte `G`.
    Gif,
    /// PBMPLUS PPM/PGM, first byte `P`.
    Ppm,
    /// Utah RLE, first byte `R` (0x52, low byte of the 0xcc52 magic).
    Rle,
    /// Truevision Targa, first byte usually `0x00`.
    Targa,
}

impl InputFormat {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gif => "GIF",
            Self::Ppm => "PPM",
            Self::Rle => "RLE",
            Self::Targa => "Targa",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Leading byte → format. Anything not listed is unrecognized.
const SIGNATURES: [(u8, InputFormat); 4] = [
    (b'G', InputFormat::Gif),
    (b'P', InputFormat::Ppm),
    (b'R', InputFormat::Rle),
    (0x00, InputFormat::Targa),
];

/// Look up a leading byte in the signature table.
pub fn format_for_signature(byte: u8) -> Option<InputFormat> {
    SIGNATURES
        .iter()
        .find(|(sig, _)| *sig == byte)
        .map(|&(_, format)| format)
}

/// What this build can read and encode, resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capabilities {
    readers: Vec<InputFormat>,
    /// Huffman table optimization (`-o`).
    pub optimize_coding: bool,
    /// Non-interleaved, multi-scan output (`-I`).
    pub multiscan: bool,
    /// Arithmetic entropy coding (`-a`).
    pub arith_coding: bool,
}

impl Default for Capabilities {
    /// Readers and encoder features backed by this crate.
    fn default() -> Self {
        Self {
            readers: vec![InputFormat::Ppm, InputFormat::Targa],
            optimize_coding: cfg!(feature = "jpeg"),
            multiscan: false,
            arith_coding: false,
        }
    }
}

impl Capabilities {
    /// A registry with no readers and no optional encoder features.
    pub fn none() -> Self {
        Self {
            readers: Vec::new(),
            optimize_coding: false,
            multiscan: false,
            arith_coding: false,
        }
    }

    pub fn with_reader(mut self, format: InputFormat) -> Self {
        if !self.readers.contains(&format) {
            self.readers.push(format);
        }
        self
    }

    pub fn without_reader(mut self, format: InputFormat) -> Self {
        self.readers.retain(|&f| f != format);
        self
    }

    pub fn supports(&self, format: InputFormat) -> bool {
        self.readers.contains(&format)
    }
}

/// Decide which reader handles `src`.
///
/// With `force_targa` set no input is consumed. Otherwise one byte is read,
/// matched, and pushed back before returning, so the selected reader starts
/// at offset 0.
pub fn select_file_type<R: PeekByte + ?Sized>(
    src: &mut R,
    force_targa: bool,
    caps: &Capabilities,
) -> Result<InputFormat, ToolError> {
    if force_targa {
        if !caps.supports(InputFormat::Targa) {
            return Err(ToolError::UnsupportedFormat(InputFormat::Targa));
        }
        debug!("Targa input forced");
        return Ok(InputFormat::Targa);
    }

    let byte = src.read_byte()?.ok_or(ToolError::EmptyInput)?;

    let format = format_for_signature(byte).ok_or(ToolError::UnrecognizedFormat {
        targa_hint: caps.supports(InputFormat::Targa),
    })?;
    if !caps.supports(format) {
        return Err(ToolError::UnsupportedFormat(format));
    }
    debug!("Detected {format} input from leading byte {byte:#04x}");

    src.unread_byte(byte).map_err(|_| ToolError::PushbackFailed)?;
    Ok(format)
}
