//! # zenjpeg-tools
//!
//! Front ends for a JPEG toolkit: input format sniffing for compression and
//! streaming PPM/PGM output for decompression.
//!
//! ## Input side
//!
//! [`select_file_type`] reads exactly one byte of a possibly non-seekable
//! stream, picks a reader from a runtime [`Capabilities`] registry, and
//! pushes the byte back through [`PeekByte`] so the reader sees the file from
//! offset 0. Readers implement [`PixelSource`].
//!
//! | first byte | format |
//! |------------|--------|
//! | `G`        | GIF (detected, not decoded) |
//! | `P`        | PPM/PGM |
//! | `R`        | Utah RLE (detected, not decoded) |
//! | `0x00`     | Targa, or any byte with `force_targa` |
//!
//! ## Output side
//!
//! [`PpmWriter`] implements [`DestinationWriter`]: header once, one call per
//! row, flush-and-check once. When the engine quantizes, palette indices are
//! expanded through the [`ColorMap`] as rows arrive.
//!
//! ## Usage
//!
//! ```
//! use std::io::Cursor;
//! use zenjpeg_tools::{
//!     Capabilities, InputFormat, PixelSource, PushbackReader, open_source, select_file_type,
//! };
//!
//! let mut input = PushbackReader::new(Cursor::new(b"P5\n2 1\n255\n\x10\x20".to_vec()));
//! let caps = Capabilities::default();
//! let format = select_file_type(&mut input, false, &caps)?;
//! assert_eq!(format, InputFormat::Ppm);
//!
//! let mut source = open_source(format, input, &caps, None)?;
//! let info = source.start_input()?;
//! let mut row = vec![0u8; info.row_bytes()];
//! source.read_row(&mut row)?;
//! assert_eq!(row, [0x10, 0x20]);
//! # Ok::<(), zenjpeg_tools::ToolError>(())
//! ```
//!
//! ## Credits
//!
//! PNM header handling draws from [zune-ppm](https://github.com/etemesi254/zune-image)
//! by Caleb Etemesi (MIT/Apache-2.0/Zlib licensed).

#![forbid(unsafe_code)]

mod colormap;
mod compress;
mod decompress;
mod dest;
mod error;
mod input;
mod limits;
mod pixel;
mod sniff;
mod source;

pub mod pnm;
pub mod tga;

#[cfg(feature = "jpeg")]
pub mod engine;

#[cfg(feature = "cli")]
pub mod cli;

// Re-exports
pub use colormap::ColorMap;
pub use compress::{
    CompressParams, Compressor, DEFAULT_QUALITY, jpeg_compress, read_all_rows, select_methods,
};
pub use decompress::{Decompressor, jpeg_decompress};
pub use dest::{DecompressInfo, DestinationWriter};
pub use error::ToolError;
pub use input::{PeekByte, PushbackReader};
pub use limits::Limits;
pub use pixel::ColorSpace;
pub use pnm::{PpmReader, PpmWriter, encode_pnm};
pub use sniff::{Capabilities, InputFormat, format_for_signature, select_file_type};
pub use source::{PixelSource, SourceInfo, open_source};
pub use tga::TargaReader;
