//! Engine adapters binding [`Compressor`](crate::Compressor) and
//! [`Decompressor`](crate::Decompressor) to registry codecs.
//!
//! Compression goes through [jpeg-encoder](https://crates.io/crates/jpeg-encoder),
//! decompression through [zune-jpeg](https://github.com/etemesi254/zune-image).

mod decoder;
mod encoder;

pub use decoder::ZuneJpegDecompressor;
pub use encoder::JpegEncoderCompressor;
