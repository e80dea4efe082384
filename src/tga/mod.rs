//! Truevision Targa input (types 1, 2, 3 and their RLE variants 9, 10, 11).
//!
//! A Targa file has no magic number; its first byte is the length of the
//! optional image ID field. See [`crate::sniff`] for how that shapes
//! detection.

mod decode;

pub use decode::TargaReader;
