use crate::pixel::ColorSpace;
use crate::sniff::InputFormat;

/// Errors from format dispatch, input readers, the PPM/PGM writer and the
/// engine adapters.
///
/// Every variant is fatal to the current run; nothing is retried.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ToolError {
    #[error("empty input file")]
    EmptyInput,

    #[error("unrecognized input file format{}", targa_hint_suffix(.targa_hint))]
    UnrecognizedFormat { targa_hint: bool },

    #[error("{0} support is not available")]
    UnsupportedFormat(InputFormat),

    #[error("could not push back the signature byte")]
    PushbackFailed,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unsupported format variant: {0}")]
    UnsupportedVariant(String),

    #[error("invalid pixel data: {0}")]
    InvalidData(String),

    #[error("PPM output must be grayscale or RGB, got {0:?}")]
    UnsupportedColorSpace(ColorSpace),

    #[error("PPM output requires 8-bit samples, got {0} bits")]
    SampleSize(u8),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("row length mismatch: expected {expected} samples, got {actual}")]
    RowLength { expected: usize, actual: usize },

    #[error("too many rows: image height is {height}")]
    TooManyRows { height: u32 },

    #[error("palette index {index} out of range (colormap has {colors} entries)")]
    PaletteIndexOutOfRange { index: u8, colors: usize },

    #[error("quantized output requested without a colormap")]
    MissingColorMap,

    #[error("colormap has {actual} planes, output needs {expected}")]
    ColorMapPlanes { expected: usize, actual: usize },

    #[error("{0} called out of order")]
    InvalidState(&'static str),

    #[error("file write error")]
    FileWrite(#[source] std::io::Error),

    #[error("jpeg engine error: {0}")]
    Engine(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn targa_hint_suffix(hint: &bool) -> &'static str {
    if *hint { "--did you forget -T ?" } else { "" }
}
