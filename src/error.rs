use alloc::string::String;
use enough::StopReason;

/// Errors from matrix access, pixel conversion, and BMP decoding/encoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RasterError {
    #[error("unrecognized format magic bytes")]
    UnrecognizedFormat,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unsupported format variant: {0}")]
    UnsupportedVariant(String),

    #[error("invalid pixel data: {0}")]
    InvalidData(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("image has more than {capacity} distinct colors (found at least {colors})")]
    PaletteOverflow { colors: usize, capacity: usize },

    #[error("cannot convert {from} pixels to {to}")]
    UnsupportedConversion {
        from: &'static str,
        to: &'static str,
    },

    #[error("index ({row}, {col}) out of range for {width}x{height} matrix")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    #[error("operation cancelled")]
    Cancelled(StopReason),

    #[cfg(feature = "std")]
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[cfg(feature = "std")]
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StopReason> for RasterError {
    fn from(r: StopReason) -> Self {
        RasterError::Cancelled(r)
    }
}
