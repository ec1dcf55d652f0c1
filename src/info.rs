use crate::bmp::Compression;
use crate::error::RasterError;

/// Header-level facts about a BMP file, read without decoding pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// Bits per pixel on disk.
    pub bit_count: u16,
    pub compression: Compression,
    /// Rows are stored first-to-last instead of bottom-up.
    pub top_down: bool,
    /// Color table entries (indexed depths only).
    pub palette_len: usize,
    /// Byte offset of the pixel data.
    pub data_offset: u32,
}

impl ImageInfo {
    /// Parse and validate the headers of a BMP file.
    pub fn from_bytes(data: &[u8]) -> Result<Self, RasterError> {
        crate::bmp::probe(data)
    }

    /// Whether pixels are palette indices.
    pub fn is_indexed(&self) -> bool {
        self.bit_count <= 8
    }
}
