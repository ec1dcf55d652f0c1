//! BMP container: headers, palette generation, decoder and encoder.
//!
//! Decoding always produces a [`Matrix`] of BGR24 pixels whose rows are
//! padded to 4 bytes. Encoding accepts a matrix of any convertible pixel
//! format.

mod decode;
mod encode;
mod header;
mod palette;
mod utils;

pub use encode::{BmpFormat, indexed_bit_count};
pub use header::Compression;
pub use palette::{MAX_PALETTE_LEN, Palette, generate_palette};

pub(crate) use decode::decode_bmp;
pub(crate) use encode::{EncodeSettings, encode_bmp};

use alloc::vec::Vec;
use enough::Stop;

use crate::error::RasterError;
use crate::format::{Bgr24, PixelFormat};
use crate::info::ImageInfo;
use crate::matrix::Matrix;
use crate::pixel::Pixel;

/// Decode BMP bytes.
pub fn decode(data: &[u8], stop: impl Stop) -> Result<Matrix<Pixel<Bgr24>>, RasterError> {
    decode::decode_bmp(data, None, &stop)
}

/// Encode `image` in `format` with default conversion settings.
pub fn encode<F: PixelFormat>(
    image: &Matrix<Pixel<F>>,
    format: BmpFormat,
    stop: impl Stop,
) -> Result<Vec<u8>, RasterError> {
    encode::encode_bmp(image, format, &EncodeSettings::default(), &stop)
}

/// Read the headers only.
pub fn probe(data: &[u8]) -> Result<ImageInfo, RasterError> {
    let header = decode::parse_bmp_header(data)?;
    Ok(ImageInfo {
        width: header.width,
        height: header.height,
        bit_count: header.bit_count(),
        compression: header.compression(),
        top_down: header.top_down,
        palette_len: header.palette_len,
        data_offset: header.file.offset,
    })
}

/// Read a BMP file.
///
/// A missing file is reported as [`RasterError::FileNotFound`].
#[cfg(feature = "std")]
pub fn read(path: impl AsRef<std::path::Path>) -> Result<Matrix<Pixel<Bgr24>>, RasterError> {
    let data = read_file(path.as_ref())?;
    decode(&data, enough::Unstoppable)
}

/// Write `image` to a BMP file.
///
/// The whole file is encoded in memory first, so an encoding failure never
/// leaves a partial file behind.
#[cfg(feature = "std")]
pub fn write<F: PixelFormat>(
    image: &Matrix<Pixel<F>>,
    path: impl AsRef<std::path::Path>,
    format: BmpFormat,
) -> Result<(), RasterError> {
    let data = encode(image, format, enough::Unstoppable)?;
    std::fs::write(path, data)?;
    Ok(())
}

#[cfg(feature = "std")]
pub(crate) fn read_file(path: &std::path::Path) -> Result<Vec<u8>, RasterError> {
    std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => RasterError::FileNotFound(path.display().to_string()),
        _ => RasterError::Io(e),
    })
}
