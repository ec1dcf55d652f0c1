//! BMP encoder: 24-bit, 16-bit (5-5-5), 32-bit BGRA, and 1/4/8-bit indexed.
//!
//! The source matrix is first converted to the on-disk pixel format, then
//! written bottom row first with each row zero-padded to 4 bytes.

use alloc::vec::Vec;

use enough::Stop;

use super::header::{
    Compression, FILE_HEADER_SIZE, FileHeader, INFO_HEADER_SIZE, InfoHeader, PALETTE_ENTRY_SIZE,
    PIXELS_PER_METER, PaletteEntry,
};
use super::palette::{MAX_PALETTE_LEN, Palette, generate_palette};
use super::utils::{pack_indices, pack_rgb555, row_stride};
use crate::convert::{ConvertOptions, convert_to_binary, convert_to_rgb, convert_to_rgba};
use crate::error::RasterError;
use crate::format::{Bgr24, Bgra32, Binary, PixelFormat};
use crate::matrix::{Matrix, padding};
use crate::pixel::Pixel;

/// On-disk layout to write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum BmpFormat {
    /// 24-bit BGR.
    #[default]
    Bgr24,
    /// 16-bit `X RRRRR GGGGG BBBBB`; the low three bits of each channel are dropped.
    Rgb16,
    /// 32-bit BGRA, alpha kept (or defaulted for sources without alpha).
    Bgra32,
    /// 1-bit indexed; fails above 2 colors.
    Palette1,
    /// 4-bit indexed; fails above 16 colors.
    Palette4,
    /// 8-bit indexed; fails above 256 colors.
    Palette8,
    /// Smallest indexed depth that fits the image's colors.
    Indexed,
    /// 1-bit, thresholded, with a two-color palette chosen by the caller.
    Binary,
}

impl BmpFormat {
    /// Bits per pixel, or `None` for [`BmpFormat::Indexed`] which is decided
    /// from the image.
    pub fn bit_count(self) -> Option<u16> {
        match self {
            Self::Bgr24 => Some(24),
            Self::Rgb16 => Some(16),
            Self::Bgra32 => Some(32),
            Self::Palette1 | Self::Binary => Some(1),
            Self::Palette4 => Some(4),
            Self::Palette8 => Some(8),
            Self::Indexed => None,
        }
    }
}

/// Indexed depth for a palette of `colors` entries: 8 above 16, 4 above 2,
/// else 1.
pub fn indexed_bit_count(colors: usize) -> u16 {
    if colors > 16 {
        8
    } else if colors > 2 {
        4
    } else {
        1
    }
}

/// Encoder settings beyond the target format.
#[derive(Clone, Debug)]
pub(crate) struct EncodeSettings {
    /// Colors for `false` and `true` in [`BmpFormat::Binary`] output.
    pub binary_palette: [Pixel<Bgr24>; 2],
    pub options: ConvertOptions,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            binary_palette: [Pixel::new(), Pixel::from_u64(0xFF_FF_FF)],
            options: ConvertOptions::default(),
        }
    }
}

/// Encode `image` as a BMP file.
pub(crate) fn encode_bmp<F: PixelFormat>(
    image: &Matrix<Pixel<F>>,
    format: BmpFormat,
    settings: &EncodeSettings,
    stop: &dyn Stop,
) -> Result<Vec<u8>, RasterError> {
    if !image.is_valid() {
        return Err(RasterError::InvalidData("cannot encode an empty matrix".into()));
    }
    let (width, height) = (image.width(), image.height());
    if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
        return Err(RasterError::DimensionsTooLarge {
            width: u32::try_from(width).unwrap_or(u32::MAX),
            height: u32::try_from(height).unwrap_or(u32::MAX),
        });
    }

    stop.check()?;
    let opts = ConvertOptions {
        keep_row_padding: false,
        ..settings.options.clone()
    };

    match format {
        BmpFormat::Bgr24 => {
            let mut bgr: Matrix<Pixel<Bgr24>> = Matrix::default();
            convert_to_rgb(&mut bgr, image, &opts)?;
            // Padded rows match the file layout byte for byte.
            bgr.set_row_padding(padding(3 * width, 4));
            let mut out = start_file(width, height, 24, Compression::Rgb, &[])?;
            for row in (0..height).rev() {
                if row % 16 == 0 {
                    stop.check()?;
                }
                out.extend_from_slice(bgr.padded_row_bytes(row));
            }
            Ok(out)
        }
        BmpFormat::Bgra32 => {
            let mut bgra: Matrix<Pixel<Bgra32>> = Matrix::default();
            convert_to_rgba(&mut bgra, image, &opts)?;
            let mut out = start_file(width, height, 32, Compression::Rgb, &[])?;
            for row in (0..height).rev() {
                if row % 16 == 0 {
                    stop.check()?;
                }
                out.extend_from_slice(bgra.row_bytes(row));
            }
            Ok(out)
        }
        BmpFormat::Rgb16 => {
            let mut bgr: Matrix<Pixel<Bgr24>> = Matrix::default();
            convert_to_rgb(&mut bgr, image, &opts)?;
            let mut out = start_file(width, height, 16, Compression::Rgb, &[])?;
            let pad = padding(2 * width, 4);
            for row in (0..height).rev() {
                if row % 16 == 0 {
                    stop.check()?;
                }
                for px in bgr.row(row) {
                    let v = pack_rgb555(px.red(), px.green(), px.blue());
                    out.extend_from_slice(&v.to_le_bytes());
                }
                out.extend(core::iter::repeat_n(0u8, pad));
            }
            Ok(out)
        }
        BmpFormat::Palette1 | BmpFormat::Palette4 | BmpFormat::Palette8 | BmpFormat::Indexed => {
            let mut bgr: Matrix<Pixel<Bgr24>> = Matrix::default();
            convert_to_rgb(&mut bgr, image, &opts)?;
            let capacity = match format.bit_count() {
                Some(bits) => 1usize << bits,
                None => MAX_PALETTE_LEN,
            };
            let (indices, palette) = generate_palette(&bgr, capacity)?;
            let bits = format
                .bit_count()
                .unwrap_or_else(|| indexed_bit_count(palette.len()));
            write_indexed(&indices, &palette, bits, stop)
        }
        BmpFormat::Binary => {
            let mut binary: Matrix<Pixel<Binary>> = Matrix::default();
            convert_to_binary(&mut binary, image, &opts)?;
            let mut indices: Matrix<u8> = Matrix::new(width, height);
            indices.map_indexed(|row, col, index| *index = u8::from(binary.get(row, col).binary()));
            write_indexed_with(&indices, &settings.binary_palette, 1, stop)
        }
    }
}

fn write_indexed(
    indices: &Matrix<u8>,
    palette: &Palette<Bgr24>,
    bits: u16,
    stop: &dyn Stop,
) -> Result<Vec<u8>, RasterError> {
    write_indexed_with(indices, palette.colors(), bits, stop)
}

fn write_indexed_with(
    indices: &Matrix<u8>,
    colors: &[Pixel<Bgr24>],
    bits: u16,
    stop: &dyn Stop,
) -> Result<Vec<u8>, RasterError> {
    let (width, height) = (indices.width(), indices.height());
    let table: Vec<PaletteEntry> = colors
        .iter()
        .map(|c| PaletteEntry {
            blue: c.blue(),
            green: c.green(),
            red: c.red(),
            reserved: 0,
        })
        .collect();
    let mut out = start_file(width, height, bits, Compression::Rgb, &table)?;
    let stride = row_stride(width, bits).ok_or_else(|| too_large(width, height))?;
    let mut packed = alloc::vec![0u8; stride];
    for row in (0..height).rev() {
        if row % 16 == 0 {
            stop.check()?;
        }
        packed.fill(0);
        pack_indices(&mut packed, bits, indices.row(row));
        out.extend_from_slice(&packed);
    }
    Ok(out)
}

fn too_large(width: usize, height: usize) -> RasterError {
    RasterError::DimensionsTooLarge {
        width: u32::try_from(width).unwrap_or(u32::MAX),
        height: u32::try_from(height).unwrap_or(u32::MAX),
    }
}

/// Allocate the output and write headers and color table.
fn start_file(
    width: usize,
    height: usize,
    bits: u16,
    compression: Compression,
    palette: &[PaletteEntry],
) -> Result<Vec<u8>, RasterError> {
    let stride = row_stride(width, bits).ok_or_else(|| too_large(width, height))?;
    let pixel_data_size = stride
        .checked_mul(height)
        .ok_or_else(|| too_large(width, height))?;
    let offset = FILE_HEADER_SIZE + INFO_HEADER_SIZE + PALETTE_ENTRY_SIZE * palette.len();
    let file_size = pixel_data_size
        .checked_add(offset)
        .filter(|&size| u32::try_from(size).is_ok())
        .ok_or_else(|| too_large(width, height))?;

    log::debug!(
        "encoding {width}x{height} BMP at {bits} bits, {} palette entries, {file_size} bytes",
        palette.len()
    );

    let mut out = Vec::with_capacity(file_size);
    FileHeader {
        file_size: file_size as u32,
        reserved1: 0,
        reserved2: 0,
        offset: offset as u32,
    }
    .write_to(&mut out);
    InfoHeader {
        size: INFO_HEADER_SIZE as u32,
        width: width as i32,
        // Positive: rows stored bottom-up.
        height: height as i32,
        planes: 1,
        bit_count: bits,
        compression,
        image_size: pixel_data_size as u32,
        x_pixels_per_meter: PIXELS_PER_METER,
        y_pixels_per_meter: PIXELS_PER_METER,
        colors_used: palette.len() as u32,
        colors_important: 0,
    }
    .write_to(&mut out);
    for entry in palette {
        entry.write_to(&mut out);
    }
    Ok(out)
}
