//! BMP decoder for uncompressed 1/4/8-bit indexed, 16, 24 and 32-bit files,
//! plus 16/32-bit `BI_BITFIELDS`.
//!
//! Every depth decodes into the canonical BGR24 matrix, whose rows carry the
//! same 4-byte alignment padding as a 24-bit file.

use alloc::vec::Vec;

use enough::Stop;

use super::header::{
    Compression, Cursor, FILE_HEADER_SIZE, FileHeader, INFO_HEADER_SIZE, InfoHeader,
    PALETTE_ENTRY_SIZE, PaletteEntry,
};
use super::utils::{Bitfields, row_stride, unpack_index};
use crate::error::RasterError;
use crate::format::Bgr24;
use crate::limits::Limits;
use crate::matrix::{Matrix, padding};
use crate::pixel::Pixel;

// ── Parsed header info ──────────────────────────────────────────────

/// Validated headers of a BMP file.
#[derive(Clone, Debug)]
pub(crate) struct BmpHeader {
    pub file: FileHeader,
    pub info: InfoHeader,
    pub width: u32,
    pub height: u32,
    pub top_down: bool,
    /// Color table entries; 0 for direct-color depths.
    pub palette_len: usize,
}

impl BmpHeader {
    pub fn bit_count(&self) -> u16 {
        self.info.bit_count
    }

    pub fn compression(&self) -> Compression {
        self.info.compression
    }
}

/// Parse and validate the file and info headers.
pub(crate) fn parse_bmp_header(data: &[u8]) -> Result<BmpHeader, RasterError> {
    let file = FileHeader::parse(data)?;
    let info = InfoHeader::parse(data)?;

    if info.planes != 1 {
        return Err(RasterError::InvalidHeader(alloc::format!(
            "BMP planes field is {}, expected 1",
            info.planes
        )));
    }
    if info.width <= 0 {
        return Err(RasterError::InvalidHeader(alloc::format!(
            "BMP width is {}",
            info.width
        )));
    }
    if info.height == 0 {
        return Err(RasterError::InvalidHeader("BMP height is zero".into()));
    }

    let bits = info.bit_count;
    match (bits, info.compression) {
        (1 | 4 | 8 | 16 | 24 | 32, Compression::Rgb) => {}
        (16 | 32, Compression::Bitfields) => {}
        (_, Compression::Rle8 | Compression::Rle4) => {
            return Err(RasterError::UnsupportedVariant(
                "RLE-compressed BMP is not supported".into(),
            ));
        }
        (_, Compression::Bitfields) => {
            return Err(RasterError::InvalidHeader(alloc::format!(
                "BI_BITFIELDS with {bits}-bit pixels"
            )));
        }
        (1 | 4 | 8 | 16 | 24 | 32, Compression::Other(c)) => {
            return Err(RasterError::UnsupportedVariant(alloc::format!(
                "BMP compression {c} unsupported"
            )));
        }
        _ => {
            return Err(RasterError::UnsupportedVariant(alloc::format!(
                "BMP bit depth {bits} unsupported"
            )));
        }
    }

    let palette_len = if bits <= 8 {
        let max = 1usize << bits;
        match info.colors_used as usize {
            0 => max,
            n if n <= max => n,
            n => {
                return Err(RasterError::InvalidHeader(alloc::format!(
                    "BMP palette count ({n}) exceeds max for {bits}-bit depth ({max})"
                )));
            }
        }
    } else {
        0
    };

    Ok(BmpHeader {
        file,
        info,
        width: info.width.unsigned_abs(),
        height: info.height.unsigned_abs(),
        top_down: info.is_top_down(),
        palette_len,
    })
}

/// Read the color table right after the info header.
fn read_palette(data: &[u8], header: &BmpHeader) -> Result<Vec<Pixel<Bgr24>>, RasterError> {
    let start = FILE_HEADER_SIZE + header.info.size as usize;
    let mut cur = Cursor::at(data, start)?;
    let mut colors = Vec::with_capacity(header.palette_len);
    for _ in 0..header.palette_len {
        let entry = PaletteEntry::parse(&mut cur)?;
        colors.push(Pixel::from_bytes([entry.blue, entry.green, entry.red]));
    }
    Ok(colors)
}

/// Channel masks for 16/32-bit data: read after the 40-byte header for
/// `BI_BITFIELDS`, the fixed 5-5-5 layout for plain 16-bit files.
fn read_bitfields(data: &[u8], header: &BmpHeader) -> Result<Option<Bitfields>, RasterError> {
    match (header.bit_count(), header.compression()) {
        (_, Compression::Bitfields) => {
            let mut cur = Cursor::at(data, FILE_HEADER_SIZE + INFO_HEADER_SIZE)?;
            let red = cur.get_u32_le()?;
            let green = cur.get_u32_le()?;
            let blue = cur.get_u32_le()?;
            Ok(Some(Bitfields::new(red, green, blue)))
        }
        (16, _) => Ok(Some(Bitfields::rgb555())),
        _ => Ok(None),
    }
}

// ── Full decode ─────────────────────────────────────────────────────

/// Decode a BMP file into a BGR24 matrix.
pub(crate) fn decode_bmp(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Matrix<Pixel<Bgr24>>, RasterError> {
    let header = parse_bmp_header(data)?;
    log::debug!(
        "BMP {}x{} {}-bit {:?}, {} palette entries{}",
        header.width,
        header.height,
        header.bit_count(),
        header.compression(),
        header.palette_len,
        if header.top_down { ", top-down" } else { "" }
    );

    let unlimited = Limits::default();
    let limits = limits.unwrap_or(&unlimited);
    limits.check(header.width, header.height)?;

    let width = header.width as usize;
    let height = header.height as usize;

    // Input bounds are checked before anything is allocated.
    let in_stride = row_stride(width, header.bit_count()).ok_or_else(|| too_large_of(&header))?;
    let pixel_bytes = in_stride
        .checked_mul(height)
        .ok_or_else(|| too_large_of(&header))?;
    let offset = header.file.offset as usize;
    let pixel_data = offset
        .checked_add(pixel_bytes)
        .and_then(|end| data.get(offset..end))
        .ok_or(RasterError::UnexpectedEof)?;

    let out_padding = padding(3 * width, 4);
    limits.check_matrix::<Pixel<Bgr24>>(width, height, out_padding)?;

    let palette = if header.palette_len > 0 {
        read_palette(data, &header)?
    } else {
        Vec::new()
    };
    let bitfields = read_bitfields(data, &header)?;

    stop.check()?;

    let mut image: Matrix<Pixel<Bgr24>> = Matrix::with_padding(width, height, out_padding);
    for (i, src) in pixel_data.chunks_exact(in_stride).enumerate() {
        if i % 16 == 0 {
            stop.check()?;
        }
        let row = if header.top_down { i } else { height - 1 - i };
        let out = image.row_bytes_mut(row);
        match (header.bit_count(), bitfields) {
            (24, _) => out.copy_from_slice(&src[..3 * width]),
            (32, None) => {
                for (px, bgrx) in out.chunks_exact_mut(3).zip(src.chunks_exact(4)) {
                    px.copy_from_slice(&bgrx[..3]);
                }
            }
            (32, Some(fields)) => {
                for (px, raw) in out.chunks_exact_mut(3).zip(src.chunks_exact(4)) {
                    let v = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
                    px.copy_from_slice(&fields.bgr(v));
                }
            }
            (16, Some(fields)) => {
                for (px, raw) in out.chunks_exact_mut(3).zip(src.chunks_exact(2)) {
                    let v = u32::from(u16::from_le_bytes([raw[0], raw[1]]));
                    px.copy_from_slice(&fields.bgr(v));
                }
            }
            (bits, _) => {
                for (col, px) in out.chunks_exact_mut(3).enumerate() {
                    let index = unpack_index(src, col, bits);
                    let color = palette.get(usize::from(index)).ok_or_else(|| {
                        RasterError::InvalidData(alloc::format!(
                            "palette index {index} out of range ({} entries)",
                            palette.len()
                        ))
                    })?;
                    px.copy_from_slice(color.bytes());
                }
            }
        }
    }

    Ok(image)
}

fn too_large_of(header: &BmpHeader) -> RasterError {
    RasterError::DimensionsTooLarge {
        width: header.width,
        height: header.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bmp::header::{PIXEL_DATA_OFFSET, PIXELS_PER_METER};
    use alloc::vec;
    use enough::Unstoppable;

    /// Hand-built file: headers, optional color table, raw rows.
    fn build(
        width: i32,
        height: i32,
        bits: u16,
        compression: Compression,
        extra: &[u8],
        rows: &[u8],
    ) -> Vec<u8> {
        let offset = PIXEL_DATA_OFFSET + extra.len();
        let mut out = Vec::new();
        FileHeader {
            file_size: (offset + rows.len()) as u32,
            reserved1: 0,
            reserved2: 0,
            offset: offset as u32,
        }
        .write_to(&mut out);
        InfoHeader {
            size: INFO_HEADER_SIZE as u32,
            width,
            height,
            planes: 1,
            bit_count: bits,
            compression,
            image_size: rows.len() as u32,
            x_pixels_per_meter: PIXELS_PER_METER,
            y_pixels_per_meter: PIXELS_PER_METER,
            colors_used: (extra.len() / PALETTE_ENTRY_SIZE) as u32,
            colors_important: 0,
        }
        .write_to(&mut out);
        out.extend_from_slice(extra);
        out.extend_from_slice(rows);
        out
    }

    fn decode(data: &[u8]) -> Result<Matrix<Pixel<Bgr24>>, RasterError> {
        decode_bmp(data, None, &Unstoppable)
    }

    #[test]
    fn bottom_up_24bit_rows_are_flipped() {
        // 1x2: file row 0 is the bottom image row.
        let rows = [1, 2, 3, 0, 4, 5, 6, 0];
        let data = build(1, 2, 24, Compression::Rgb, &[], &rows);
        let image = decode(&data).unwrap();
        assert_eq!(image.row_padding(), 1);
        assert_eq!(image.get(0, 0).bytes(), &[4, 5, 6]);
        assert_eq!(image.get(1, 0).bytes(), &[1, 2, 3]);
    }

    #[test]
    fn top_down_24bit_keeps_order() {
        let rows = [1, 2, 3, 0, 4, 5, 6, 0];
        let data = build(1, -2, 24, Compression::Rgb, &[], &rows);
        let image = decode(&data).unwrap();
        assert_eq!(image.get(0, 0).bytes(), &[1, 2, 3]);
        assert_eq!(image.get(1, 0).bytes(), &[4, 5, 6]);
    }

    #[test]
    fn indexed_1bit() {
        // Palette: 0 = black, 1 = red. 3x1 image: 1, 0, 1.
        let palette = [0, 0, 0, 0, 0, 0, 255, 0];
        let rows = [0b1010_0000, 0, 0, 0];
        let data = build(3, 1, 1, Compression::Rgb, &palette, &rows);
        let image = decode(&data).unwrap();
        let red = Pixel::<Bgr24>::rgb(255, 0, 0);
        assert_eq!(image.get(0, 0), red);
        assert_eq!(image.get(0, 1), Pixel::new());
        assert_eq!(image.get(0, 2), red);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let palette = [9, 9, 9, 0, 8, 8, 8, 0];
        // 4-bit index 5 with a two-entry table.
        let rows = [0x50, 0, 0, 0];
        let data = build(1, 1, 4, Compression::Rgb, &palette, &rows);
        assert!(matches!(decode(&data), Err(RasterError::InvalidData(_))));
    }

    #[test]
    fn plain_16bit_is_555() {
        // 0x7C00 = pure red, stored little-endian.
        let rows = [0x00, 0x7C, 0xE0, 0x03];
        let data = build(2, 1, 16, Compression::Rgb, &[], &rows);
        let image = decode(&data).unwrap();
        assert_eq!(image.get(0, 0).bytes(), &[0, 0, 255]);
        assert_eq!(image.get(0, 1).bytes(), &[0, 255, 0]);
    }

    #[test]
    fn bitfield_16bit_565() {
        let mut masks = vec![];
        for m in [0xF800u32, 0x07E0, 0x001F] {
            masks.extend_from_slice(&m.to_le_bytes());
        }
        // 0x07E0 is pure green in 5-6-5.
        let rows = [0xE0, 0x07, 0, 0];
        let mut data = build(1, 1, 16, Compression::Bitfields, &masks, &rows);
        // Masks are not palette entries.
        data[46..50].copy_from_slice(&0u32.to_le_bytes());
        let image = decode(&data).unwrap();
        assert_eq!(image.get(0, 0).bytes(), &[0, 255, 0]);
    }

    #[test]
    fn bgrx_32bit_drops_fourth_byte() {
        let rows = [10, 20, 30, 99, 40, 50, 60, 0];
        let data = build(2, 1, 32, Compression::Rgb, &[], &rows);
        let image = decode(&data).unwrap();
        assert_eq!(image.get(0, 0).bytes(), &[10, 20, 30]);
        assert_eq!(image.get(0, 1).bytes(), &[40, 50, 60]);
    }

    #[test]
    fn truncated_pixel_data_is_eof() {
        let data = build(2, 2, 24, Compression::Rgb, &[], &[0; 12]);
        assert!(matches!(decode(&data), Err(RasterError::UnexpectedEof)));
    }

    #[test]
    fn header_validation() {
        let ok = build(1, 1, 24, Compression::Rgb, &[], &[0; 4]);

        let mut bad = ok.clone();
        bad[26..28].copy_from_slice(&2u16.to_le_bytes());
        assert!(matches!(decode(&bad), Err(RasterError::InvalidHeader(_))));

        let zero_width = build(0, 1, 24, Compression::Rgb, &[], &[0; 4]);
        assert!(matches!(
            decode(&zero_width),
            Err(RasterError::InvalidHeader(_))
        ));
        let zero_height = build(1, 0, 24, Compression::Rgb, &[], &[]);
        assert!(matches!(
            decode(&zero_height),
            Err(RasterError::InvalidHeader(_))
        ));

        let rle = build(1, 1, 8, Compression::Rle8, &[0; 4], &[0; 4]);
        assert!(matches!(
            decode(&rle),
            Err(RasterError::UnsupportedVariant(_))
        ));

        let depth = build(1, 1, 2, Compression::Rgb, &[0; 16], &[0; 4]);
        assert!(matches!(
            decode(&depth),
            Err(RasterError::UnsupportedVariant(_))
        ));

        let mut magic = ok;
        magic[0] = b'X';
        assert!(matches!(
            decode(&magic),
            Err(RasterError::UnrecognizedFormat)
        ));
    }

    #[test]
    fn limits_are_checked_before_decoding() {
        let data = build(4, 4, 24, Compression::Rgb, &[], &[0; 48]);
        let limits = Limits {
            max_pixels: Some(15),
            ..Limits::default()
        };
        assert!(matches!(
            decode_bmp(&data, Some(&limits), &Unstoppable),
            Err(RasterError::LimitExceeded(_))
        ));
        let limits = Limits {
            max_memory_bytes: Some(47),
            ..Limits::default()
        };
        assert!(decode_bmp(&data, Some(&limits), &Unstoppable).is_err());
    }
}
