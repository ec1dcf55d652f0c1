//! Fixed-size BMP structures: the 14-byte file header, the 40-byte
//! `BITMAPINFOHEADER` and 4-byte color table entries. All fields are
//! little-endian on disk.

use alloc::vec::Vec;

use crate::error::RasterError;

pub(crate) const FILE_HEADER_SIZE: usize = 14;
pub(crate) const INFO_HEADER_SIZE: usize = 40;
pub(crate) const PALETTE_ENTRY_SIZE: usize = 4;
/// Offset of pixel data in a file without a color table.
pub(crate) const PIXEL_DATA_OFFSET: usize = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
/// 96 DPI.
pub(crate) const PIXELS_PER_METER: i32 = 3780;

/// Value of the InfoHeader `compression` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Compression {
    /// `BI_RGB`: uncompressed.
    Rgb,
    /// `BI_RLE8`.
    Rle8,
    /// `BI_RLE4`.
    Rle4,
    /// `BI_BITFIELDS`: uncompressed with explicit channel masks.
    Bitfields,
    /// Anything else (JPEG/PNG payloads, alpha bitfields, ...).
    Other(u32),
}

impl Compression {
    pub fn from_u32(value: u32) -> Self {
        match value {
            0 => Self::Rgb,
            1 => Self::Rle8,
            2 => Self::Rle4,
            3 => Self::Bitfields,
            other => Self::Other(other),
        }
    }

    pub fn to_u32(self) -> u32 {
        match self {
            Self::Rgb => 0,
            Self::Rle8 => 1,
            Self::Rle4 => 2,
            Self::Bitfields => 3,
            Self::Other(v) => v,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FileHeader {
    pub file_size: u32,
    pub reserved1: u16,
    pub reserved2: u16,
    /// Byte offset of the pixel data.
    pub offset: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct InfoHeader {
    /// Size of this header; 40 here, larger for V4/V5 headers.
    pub size: u32,
    pub width: i32,
    /// Positive for bottom-up rows, negative for top-down.
    pub height: i32,
    pub planes: u16,
    pub bit_count: u16,
    pub compression: Compression,
    pub image_size: u32,
    pub x_pixels_per_meter: i32,
    pub y_pixels_per_meter: i32,
    pub colors_used: u32,
    pub colors_important: u32,
}

/// One color table entry, stored as blue, green, red, reserved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PaletteEntry {
    pub blue: u8,
    pub green: u8,
    pub red: u8,
    pub reserved: u8,
}

// ── Cursor over the input bytes ─────────────────────────────────────

pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn at(data: &'a [u8], pos: usize) -> Result<Self, RasterError> {
        if pos > data.len() {
            return Err(RasterError::UnexpectedEof);
        }
        Ok(Self { data, pos })
    }

    pub(crate) fn read_fixed_bytes<const N: usize>(&mut self) -> Result<[u8; N], RasterError> {
        let end = self.pos.checked_add(N).ok_or(RasterError::UnexpectedEof)?;
        let src = self
            .data
            .get(self.pos..end)
            .ok_or(RasterError::UnexpectedEof)?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(src);
        self.pos = end;
        Ok(buf)
    }

    pub(crate) fn get_u16_le(&mut self) -> Result<u16, RasterError> {
        self.read_fixed_bytes().map(u16::from_le_bytes)
    }

    pub(crate) fn get_u32_le(&mut self) -> Result<u32, RasterError> {
        self.read_fixed_bytes().map(u32::from_le_bytes)
    }

    pub(crate) fn get_i32_le(&mut self) -> Result<i32, RasterError> {
        self.read_fixed_bytes().map(i32::from_le_bytes)
    }
}

// ── Parsing ─────────────────────────────────────────────────────────

impl FileHeader {
    /// Parse the file header, checking the `BM` magic.
    pub(crate) fn parse(data: &[u8]) -> Result<Self, RasterError> {
        let mut cur = Cursor::new(data);
        let magic: [u8; 2] = cur.read_fixed_bytes()?;
        if &magic != b"BM" {
            return Err(RasterError::UnrecognizedFormat);
        }
        Ok(Self {
            file_size: cur.get_u32_le()?,
            reserved1: cur.get_u16_le()?,
            reserved2: cur.get_u16_le()?,
            offset: cur.get_u32_le()?,
        })
    }

    pub(crate) fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(b"BM");
        out.extend_from_slice(&self.file_size.to_le_bytes());
        out.extend_from_slice(&self.reserved1.to_le_bytes());
        out.extend_from_slice(&self.reserved2.to_le_bytes());
        out.extend_from_slice(&self.offset.to_le_bytes());
    }
}

impl InfoHeader {
    /// Parse the first 40 bytes of the info header at offset 14.
    ///
    /// Longer V4/V5 headers share this prefix; their extra fields are ignored.
    pub(crate) fn parse(data: &[u8]) -> Result<Self, RasterError> {
        let mut cur = Cursor::at(data, FILE_HEADER_SIZE)?;
        let size = cur.get_u32_le()?;
        if (size as usize) < INFO_HEADER_SIZE {
            return Err(RasterError::UnsupportedVariant(alloc::format!(
                "BMP info header of {size} bytes (OS/2 or core header)"
            )));
        }
        Ok(Self {
            size,
            width: cur.get_i32_le()?,
            height: cur.get_i32_le()?,
            planes: cur.get_u16_le()?,
            bit_count: cur.get_u16_le()?,
            compression: Compression::from_u32(cur.get_u32_le()?),
            image_size: cur.get_u32_le()?,
            x_pixels_per_meter: cur.get_i32_le()?,
            y_pixels_per_meter: cur.get_i32_le()?,
            colors_used: cur.get_u32_le()?,
            colors_important: cur.get_u32_le()?,
        })
    }

    pub(crate) fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.size.to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&self.planes.to_le_bytes());
        out.extend_from_slice(&self.bit_count.to_le_bytes());
        out.extend_from_slice(&self.compression.to_u32().to_le_bytes());
        out.extend_from_slice(&self.image_size.to_le_bytes());
        out.extend_from_slice(&self.x_pixels_per_meter.to_le_bytes());
        out.extend_from_slice(&self.y_pixels_per_meter.to_le_bytes());
        out.extend_from_slice(&self.colors_used.to_le_bytes());
        out.extend_from_slice(&self.colors_important.to_le_bytes());
    }

    /// Whether rows are stored first-to-last (negative height).
    pub(crate) fn is_top_down(&self) -> bool {
        self.height < 0
    }
}

impl PaletteEntry {
    pub(crate) fn parse(cur: &mut Cursor<'_>) -> Result<Self, RasterError> {
        let [blue, green, red, reserved] = cur.read_fixed_bytes()?;
        Ok(Self {
            blue,
            green,
            red,
            reserved,
        })
    }

    pub(crate) fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[self.blue, self.green, self.red, self.reserved]);
    }
}
