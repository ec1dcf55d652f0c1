//! Row layout, index packing and bitfield helpers.
//!
//! The bitfield scaling tables come from zune-bmp 0.5.2 by Caleb Etemesi
//! (MIT/Apache-2.0/Zlib).

/// Bytes in one on-disk row: `ceil(width * bits / 8)` rounded up to a
/// multiple of 4. `None` on overflow.
pub(crate) fn row_stride(width: usize, bits: u16) -> Option<usize> {
    width
        .checked_mul(usize::from(bits))
        .and_then(|b| b.checked_add(31))
        .map(|b| b / 32 * 4)
}

/// Index of pixel `col` in a packed row of `bits`-bit palette indices,
/// most significant bits first.
#[inline]
pub(crate) fn unpack_index(row: &[u8], col: usize, bits: u16) -> u8 {
    let bits = usize::from(bits);
    let per_byte = 8 / bits;
    let mask = ((1u16 << bits) - 1) as u8;
    let shift = 8 - bits * (col % per_byte + 1);
    (row[col / per_byte] >> shift) & mask
}

/// Pack `indices` into `out` at `bits` per index, most significant bits
/// first. `out` must start zeroed.
pub(crate) fn pack_indices(out: &mut [u8], bits: u16, indices: impl Iterator<Item = u8>) {
    let bits = usize::from(bits);
    let per_byte = 8 / bits;
    let mask = ((1u16 << bits) - 1) as u8;
    for (col, index) in indices.enumerate() {
        let shift = 8 - bits * (col % per_byte + 1);
        out[col / per_byte] |= (index & mask) << shift;
    }
}

/// Bitfield shift/scale table for converting N-bit values to 8-bit.
pub(crate) const MUL_TABLE: [u32; 9] = [
    0,    // 0 bits
    0xff, // 1 bit:  0b11111111
    0x55, // 2 bits: 0b01010101
    0x49, // 3 bits: 0b01001001
    0x11, // 4 bits: 0b00010001
    0x21, // 5 bits: 0b00100001
    0x41, // 6 bits: 0b01000001
    0x81, // 7 bits: 0b10000001
    0x01, // 8 bits: 0b00000001
];

pub(crate) const SHIFT_TABLE: [i32; 9] = [0, 0, 0, 1, 0, 2, 4, 6, 0];

/// Extract and scale a bitfield value to 8-bit range.
pub(crate) fn shift_signed(mut v: u32, shift: i32, mut bits: u32) -> u32 {
    if shift < 0 {
        v <<= -shift;
    } else {
        v >>= shift;
    }
    bits = bits.clamp(0, 8);
    v >>= 8 - bits;
    (v.wrapping_mul(MUL_TABLE[bits as usize])) >> SHIFT_TABLE[bits as usize]
}

/// One channel mask of a bitfield-coded pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Bitfield {
    mask: u32,
    shift: i32,
    bits: u32,
}

impl Bitfield {
    pub(crate) fn new(mask: u32) -> Self {
        Self {
            mask,
            shift: (32u32.wrapping_sub(mask.leading_zeros())).wrapping_sub(8) as i32,
            bits: mask.count_ones(),
        }
    }

    /// 8-bit value of this channel in `pixel`; 0 for an empty mask.
    #[inline]
    pub(crate) fn extract(&self, pixel: u32) -> u8 {
        if self.mask == 0 {
            return 0;
        }
        shift_signed(pixel & self.mask, self.shift, self.bits) as u8
    }
}

/// Red, green and blue masks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Bitfields {
    pub red: Bitfield,
    pub green: Bitfield,
    pub blue: Bitfield,
}

impl Bitfields {
    pub(crate) fn new(red: u32, green: u32, blue: u32) -> Self {
        Self {
            red: Bitfield::new(red),
            green: Bitfield::new(green),
            blue: Bitfield::new(blue),
        }
    }

    /// `X RRRRR GGGGG BBBBB`, the layout of uncompressed 16-bit files.
    pub(crate) fn rgb555() -> Self {
        Self::new(0x7C00, 0x03E0, 0x001F)
    }

    /// Blue, green, red of `pixel`.
    #[inline]
    pub(crate) fn bgr(&self, pixel: u32) -> [u8; 3] {
        [
            self.blue.extract(pixel),
            self.green.extract(pixel),
            self.red.extract(pixel),
        ]
    }
}

/// Pack 8-bit channels into `X RRRRR GGGGG BBBBB`, keeping the top five bits.
#[inline]
pub(crate) fn pack_rgb555(red: u8, green: u8, blue: u8) -> u16 {
    (u16::from(red >> 3) << 10) | (u16::from(green >> 3) << 5) | u16::from(blue >> 3)
}
