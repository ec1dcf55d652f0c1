//! Color tables for indexed BMP output.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::error::RasterError;
use crate::format::PixelFormat;
use crate::matrix::Matrix;
use crate::pixel::Pixel;

/// Largest table an 8-bit index can address.
pub const MAX_PALETTE_LEN: usize = 256;

/// Distinct colors in first-seen order.
///
/// A color's index is its position in the table and never changes once
/// assigned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette<F: PixelFormat> {
    colors: Vec<Pixel<F>>,
    lookup: BTreeMap<u64, u8>,
}

impl<F: PixelFormat> Default for Palette<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: PixelFormat> Palette<F> {
    pub fn new() -> Self {
        Self {
            colors: Vec::new(),
            lookup: BTreeMap::new(),
        }
    }

    /// Palette holding `colors` in order. Later duplicates keep the index of
    /// the first occurrence.
    pub fn from_colors(colors: &[Pixel<F>]) -> Result<Self, RasterError> {
        let mut palette = Self::new();
        for &px in colors {
            palette.insert(px, MAX_PALETTE_LEN)?;
        }
        Ok(palette)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Pixel<F>] {
        &self.colors
    }

    pub fn get(&self, index: u8) -> Option<Pixel<F>> {
        self.colors.get(usize::from(index)).copied()
    }

    pub fn index_of(&self, color: Pixel<F>) -> Option<u8> {
        self.lookup.get(&color.to_u64()).copied()
    }

    /// Index of `color`, appending it if new. Fails once the table would
    /// grow past `capacity` entries.
    pub fn insert(&mut self, color: Pixel<F>, capacity: usize) -> Result<u8, RasterError> {
        let key = color.to_u64();
        if let Some(&index) = self.lookup.get(&key) {
            return Ok(index);
        }
        let capacity = capacity.min(MAX_PALETTE_LEN);
        if self.colors.len() >= capacity {
            return Err(RasterError::PaletteOverflow {
                colors: self.colors.len() + 1,
                capacity,
            });
        }
        let index = self.colors.len() as u8;
        self.colors.push(color);
        self.lookup.insert(key, index);
        Ok(index)
    }
}

/// Build a palette of the colors in `image` and the matching index matrix.
///
/// Pixels are scanned row by row, left to right; each new color gets the next
/// free index. Fails with [`RasterError::PaletteOverflow`] as soon as more
/// than `capacity` distinct colors are seen (`capacity` is capped at 256).
pub fn generate_palette<F: PixelFormat>(
    image: &Matrix<Pixel<F>>,
    capacity: usize,
) -> Result<(Matrix<u8>, Palette<F>), RasterError> {
    let mut palette = Palette::new();
    let mut indices = Matrix::new(image.width(), image.height());
    for row in 0..image.height() {
        for (col, px) in image.row(row).enumerate() {
            let index = palette.insert(px, capacity)?;
            indices.set(row, col, index);
        }
    }
    log::debug!(
        "palette of {} colors for {}x{} image",
        palette.len(),
        image.width(),
        image.height()
    );
    Ok((indices, palette))
}
