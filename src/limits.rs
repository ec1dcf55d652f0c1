use crate::error::RasterError;
use crate::matrix::{Element, checked_byte_size};

/// Caps on what a decode may allocate. Each `None` field is unlimited,
/// which is the default.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes of the output matrix buffer, row padding included.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Reject header dimensions before any pixel data is looked at.
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), RasterError> {
        let (w, h) = (u64::from(width), u64::from(height));
        within("width", w, self.max_width)?;
        within("height", h, self.max_height)?;
        within("pixel count", w * h, self.max_pixels)
    }

    /// Byte size of a `width` x `height` matrix of `T` whose rows carry
    /// `row_padding` extra bytes, checked against `max_memory_bytes`.
    pub(crate) fn check_matrix<T: Element>(
        &self,
        width: usize,
        height: usize,
        row_padding: usize,
    ) -> Result<usize, RasterError> {
        let bytes = checked_byte_size(T::SIZE, width, height, row_padding).ok_or_else(|| {
            RasterError::DimensionsTooLarge {
                width: u32::try_from(width).unwrap_or(u32::MAX),
                height: u32::try_from(height).unwrap_or(u32::MAX),
            }
        })?;
        within("matrix size in bytes", bytes as u64, self.max_memory_bytes)?;
        Ok(bytes)
    }
}

fn within(what: &str, value: u64, limit: Option<u64>) -> Result<(), RasterError> {
    match limit {
        Some(max) if value > max => Err(RasterError::LimitExceeded(alloc::format!(
            "{what} {value} exceeds limit {max}"
        ))),
        _ => Ok(()),
    }
}
