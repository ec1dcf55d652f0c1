//! Row-major matrix over a flat byte buffer with explicit per-row padding.
//!
//! Row `r` starts at byte `r * (T::SIZE * width + row_padding)`. The padding
//! lets a matrix carry file-format alignment (BMP rows are multiples of 4
//! bytes) so whole rows can be copied to and from disk unchanged.

use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;
use core::ops::Add;

use crate::error::RasterError;
use crate::format::PixelFormat;
use crate::pixel::Pixel;

/// A value that can live in a [`Matrix`]: fixed size, plain bytes.
pub trait Element: Copy + Default {
    /// Bytes occupied by one element.
    const SIZE: usize;

    /// Read an element from the first `SIZE` bytes of `bytes`.
    fn read(bytes: &[u8]) -> Self;

    /// Write this element into the first `SIZE` bytes of `bytes`.
    fn write(self, bytes: &mut [u8]);
}

impl<F: PixelFormat> Element for Pixel<F> {
    const SIZE: usize = F::LEN;

    #[inline]
    fn read(bytes: &[u8]) -> Self {
        let mut raw = F::Bytes::default();
        raw.as_mut().copy_from_slice(&bytes[..F::LEN]);
        Pixel::from_bytes(raw)
    }

    #[inline]
    fn write(self, bytes: &mut [u8]) {
        bytes[..F::LEN].copy_from_slice(self.bytes());
    }
}

macro_rules! numeric_elements {
    ($($t:ty),+) => {
        $(
            impl Element for $t {
                const SIZE: usize = core::mem::size_of::<$t>();

                #[inline]
                fn read(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; core::mem::size_of::<$t>()];
                    raw.copy_from_slice(&bytes[..Self::SIZE]);
                    <$t>::from_ne_bytes(raw)
                }

                #[inline]
                fn write(self, bytes: &mut [u8]) {
                    bytes[..Self::SIZE].copy_from_slice(&self.to_ne_bytes());
                }
            }
        )+
    };
}

numeric_elements!(u8, u16, u32, u64, usize, i8, i16, i32, i64, f32, f64);

#[cold]
#[track_caller]
fn capacity_overflow() -> ! {
    panic!("matrix size overflows usize")
}

/// Byte length of a `width` x `height` matrix with `row_padding`, or `None`
/// if it does not fit in `usize`.
pub(crate) fn checked_byte_size(
    element: usize,
    width: usize,
    height: usize,
    row_padding: usize,
) -> Option<usize> {
    if width == 0 || height == 0 {
        return Some(0);
    }
    element
        .checked_mul(width)
        .and_then(|w| w.checked_add(row_padding))
        .and_then(|stride| stride.checked_mul(height))
}

fn byte_size(element: usize, width: usize, height: usize, row_padding: usize) -> usize {
    checked_byte_size(element, width, height, row_padding).unwrap_or_else(|| capacity_overflow())
}

/// Owned 2-D array of `T` stored row-major in one byte buffer.
///
/// The buffer is empty exactly when `width` or `height` is zero. Cloning
/// copies the buffer; [`Matrix::take`] moves it out and leaves an empty
/// matrix behind.
pub struct Matrix<T: Element> {
    width: usize,
    height: usize,
    row_padding: usize,
    data: Vec<u8>,
    element: PhantomData<T>,
}

impl<T: Element> Matrix<T> {
    /// Zero-filled `width` x `height` matrix without row padding.
    #[track_caller]
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_padding(width, height, 0)
    }

    /// Zero-filled matrix whose rows are followed by `row_padding` bytes.
    #[track_caller]
    pub fn with_padding(width: usize, height: usize, row_padding: usize) -> Self {
        let size = byte_size(T::SIZE, width, height, row_padding);
        Self {
            width,
            height,
            row_padding,
            data: alloc::vec![0u8; size],
            element: PhantomData,
        }
    }

    /// Matrix filled by calling `f(row, col)` for every element.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut m = Self::new(width, height);
        m.map_indexed(|row, col, v| *v = f(row, col));
        m
    }

    /// Whether the matrix holds any elements.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.data.is_empty()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes after each row.
    #[inline]
    pub fn row_padding(&self) -> usize {
        self.row_padding
    }

    /// Bytes from the start of one row to the start of the next.
    #[inline]
    pub fn stride(&self) -> usize {
        T::SIZE * self.width + self.row_padding
    }

    /// Buffer length in bytes: `stride * height`, or 0 when empty.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// The whole buffer, padding included.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Element bytes of `row`, without its padding.
    #[track_caller]
    pub fn row_bytes(&self, row: usize) -> &[u8] {
        let start = row * self.stride();
        &self.data[start..start + T::SIZE * self.width]
    }

    #[track_caller]
    pub fn row_bytes_mut(&mut self, row: usize) -> &mut [u8] {
        let start = row * self.stride();
        let len = T::SIZE * self.width;
        &mut self.data[start..start + len]
    }

    /// Element bytes of `row` followed by its padding.
    #[track_caller]
    pub fn padded_row_bytes(&self, row: usize) -> &[u8] {
        let stride = self.stride();
        &self.data[row * stride..(row + 1) * stride]
    }

    /// Iterate the elements of `row` left to right.
    #[track_caller]
    pub fn row(&self, row: usize) -> impl Iterator<Item = T> + '_ {
        self.row_bytes(row).chunks_exact(T::SIZE).map(T::read)
    }

    /// Iterate all elements in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.height).flat_map(move |row| self.row(row))
    }

    /// Change the shape. Contents are not carried over: the buffer is
    /// zero-filled at the new size. Row padding is kept.
    #[track_caller]
    pub fn resize(&mut self, width: usize, height: usize) {
        self.resize_with_padding(width, height, self.row_padding);
    }

    /// Change the shape and row padding, zero-filling the buffer.
    #[track_caller]
    pub fn resize_with_padding(&mut self, width: usize, height: usize, row_padding: usize) {
        let size = byte_size(T::SIZE, width, height, row_padding);
        self.width = width;
        self.height = height;
        self.row_padding = row_padding;
        self.data.clear();
        self.data.resize(size, 0);
        if size == 0 {
            self.data.shrink_to_fit();
        }
    }

    /// Change the row padding in place, keeping every element.
    ///
    /// Each row moves together with the first `min(old, new)` padding bytes;
    /// padding bytes added by growing are zero. Growing moves rows from the
    /// last to the first, shrinking from the first to the last, so no row is
    /// overwritten before it has been moved.
    #[track_caller]
    pub fn set_row_padding(&mut self, row_padding: usize) {
        let old = self.row_padding;
        if row_padding == old {
            return;
        }
        if !self.is_valid() {
            self.row_padding = row_padding;
            return;
        }

        let row_len = T::SIZE * self.width;
        let old_stride = row_len + old;
        let new_stride = row_len + row_padding;
        let kept = row_len + old.min(row_padding);
        let new_size = byte_size(T::SIZE, self.width, self.height, row_padding);

        if row_padding > old {
            self.data.resize(new_size, 0);
            for row in (0..self.height).rev() {
                let src = row * old_stride;
                let dst = row * new_stride;
                self.data.copy_within(src..src + kept, dst);
                self.data[dst + kept..dst + new_stride].fill(0);
            }
        } else {
            for row in 0..self.height {
                let src = row * old_stride;
                let dst = row * new_stride;
                self.data.copy_within(src..src + kept, dst);
            }
            self.data.truncate(new_size);
        }
        self.row_padding = row_padding;
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        row * self.stride() + col * T::SIZE
    }

    /// Bounds-checked read.
    pub fn at(&self, row: usize, col: usize) -> Result<T, RasterError> {
        self.check_index(row, col)?;
        Ok(self.get(row, col))
    }

    /// Bounds-checked write.
    pub fn try_set(&mut self, row: usize, col: usize, value: T) -> Result<(), RasterError> {
        self.check_index(row, col)?;
        self.set(row, col, value);
        Ok(())
    }

    fn check_index(&self, row: usize, col: usize) -> Result<(), RasterError> {
        if row >= self.height || col >= self.width {
            return Err(RasterError::IndexOutOfRange {
                row,
                col,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Read without the index check of [`Matrix::at`].
    ///
    /// Debug builds assert `col < width`. Release builds skip that check, so
    /// a column past the row end reads into the padding or the next row. An
    /// offset past the buffer panics in every build.
    #[inline]
    #[track_caller]
    pub fn get(&self, row: usize, col: usize) -> T {
        debug_assert!(col < self.width, "column {col} out of range");
        let off = self.offset(row, col);
        T::read(&self.data[off..off + T::SIZE])
    }

    /// Write without the index check of [`Matrix::try_set`].
    #[inline]
    #[track_caller]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        debug_assert!(col < self.width, "column {col} out of range");
        let off = self.offset(row, col);
        value.write(&mut self.data[off..off + T::SIZE]);
    }

    /// Set every element to `value`, leaving padding untouched.
    pub fn fill(&mut self, value: T) {
        self.map(|v| *v = value);
    }

    /// Apply `f` to every element in row-major order.
    pub fn map(&mut self, mut f: impl FnMut(&mut T)) {
        self.map_indexed(|_, _, v| f(v));
    }

    /// Like [`Matrix::map`], also passing `(row, col)`.
    pub fn map_indexed(&mut self, mut f: impl FnMut(usize, usize, &mut T)) {
        let stride = self.stride();
        let row_len = T::SIZE * self.width;
        if stride == 0 || row_len == 0 {
            return;
        }
        for (row, bytes) in self.data.chunks_exact_mut(stride).enumerate() {
            for (col, cell) in bytes[..row_len].chunks_exact_mut(T::SIZE).enumerate() {
                let mut value = T::read(cell);
                f(row, col, &mut value);
                value.write(cell);
            }
        }
    }

    /// Sum `f(element)` over all elements in row-major order, starting from
    /// `A::default()`.
    pub fn reduce<A>(&self, mut f: impl FnMut(T) -> A) -> A
    where
        A: Add<Output = A> + Default,
    {
        self.reduce_indexed(|_, _, v| f(v))
    }

    /// Like [`Matrix::reduce`], also passing `(row, col)`.
    pub fn reduce_indexed<A>(&self, mut f: impl FnMut(usize, usize, T) -> A) -> A
    where
        A: Add<Output = A> + Default,
    {
        let mut acc = A::default();
        for row in 0..self.height {
            for (col, value) in self.row(row).enumerate() {
                acc = acc + f(row, col, value);
            }
        }
        acc
    }

    /// Move the contents out, leaving `self` empty (0 x 0, no padding).
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }

    /// Copy into an [`imgref::ImgVec`] of typed pixels.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec<P>(&self) -> imgref::ImgVec<P>
    where
        T: Into<P>,
    {
        let buf: Vec<P> = self.iter().map(Into::into).collect();
        imgref::ImgVec::new(buf, self.width, self.height)
    }

    /// Copy from an [`imgref::ImgRef`] of typed pixels, without row padding.
    #[cfg(feature = "imgref")]
    pub fn from_imgref<P>(img: imgref::ImgRef<'_, P>) -> Self
    where
        P: Copy + Into<T>,
    {
        let mut m = Self::new(img.width(), img.height());
        for (row, pixels) in img.rows().enumerate() {
            for (col, &px) in pixels.iter().enumerate() {
                m.set(row, col, px.into());
            }
        }
        m
    }
}

impl<T: Element> Default for Matrix<T> {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            row_padding: 0,
            data: Vec::new(),
            element: PhantomData,
        }
    }
}

impl<T: Element> Clone for Matrix<T> {
    fn clone(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            row_padding: self.row_padding,
            data: self.data.clone(),
            element: PhantomData,
        }
    }
}

impl<T: Element> PartialEq for Matrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.row_padding == other.row_padding
            && self.data == other.data
    }
}

impl<T: Element> Eq for Matrix<T> {}

impl<T: Element> fmt::Debug for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("row_padding", &self.row_padding)
            .field("size", &self.data.len())
            .finish()
    }
}

/// Padding needed to round `len` up to a multiple of `align`.
pub const fn padding(len: usize, align: usize) -> usize {
    (align - (len % align)) % align
}
