//! Conversion between pixel formats, for single pixels and whole matrices.
//!
//! A source format is classified by what it carries, checked in this order:
//! RGB-like (red, green and blue in any order, alpha optional), gray-like,
//! binary-like. Anything else (HSL, for example) cannot be converted and
//! yields [`RasterError::UnsupportedConversion`].

use crate::error::RasterError;
use crate::format::PixelFormat;
use crate::matrix::Matrix;
use crate::pixel::Pixel;

/// Options for matrix conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Gray levels strictly above this become `true` in binary output.
    pub threshold: u8,
    /// Alpha written to RGBA output when the source has no alpha.
    pub default_alpha: u8,
    /// Give the destination the source's row padding instead of its own.
    pub keep_row_padding: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            threshold: 127,
            default_alpha: 0xFF,
            keep_row_padding: false,
        }
    }
}

impl ConvertOptions {
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_default_alpha(mut self, alpha: u8) -> Self {
        self.default_alpha = alpha;
        self
    }

    pub fn with_keep_row_padding(mut self, keep: bool) -> Self {
        self.keep_row_padding = keep;
        self
    }
}

/// BT.601 luma, rounded half up: `(299 R + 587 G + 114 B + 500) / 1000`.
#[inline]
pub const fn luma(red: u8, green: u8, blue: u8) -> u8 {
    ((red as u32 * 299 + green as u32 * 587 + blue as u32 * 114 + 500) / 1000) as u8
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Source {
    Rgb { alpha: bool },
    Gray,
    Binary,
}

fn classify<S: PixelFormat>() -> Option<Source> {
    if S::is_rgb_like() {
        Some(Source::Rgb {
            alpha: S::is_rgba_like(),
        })
    } else if S::is_gray_like() {
        Some(Source::Gray)
    } else if S::is_binary_like() {
        Some(Source::Binary)
    } else {
        None
    }
}

fn source_kind<S: PixelFormat, D: PixelFormat>() -> Result<Source, RasterError> {
    classify::<S>().ok_or(RasterError::UnsupportedConversion {
        from: S::NAME,
        to: D::NAME,
    })
}

#[inline]
fn binary_level(value: bool) -> u8 {
    if value { 0xFF } else { 0x00 }
}

/// Gray level of any classified source pixel.
#[inline]
fn level<S: PixelFormat>(kind: Source, src: &Pixel<S>) -> u8 {
    match kind {
        Source::Rgb { .. } => luma(src.red(), src.green(), src.blue()),
        Source::Gray => src.gray(),
        Source::Binary => binary_level(src.binary()),
    }
}

#[inline]
fn rgb_of<S: PixelFormat>(kind: Source, src: &Pixel<S>) -> (u8, u8, u8) {
    match kind {
        Source::Rgb { .. } => (src.red(), src.green(), src.blue()),
        Source::Gray | Source::Binary => {
            let v = level(kind, src);
            (v, v, v)
        }
    }
}

#[inline]
fn write_gray<S: PixelFormat, D: PixelFormat>(kind: Source, dst: &mut Pixel<D>, src: &Pixel<S>) {
    dst.set_gray(level(kind, src));
}

#[inline]
fn write_rgb<S: PixelFormat, D: PixelFormat>(kind: Source, dst: &mut Pixel<D>, src: &Pixel<S>) {
    let (r, g, b) = rgb_of(kind, src);
    dst.set_rgb(r, g, b);
}

#[inline]
fn write_rgba<S: PixelFormat, D: PixelFormat>(
    kind: Source,
    dst: &mut Pixel<D>,
    src: &Pixel<S>,
    default_alpha: u8,
) {
    write_rgb(kind, dst, src);
    let alpha = match kind {
        Source::Rgb { alpha: true } => src.alpha(),
        _ => default_alpha,
    };
    dst.set_alpha(alpha);
}

#[inline]
fn write_binary<S: PixelFormat, D: PixelFormat>(
    kind: Source,
    dst: &mut Pixel<D>,
    src: &Pixel<S>,
    threshold: u8,
) {
    let value = match kind {
        Source::Binary => src.binary(),
        _ => level(kind, src) > threshold,
    };
    dst.set_binary(value);
}

/// Write the gray level of `src` into `dst`.
///
/// # Panics
///
/// If `D` has no gray channel.
pub fn to_gray<S: PixelFormat, D: PixelFormat>(
    dst: &mut Pixel<D>,
    src: &Pixel<S>,
) -> Result<(), RasterError> {
    let kind = source_kind::<S, D>()?;
    write_gray(kind, dst, src);
    Ok(())
}

/// Write red, green and blue of `src` into `dst`; other channels of `dst`
/// are left alone.
pub fn to_rgb<S: PixelFormat, D: PixelFormat>(
    dst: &mut Pixel<D>,
    src: &Pixel<S>,
) -> Result<(), RasterError> {
    let kind = source_kind::<S, D>()?;
    write_rgb(kind, dst, src);
    Ok(())
}

/// Like [`to_rgb`], also setting alpha: copied when `src` has alpha,
/// `default_alpha` otherwise.
pub fn to_rgba<S: PixelFormat, D: PixelFormat>(
    dst: &mut Pixel<D>,
    src: &Pixel<S>,
    default_alpha: u8,
) -> Result<(), RasterError> {
    let kind = source_kind::<S, D>()?;
    write_rgba(kind, dst, src, default_alpha);
    Ok(())
}

/// Binary value of `src`: its gray level compared with `> threshold`.
/// Binary sources are copied as is.
pub fn to_binary<S: PixelFormat, D: PixelFormat>(
    dst: &mut Pixel<D>,
    src: &Pixel<S>,
    threshold: u8,
) -> Result<(), RasterError> {
    let kind = source_kind::<S, D>()?;
    write_binary(kind, dst, src, threshold);
    Ok(())
}

/// Resize `dst` to `src`'s shape and fill it with `write` applied per pixel.
///
/// The capability check happens before `dst` is touched, so an unsupported
/// source leaves `dst` unchanged.
fn convert_matrix<S, D>(
    dst: &mut Matrix<Pixel<D>>,
    src: &Matrix<Pixel<S>>,
    opts: &ConvertOptions,
    write: impl Fn(Source, &mut Pixel<D>, &Pixel<S>),
) -> Result<(), RasterError>
where
    S: PixelFormat,
    D: PixelFormat,
{
    let kind = source_kind::<S, D>()?;
    let padding = if opts.keep_row_padding {
        src.row_padding()
    } else {
        dst.row_padding()
    };
    dst.resize_with_padding(src.width(), src.height(), padding);
    log::trace!(
        "convert {}x{} {} -> {}",
        src.width(),
        src.height(),
        S::NAME,
        D::NAME
    );
    dst.map_indexed(|row, col, out| {
        let px = src.get(row, col);
        write(kind, out, &px);
    });
    Ok(())
}

/// Convert every pixel of `src` to gray into `dst`.
pub fn convert_to_gray<S: PixelFormat, D: PixelFormat>(
    dst: &mut Matrix<Pixel<D>>,
    src: &Matrix<Pixel<S>>,
    opts: &ConvertOptions,
) -> Result<(), RasterError> {
    convert_matrix(dst, src, opts, write_gray)
}

/// Convert every pixel of `src` to RGB into `dst`.
pub fn convert_to_rgb<S: PixelFormat, D: PixelFormat>(
    dst: &mut Matrix<Pixel<D>>,
    src: &Matrix<Pixel<S>>,
    opts: &ConvertOptions,
) -> Result<(), RasterError> {
    convert_matrix(dst, src, opts, write_rgb)
}

/// Convert every pixel of `src` to RGBA into `dst`, using
/// `opts.default_alpha` where the source has no alpha.
pub fn convert_to_rgba<S: PixelFormat, D: PixelFormat>(
    dst: &mut Matrix<Pixel<D>>,
    src: &Matrix<Pixel<S>>,
    opts: &ConvertOptions,
) -> Result<(), RasterError> {
    let alpha = opts.default_alpha;
    convert_matrix(dst, src, opts, move |kind, out, px| {
        write_rgba(kind, out, px, alpha)
    })
}

/// Threshold every pixel of `src` into `dst` at `opts.threshold`.
pub fn convert_to_binary<S: PixelFormat, D: PixelFormat>(
    dst: &mut Matrix<Pixel<D>>,
    src: &Matrix<Pixel<S>>,
    opts: &ConvertOptions,
) -> Result<(), RasterError> {
    let threshold = opts.threshold;
    convert_matrix(dst, src, opts, move |kind, out, px| {
        write_binary(kind, out, px, threshold)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{Argb32, Bgr24, Binary, Gray, Hsl24, Rgb24, Rgba32, Rgbx32};

    #[test]
    fn luma_rounds_half_up() {
        assert_eq!(luma(95, 5, 15), 33);
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 255, 255), 255);
        // 299 * 2 = 598 -> 1.098 rounds to 1
        assert_eq!(luma(2, 0, 0), 1);
    }

    #[test]
    fn rgb_to_gray() {
        let src = Pixel::<Bgr24>::rgb(95, 5, 15);
        let mut dst = Pixel::<Gray>::new();
        to_gray(&mut dst, &src).unwrap();
        assert_eq!(dst.gray(), 33);
    }

    #[test]
    fn gray_rgb_round_trip_is_idempotent() {
        let p = Pixel::<Rgb24>::rgb(200, 17, 90);
        let mut g = Pixel::<Gray>::new();
        let mut once = Pixel::<Rgb24>::new();
        to_gray(&mut g, &p).unwrap();
        to_rgb(&mut once, &g).unwrap();

        let mut twice = Pixel::<Rgb24>::new();
        to_gray(&mut g, &once).unwrap();
        to_rgb(&mut twice, &g).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.red(), once.blue());
    }

    #[test]
    fn binary_threshold_is_strict() {
        let mut out = Pixel::<Binary>::new();
        to_binary(&mut out, &Pixel::<Gray>::from_u64(127), 127).unwrap();
        assert!(!out.binary());
        to_binary(&mut out, &Pixel::<Gray>::from_u64(128), 127).unwrap();
        assert!(out.binary());

        to_binary(&mut out, &Pixel::<Rgb24>::rgb(255, 255, 255), 254).unwrap();
        assert!(out.binary());
        to_binary(&mut out, &Pixel::<Rgb24>::rgb(95, 5, 15), 33).unwrap();
        assert!(!out.binary());
    }

    #[test]
    fn binary_source_expands_to_full_range() {
        let mut on = Pixel::<Binary>::new();
        on.set_binary(true);

        let mut rgb = Pixel::<Bgr24>::new();
        to_rgb(&mut rgb, &on).unwrap();
        assert_eq!(rgb.bytes(), &[0xFF, 0xFF, 0xFF]);

        let mut gray = Pixel::<Gray>::new();
        to_gray(&mut gray, &Pixel::<Binary>::new()).unwrap();
        assert_eq!(gray.gray(), 0);
    }

    #[test]
    fn alpha_is_kept_or_defaulted() {
        let src = Pixel::<Argb32>::from_u64(0x80_01_02_03);
        let mut dst = Pixel::<Rgba32>::new();
        to_rgba(&mut dst, &src, 0xFF).unwrap();
        assert_eq!(dst.bytes(), &[1, 2, 3, 0x80]);

        to_rgba(&mut dst, &Pixel::<Rgbx32>::rgb(4, 5, 6), 0xFF).unwrap();
        assert_eq!(dst.bytes(), &[4, 5, 6, 0xFF]);

        to_rgba(&mut dst, &Pixel::<Gray>::from_u64(9), 0).unwrap();
        assert_eq!(dst.bytes(), &[9, 9, 9, 0]);
    }

    #[test]
    fn hsl_is_unsupported() {
        let mut dst = Pixel::<Rgb24>::new();
        let err = to_rgb(&mut dst, &Pixel::<Hsl24>::new()).unwrap_err();
        assert!(matches!(
            err,
            RasterError::UnsupportedConversion {
                from: "HSL",
                to: "RGB"
            }
        ));
    }

    #[test]
    fn matrix_conversion_resizes_destination() {
        let src = Matrix::from_fn(3, 2, |row, col| {
            Pixel::<Rgb24>::rgb((row * 100) as u8, (col * 50) as u8, 0)
        });
        let mut dst: Matrix<Pixel<Gray>> = Matrix::new(1, 1);
        convert_to_gray(&mut dst, &src, &ConvertOptions::default()).unwrap();
        assert_eq!((dst.width(), dst.height()), (3, 2));
        assert_eq!(dst.get(1, 2).gray(), luma(100, 100, 0));
    }

    #[test]
    fn matrix_conversion_padding_option() {
        let src: Matrix<Pixel<Bgr24>> = Matrix::with_padding(5, 2, 1);
        let mut dst: Matrix<Pixel<Rgb24>> = Matrix::with_padding(1, 1, 3);

        convert_to_rgb(&mut dst, &src, &ConvertOptions::default()).unwrap();
        assert_eq!(dst.row_padding(), 3);

        let keep = ConvertOptions::default().with_keep_row_padding(true);
        convert_to_rgb(&mut dst, &src, &keep).unwrap();
        assert_eq!(dst.row_padding(), 1);
    }

    #[test]
    fn matrix_conversion_fails_without_touching_destination() {
        let src: Matrix<Pixel<Hsl24>> = Matrix::new(4, 4);
        let mut dst: Matrix<Pixel<Gray>> = Matrix::new(2, 2);
        dst.fill(Pixel::from_u64(7));
        let before = dst.clone();
        assert!(convert_to_gray(&mut dst, &src, &ConvertOptions::default()).is_err());
        assert_eq!(dst, before);
    }

    #[test]
    fn matrix_rgba_and_binary_use_options() {
        let src = Matrix::from_fn(2, 1, |_, col| Pixel::<Gray>::from_u64(col as u64 * 200));
        let opts = ConvertOptions::default()
            .with_default_alpha(0x40)
            .with_threshold(100);

        let mut rgba: Matrix<Pixel<Rgba32>> = Matrix::default();
        convert_to_rgba(&mut rgba, &src, &opts).unwrap();
        assert_eq!(rgba.get(0, 1).bytes(), &[200, 200, 200, 0x40]);

        let mut bin: Matrix<Pixel<Binary>> = Matrix::default();
        convert_to_binary(&mut bin, &src, &opts).unwrap();
        assert!(!bin.get(0, 0).binary());
        assert!(bin.get(0, 1).binary());
    }
}
