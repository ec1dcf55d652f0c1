//! Simple drawing on a [`Matrix`].
//!
//! Coordinates are signed `(x, y)` = `(col, row)` pairs so shapes may extend
//! past the border; anything outside the matrix is clipped.

use crate::matrix::{Element, Matrix};

/// Draws into a borrowed matrix with one value.
pub struct Painter<'a, T: Element> {
    target: &'a mut Matrix<T>,
    value: T,
}

impl<'a, T: Element> Painter<'a, T> {
    /// Painter drawing `value` into `target`.
    pub fn new(target: &'a mut Matrix<T>, value: T) -> Self {
        Self { target, value }
    }

    /// Change the value used by later calls.
    pub fn set_value(&mut self, value: T) -> &mut Self {
        self.value = value;
        self
    }

    pub fn value(&self) -> T {
        self.value
    }

    /// Set every element.
    pub fn fill(&mut self) -> &mut Self {
        self.target.fill(self.value);
        self
    }

    /// Set one element; does nothing outside the matrix.
    pub fn draw_point(&mut self, x: isize, y: isize) -> &mut Self {
        self.plot(x as i128, y as i128);
        self
    }

    /// Straight line from `(x1, y1)` to `(x2, y2)`, both ends included.
    ///
    /// Only the steps that land inside the matrix are visited, so endpoints
    /// may be arbitrarily far away.
    pub fn draw_line(&mut self, x1: isize, y1: isize, x2: isize, y2: isize) -> &mut Self {
        let (width, height) = (self.target.width(), self.target.height());
        if x1.abs_diff(x2) >= y1.abs_diff(y2) {
            walk_line(x1, y1, x2, y2, width, |x, y| self.plot(x, y));
        } else {
            walk_line(y1, x1, y2, x2, height, |y, x| self.plot(x, y));
        }
        self
    }

    /// One-pixel outline of the `width` x `height` rectangle at `(x, y)`.
    pub fn draw_rect(&mut self, x: isize, y: isize, width: usize, height: usize) -> &mut Self {
        if width == 0 || height == 0 {
            return self;
        }
        let right = x.saturating_add(isize::try_from(width - 1).unwrap_or(isize::MAX));
        let bottom = y.saturating_add(isize::try_from(height - 1).unwrap_or(isize::MAX));
        self.draw_line(x, y, right, y)
            .draw_line(x, bottom, right, bottom)
            .draw_line(x, y, x, bottom)
            .draw_line(right, y, right, bottom)
    }

    /// Filled `width` x `height` rectangle at `(x, y)`.
    pub fn fill_rect(&mut self, x: isize, y: isize, width: usize, height: usize) -> &mut Self {
        let Some((col0, col1)) = clip(x, width, self.target.width()) else {
            return self;
        };
        let Some((row0, row1)) = clip(y, height, self.target.height()) else {
            return self;
        };
        for row in row0..row1 {
            for col in col0..col1 {
                self.target.set(row, col, self.value);
            }
        }
        self
    }

    #[inline]
    fn plot(&mut self, x: i128, y: i128) {
        let (Ok(col), Ok(row)) = (usize::try_from(x), usize::try_from(y)) else {
            return;
        };
        if col < self.target.width() && row < self.target.height() {
            self.target.set(row, col, self.value);
        }
    }
}

/// Bresenham along the major axis `a` (the one with the larger span).
///
/// The error term after `k` steps has a closed form, so the walk starts at
/// the first step with `a` in `[0, limit)` and stops after the last one.
/// `plot` receives `(a, b)`.
fn walk_line(
    a1: isize,
    b1: isize,
    a2: isize,
    b2: isize,
    limit: usize,
    mut plot: impl FnMut(i128, i128),
) {
    if limit == 0 {
        return;
    }
    let da = a1.abs_diff(a2) as u128;
    let db = b1.abs_diff(b2) as u128;
    let sa: i128 = if a2 > a1 { 1 } else { -1 };
    let sb: i128 = if b2 > b1 { 1 } else { -1 };
    let (a1, b1) = (a1 as i128, b1 as i128);
    let last = limit as i128 - 1;

    let (first, end) = if sa > 0 { (-a1, last - a1) } else { (a1 - last, a1) };
    let first = first.max(0);
    let end = end.min(da as i128);
    if first > end {
        return;
    }
    // b advances once per step where `err = da / 2 - k * db (mod da)` wraps.
    let bias = da.saturating_sub(1) - da / 2;
    for k in first as u128..=end as u128 {
        let n = if da == 0 { 0 } else { (k * db + bias) / da };
        plot(a1 + sa * k as i128, b1 + sb * n as i128);
    }
}

/// Visible `[start, end)` of a span of `len` starting at `start`.
fn clip(start: isize, len: usize, limit: usize) -> Option<(usize, usize)> {
    let end = start.saturating_add(isize::try_from(len).unwrap_or(isize::MAX));
    let lo = start.max(0) as usize;
    let hi = (end.max(0) as usize).min(limit);
    (lo < hi).then_some((lo, hi))
}
