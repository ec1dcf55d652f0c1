use alloc::vec::Vec;

use enough::Stop;

use crate::bmp::{self, BmpFormat, EncodeSettings};
use crate::convert::ConvertOptions;
use crate::error::RasterError;
use crate::format::{Bgr24, PixelFormat};
use crate::matrix::Matrix;
use crate::pixel::Pixel;

/// BMP encode builder.
///
/// ```
/// use zenraster::{EncodeRequest, Matrix, Pixel, Unstoppable};
/// use zenraster::bmp::BmpFormat;
/// use zenraster::format::{Bgr24, Gray};
///
/// let image = Matrix::from_fn(4, 4, |row, col| Pixel::<Gray>::from_u64((row * 4 + col) as u64 * 16));
/// let data = EncodeRequest::new(BmpFormat::Binary)
///     .with_binary_palette(Pixel::<Bgr24>::rgb(0, 0, 64), Pixel::rgb(255, 255, 255))
///     .encode(&image, Unstoppable)?;
/// assert_eq!(&data[..2], b"BM");
/// # Ok::<(), zenraster::RasterError>(())
/// ```
#[derive(Clone, Debug)]
pub struct EncodeRequest {
    format: BmpFormat,
    settings: EncodeSettings,
}

impl EncodeRequest {
    pub fn new(format: BmpFormat) -> Self {
        Self {
            format,
            settings: EncodeSettings::default(),
        }
    }

    /// Colors for `false` and `true` pixels in [`BmpFormat::Binary`] output.
    /// Defaults to black and white.
    pub fn with_binary_palette(mut self, zero: Pixel<Bgr24>, one: Pixel<Bgr24>) -> Self {
        self.settings.binary_palette = [zero, one];
        self
    }

    /// Threshold and default alpha used when converting the source.
    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.settings.options = options;
        self
    }

    pub fn format(&self) -> BmpFormat {
        self.format
    }

    pub fn encode<F: PixelFormat>(
        &self,
        image: &Matrix<Pixel<F>>,
        stop: impl Stop,
    ) -> Result<Vec<u8>, RasterError> {
        bmp::encode_bmp(image, self.format, &self.settings, &stop)
    }

    /// Encode and write to `path`. Nothing is written if encoding fails.
    #[cfg(feature = "std")]
    pub fn encode_to_file<F: PixelFormat>(
        &self,
        image: &Matrix<Pixel<F>>,
        path: impl AsRef<std::path::Path>,
        stop: impl Stop,
    ) -> Result<(), RasterError> {
        let data = self.encode(image, stop)?;
        std::fs::write(path, data)?;
        Ok(())
    }
}
