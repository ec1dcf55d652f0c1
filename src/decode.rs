use enough::Stop;

use crate::bmp;
use crate::error::RasterError;
use crate::format::Bgr24;
use crate::limits::Limits;
use crate::matrix::Matrix;
use crate::pixel::Pixel;

/// BMP decode builder.
///
/// ```no_run
/// use zenraster::{DecodeRequest, Limits, Unstoppable};
///
/// let data: &[u8] = &[]; // your BMP bytes
/// let limits = Limits { max_pixels: Some(1 << 24), ..Limits::default() };
/// let image = DecodeRequest::new(data).with_limits(&limits).decode(Unstoppable)?;
/// println!("{}x{}", image.width(), image.height());
/// # Ok::<(), zenraster::RasterError>(())
/// ```
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, limits: None }
    }

    /// Reject images over these limits before allocating pixel storage.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn decode(self, stop: impl Stop) -> Result<Matrix<Pixel<Bgr24>>, RasterError> {
        bmp::decode_bmp(self.data, self.limits, &stop)
    }

    /// Read and decode a file.
    #[cfg(feature = "std")]
    pub fn decode_file(
        path: impl AsRef<std::path::Path>,
        limits: Option<&Limits>,
        stop: impl Stop,
    ) -> Result<Matrix<Pixel<Bgr24>>, RasterError> {
        let data = bmp::read_file(path.as_ref())?;
        bmp::decode_bmp(&data, limits, &stop)
    }
}
