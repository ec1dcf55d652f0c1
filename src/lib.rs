//! # zenraster
//!
//! Typed pixel formats, a row-padded pixel matrix, format conversion, and a
//! BMP codec built on them.
//!
//! ## Model
//!
//! - [`format`]: pixel formats as ordered lists of one-byte channels
//!   (`BGR`, `RGBA`, `Y`, binary, ...), each a zero-sized marker type.
//! - [`Pixel<F>`]: `F::LEN` bytes with named channel accessors and a
//!   big-endian integer view.
//! - [`Matrix<T>`]: row-major storage with explicit padding after every row,
//!   so file-format row alignment can be kept in memory.
//! - [`convert`]: gray, RGB, RGBA and binary conversion between any formats
//!   that carry the needed channels.
//! - [`Painter`]: points, lines and rectangles on a matrix.
//!
//! ## BMP
//!
//! Decoding handles uncompressed 1/4/8-bit indexed, 16-bit (5-5-5 and
//! bitfields), 24-bit and 32-bit files, bottom-up or top-down, and always
//! yields a BGR24 matrix. Encoding writes 24-bit, 16-bit, 32-bit BGRA,
//! indexed (palette built from the image in first-seen order) and
//! thresholded 1-bit output. RLE compression is not supported.
//!
//! ## Usage
//!
//! ```no_run
//! use zenraster::{DecodeRequest, EncodeRequest, Unstoppable};
//! use zenraster::bmp::BmpFormat;
//!
//! let data: &[u8] = &[]; // your BMP bytes
//!
//! // Probe without decoding
//! let info = zenraster::bmp::probe(data)?;
//! println!("{}x{} {}-bit", info.width, info.height, info.bit_count);
//!
//! let image = DecodeRequest::new(data).decode(Unstoppable)?;
//! let indexed = EncodeRequest::new(BmpFormat::Indexed).encode(&image, Unstoppable)?;
//! # Ok::<(), zenraster::RasterError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod error;
mod info;
mod limits;
mod matrix;
mod paint;
mod pixel;

pub mod bmp;
pub mod convert;
pub mod format;

mod decode;
mod encode;

// Re-exports
pub use convert::ConvertOptions;
pub use decode::DecodeRequest;
pub use encode::EncodeRequest;
pub use enough::{Stop, Unstoppable};
pub use error::RasterError;
pub use format::{Channel, PixelFormat};
pub use info::ImageInfo;
pub use limits::Limits;
pub use matrix::{Element, Matrix, padding};
pub use paint::Painter;
pub use pixel::Pixel;
