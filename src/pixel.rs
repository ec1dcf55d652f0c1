//! Fixed-size pixels tagged with a [`PixelFormat`].

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use crate::format::{Channel, PixelFormat};

/// One pixel: `F::LEN` bytes laid out in `F`'s channel order.
///
/// Channel getters and setters panic when `F` lacks the channel. The format is
/// a type parameter, so such a call is a construction-time mistake rather than
/// bad input; use [`Pixel::try_get`]/[`Pixel::try_set`] for a checked form.
#[repr(transparent)]
pub struct Pixel<F: PixelFormat> {
    bytes: F::Bytes,
    format: PhantomData<F>,
}

#[cold]
#[track_caller]
fn channel_absent<F: PixelFormat>(channel: Channel) -> ! {
    panic!("{} pixel has no {:?} channel", F::NAME, channel)
}

macro_rules! channel_accessors {
    ($($(#[$meta:meta])* $channel:ident => $get:ident, $set:ident;)+) => {
        $(
            $(#[$meta])*
            #[inline]
            #[track_caller]
            pub fn $get(&self) -> u8 {
                self.get(Channel::$channel)
            }

            #[inline]
            #[track_caller]
            pub fn $set(&mut self, value: u8) {
                self.set(Channel::$channel, value)
            }
        )+
    };
}

impl<F: PixelFormat> Pixel<F> {
    /// All-zero pixel.
    #[inline]
    pub fn new() -> Self {
        Self::from_bytes(F::Bytes::default())
    }

    #[inline]
    pub fn from_bytes(bytes: F::Bytes) -> Self {
        Self {
            bytes,
            format: PhantomData,
        }
    }

    /// Build a pixel from an integer whose most significant used byte is the
    /// first channel: `Pixel::<Rgb24>::from_u64(0x112233)` has red `0x11`.
    ///
    /// Bits above `8 * F::LEN` are ignored.
    pub fn from_u64(value: u64) -> Self {
        let mut px = Self::new();
        let len = F::LEN;
        for (i, byte) in px.bytes.as_mut().iter_mut().enumerate() {
            *byte = (value >> (8 * (len - i - 1))) as u8;
        }
        px
    }

    /// Inverse of [`Pixel::from_u64`].
    pub fn to_u64(&self) -> u64 {
        self.bytes
            .as_ref()
            .iter()
            .fold(0u64, |n, &b| (n << 8) | u64::from(b))
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        self.bytes.as_ref()
    }

    #[inline]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        self.bytes.as_mut()
    }

    #[inline]
    pub fn into_bytes(self) -> F::Bytes {
        self.bytes
    }

    /// Value of `channel`, or `None` if the format lacks it.
    #[inline]
    pub fn try_get(&self, channel: Channel) -> Option<u8> {
        F::index_of(channel).map(|i| self.bytes.as_ref()[i])
    }

    /// Set `channel`; returns `false` (and changes nothing) if the format lacks it.
    #[inline]
    pub fn try_set(&mut self, channel: Channel, value: u8) -> bool {
        match F::index_of(channel) {
            Some(i) => {
                self.bytes.as_mut()[i] = value;
                true
            }
            None => false,
        }
    }

    /// Value of `channel`.
    ///
    /// # Panics
    ///
    /// If `F` has no such channel.
    #[inline]
    #[track_caller]
    pub fn get(&self, channel: Channel) -> u8 {
        match self.try_get(channel) {
            Some(v) => v,
            None => channel_absent::<F>(channel),
        }
    }

    /// Set `channel`.
    ///
    /// # Panics
    ///
    /// If `F` has no such channel.
    #[inline]
    #[track_caller]
    pub fn set(&mut self, channel: Channel, value: u8) {
        if !self.try_set(channel, value) {
            channel_absent::<F>(channel)
        }
    }

    channel_accessors! {
        Red => red, set_red;
        Green => green, set_green;
        Blue => blue, set_blue;
        Alpha => alpha, set_alpha;
        /// Gray level (`Y` channel).
        Gray => gray, set_gray;
        Hue => hue, set_hue;
        Saturation => saturation, set_saturation;
        Lightness => lightness, set_lightness;
    }

    /// Value of a binary pixel (any non-zero byte reads as `true`).
    #[inline]
    #[track_caller]
    pub fn binary(&self) -> bool {
        self.get(Channel::Binary) != 0
    }

    #[inline]
    #[track_caller]
    pub fn set_binary(&mut self, value: bool) {
        self.set(Channel::Binary, u8::from(value))
    }

    /// Set red, green and blue at once.
    #[inline]
    #[track_caller]
    pub fn set_rgb(&mut self, red: u8, green: u8, blue: u8) {
        self.set_red(red);
        self.set_green(green);
        self.set_blue(blue);
    }

    /// Pixel with the given red, green and blue; other channels zero.
    #[track_caller]
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        let mut px = Self::new();
        px.set_rgb(red, green, blue);
        px
    }
}

impl<F: PixelFormat> Clone for Pixel<F> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: PixelFormat> Copy for Pixel<F> {}

impl<F: PixelFormat> Default for Pixel<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: PixelFormat> PartialEq for Pixel<F> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl<F: PixelFormat> Eq for Pixel<F> {}

impl<F: PixelFormat> Hash for Pixel<F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl<F: PixelFormat> fmt::Debug for Pixel<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pixel<{}>{:?}", F::NAME, self.bytes.as_ref())
    }
}

impl<F: PixelFormat> From<Pixel<F>> for u64 {
    fn from(px: Pixel<F>) -> u64 {
        px.to_u64()
    }
}

// ── rgb crate interop ───────────────────────────────────────────────

#[cfg(feature = "rgb")]
mod typed {
    use super::Pixel;
    use crate::format::{Bgr24, Bgra32, Rgb24, Rgba32};

    impl From<Pixel<Rgb24>> for rgb::RGB8 {
        fn from(px: Pixel<Rgb24>) -> Self {
            let [r, g, b] = px.into_bytes();
            rgb::RGB8 { r, g, b }
        }
    }

    impl From<rgb::RGB8> for Pixel<Rgb24> {
        fn from(px: rgb::RGB8) -> Self {
            Pixel::from_bytes([px.r, px.g, px.b])
        }
    }

    impl From<Pixel<Rgba32>> for rgb::RGBA8 {
        fn from(px: Pixel<Rgba32>) -> Self {
            let [r, g, b, a] = px.into_bytes();
            rgb::RGBA8 { r, g, b, a }
        }
    }

    impl From<rgb::RGBA8> for Pixel<Rgba32> {
        fn from(px: rgb::RGBA8) -> Self {
            Pixel::from_bytes([px.r, px.g, px.b, px.a])
        }
    }

    impl From<Pixel<Bgr24>> for rgb::alt::BGR8 {
        fn from(px: Pixel<Bgr24>) -> Self {
            let [b, g, r] = px.into_bytes();
            rgb::alt::BGR8 { b, g, r }
        }
    }

    impl From<rgb::alt::BGR8> for Pixel<Bgr24> {
        fn from(px: rgb::alt::BGR8) -> Self {
            Pixel::from_bytes([px.b, px.g, px.r])
        }
    }

    impl From<Pixel<Bgra32>> for rgb::alt::BGRA8 {
        fn from(px: Pixel<Bgra32>) -> Self {
            let [b, g, r, a] = px.into_bytes();
            rgb::alt::BGRA8 { b, g, r, a }
        }
    }

    impl From<rgb::alt::BGRA8> for Pixel<Bgra32> {
        fn from(px: rgb::alt::BGRA8) -> Self {
            Pixel::from_bytes([px.b, px.g, px.r, px.a])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{Argb32, Bgr24, Binary, Gray, Rgb24, Rgba32, Rgbx32};

    #[test]
    fn size_is_channel_count() {
        assert_eq!(core::mem::size_of::<Pixel<Rgb24>>(), 3);
        assert_eq!(core::mem::size_of::<Pixel<Bgr24>>(), 3);
        assert_eq!(core::mem::size_of::<Pixel<Rgbx32>>(), 4);
        assert_eq!(core::mem::size_of::<Pixel<Argb32>>(), 4);
        assert_eq!(core::mem::size_of::<Pixel<Gray>>(), 1);
    }

    #[test]
    fn integer_view_is_big_endian_in_channel_order() {
        let px = Pixel::<Rgb24>::from_u64(0x11_22_33);
        assert_eq!(px.red(), 0x11);
        assert_eq!(px.green(), 0x22);
        assert_eq!(px.blue(), 0x33);
        assert_eq!(px.to_u64(), 0x11_22_33);

        let px = Pixel::<Bgr24>::from_u64(0x11_22_33);
        assert_eq!(px.blue(), 0x11);
        assert_eq!(px.red(), 0x33);

        let px = Pixel::<Argb32>::from_u64(0xff_01_02_03);
        assert_eq!(px.alpha(), 0xff);
        assert_eq!(u64::from(px), 0xff_01_02_03);
    }

    #[test]
    fn high_bits_are_dropped() {
        let px = Pixel::<Gray>::from_u64(0xabcd);
        assert_eq!(px.gray(), 0xcd);
    }

    #[test]
    fn named_accessors() {
        let mut px = Pixel::<Rgba32>::new();
        px.set_rgb(95, 5, 15);
        px.set_alpha(200);
        assert_eq!(px.bytes(), &[95, 5, 15, 200]);
        assert_eq!(px.get(Channel::Green), 5);
    }

    #[test]
    fn try_accessors_report_absent_channels() {
        let mut px = Pixel::<Rgbx32>::new();
        assert_eq!(px.try_get(Channel::Alpha), None);
        assert!(!px.try_set(Channel::Alpha, 1));
        assert!(px.try_set(Channel::Placeholder, 9));
        assert_eq!(px.try_get(Channel::Placeholder), Some(9));
    }

    #[test]
    #[should_panic(expected = "RGB pixel has no Alpha channel")]
    fn absent_channel_panics() {
        let px = Pixel::<Rgb24>::new();
        let _ = px.alpha();
    }

    #[test]
    #[should_panic(expected = "Y pixel has no Red channel")]
    fn absent_channel_set_panics() {
        let mut px = Pixel::<Gray>::new();
        px.set_red(1);
    }

    #[test]
    fn binary_pixel() {
        let mut px = Pixel::<Binary>::new();
        assert!(!px.binary());
        px.set_binary(true);
        assert_eq!(px.bytes(), &[1]);
        assert!(px.binary());
    }

    #[test]
    fn debug_names_format() {
        let px = Pixel::<Bgr24>::from_bytes([1, 2, 3]);
        assert_eq!(alloc::format!("{px:?}"), "Pixel<BGR>[1, 2, 3]");
    }

    #[cfg(feature = "rgb")]
    #[test]
    fn rgb_crate_interop() {
        let px = Pixel::<Bgr24>::rgb(1, 2, 3);
        let typed: rgb::alt::BGR8 = px.into();
        assert_eq!((typed.r, typed.g, typed.b), (1, 2, 3));
        assert_eq!(Pixel::<Bgr24>::from(typed), px);

        let rgba: rgb::RGBA8 = Pixel::<Rgba32>::from_u64(0x01020304).into();
        assert_eq!(rgba.a, 4);
    }
}
