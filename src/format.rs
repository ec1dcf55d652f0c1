//! Pixel formats as ordered lists of one-byte channels.
//!
//! A format is a zero-sized marker type implementing [`PixelFormat`]. Its
//! channel list fixes the byte length of a pixel and the offset of every
//! channel; both are resolved at compile time into a lookup table keyed by
//! [`Channel`].

use core::fmt::Debug;
use core::hash::Hash;

/// A single one-byte channel of a pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Channel {
    Red,
    Green,
    Blue,
    Alpha,
    Gray,
    Hue,
    Saturation,
    Lightness,
    /// One byte holding 0 or 1.
    Binary,
    /// Unused byte (the `X` in `RGBX`).
    Placeholder,
}

impl Channel {
    /// Number of distinct channel tags.
    pub const COUNT: usize = 10;

    /// Single-letter tag used in format names.
    pub const fn symbol(self) -> char {
        match self {
            Channel::Red => 'R',
            Channel::Green => 'G',
            Channel::Blue => 'B',
            Channel::Alpha => 'A',
            Channel::Gray => 'Y',
            Channel::Hue => 'H',
            Channel::Saturation => 'S',
            Channel::Lightness => 'L',
            Channel::Binary => '1',
            Channel::Placeholder => 'X',
        }
    }

    /// Inverse of [`Channel::symbol`].
    pub const fn from_symbol(symbol: char) -> Option<Channel> {
        match symbol {
            'R' => Some(Channel::Red),
            'G' => Some(Channel::Green),
            'B' => Some(Channel::Blue),
            'A' => Some(Channel::Alpha),
            'Y' => Some(Channel::Gray),
            'H' => Some(Channel::Hue),
            'S' => Some(Channel::Saturation),
            'L' => Some(Channel::Lightness),
            '1' => Some(Channel::Binary),
            'X' => Some(Channel::Placeholder),
            _ => None,
        }
    }
}

/// Channels an RGB-like format must carry.
pub const RGB_LIKE: &[Channel] = &[Channel::Red, Channel::Green, Channel::Blue];
/// Channels an RGBA-like format must carry.
pub const RGBA_LIKE: &[Channel] = &[Channel::Red, Channel::Green, Channel::Blue, Channel::Alpha];
/// Channels a gray-like format must carry.
pub const GRAY_LIKE: &[Channel] = &[Channel::Gray];
/// Channels a binary-like format must carry.
pub const BINARY_LIKE: &[Channel] = &[Channel::Binary];

/// Offset-table entry for a channel the format does not have.
pub const ABSENT: u8 = u8::MAX;

/// Build the channel → byte offset table for a channel list.
pub const fn offset_table(channels: &[Channel]) -> [u8; Channel::COUNT] {
    let mut table = [ABSENT; Channel::COUNT];
    let mut i = 0;
    while i < channels.len() {
        table[channels[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// Whether `channels` contains `channel`.
pub const fn contains(channels: &[Channel], channel: Channel) -> bool {
    let mut i = 0;
    while i < channels.len() {
        if channels[i] as u8 == channel as u8 {
            return true;
        }
        i += 1;
    }
    false
}

/// Whether every channel of `required` appears somewhere in `channels`,
/// in any order.
pub const fn compatible(channels: &[Channel], required: &[Channel]) -> bool {
    let mut i = 0;
    while i < required.len() {
        if !contains(channels, required[i]) {
            return false;
        }
        i += 1;
    }
    true
}

/// Whether no channel appears twice.
pub const fn all_unique(channels: &[Channel]) -> bool {
    let mut i = 0;
    while i < channels.len() {
        let mut j = i + 1;
        while j < channels.len() {
            if channels[i] as u8 == channels[j] as u8 {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

/// Compile-time description of a pixel's byte layout.
///
/// Implemented by the zero-sized marker types in this module. Each channel is
/// one byte, so the pixel length equals the channel count.
pub trait PixelFormat: Copy + Default + Debug + Eq + Hash + Send + Sync + 'static {
    /// Format name, one [`Channel::symbol`] per byte (`"BGR"`, `"RGBA"`, ...).
    const NAME: &'static str;
    /// Channels in byte order.
    const CHANNELS: &'static [Channel];
    /// Fixed-size storage for one pixel (`[u8; LEN]`).
    type Bytes: Copy + Default + Eq + Hash + Debug + AsRef<[u8]> + AsMut<[u8]> + Send + Sync;

    /// Bytes per pixel.
    const LEN: usize = Self::CHANNELS.len();
    /// Byte offset of every channel, [`ABSENT`] where missing.
    const OFFSETS: [u8; Channel::COUNT] = offset_table(Self::CHANNELS);

    /// Byte offset of `channel`, or `None` if the format lacks it.
    #[inline]
    fn index_of(channel: Channel) -> Option<usize> {
        match Self::OFFSETS[channel as usize] {
            ABSENT => None,
            i => Some(i as usize),
        }
    }

    #[inline]
    fn has(channel: Channel) -> bool {
        Self::OFFSETS[channel as usize] != ABSENT
    }

    /// Whether every channel in `required` is present.
    #[inline]
    fn compatible(required: &[Channel]) -> bool {
        compatible(Self::CHANNELS, required)
    }

    fn is_rgb_like() -> bool {
        Self::compatible(RGB_LIKE)
    }

    fn is_rgba_like() -> bool {
        Self::compatible(RGBA_LIKE)
    }

    fn is_gray_like() -> bool {
        Self::compatible(GRAY_LIKE)
    }

    fn is_binary_like() -> bool {
        Self::compatible(BINARY_LIKE)
    }
}

macro_rules! pixel_formats {
    ($(
        $(#[$meta:meta])*
        $name:ident = $label:literal [$($channel:ident),+; $len:literal];
    )+) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
            pub struct $name;

            impl PixelFormat for $name {
                const NAME: &'static str = $label;
                const CHANNELS: &'static [Channel] = &[$(Channel::$channel),+];
                type Bytes = [u8; $len];
            }

            const _: () = {
                let channels = <$name as PixelFormat>::CHANNELS;
                assert!(channels.len() == $len);
                assert!(all_unique(channels));
            };
        )+
    };
}

pixel_formats! {
    /// 8-bit grayscale.
    Gray = "Y" [Gray; 1];
    /// One byte per pixel holding 0 or 1.
    Binary = "1" [Binary; 1];

    Rgb24 = "RGB" [Red, Green, Blue; 3];
    Rbg24 = "RBG" [Red, Blue, Green; 3];
    Grb24 = "GRB" [Green, Red, Blue; 3];
    Gbr24 = "GBR" [Green, Blue, Red; 3];
    Brg24 = "BRG" [Blue, Red, Green; 3];
    /// Byte order of 24-bit BMP pixel data; the codec's canonical format.
    Bgr24 = "BGR" [Blue, Green, Red; 3];

    Rgbx32 = "RGBX" [Red, Green, Blue, Placeholder; 4];
    Bgrx32 = "BGRX" [Blue, Green, Red, Placeholder; 4];
    Xrgb32 = "XRGB" [Placeholder, Red, Green, Blue; 4];
    Xbgr32 = "XBGR" [Placeholder, Blue, Green, Red; 4];

    Rgba32 = "RGBA" [Red, Green, Blue, Alpha; 4];
    /// Byte order of 32-bit BMP pixel data.
    Bgra32 = "BGRA" [Blue, Green, Red, Alpha; 4];
    Argb32 = "ARGB" [Alpha, Red, Green, Blue; 4];
    Abgr32 = "ABGR" [Alpha, Blue, Green, Red; 4];

    Hsl24 = "HSL" [Hue, Saturation, Lightness; 3];
}
