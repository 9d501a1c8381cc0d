//! RGBA colour values.

use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel RGBA colour, laid out exactly like a pixel in the
/// output buffer.
///
/// Deserialization is lenient: channels may be given as integers or floats,
/// are clamped into `0..=255`, and default to 255 when missing. Both the
/// `{r,g,b,a}` map form and the `[r,g,b,a]` sequence form are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawRgba")]
#[repr(C)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

static_assertions::assert_eq_size!(Rgba, [u8; 4]);

/// Channels at or above this value count as "full" for pure-colour tests.
const PURE_HIGH: u8 = 245;
/// Channels at or below this value count as "empty" for pure-colour tests.
const PURE_LOW: u8 = 10;

impl Rgba {
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Channels in buffer order.
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Replace the colour channels, keeping alpha.
    pub const fn with_rgb(self, r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, self.a)
    }

    /// Whether the colour is a pure primary, secondary, black or white.
    ///
    /// Each channel must sit within 10 of either end of its range.
    pub fn is_pure(self) -> bool {
        let channels = [self.r, self.g, self.b];
        channels.iter().all(|&c| c >= PURE_HIGH || c <= PURE_LOW)
    }
}

/// Round a float channel to the nearest byte, clamping into `0..=255`.
///
/// Halves round up. NaN maps to 0.
pub(crate) fn quantize(value: f32) -> u8 {
    (value + 0.5).clamp(0.0, 255.0) as u8
}

fn channel_from_f64(value: f64) -> u8 {
    if value.is_finite() {
        value.round().clamp(0.0, 255.0) as u8
    } else {
        255
    }
}

fn full_channel() -> f64 {
    255.0
}

#[derive(Deserialize)]
struct RawRgba {
    #[serde(default = "full_channel")]
    r: f64,
    #[serde(default = "full_channel")]
    g: f64,
    #[serde(default = "full_channel")]
    b: f64,
    #[serde(default = "full_channel")]
    a: f64,
}

impl From<RawRgba> for Rgba {
    fn from(raw: RawRgba) -> Self {
        Self::new(
            channel_from_f64(raw.r),
            channel_from_f64(raw.g),
            channel_from_f64(raw.b),
            channel_from_f64(raw.a),
        )
    }
}
