//! Color mapping from escape values to RGB.
//!
//! Each [`ColorScheme`] resolves to one [`Colorizer`] function, looked up once
//! per frame and then applied to every pixel.

use crate::error::ConfigError;
use crate::escape_time::is_interior;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Colorizer function type - converts a normalized escape value `t ∈ [0, 1)` to RGB
pub type Colorizer = fn(f64) -> PixelColor;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Rainbow,
    Grayscale,
    Fire,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 3] = [
        ColorScheme::Rainbow,
        ColorScheme::Grayscale,
        ColorScheme::Fire,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            ColorScheme::Rainbow => "rainbow",
            ColorScheme::Grayscale => "grayscale",
            ColorScheme::Fire => "fire",
        }
    }

    /// Stable index shared with the fragment shader's scheme switch.
    pub fn shader_index(&self) -> u32 {
        match self {
            ColorScheme::Rainbow => 0,
            ColorScheme::Grayscale => 1,
            ColorScheme::Fire => 2,
        }
    }

    pub fn colorizer(self) -> Colorizer {
        match self {
            ColorScheme::Rainbow => rainbow,
            ColorScheme::Grayscale => grayscale,
            ColorScheme::Fire => fire,
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ColorScheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorScheme::ALL
            .into_iter()
            .find(|scheme| scheme.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownColorScheme(s.to_string()))
    }
}

/// Opaque RGB color
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PixelColor {
    pub const BLACK: PixelColor = PixelColor { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

/// Normalize an escape value to `t ∈ [0, 1)`, or `None` for set members.
pub fn normalized_escape(escape_value: f64, max_iterations: u32) -> Option<f64> {
    if is_interior(escape_value, max_iterations) {
        return None;
    }
    Some((escape_value / max_iterations as f64).clamp(0.0, 1.0))
}

/// Color for an escape value under `scheme`. Set members are black.
pub fn colorize(escape_value: f64, max_iterations: u32, scheme: ColorScheme) -> PixelColor {
    match normalized_escape(escape_value, max_iterations) {
        Some(t) => scheme.colorizer()(t),
        None => PixelColor::BLACK,
    }
}

fn channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn grayscale(t: f64) -> PixelColor {
    let v = channel(t * 255.0);
    PixelColor::new(v, v, v)
}

fn fire(t: f64) -> PixelColor {
    PixelColor::new(
        channel((t * 510.0).min(255.0)),
        channel((t * 153.0).min(255.0)),
        channel(t * 40.0),
    )
}

fn rainbow(t: f64) -> PixelColor {
    hsl_to_rgb(360.0 * t, 1.0, 0.5)
}

/// Standard HSL to RGB conversion. Hue in degrees, saturation and lightness in `[0, 1]`.
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> PixelColor {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue.rem_euclid(360.0) / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());

    let (r1, g1, b1) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    let m = lightness - chroma / 2.0;
    PixelColor::new(
        channel((r1 + m) * 255.0),
        channel((g1 + m) * 255.0),
        channel((b1 + m) * 255.0),
    )
}
