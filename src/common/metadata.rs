use std::{fmt, str::FromStr};

use image::Rgba;
use serde::{Deserialize, Serialize};

use super::error::QRError;

// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ECLevel {
    L = 0,
    #[default]
    M = 1,
    Q = 2,
    H = 3,
}

impl From<ECLevel> for qrcode::EcLevel {
    fn from(ecl: ECLevel) -> Self {
        match ecl {
            ECLevel::L => Self::L,
            ECLevel::M => Self::M,
            ECLevel::Q => Self::Q,
            ECLevel::H => Self::H,
        }
    }
}

// Color
//------------------------------------------------------------------------------

/// An RGBA color, written and parsed as `#RGB`, `#RRGGBB` or `#RRGGBBAA`.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const BLACK: Self = Self([0, 0, 0, 255]);
    pub const WHITE: Self = Self([255, 255, 255, 255]);
    pub const BADGE_GREEN: Self = Self([0x34, 0xd3, 0x99, 255]);

    /// Quick-pick swatches offered next to the free color input.
    pub const PRESETS: [Self; 21] = [
        Self::rgb(0x00, 0x00, 0x00),
        Self::rgb(0x1f, 0x29, 0x37),
        Self::rgb(0x4b, 0x55, 0x63),
        Self::rgb(0x10, 0xb9, 0x81),
        Self::rgb(0x05, 0x96, 0x69),
        Self::rgb(0x06, 0x80, 0x5e),
        Self::rgb(0x3b, 0x82, 0xf6),
        Self::rgb(0x25, 0x63, 0xeb),
        Self::rgb(0x1e, 0x40, 0xaf),
        Self::rgb(0x8b, 0x5c, 0xf6),
        Self::rgb(0x7c, 0x3a, 0xed),
        Self::rgb(0x6d, 0x28, 0xd9),
        Self::rgb(0xec, 0x48, 0x99),
        Self::rgb(0xdb, 0x27, 0x77),
        Self::rgb(0xbe, 0x18, 0x5d),
        Self::rgb(0xef, 0x44, 0x44),
        Self::rgb(0xdc, 0x26, 0x26),
        Self::rgb(0xb9, 0x1c, 0x1c),
        Self::rgb(0xf5, 0x9e, 0x0b),
        Self::rgb(0xd9, 0x77, 0x06),
        Self::rgb(0xb4, 0x53, 0x09),
    ];

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    pub fn alpha(self) -> u8 {
        self.0[3]
    }

    /// `#rrggbb` part of the color, as used in svg `fill`/`stroke` attributes.
    pub fn to_hex_rgb(self) -> String {
        let [r, g, b, _] = self.0;
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Alpha as an svg `*-opacity` value.
    pub fn opacity(self) -> f32 {
        self.alpha() as f32 / 255.0
    }
}

impl From<Color> for Rgba<u8> {
    fn from(c: Color) -> Self {
        Rgba(c.0)
    }
}

impl From<Rgba<u8>> for Color {
    fn from(p: Rgba<u8>) -> Self {
        Self(p.0)
    }
}

impl FromStr for Color {
    type Err = QRError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || QRError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).map_err(|_| invalid());
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        match hex.len() {
            3 => Ok(Self([nibble(0)? * 17, nibble(1)? * 17, nibble(2)? * 17, 255])),
            6 => Ok(Self([byte(0)?, byte(2)?, byte(4)?, 255])),
            8 => Ok(Self([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = QRError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.alpha() {
            255 => f.write_str(&self.to_hex_rgb().to_uppercase()),
            a => write!(f, "{}{a:02X}", self.to_hex_rgb().to_uppercase()),
        }
    }
}

// Corner radius
//------------------------------------------------------------------------------

/// Data module corner rounding in canvas units, applied on top of any style.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerRadius {
    #[default]
    Square,
    Rounded,
    Circle,
}

impl CornerRadius {
    pub const fn units(self) -> u32 {
        match self {
            Self::Square => 0,
            Self::Rounded => 8,
            Self::Circle => 16,
        }
    }
}
