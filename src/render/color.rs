//! RGBA colors with CSS output

use serde::{Deserialize, Serialize};

use crate::error::ColorError;

/// 8-bit RGB plus float alpha, serialized as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    /// Left saber
    pub const SABER_RED: Rgba = Rgba::rgb(0xff, 0x00, 0x40);
    /// Right saber
    pub const SABER_BLUE: Rgba = Rgba::rgb(0x00, 0xa0, 0xff);
    /// Miss counter near the limit
    pub const WARNING: Rgba = Rgba::rgb(0xff, 0x44, 0x44);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Parse `#rrggbb` (leading `#` optional)
    pub fn from_hex(s: &str) -> Result<Self, ColorError> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ColorError(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ColorError(s.to_string()))
        };
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// CSS color string for canvas styles
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            self.to_hex()
        } else {
            format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.a.max(0.0))
        }
    }
}

impl TryFrom<String> for Rgba {
    type Error = ColorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> Self {
        c.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parse() {
        assert_eq!(Rgba::from_hex("#ff0040").unwrap(), Rgba::SABER_RED);
        assert_eq!(Rgba::from_hex("00a0ff").unwrap(), Rgba::SABER_BLUE);
        assert!(Rgba::from_hex("#ff00").is_err());
        assert!(Rgba::from_hex("#gg0000").is_err());
    }

    #[test]
    fn test_css_output() {
        assert_eq!(Rgba::SABER_RED.to_css(), "#ff0040");
        assert_eq!(
            Rgba::BLACK.with_alpha(0.3).to_css(),
            "rgba(0, 0, 0, 0.300)"
        );
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Rgba::SABER_BLUE).unwrap();
        assert_eq!(json, "\"#00a0ff\"");
        let back: Rgba = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgba::SABER_BLUE);
        assert!(serde_json::from_str::<Rgba>("\"red\"").is_err());
    }
}
