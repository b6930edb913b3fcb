use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An opaque sRGB color stored and serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color {0:?}: expected #rrggbb or #rgb")]
pub struct InvalidColor(pub String);

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_array(rgb: [u8; 3]) -> Self {
        Self::rgb(rgb[0], rgb[1], rgb[2])
    }
}

impl FromStr for HexColor {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |text: &str| u8::from_str_radix(text, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let r = channel(&hex[0..1])?;
                let g = channel(&hex[1..2])?;
                let b = channel(&hex[2..3])?;
                Ok(Self::rgb(r * 17, g * 17, b * 17))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for HexColor {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Default palette for sections and freshly created items.
pub const PALETTE: [HexColor; 6] = [
    HexColor::rgb(0xf4, 0xb7, 0x40),
    HexColor::rgb(0x61, 0xc0, 0xbf),
    HexColor::rgb(0x5b, 0x8d, 0xef),
    HexColor::rgb(0xf7, 0x88, 0x83),
    HexColor::rgb(0xb0, 0x7c, 0xf7),
    HexColor::rgb(0x87, 0xc3, 0x8f),
];

/// The palette entry after `color`, or the first entry for off-palette colors.
pub fn next_palette_color(color: HexColor) -> HexColor {
    let next = PALETTE
        .iter()
        .position(|c| *c == color)
        .map(|i| (i + 1) % PALETTE.len())
        .unwrap_or(0);
    PALETTE[next]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_forms() {
        assert_eq!("#f4b740".parse::<HexColor>().unwrap(), PALETTE[0]);
        assert_eq!("#FFF".parse::<HexColor>().unwrap(), HexColor::rgb(255, 255, 255));
        assert!("f4b740".parse::<HexColor>().is_err());
        assert!("#f4b7".parse::<HexColor>().is_err());
        assert!("#zzzzzz".parse::<HexColor>().is_err());
    }

    #[test]
    fn serializes_as_hex_string() {
        let json = serde_json::to_string(&PALETTE[1]).unwrap();
        assert_eq!(json, "\"#61c0bf\"");
        let back: HexColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PALETTE[1]);
        assert!(serde_json::from_str::<HexColor>("\"teal\"").is_err());
    }

    #[test]
    fn palette_cycles() {
        assert_eq!(next_palette_color(PALETTE[5]), PALETTE[0]);
        assert_eq!(next_palette_color(PALETTE[0]), PALETTE[1]);
        assert_eq!(next_palette_color(HexColor::rgb(1, 2, 3)), PALETTE[0]);
    }
}
