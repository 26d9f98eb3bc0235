use serde::{Deserialize, Serialize};

/// Axis-aligned pixel rectangle designating where one layer may paint.
///
/// A zero-area zone means the layer is disabled for this render (e.g. no
/// image zone in the type-only layout).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelZone {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelZone {
    pub const EMPTY: Self = Self {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// One past the rightmost painted column.
    pub fn right(self) -> u32 {
        self.x + self.width
    }

    /// One past the bottommost painted row.
    pub fn bottom(self) -> u32 {
        self.y + self.height
    }
}

/// Straight-alpha RGBA8 color.
///
/// Serializes as `#RRGGBB` (or `#RRGGBBAA` when translucent) to match the
/// hex palette entries in brand configuration files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn parse_hex(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> Result<u8, String> {
            u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
        }

        match s.len() {
            6 => Ok(Self {
                r: hex_byte(&s[0..2])?,
                g: hex_byte(&s[2..4])?,
                b: hex_byte(&s[4..6])?,
                a: 255,
            }),
            8 => Ok(Self {
                r: hex_byte(&s[0..2])?,
                g: hex_byte(&s[2..4])?,
                b: hex_byte(&s[4..6])?,
                a: hex_byte(&s[6..8])?,
            }),
            _ => Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned()),
        }
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Serialize for Rgba8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_emptiness_and_edges() {
        let z = PixelZone::new(10, 20, 100, 50);
        assert!(!z.is_empty());
        assert_eq!(z.right(), 110);
        assert_eq!(z.bottom(), 70);
        assert!(PixelZone::EMPTY.is_empty());
        assert!(PixelZone::new(5, 5, 0, 10).is_empty());
    }

    #[test]
    fn parses_hex_rgb_and_rgba() {
        assert_eq!(Rgba8::parse_hex("#ff0000").unwrap(), Rgba8::rgb(255, 0, 0));
        assert_eq!(
            Rgba8::parse_hex("0000FF80").unwrap(),
            Rgba8::rgba(0, 0, 255, 128)
        );
        assert!(Rgba8::parse_hex("#fff").is_err());
        assert!(Rgba8::parse_hex("#zzzzzz").is_err());
    }

    #[test]
    fn hex_roundtrip_through_serde() {
        let c: Rgba8 = serde_json::from_str("\"#1a2B3c\"").unwrap();
        assert_eq!(c, Rgba8::rgb(0x1a, 0x2b, 0x3c));
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"#1a2b3c\"");
    }
}
