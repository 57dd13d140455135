//! Custom deserialization helpers for [peniko::Color].
//!
//! Colours are written as `#rrggbb` or `#rrggbbaa` hex strings in configuration files.

use peniko::Color;
use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;

/// Deserialize a Color from a hex string.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let hex = String::deserialize(deserializer)?;
    parse_hex_color(&hex).map_err(Error::custom)
}

/// Deserialize an optional Color from an optional hex string.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<Color>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    match Option::<String>::deserialize(deserializer)? {
        Some(hex) => parse_hex_color(&hex).map(Some).map_err(Error::custom),
        None => Ok(None),
    }
}

/// Format a Color as a hex string, omitting the alpha channel when opaque.
pub fn to_hex(color: Color) -> String {
    let rgba = color.to_rgba8();
    if rgba.a == 255 {
        format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

/// Parse a `#rrggbb` or `#rrggbbaa` string.
pub fn parse_hex_color(hex: &str) -> Result<Color, ConfigError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidColor(hex.to_string()));
    }

    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .ok_or_else(|| ConfigError::InvalidColor(hex.to_string()))
    };

    match digits.len() {
        6 => Ok(Color::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        8 => Ok(Color::from_rgba8(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        )),
        _ => Err(ConfigError::InvalidColor(hex.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rgb_and_rgba() {
        let red = parse_hex_color("#ff0000").unwrap().to_rgba8();
        assert_eq!((red.r, red.g, red.b, red.a), (255, 0, 0, 255));

        let translucent = parse_hex_color("00ff0080").unwrap().to_rgba8();
        assert_eq!((translucent.r, translucent.g, translucent.b, translucent.a), (0, 255, 0, 128));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_hex_color("#fff").is_err());
        assert!(parse_hex_color("#gg0000").is_err());
        assert!(parse_hex_color("").is_err());
    }

    #[test]
    fn test_parse_rejects_signs_and_extra_hashes() {
        assert!(parse_hex_color("#+f+f+f").is_err());
        assert!(parse_hex_color("+f+f+f+f").is_err());
        assert!(parse_hex_color("##ff0000").is_err());
        assert!(parse_hex_color("#ff 000").is_err());
    }

    #[test]
    fn test_to_hex_omits_opaque_alpha() {
        assert_eq!(to_hex(Color::from_rgb8(0x12, 0x34, 0x56)), "#123456");
        assert_eq!(to_hex(Color::from_rgba8(0, 0, 0, 0x40)), "#00000040");
    }
}
