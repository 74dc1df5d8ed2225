use std::str::FromStr;

use csscolorparser::Color as CssColor;
use palette::Srgba;

use crate::error::FlashError;

/// Highlight color in sRGB, parsed from a CSS color string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightColor(pub Srgba);

impl HighlightColor {
    /// Parse any CSS color: named (`green`), hex (`#0f0`, `#00ff0080`) or functional (`rgb(0 128 0)`).
    pub fn parse(value: &str) -> Result<Self, FlashError> {
        let c = CssColor::from_str(value.trim()).map_err(|_| FlashError::InvalidColor(value.to_string()))?;
        Ok(Self(Srgba::new(c.r as f32, c.g as f32, c.b as f32, c.a as f32)))
    }

    /// Convert to 8-bit sRGB RGBA, scaling the color's own alpha by `alpha`.
    pub fn to_rgba8(&self, alpha: f32) -> [u8; 4] {
        let c = self.0;
        let a = (c.alpha * alpha.clamp(0.0, 1.0)).clamp(0.0, 1.0);
        [
            (c.red * 255.0).round().clamp(0.0, 255.0) as u8,
            (c.green * 255.0).round().clamp(0.0, 255.0) as u8,
            (c.blue * 255.0).round().clamp(0.0, 255.0) as u8,
            (a * 255.0).round() as u8,
        ]
    }
}

impl Default for HighlightColor {
    /// CSS `green`.
    fn default() -> Self {
        Self(Srgba::new(0.0, 128.0 / 255.0, 0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_color() {
        let green = HighlightColor::parse("green").unwrap();
        assert_eq!(green.to_rgba8(1.0), [0, 128, 0, 255]);
        assert_eq!(HighlightColor::default().to_rgba8(1.0), [0, 128, 0, 255]);
    }

    #[test]
    fn test_parse_hex_color() {
        let c = HighlightColor::parse("#0000ff80").unwrap();
        assert_eq!(c.to_rgba8(1.0), [0, 0, 255, 128]);
    }

    #[test]
    fn test_alpha_scales_own_alpha() {
        let c = HighlightColor::parse("blue").unwrap();
        assert_eq!(c.to_rgba8(0.25)[3], 64);
        assert_eq!(c.to_rgba8(0.0)[3], 0);
    }

    #[test]
    fn test_parse_invalid_color() {
        assert!(matches!(
            HighlightColor::parse("not-a-color"),
            Err(FlashError::InvalidColor(_))
        ));
    }
}
