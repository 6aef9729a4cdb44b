//! Color strings to RGB.

use std::fmt;

use crate::error::{BusylightError, BusylightResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const OFF: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    pub fn is_off(&self) -> bool {
        *self == Self::OFF
    }

    /// Scale every channel by `percent / 100`. Values above 100 are clamped.
    pub fn dimmed(&self, percent: u8) -> Self {
        let percent = u16::from(percent.min(100));
        let scale = |c: u8| ((u16::from(c) * percent) / 100) as u8;

        Rgb {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgb { r, g, b }
    }
}

/// Parse a color name, hex code (`#ff0000`, `ff0000`, `0xff0000`) or CSS
/// functional notation (`rgb(255, 0, 0)`).
pub fn parse_color(value: &str) -> BusylightResult<Rgb> {
    let trimmed = value.trim();
    let normalized = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
        .to_ascii_lowercase();

    if normalized.is_empty() {
        return Err(BusylightError::ColorLookup(value.to_string()));
    }

    let color = csscolorparser::parse(&normalized)
        .map_err(|_| BusylightError::ColorLookup(value.to_string()))?;

    let [r, g, b, _] = color.to_rgba8();
    Ok(Rgb { r, g, b })
}

/// Parse a color and scale it to `dim` percent brightness.
pub fn parse_color_dimmed(value: &str, dim: u8) -> BusylightResult<Rgb> {
    Ok(parse_color(value)?.dimmed(dim))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!(parse_color("red").unwrap(), Rgb::new(255, 0, 0));
        assert_eq!(parse_color("  Blue ").unwrap(), Rgb::new(0, 0, 255));
        assert_eq!(parse_color("rebeccapurple").unwrap(), Rgb::new(102, 51, 153));
    }

    #[test]
    fn parses_hex_forms() {
        assert_eq!(parse_color("#00ff00").unwrap(), Rgb::new(0, 255, 0));
        assert_eq!(parse_color("#0f0").unwrap(), Rgb::new(0, 255, 0));
        assert_eq!(parse_color("0x112233").unwrap(), Rgb::new(0x11, 0x22, 0x33));
        assert_eq!(parse_color("0XFFFFFF").unwrap(), Rgb::new(255, 255, 255));
    }

    #[test]
    fn parses_functional_notation() {
        assert_eq!(parse_color("rgb(10, 20, 30)").unwrap(), Rgb::new(10, 20, 30));
        assert_eq!(parse_color("hsl(240, 100%, 50%)").unwrap(), Rgb::new(0, 0, 255));
        assert_eq!(parse_color("HSL(0, 0%, 100%)").unwrap(), Rgb::new(255, 255, 255));
    }

    #[test]
    fn rejects_unknown_colors() {
        assert!(matches!(
            parse_color("not-a-color"),
            Err(BusylightError::ColorLookup(v)) if v == "not-a-color"
        ));
        assert!(parse_color("").is_err());
        assert!(parse_color("0x").is_err());
    }

    #[test]
    fn dims_each_channel() {
        let color = Rgb::new(200, 100, 51);
        assert_eq!(color.dimmed(100), color);
        assert_eq!(color.dimmed(50), Rgb::new(100, 50, 25));
        assert_eq!(color.dimmed(0), Rgb::OFF);
        assert_eq!(color.dimmed(250), color);
    }

    #[test]
    fn parse_dimmed_scales_parsed_color() {
        assert_eq!(parse_color_dimmed("white", 10).unwrap(), Rgb::new(25, 25, 25));
    }

    #[test]
    fn displays_as_hex() {
        assert_eq!(Rgb::new(255, 8, 0).to_string(), "#ff0800");
    }
}
