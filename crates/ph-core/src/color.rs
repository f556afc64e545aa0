use std::fmt;

use crate::error::CoreError;

/// Couleur RGB 8 bits par canal.
///
/// # Example
/// ```
/// use ph_core::color::Rgb;
/// let amber = Rgb::new(255, 154, 16);
/// assert_eq!(amber.to_array(), [255, 154, 16]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Build a color from its three channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a packed `0xRRGGBB` value.
    ///
    /// # Example
    /// ```
    /// use ph_core::color::Rgb;
    /// assert_eq!(Rgb::from_hex(0x1b2a09), Rgb::new(0x1b, 0x2a, 0x09));
    /// ```
    #[must_use]
    pub const fn from_hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    /// Parse `#rrggbb` (le `#` est optionnel).
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidColor`] if the string is not six hex digits.
    ///
    /// # Example
    /// ```
    /// use ph_core::color::Rgb;
    /// assert_eq!(Rgb::parse("#ff9a10").unwrap(), Rgb::new(255, 154, 16));
    /// assert!(Rgb::parse("#fff").is_err());
    /// ```
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::InvalidColor {
            value: value.to_string(),
        };
        let hex = value.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        u32::from_str_radix(hex, 16)
            .map(Self::from_hex)
            .map_err(|_| invalid())
    }

    /// Channels as an array, in the byte order expected by RGB encoders.
    #[inline(always)]
    #[must_use]
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_then_parse_is_identity() {
        for c in [Rgb::new(23, 8, 0), Rgb::new(0x9a, 0x9e, 0x3f), Rgb::new(255, 255, 255)] {
            assert_eq!(Rgb::parse(&c.to_string()).unwrap(), c);
        }
    }

    #[test]
    fn parse_accepts_missing_hash_and_uppercase() {
        assert_eq!(Rgb::parse("0E450B").unwrap(), Rgb::new(0x0e, 0x45, 0x0b));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Rgb::parse("").is_err());
        assert!(Rgb::parse("#12345g").is_err());
        assert!(Rgb::parse("#1234567").is_err());
        assert!(Rgb::parse("+12345").is_err());
    }
}
