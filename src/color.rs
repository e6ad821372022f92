// src/color.rs

use std::fmt;

use rand::Rng;

/// Opaque sRGB color written as six hex digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const DEFAULT_FILL: HexColor = HexColor::rgb(0xFF, 0x57, 0x33);
    pub const DEFAULT_BACKGROUND: HexColor = HexColor::rgb(0xFF, 0xFF, 0xFF);

    pub const TITLE_ON_LIGHT: HexColor = HexColor::rgb(0x11, 0x11, 0x11);
    pub const TITLE_ON_DARK: HexColor = HexColor::rgb(0xFF, 0xFF, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_u32(value: u32) -> Self {
        Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Accepts `RRGGBB` or `#RRGGBB`, surrounding whitespace ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_u32)
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_u32(rng.gen_range(0..0xFF_FFFF))
    }

    /// Six uppercase hex digits without the leading `#`.
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Perceived brightness above 186 (ITU-R 601 weights).
    pub fn is_light(&self) -> bool {
        let weighted = self.r as u32 * 299 + self.g as u32 * 587 + self.b as u32 * 114;
        weighted as f64 / 1000.0 > 186.0
    }

    /// Title text color that stays readable on this background.
    pub fn contrasting_title(&self) -> HexColor {
        if self.is_light() {
            Self::TITLE_ON_LIGHT
        } else {
            Self::TITLE_ON_DARK
        }
    }

    /// Linear-light RGBA for writing into an sRGB render target.
    pub fn to_linear_rgba(&self) -> [f32; 4] {
        [
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
            1.0,
        ]
    }

    pub fn to_unorm_rgba(&self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            1.0,
        ]
    }
}

impl From<[u8; 3]> for HexColor {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::rgb(r, g, b)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

fn srgb_to_linear(channel: u8) -> f32 {
    let c = channel as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn parse_accepts_hash_whitespace_and_case() {
        assert_eq!(HexColor::parse("FF5733"), Some(HexColor::rgb(0xFF, 0x57, 0x33)));
        assert_eq!(HexColor::parse("  #ff5733 "), Some(HexColor::rgb(0xFF, 0x57, 0x33)));
        assert_eq!(HexColor::parse("#00aAbB"), Some(HexColor::rgb(0x00, 0xAA, 0xBB)));
    }

    #[test]
    fn parse_rejects_malformed() {
        for bad in ["", "#", "FFF", "FF57331", "GG5733", "+F5733", "##FF5733", "FF 573"] {
            assert_eq!(HexColor::parse(bad), None, "accepted {bad:?}");
        }
    }

    #[test]
    fn hex_and_display() {
        let c = HexColor::rgb(0x0a, 0xbc, 0x01);
        assert_eq!(c.to_hex(), "0ABC01");
        assert_eq!(c.to_string(), "#0ABC01");
    }

    #[test]
    fn lightness_threshold() {
        assert!(HexColor::DEFAULT_BACKGROUND.is_light());
        assert!(!HexColor::rgb(0, 0, 0).is_light());
        assert!(!HexColor::DEFAULT_FILL.is_light());
        // 187 grey sits just above the threshold, 186 on it.
        assert!(HexColor::rgb(187, 187, 187).is_light());
        assert!(!HexColor::rgb(186, 186, 186).is_light());
        assert_eq!(HexColor::rgb(10, 10, 40).contrasting_title(), HexColor::TITLE_ON_DARK);
        assert_eq!(HexColor::DEFAULT_BACKGROUND.contrasting_title(), HexColor::TITLE_ON_LIGHT);
    }

    #[test]
    fn random_colors_are_seedable() {
        let mut a = StdRng::seed_from_u64(3);
        let mut b = StdRng::seed_from_u64(3);
        assert_eq!(HexColor::random(&mut a), HexColor::random(&mut b));
    }

    #[test]
    fn linear_conversion_endpoints() {
        assert_eq!(HexColor::rgb(0, 0, 0).to_linear_rgba(), [0.0, 0.0, 0.0, 1.0]);
        let white = HexColor::rgb(255, 255, 255).to_linear_rgba();
        assert!(white.iter().all(|c| (c - 1.0).abs() < 1e-6));
    }
}
