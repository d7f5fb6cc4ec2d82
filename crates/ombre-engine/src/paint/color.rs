use crate::error::{Error, Result};

/// Normalizes a `#RGB` / `#RRGGBB` color string to lowercase `#rrggbb`.
///
/// Short forms expand by digit duplication (`#abc` -> `#aabbcc`). Anything else,
/// including missing `#`, alpha digits or surrounding whitespace, is rejected.
pub fn normalize_hex(input: &str) -> Result<String> {
    let digits = input
        .strip_prefix('#')
        .filter(|d| d.bytes().all(|b| b.is_ascii_hexdigit()))
        .ok_or_else(|| Error::InvalidFormat(input.to_string()))?;

    match digits.len() {
        6 => Ok(format!("#{}", digits.to_ascii_lowercase())),
        3 => {
            let mut out = String::with_capacity(7);
            out.push('#');
            for c in digits.chars() {
                let c = c.to_ascii_lowercase();
                out.push(c);
                out.push(c);
            }
            Ok(out)
        }
        _ => Err(Error::InvalidFormat(input.to_string())),
    }
}

/// Opaque 8-bit sRGB color, the unit stored in a palette.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RGB` or `#RRGGBB` (case-insensitive).
    pub fn from_hex(input: &str) -> Result<Self> {
        let hex = normalize_hex(input)?;
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| Error::InvalidFormat(input.to_string()))
        };
        Ok(Self::new(channel(1)?, channel(3)?, channel(5)?))
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels normalized to `[0, 1]`, as uploaded to the GPU path.
    #[inline]
    pub fn to_unit(self) -> [f32; 3] {
        [self.r as f32 / 255.0, self.g as f32 / 255.0, self.b as f32 / 255.0]
    }

    /// Inverse of [`to_unit`](Self::to_unit): `round(c * 255)`, half away from zero.
    #[inline]
    pub fn from_unit(rgb: [f32; 3]) -> Self {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(q(rgb[0]), q(rgb[1]), q(rgb[2]))
    }

    /// The same color at straight alpha `alpha`, premultiplied for compositing.
    #[inline]
    pub fn with_alpha(self, alpha: f32) -> Color {
        Color::from_srgb(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            alpha,
        )
    }
}

/// Parses a hex string into a premultiplied color with the given straight alpha.
pub fn hex_to_rgba(hex: &str, alpha: f32) -> Result<Color> {
    Ok(Rgb::from_hex(hex)?.with_alpha(alpha))
}

/// Premultiplied RGBA color with `f32` channels in `[0, 1]`.
///
/// Invariant:
/// - `rgb` components are multiplied by `a`.
///
/// Keeping colors premultiplied makes source-over a single multiply-add per
/// channel in the raster compositor.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn transparent() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }

    /// Opaque color from 8-bit sRGB bytes.
    #[inline]
    pub fn opaque(rgb: Rgb) -> Self {
        rgb.with_alpha(1.0)
    }

    /// Creates a premultiplied color from straight `f32` components in `[0, 1]`.
    #[inline]
    pub fn from_srgb(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: r.clamp(0.0, 1.0) * a,
            g: g.clamp(0.0, 1.0) * a,
            b: b.clamp(0.0, 1.0) * a,
            a,
        }
    }

    /// Returns a straight-alpha representation.
    ///
    /// For `a == 0`, RGB is returned as 0.
    #[inline]
    pub fn to_straight(self) -> (f32, f32, f32, f32) {
        if self.a <= 0.0 {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            let inv = 1.0 / self.a;
            (self.r * inv, self.g * inv, self.b * inv, self.a)
        }
    }

    /// Component-wise interpolation in premultiplied space.
    #[inline]
    pub fn lerp(self, other: Color, t: f32) -> Color {
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Source-over: `self` drawn on top of `dst`.
    #[inline]
    pub fn over(self, dst: Color) -> Color {
        let k = 1.0 - self.a;
        Color {
            r: self.r + dst.r * k,
            g: self.g + dst.g * k,
            b: self.b + dst.b * k,
            a: self.a + dst.a * k,
        }
    }

    /// Straight-alpha 8-bit RGBA, rounded.
    pub fn to_rgba8(self) -> [u8; 4] {
        let (r, g, b, a) = self.to_straight();
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(r), q(g), q(b), q(a)]
    }

    /// Inverse of [`to_rgba8`](Self::to_rgba8).
    pub fn from_rgba8(px: [u8; 4]) -> Self {
        Self::from_srgb(
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
            px[3] as f32 / 255.0,
        )
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── normalize_hex ─────────────────────────────────────────────────────

    #[test]
    fn short_form_expands_by_duplication() {
        assert_eq!(normalize_hex("#abc").unwrap(), "#aabbcc");
    }

    #[test]
    fn long_form_is_lowercased() {
        assert_eq!(normalize_hex("#FF00aA").unwrap(), "#ff00aa");
    }

    #[test]
    fn rejects_bad_input() {
        for bad in ["", "#", "abc", "#abcd", "#12345", "#1234567", "#ggg", " #abc", "#abc "] {
            assert!(
                matches!(normalize_hex(bad), Err(Error::InvalidFormat(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_non_ascii_without_panicking() {
        assert!(normalize_hex("#ééé").is_err());
    }

    // ── Rgb ───────────────────────────────────────────────────────────────

    #[test]
    fn hex_round_trip_covers_every_channel_value() {
        for v in 0..=255u8 {
            let hex = format!("#{v:02x}{:02x}{:02x}", 255 - v, v / 2);
            assert_eq!(Rgb::from_hex(&hex).unwrap().to_hex(), hex);
        }
    }

    #[test]
    fn unit_round_trip_is_exact() {
        for v in 0..=255u8 {
            let c = Rgb::new(v, v.wrapping_mul(7), 255 - v);
            assert_eq!(Rgb::from_unit(c.to_unit()), c);
        }
    }

    #[test]
    fn from_unit_rounds_half_away_from_zero() {
        // 0.5 / 255 * 255 = 0.5 -> 1
        assert_eq!(Rgb::from_unit([0.5 / 255.0, 0.0, 1.0]), Rgb::new(1, 0, 255));
    }

    #[test]
    fn hex_to_rgba_premultiplies() {
        let c = hex_to_rgba("#ff0000", 0.25).unwrap();
        assert_eq!(c, Color { r: 0.25, g: 0.0, b: 0.0, a: 0.25 });
    }

    // ── Color ─────────────────────────────────────────────────────────────

    #[test]
    fn over_opaque_destination_stays_opaque() {
        let dst = Color::opaque(Rgb::new(0, 0, 255));
        let src = Rgb::new(255, 0, 0).with_alpha(0.5);
        let out = src.over(dst);
        assert_eq!(out.a, 1.0);
        assert_eq!(out.to_rgba8(), [128, 0, 128, 255]);
    }

    #[test]
    fn transparent_source_is_identity() {
        let dst = Color::opaque(Rgb::new(10, 20, 30));
        assert_eq!(Color::transparent().over(dst), dst);
    }
}
