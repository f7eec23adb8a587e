//! Colors for cards, notes and procedural textures.
//!
//! Hex parsing stays branchless: each nibble is computed with arithmetic
//! masks instead of a three-way range check, so palette strings can be
//! parsed per texture without a lookup table.

use crate::fast_math::{lerp, RECIPROCALS};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255, a: 255 };
    pub const TRANSPARENT: Self = Self { r: 0, g: 0, b: 0, a: 0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with a replaced alpha channel.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Pixel layout used by `image::Rgba<u8>`.
    #[inline(always)]
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Source-over blend of `top` (with an extra opacity factor) onto `self`.
    pub fn blend_over(self, top: Rgba, opacity: f32) -> Rgba {
        let alpha = (top.a as f32 * RECIPROCALS.inv_255 * opacity).clamp(0.0, 1.0);
        let mix = |dst: u8, src: u8| lerp(dst as f32, src as f32, alpha).round() as u8;
        Rgba {
            r: mix(self.r, top.r),
            g: mix(self.g, top.g),
            b: mix(self.b, top.b),
            a: self.a.max((alpha * 255.0).round() as u8),
        }
    }
}

/// Interpolate every channel, `t` clamped to [0, 1].
pub fn interpolate_color(from: Rgba, to: Rgba, t: f32) -> Rgba {
    let t = t.clamp(0.0, 1.0);
    let ch = |a: u8, b: u8| lerp(a as f32, b as f32, t).round() as u8;
    Rgba {
        r: ch(from.r, to.r),
        g: ch(from.g, to.g),
        b: ch(from.b, to.b),
        a: ch(from.a, to.a),
    }
}

/// Sample a gradient made of evenly spaced stops at position `t` in [0, 1].
pub fn sample_stops(stops: &[Rgba], t: f32) -> Rgba {
    match stops.len() {
        0 => Rgba::TRANSPARENT,
        1 => stops[0],
        n => {
            let scaled = t.clamp(0.0, 1.0) * (n - 1) as f32;
            let i = (scaled.floor() as usize).min(n - 2);
            interpolate_color(stops[i], stops[i + 1], scaled - i as f32)
        }
    }
}

/// Hex character → 4-bit value without branching.
#[inline(always)]
fn hex_digit_branchless(b: u8) -> u8 {
    let is_digit = (b.wrapping_sub(b'0') < 10) as u8;
    let is_lower = (b.wrapping_sub(b'a') < 6) as u8;
    let is_upper = (b.wrapping_sub(b'A') < 6) as u8;

    let digit_val = b.wrapping_sub(b'0');
    let lower_val = b.wrapping_sub(b'a').wrapping_add(10);
    let upper_val = b.wrapping_sub(b'A').wrapping_add(10);

    is_digit.wrapping_mul(digit_val)
        .wrapping_add(is_lower.wrapping_mul(lower_val))
        .wrapping_add(is_upper.wrapping_mul(upper_val))
}

#[inline(always)]
fn hex_byte_branchless(hi: u8, lo: u8) -> u8 {
    (hex_digit_branchless(hi) << 4) | hex_digit_branchless(lo)
}

/// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
///
/// Returns `Rgba::BLACK` on invalid input.
pub fn parse_hex_color(s: &str) -> Rgba {
    let bytes = s.trim().as_bytes();
    let len = bytes.len();

    if len == 0 || bytes[0] != b'#' {
        return Rgba::BLACK;
    }

    let nibble = |i: usize| {
        let v = hex_digit_branchless(bytes[i]);
        v << 4 | v
    };

    match len {
        4 => Rgba { r: nibble(1), g: nibble(2), b: nibble(3), a: 255 },
        5 => Rgba { r: nibble(1), g: nibble(2), b: nibble(3), a: nibble(4) },
        7 => Rgba {
            r: hex_byte_branchless(bytes[1], bytes[2]),
            g: hex_byte_branchless(bytes[3], bytes[4]),
            b: hex_byte_branchless(bytes[5], bytes[6]),
            a: 255,
        },
        9 => Rgba {
            r: hex_byte_branchless(bytes[1], bytes[2]),
            g: hex_byte_branchless(bytes[3], bytes[4]),
            b: hex_byte_branchless(bytes[5], bytes[6]),
            a: hex_byte_branchless(bytes[7], bytes[8]),
        },
        _ => Rgba::BLACK,
    }
}

// ── Palette ──

pub mod palette {
    use super::Rgba;

    pub const PENDING: Rgba = Rgba::rgb(0xfb, 0xbf, 0x24);
    pub const PENDING_DEEP: Rgba = Rgba::rgb(0xf5, 0x9e, 0x0b);
    pub const IN_PROGRESS: Rgba = Rgba::rgb(0x3b, 0x82, 0xf6);
    pub const IN_PROGRESS_DEEP: Rgba = Rgba::rgb(0x1d, 0x4e, 0xd8);
    pub const COMPLETED: Rgba = Rgba::rgb(0x4a, 0xde, 0x80);
    pub const COMPLETED_DEEP: Rgba = Rgba::rgb(0x05, 0x96, 0x69);
    pub const LAGGING: Rgba = Rgba::rgb(0xf8, 0x71, 0x71);
    pub const NEUTRAL: Rgba = Rgba::rgb(0x6b, 0x72, 0x80);

    pub const CARD: Rgba = Rgba::rgb(0x0f, 0x17, 0x2a);
    pub const CARD_HOVER: Rgba = Rgba::rgb(0x1e, 0x29, 0x3b);
    pub const CARD_BORDER_HOVER: Rgba = Rgba::rgb(0x3b, 0x82, 0xf6);
    pub const ROLE_TEXT: Rgba = Rgba::rgb(0x94, 0xa3, 0xb8);
    pub const NOTE_TEXT: Rgba = Rgba::rgb(0x1f, 0x29, 0x37);
    pub const PAPER: Rgba = Rgba::rgb(0xf5, 0xf5, 0xf5);

    pub const BACKDROP_DARK: Rgba = Rgba::rgb(0x11, 0x18, 0x27);
    pub const BACKDROP_LIGHT: Rgba = Rgba::rgb(0xef, 0xf6, 0xff);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_digit_branchless() {
        assert_eq!(hex_digit_branchless(b'0'), 0);
        assert_eq!(hex_digit_branchless(b'9'), 9);
        assert_eq!(hex_digit_branchless(b'a'), 10);
        assert_eq!(hex_digit_branchless(b'F'), 15);
    }

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(parse_hex_color("#fbbf24"), palette::PENDING);
        assert_eq!(parse_hex_color("#F80"), Rgba { r: 255, g: 136, b: 0, a: 255 });
        assert_eq!(parse_hex_color("#ffffff88"), Rgba::WHITE.with_alpha(0x88));
        assert_eq!(parse_hex_color("not-a-color"), Rgba::BLACK);
    }

    #[test]
    fn test_interpolate_color_endpoints() {
        let a = Rgba::rgb(0, 0, 0);
        let b = Rgba::rgb(200, 100, 50);
        assert_eq!(interpolate_color(a, b, 0.0), a);
        assert_eq!(interpolate_color(a, b, 1.0), b);
        assert_eq!(interpolate_color(a, b, 0.5), Rgba::rgb(100, 50, 25));
        assert_eq!(interpolate_color(a, b, 7.0), b);
    }

    #[test]
    fn test_sample_stops() {
        let stops = [Rgba::BLACK, Rgba::WHITE, Rgba::BLACK];
        assert_eq!(sample_stops(&stops, 0.0), Rgba::BLACK);
        assert_eq!(sample_stops(&stops, 0.5), Rgba::WHITE);
        assert_eq!(sample_stops(&stops, 1.0), Rgba::BLACK);
        assert_eq!(sample_stops(&[], 0.3), Rgba::TRANSPARENT);
        assert_eq!(sample_stops(&[palette::PAPER], 0.9), palette::PAPER);
    }

    #[test]
    fn test_blend_over() {
        let base = Rgba::BLACK;
        assert_eq!(base.blend_over(Rgba::WHITE, 0.0), Rgba::BLACK);
        let half = base.blend_over(Rgba::WHITE, 0.5);
        assert!((half.r as i32 - 128).abs() <= 1);
    }
}
