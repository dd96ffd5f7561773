//! # Color 模块
//!
//! 十六进制颜色解析（`#RRGGBB` / `#AARRGGBB`，`#` 可省略）。

use std::fmt;

/// RGBA 颜色，各分量取值 0.0 - 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// 解析十六进制颜色
    ///
    /// 无法解析时返回 `None`，调用方决定如何上报。
    pub fn parse(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        let channel = |i: usize| -> Option<f32> {
            u8::from_str_radix(digits.get(i..i + 2)?, 16)
                .ok()
                .map(|v| v as f32 / 255.0)
        };

        match digits.len() {
            6 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, 1.0)),
            8 => Some(Self::rgba(channel(2)?, channel(4)?, channel(6)?, channel(0)?)),
            _ => None,
        }
    }

    /// 返回替换了透明度的新颜色
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        write!(
            f,
            "#{:02X}{:02X}{:02X}{:02X}",
            to_u8(self.a),
            to_u8(self.r),
            to_u8(self.g),
            to_u8(self.b)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rgb() {
        let c = Color::parse("#FF0000").unwrap();
        assert_eq!(c, Color::rgba(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_parse_without_hash() {
        assert_eq!(Color::parse("00ff00"), Some(Color::rgba(0.0, 1.0, 0.0, 1.0)));
    }

    #[test]
    fn test_parse_argb() {
        let c = Color::parse("#800000FF").unwrap();
        assert_eq!(c.b, 1.0);
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Color::parse("").is_none());
        assert!(Color::parse("#12345").is_none());
        assert!(Color::parse("#GG0000").is_none());
        assert!(Color::parse("#+F0000").is_none());
    }

    #[test]
    fn test_with_alpha_and_display() {
        let c = Color::parse("#272239").unwrap().with_alpha(0.32);
        assert_eq!(c.a, 0.32);
        assert_eq!(c.to_string(), "#52272239");
    }
}
