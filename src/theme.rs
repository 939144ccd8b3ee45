use std::fmt;

use serde::{Deserialize, Serialize};

/// A packed 32-bit `0xAARRGGBB` color, the form colors arrive in from the phone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Argb(pub u32);

impl Argb {
    pub const WHITE: Argb = Argb(0xFFFF_FFFF);
    pub const DARK_GRAY: Argb = Argb(0xFF44_4444);

    pub const fn from_parts(a: u8, r: u8, g: u8, b: u8) -> Self {
        Argb((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Accepts both signed (`-16777216`) and unsigned (`4278190080`) encodings
    /// of the same 32 bits.
    pub fn from_i64(value: i64) -> Option<Self> {
        if (i64::from(i32::MIN)..=i64::from(u32::MAX)).contains(&value) {
            Some(Argb(value as u32))
        } else {
            None
        }
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    pub fn to_hsl(self) -> Hsl {
        let r = f32::from(self.red()) / 255.0;
        let g = f32::from(self.green()) / 255.0;
        let b = f32::from(self.blue()) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;
        let lightness = (max + min) / 2.0;

        let (hue, saturation) = if delta == 0.0 {
            (0.0, 0.0)
        } else {
            let h = if max == r {
                ((g - b) / delta) % 6.0
            } else if max == g {
                (b - r) / delta + 2.0
            } else {
                (r - g) / delta + 4.0
            };
            (h, delta / (1.0 - (2.0 * lightness - 1.0).abs()))
        };

        let mut hue = (hue * 60.0) % 360.0;
        if hue < 0.0 {
            hue += 360.0;
        }

        Hsl {
            hue: hue.clamp(0.0, 360.0),
            saturation: saturation.clamp(0.0, 1.0),
            lightness: lightness.clamp(0.0, 1.0),
        }
    }

    /// Rebuilds a color from `hsl`, keeping this color's alpha channel.
    pub fn with_hsl(self, hsl: Hsl) -> Self {
        let (r, g, b) = hsl.to_rgb();
        Argb::from_parts(self.alpha(), r, g, b)
    }

    /// Derive a variant of this color. Never invents a color; callers pick
    /// their own fallback when no theme color is synced.
    pub fn variant(self, kind: ColorVariant) -> Self {
        self.with_hsl(self.to_hsl().adjusted(kind))
    }

    pub fn toned(self) -> Self {
        self.variant(ColorVariant::Toned)
    }

    pub fn light_accent(self) -> Self {
        self.variant(ColorVariant::LightAccent)
    }
}

impl fmt::Display for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorVariant {
    /// Dark, slightly desaturated; card backgrounds.
    Toned,
    /// Brighter and more saturated; accent text on dark backgrounds.
    LightAccent,
}

/// Hue in degrees `[0, 360)`, saturation and lightness in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl Hsl {
    pub fn adjusted(mut self, kind: ColorVariant) -> Self {
        match kind {
            ColorVariant::Toned => {
                self.lightness = 0.25;
                self.saturation = (self.saturation * 0.8).clamp(0.0, 1.0);
            }
            ColorVariant::LightAccent => {
                self.lightness = (self.lightness + 0.3).clamp(0.0, 1.0);
                self.saturation = (self.saturation + 0.2).clamp(0.0, 1.0);
            }
        }
        self
    }

    fn to_rgb(self) -> (u8, u8, u8) {
        let Hsl {
            hue,
            saturation,
            lightness,
        } = self;

        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let m = lightness - 0.5 * c;
        let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());

        let (r, g, b) = match (hue / 60.0) as u32 {
            0 => (c + m, x + m, m),
            1 => (x + m, c + m, m),
            2 => (m, c + m, x + m),
            3 => (m, x + m, c + m),
            4 => (x + m, m, c + m),
            _ => (c + m, m, x + m),
        };

        (channel(r), channel(g), channel(b))
    }
}

fn channel(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Up to three synced theme colors. Only `primary` feeds the derived colors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeColors {
    pub primary: Option<Argb>,
    pub secondary: Option<Argb>,
    pub tertiary: Option<Argb>,
}

impl ThemeColors {
    /// Colors present in `update` win; absent ones keep the current value.
    pub fn merged_with(self, update: ThemeColors) -> ThemeColors {
        ThemeColors {
            primary: update.primary.or(self.primary),
            secondary: update.secondary.or(self.secondary),
            tertiary: update.tertiary.or(self.tertiary),
        }
    }
}

/// Fixed colors used by the surfaces when no theme color has been synced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fallbacks {
    pub accent: Argb,
    pub card: Argb,
    pub chip: Argb,
    pub greeting: Argb,
    pub title: Argb,
    pub complication: Argb,
}

impl Default for Fallbacks {
    fn default() -> Self {
        Self {
            accent: Argb(0xFFEE_EEEE),
            card: Argb(0xFF33_3333),
            chip: Argb::DARK_GRAY,
            greeting: Argb(0xFFB3_9DDB),
            title: Argb(0xFFAE_CBFA),
            complication: Argb::WHITE,
        }
    }
}

/// Parse a color string: hex "#rrggbb" (opaque), "#aarrggbb", or named colors.
pub fn parse_color(s: &str) -> Option<Argb> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        let value = u32::from_str_radix(hex, 16).ok()?;
        return match hex.len() {
            6 => Some(Argb(0xFF00_0000 | value)),
            8 => Some(Argb(value)),
            _ => None,
        };
    }
    match s.to_lowercase().as_str() {
        "black" => Some(Argb(0xFF00_0000)),
        "white" => Some(Argb::WHITE),
        "red" => Some(Argb(0xFFFF_0000)),
        "green" => Some(Argb(0xFF00_FF00)),
        "blue" => Some(Argb(0xFF00_00FF)),
        "gray" | "grey" => Some(Argb(0xFF88_8888)),
        "darkgray" | "darkgrey" => Some(Argb::DARK_GRAY),
        "transparent" => Some(Argb(0)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toned_red_has_quarter_lightness_and_keeps_alpha() {
        let toned = Argb(0xFFFF_0000).toned();
        assert_eq!(toned, Argb(0xFF73_0D0D));
        assert_eq!(toned.alpha(), 0xFF);

        let adjusted = Argb(0xFFFF_0000).to_hsl().adjusted(ColorVariant::Toned);
        assert_eq!(adjusted.lightness, 0.25);
        assert_eq!(adjusted.saturation, 0.8);

        // 8-bit channels can only land within one step of the exact lightness.
        let hsl = toned.to_hsl();
        assert!((hsl.lightness - 0.25).abs() <= 1.0 / 255.0);
        assert!((hsl.saturation - 0.8).abs() < 0.01);
    }

    #[test]
    fn variants_preserve_translucent_alpha() {
        let base = Argb(0x8012_34AB);
        assert_eq!(base.toned().alpha(), 0x80);
        assert_eq!(base.light_accent().alpha(), 0x80);
    }

    #[test]
    fn light_accent_clamps_lightness_and_saturation() {
        // Pure red: s=1, l=0.5 -> s stays 1, l becomes 0.8.
        let accent = Argb(0xFFFF_0000).light_accent();
        assert_eq!(accent, Argb(0xFFFF_9999));

        // White is already at full lightness.
        assert_eq!(Argb::WHITE.light_accent(), Argb::WHITE);
    }

    #[test]
    fn hsl_round_trips_primary_hues() {
        for color in [0xFFFF_0000, 0xFF00_FF00, 0xFF00_00FF, 0xFFFF_FF00, 0xFF80_8080] {
            let argb = Argb(color);
            assert_eq!(argb.with_hsl(argb.to_hsl()), argb, "{argb}");
        }
    }

    #[test]
    fn hue_of_magenta_wraps_positive() {
        let hsl = Argb(0xFFFF_00FF).to_hsl();
        assert!((hsl.hue - 300.0).abs() < 0.01);
    }

    #[test]
    fn signed_and_unsigned_encodings_agree() {
        assert_eq!(Argb::from_i64(-16_777_216), Some(Argb(0xFF00_0000)));
        assert_eq!(Argb::from_i64(4_278_190_080), Some(Argb(0xFF00_0000)));
        assert_eq!(Argb::from_i64(-1), Some(Argb::WHITE));
        assert_eq!(Argb::from_i64(1 << 32), None);
        assert_eq!(Argb::from_i64(i64::from(i32::MIN) - 1), None);
    }

    #[test]
    fn merge_keeps_colors_missing_from_update() {
        let stored = ThemeColors {
            primary: Some(Argb(1)),
            secondary: Some(Argb(2)),
            tertiary: None,
        };
        let update = ThemeColors {
            primary: Some(Argb(9)),
            ..ThemeColors::default()
        };
        let merged = stored.merged_with(update);
        assert_eq!(merged.primary, Some(Argb(9)));
        assert_eq!(merged.secondary, Some(Argb(2)));
        assert_eq!(merged.tertiary, None);
    }

    #[test]
    fn parses_hex_and_named_colors() {
        assert_eq!(parse_color("#b39ddb"), Some(Argb(0xFFB3_9DDB)));
        assert_eq!(parse_color(" #80FFFFFF "), Some(Argb(0x80FF_FFFF)));
        assert_eq!(parse_color("DarkGray"), Some(Argb::DARK_GRAY));
        assert_eq!(parse_color("#fff"), None);
        assert_eq!(parse_color("chartreuse"), None);
    }

    #[test]
    fn displays_as_argb_hex() {
        assert_eq!(Argb(0xFF12_34AB).to_string(), "#FF1234AB");
    }
}
