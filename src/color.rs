use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An HSL color: `h` in degrees `[0, 360)`, `s` and `l` in percent `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

fn round3(v: f32) -> f32 {
    (v * 1000.0).round() / 1000.0
}

impl Hsl {
    /// Builds a color, normalizing hue into `[0, 360)` and clamping the percentages.
    /// Components are kept to three decimals.
    pub fn new(h: f32, s: f32, l: f32) -> Self {
        Self {
            h: round3(h.rem_euclid(360.0)),
            s: round3(s.clamp(0.0, 100.0)),
            l: round3(l.clamp(0.0, 100.0)),
        }
    }

    pub const WHITE: Hsl = Hsl {
        h: 0.0,
        s: 0.0,
        l: 100.0,
    };

    pub const BLACK: Hsl = Hsl {
        h: 0.0,
        s: 0.0,
        l: 0.0,
    };

    pub fn to_rgba(&self) -> Rgba<u8> {
        let s = self.s / 100.0;
        let l = self.l / 100.0;
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let hp = self.h / 60.0;
        let x = c * (1.0 - (hp.rem_euclid(2.0) - 1.0).abs());
        let (r, g, b) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgba([to_u8(r), to_u8(g), to_u8(b), 255])
    }

    pub fn from_rgba(rgba: Rgba<u8>) -> Self {
        let r = rgba[0] as f32 / 255.0;
        let g = rgba[1] as f32 / 255.0;
        let b = rgba[2] as f32 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let d = max - min;
        if d == 0.0 {
            return Self::new(0.0, 0.0, l * 100.0);
        }
        let s = d / (1.0 - (2.0 * l - 1.0).abs());
        let h = if max == r {
            60.0 * ((g - b) / d).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / d + 2.0)
        } else {
            60.0 * ((r - g) / d + 4.0)
        };
        Self::new(h, s * 100.0, l * 100.0)
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.h, self.s, self.l)
    }
}

/// Which of the two application colors a picker edit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorProperty {
    Fill,
    #[default]
    Stroke,
}

impl ColorProperty {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fillColor" => Some(Self::Fill),
            "strokeColor" => Some(Self::Stroke),
            _ => None,
        }
    }
}

/// How the 2-D saturation/value picker maps to HSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PickerMode {
    /// The picker area is saturation/brightness, converted to HSL
    #[default]
    Hsb,
    /// The picker area is saturation/lightness directly
    Hsl,
}

/// Hue for a position on the vertical hue picker, `0.0` being the top.
/// The top of the strip is 360°, which wraps to 0.
pub fn hue_from_picker(fraction: f32) -> f32 {
    (360.0 * (1.0 - fraction.clamp(0.0, 1.0))).rem_euclid(360.0)
}

/// Saturation/lightness percentages for a position on the 2-D picker.
pub fn picker_to_saturation_lightness(mode: PickerMode, sat: f32, val: f32) -> (f32, f32) {
    let (sat, val) = (sat.clamp(0.0, 1.0), val.clamp(0.0, 1.0));
    match mode {
        PickerMode::Hsb => {
            let l = val * (1.0 - sat / 2.0);
            let s = if l == 0.0 || l == 1.0 {
                0.0
            } else {
                (val - l) / l.min(1.0 - l)
            };
            (s * 100.0, l * 100.0)
        }
        PickerMode::Hsl => (sat * 100.0, val * 100.0),
    }
}

/// Fill and stroke colors plus the picker settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppColorState {
    pub fill: Hsl,
    pub stroke: Hsl,
    pub selected: ColorProperty,
    pub picker_mode: PickerMode,
}

impl Default for AppColorState {
    fn default() -> Self {
        Self {
            fill: Hsl::WHITE,
            stroke: Hsl::BLACK,
            selected: ColorProperty::Stroke,
            picker_mode: PickerMode::Hsb,
        }
    }
}

impl AppColorState {
    pub fn get(&self, property: ColorProperty) -> Hsl {
        match property {
            ColorProperty::Fill => self.fill,
            ColorProperty::Stroke => self.stroke,
        }
    }

    pub fn set(&mut self, property: ColorProperty, color: Hsl) {
        let color = Hsl::new(color.h, color.s, color.l);
        match property {
            ColorProperty::Fill => self.fill = color,
            ColorProperty::Stroke => self.stroke = color,
        }
    }

    /// Applies a picker-area position to `property`, keeping its hue.
    pub fn set_by_percentages(&mut self, property: ColorProperty, sat: f32, val: f32) -> Hsl {
        let (s, l) = picker_to_saturation_lightness(self.picker_mode, sat, val);
        let current = self.get(property);
        self.set(property, Hsl::new(current.h, s, l));
        self.get(property)
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.fill, &mut self.stroke);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsl_to_rgba() {
        assert_eq!(Hsl::new(0.0, 0.0, 50.0).to_rgba(), Rgba([128, 128, 128, 255]));
        assert_eq!(Hsl::new(0.0, 100.0, 50.0).to_rgba(), Rgba([255, 0, 0, 255]));
        assert_eq!(Hsl::new(240.0, 100.0, 50.0).to_rgba(), Rgba([0, 0, 255, 255]));
        assert_eq!(Hsl::WHITE.to_rgba(), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_rgba_round_trip_for_primaries() {
        let green = Hsl::from_rgba(Rgba([0, 255, 0, 255]));
        assert_eq!(green, Hsl::new(120.0, 100.0, 50.0));
    }

    #[test]
    fn test_display_matches_css() {
        assert_eq!(Hsl::new(12.3456, 50.0, 40.0).to_string(), "hsl(12.346, 50%, 40%)");
    }

    #[test]
    fn test_hue_picker_is_inverted() {
        assert_eq!(hue_from_picker(0.0), 0.0);
        assert_eq!(hue_from_picker(0.25), 270.0);
        assert_eq!(hue_from_picker(1.0), 0.0);
    }

    #[test]
    fn test_hsb_picker_conversion() {
        // Full brightness, no saturation is white.
        assert_eq!(picker_to_saturation_lightness(PickerMode::Hsb, 0.0, 1.0), (0.0, 100.0));
        // Pure hue at full saturation and brightness.
        assert_eq!(picker_to_saturation_lightness(PickerMode::Hsb, 1.0, 1.0), (100.0, 50.0));
        let (s, l) = picker_to_saturation_lightness(PickerMode::Hsl, 0.3, 0.6);
        assert!((s - 30.0).abs() < 1e-3 && (l - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_swap_and_lookup() {
        let mut colors = AppColorState::default();
        colors.swap();
        assert_eq!(colors.fill, Hsl::BLACK);
        assert_eq!(colors.stroke, Hsl::WHITE);
        assert_eq!(ColorProperty::from_name("fillColor"), Some(ColorProperty::Fill));
        assert_eq!(ColorProperty::from_name("bogus"), None);
    }
}
