use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// A color with a separate alpha channel. Serializes as its channels;
/// chart configurations write it as CSS `rgba(...)` via [`serialize_css`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: f32,
}

impl Rgba {
    pub const fn new(red: u8, green: u8, blue: u8, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub const fn opaque(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, 1.0)
    }

    /// Same hue with a different alpha; alpha is clamped to [0, 1].
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            self.red, self.green, self.blue, self.alpha
        )
    }
}

/// `serialize_with` helper for fields the charting library reads as CSS.
pub fn serialize_css<S: Serializer>(color: &Rgba, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(color)
}

/// The dashboard palette shared by every chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub primary: Rgba,
    pub success: Rgba,
    pub danger: Rgba,
    pub warning: Rgba,
    pub info: Rgba,
    pub primary_light: Rgba,
    pub success_light: Rgba,
    pub danger_light: Rgba,
    pub warning_light: Rgba,
    pub info_light: Rgba,
}

const FILL_ALPHA: f32 = 0.8;
const LIGHT_ALPHA: f32 = 0.1;

pub const fn colors() -> Palette {
    Palette {
        primary: Rgba::new(13, 110, 253, FILL_ALPHA),
        success: Rgba::new(25, 135, 84, FILL_ALPHA),
        danger: Rgba::new(220, 53, 69, FILL_ALPHA),
        warning: Rgba::new(255, 193, 7, FILL_ALPHA),
        info: Rgba::new(13, 202, 240, FILL_ALPHA),
        primary_light: Rgba::new(13, 110, 253, LIGHT_ALPHA),
        success_light: Rgba::new(25, 135, 84, LIGHT_ALPHA),
        danger_light: Rgba::new(220, 53, 69, LIGHT_ALPHA),
        warning_light: Rgba::new(255, 193, 7, LIGHT_ALPHA),
        info_light: Rgba::new(13, 202, 240, LIGHT_ALPHA),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_css_rgba() {
        assert_eq!(colors().primary.css(), "rgba(13, 110, 253, 0.8)");
        assert_eq!(colors().danger_light.css(), "rgba(220, 53, 69, 0.1)");
        assert_eq!(colors().primary.with_alpha(1.0).css(), "rgba(13, 110, 253, 1)");
    }

    #[test]
    fn with_alpha_keeps_hue_for_any_input_alpha() {
        let custom = Rgba::new(10, 20, 30, 0.35);
        let border = custom.with_alpha(1.0);
        assert_eq!((border.red, border.green, border.blue), (10, 20, 30));
        assert_ne!(border, custom);
        assert!((Rgba::opaque(1, 2, 3).with_alpha(7.0).alpha - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn serializes_as_channels() {
        let value = serde_json::to_value(Rgba::new(1, 2, 3, 0.5)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "red": 1, "green": 2, "blue": 3, "alpha": 0.5 })
        );
    }

    #[test]
    fn palette_entries_round_trip_through_json() {
        let palette = serde_json::to_value(colors()).unwrap();
        assert!(palette["info"].is_object());

        let info: Rgba = serde_json::from_value(palette["info"].clone()).unwrap();
        assert_eq!(info, colors().info);
    }
}
