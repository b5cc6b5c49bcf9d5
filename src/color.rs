use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.45);
            let rgb: Srgb = hsl.into_color();
            RGBColor(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: condition name → RGBColor
// ---------------------------------------------------------------------------

/// Maps condition names to distinct colours, stable across the plots of one
/// rendering run. Assignment order follows the given name order, so legends
/// line up between plot types.
#[derive(Debug, Clone)]
pub struct ConditionColors {
    mapping: Vec<(String, RGBColor)>,
    default_color: RGBColor,
}

impl ConditionColors {
    /// Assign palette colours to conditions in the given order.
    pub fn new(conditions: &[String]) -> Self {
        let palette = generate_palette(conditions.len());
        let mapping = conditions
            .iter()
            .cloned()
            .zip(palette)
            .collect();
        ConditionColors {
            mapping,
            default_color: RGBColor(128, 128, 128),
        }
    }

    /// Look up the colour for a condition; unknown names get grey.
    pub fn color_for(&self, condition: &str) -> RGBColor {
        self.mapping
            .iter()
            .find(|(name, _)| name == condition)
            .map(|(_, c)| *c)
            .unwrap_or(self.default_color)
    }

    /// Legend entries (condition name → colour) in assignment order.
    pub fn legend_entries(&self) -> impl Iterator<Item = (&str, RGBColor)> {
        self.mapping.iter().map(|(n, c)| (n.as_str(), *c))
    }
}
