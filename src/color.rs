//! Named chart color palettes.

use serde::{Deserialize, Serialize};

/// A named palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// General-purpose categorical palette.
    #[default]
    Default,
    /// Soft, low-saturation colors.
    Pastel,
    /// High-saturation colors.
    Vibrant,
    /// Shades of a single blue hue, dark to light.
    Monochrome,
}

impl ColorScheme {
    /// Parse a scheme name. Unrecognized names fall back to [`ColorScheme::Default`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "pastel" => Self::Pastel,
            "vibrant" => Self::Vibrant,
            "monochrome" => Self::Monochrome,
            _ => Self::Default,
        }
    }

    /// The palette's colors as `#rrggbb` strings.
    pub fn palette(&self) -> &'static [&'static str] {
        match self {
            Self::Default => &[
                "#8884d8", "#82ca9d", "#ffc658", "#ff7300", "#0088fe", "#00c49f", "#ffbb28", "#ff8042",
            ],
            Self::Pastel => &[
                "#fbb4ae", "#b3cde3", "#ccebc5", "#decbe4", "#fed9a6", "#ffffcc", "#e5d8bd", "#fddaec",
            ],
            Self::Vibrant => &[
                "#e6194b", "#3cb44b", "#ffe119", "#4363d8", "#f58231", "#911eb4", "#46f0f0", "#f032e6",
            ],
            Self::Monochrome => &["#08306b", "#08519c", "#2171b5", "#4292c6", "#6baed6", "#9ecae1", "#c6dbef"],
        }
    }
}

/// Returns `count` colors from `scheme`, cycling when `count` exceeds the palette length.
pub fn generate_color_scheme(count: usize, scheme: ColorScheme) -> Vec<String> {
    scheme
        .palette()
        .iter()
        .cycle()
        .take(count)
        .map(|c| (*c).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_palette() {
        let palette = ColorScheme::Monochrome.palette();
        let colors = generate_color_scheme(palette.len() + 2, ColorScheme::Monochrome);
        assert_eq!(colors.len(), palette.len() + 2);
        assert_eq!(colors[palette.len()], palette[0]);
        assert_eq!(colors[palette.len() + 1], palette[1]);
    }

    #[test]
    fn zero_count_is_empty() {
        assert!(generate_color_scheme(0, ColorScheme::Vibrant).is_empty());
    }

    #[test]
    fn unknown_scheme_name_uses_default() {
        assert_eq!(ColorScheme::from_name("neon"), ColorScheme::Default);
        assert_eq!(
            generate_color_scheme(3, ColorScheme::from_name("neon")),
            vec!["#8884d8", "#82ca9d", "#ffc658"]
        );
    }

    #[test]
    fn all_palettes_are_hex() {
        for scheme in [
            ColorScheme::Default,
            ColorScheme::Pastel,
            ColorScheme::Vibrant,
            ColorScheme::Monochrome,
        ] {
            for c in scheme.palette() {
                assert_eq!(c.len(), 7);
                assert!(c.starts_with('#'));
                assert!(c[1..].chars().all(|ch| ch.is_ascii_hexdigit()));
            }
        }
    }
}
