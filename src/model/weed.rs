//! Weed label presentation: overlay colors and display names.

use serde::Serialize;

/// Label used for detections without a recognized weed type.
pub const UNKNOWN_WEED: &str = "Unknown Weed";

/// Overlay style for one weed type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeedStyle {
    /// Weed type this style belongs to
    pub label: &'static str,
    /// CSS color name, used by the browser overlay
    pub css_color: &'static str,
    /// RGB equivalent of `css_color`
    pub color: [u8; 3],
}

impl WeedStyle {
    const fn new(label: &'static str, css_color: &'static str, color: [u8; 3]) -> Self {
        Self {
            label,
            css_color,
            color,
        }
    }
}

/// Style for labels missing from the table.
static UNKNOWN_STYLE: WeedStyle = WeedStyle::new(UNKNOWN_WEED, "gray", [128, 128, 128]);

/// Known weed types and their overlay colors.
static WEED_STYLES: &[WeedStyle] = &[
    WeedStyle::new("Common purslane", "darkred", [139, 0, 0]),
    WeedStyle::new("Goosegrass", "darkgreen", [0, 100, 0]),
    WeedStyle::new("Asthma-plant", "darkblue", [0, 0, 139]),
    WeedStyle::new("Blue porterweed", "purple", [128, 0, 128]),
    WeedStyle::new("Santa Maria feverfew", "orange", [255, 165, 0]),
    WeedStyle::new("Water hyacinth", "teal", [0, 128, 128]),
    WeedStyle::new("Climbing dayflower", "brown", [165, 42, 42]),
    WeedStyle::new("Common plantain", "olive", [128, 128, 0]),
    WeedStyle::new("Arrowleaf sida", "indigo", [75, 0, 130]),
    WeedStyle::new("Oriental false hawksbeard", "darkcyan", [0, 139, 139]),
];

/// Style used for labels missing from the table.
pub fn unknown_style() -> &'static WeedStyle {
    &UNKNOWN_STYLE
}

/// Overlay style for a weed label, falling back to the "Unknown Weed" style.
pub fn style_for_label(label: &str) -> &'static WeedStyle {
    WEED_STYLES
        .iter()
        .find(|s| s.label == label)
        .unwrap_or(&UNKNOWN_STYLE)
}

/// Name shown to the user for a label. Unrecognized labels show as "Unknown Weed".
pub fn display_name(label: &str) -> &'static str {
    style_for_label(label).label
}

/// Hover text for an overlay box, e.g. `Weed: Goosegrass (Confidence: 95.00%)`.
pub fn tooltip(label: &str, confidence: f32) -> String {
    format!(
        "Weed: {} (Confidence: {:.2}%)",
        display_name(label),
        confidence * 100.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_label_style() {
        let style = style_for_label("Goosegrass");
        assert_eq!(style.label, "Goosegrass");
        assert_eq!(style.css_color, "darkgreen");
        assert_eq!(style.color, [0, 100, 0]);
    }

    #[test]
    fn test_unknown_label_falls_back() {
        for label in ["Mystery Plant", "", "goosegrass", "Unknown Weed"] {
            let style = style_for_label(label);
            assert_eq!(style, unknown_style());
            assert_eq!(style.css_color, "gray");
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("Water hyacinth"), "Water hyacinth");
        assert_eq!(display_name("Broadleaf Weed"), UNKNOWN_WEED);
    }

    #[test]
    fn test_tooltip_format() {
        assert_eq!(
            tooltip("Goosegrass", 0.95),
            "Weed: Goosegrass (Confidence: 95.00%)"
        );
        assert_eq!(
            tooltip("Mystery Plant", 0.6),
            "Weed: Unknown Weed (Confidence: 60.00%)"
        );
    }

    #[test]
    fn test_table_has_unique_labels() {
        for (i, a) in WEED_STYLES.iter().enumerate() {
            assert!(WEED_STYLES[i + 1..].iter().all(|b| b.label != a.label));
            assert_ne!(a.label, UNKNOWN_WEED);
        }
        assert_eq!(style_for_label("Arrowleaf sida").css_color, "indigo");
        assert_eq!(style_for_label("Nut Sedge"), unknown_style());
    }
}
