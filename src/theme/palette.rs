use serde::Serialize;

use super::{CardStyle, FontStyle, PrimaryColor, ThemeMode, ThemePreferences};

const SPACING_UNIT: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub primary: &'static str,
    pub background: &'static str,
    pub surface: &'static str,
    pub text_primary: &'static str,
    pub text_secondary: &'static str,
    pub border: &'static str,
    pub accent: &'static str,
    pub error: &'static str,
    pub success: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardTheme {
    pub style: CardStyle,
    pub radius: u32,
    pub border_width: u32,
    pub border_color: &'static str,
    pub elevation: u32,
}

/// Concrete look derived from [`ThemePreferences`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub colors: Palette,
    pub card: CardTheme,
    pub font_style: FontStyle,
    pub animations_enabled: bool,
}

impl Theme {
    pub fn resolve(prefs: &ThemePreferences) -> Self {
        let dark = prefs.theme_mode == ThemeMode::Dark;
        let border = if dark { "#334155" } else { "#D1D5DB" };

        let colors = Palette {
            primary: match prefs.primary_color {
                PrimaryColor::Blue => "#3B82F6",
                PrimaryColor::Purple => "#A855F7",
                PrimaryColor::Green => "#22C55E",
                PrimaryColor::Orange => "#F59E0B",
            },
            background: if dark { "#0F172A" } else { "#FFFFFF" },
            surface: if dark { "#1E293B" } else { "#F2F2F2" },
            text_primary: if dark { "#FFFFFF" } else { "#111827" },
            text_secondary: if dark { "#CBD5E1" } else { "#4B5563" },
            border,
            accent: "#F97316",
            error: "#F97373",
            success: "#22C55E",
        };

        let card = match prefs.card_style {
            CardStyle::Default => CardTheme {
                style: CardStyle::Default,
                radius: 10,
                border_width: 1,
                border_color: border,
                elevation: 2,
            },
            CardStyle::Rounded => CardTheme {
                style: CardStyle::Rounded,
                radius: 20,
                border_width: 1,
                border_color: border,
                elevation: 0,
            },
            CardStyle::Gradient => CardTheme {
                style: CardStyle::Gradient,
                radius: 18,
                border_width: 0,
                border_color: "rgba(255,255,255,0.25)",
                elevation: 4,
            },
        };

        Self {
            colors,
            card,
            font_style: prefs.font_style,
            animations_enabled: prefs.animations_enabled,
        }
    }

    pub fn spacing(&self, multiplier: u32) -> u32 {
        multiplier * SPACING_UNIT
    }
}
