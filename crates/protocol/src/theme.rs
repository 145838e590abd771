use serde::{Deserialize, Serialize};

use crate::types::Color;

/// Semantic colour tokens for chart furniture, resolved by the active theme.
///
/// Bars carry concrete colours because their fill is animated; only the
/// static decorations go through tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,
    AxisLine,
    AxisText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn resolve(self, token: ThemeToken) -> Color {
        match (self, token) {
            (Theme::Light, ThemeToken::Background) => Color::WHITE,
            (Theme::Light, ThemeToken::AxisLine | ThemeToken::AxisText) => Color::BLACK,
            (Theme::Dark, ThemeToken::Background) => Color::rgb(0x1a, 0x1a, 0x2e),
            (Theme::Dark, ThemeToken::AxisLine) => Color::rgb(0x9e, 0x9e, 0x9e),
            (Theme::Dark, ThemeToken::AxisText) => Color::rgb(0xec, 0xec, 0xec),
        }
    }
}
