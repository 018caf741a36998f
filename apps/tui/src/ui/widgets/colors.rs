use chuva_alerta_core::risk::Rgb;
use ratatui::style::Color;

pub const fn rgb(color: Rgb) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

/// Area shading under the trend curve, from the base up.
pub const TREND_BANDS: [Color; 3] = [
    Color::Rgb(30, 58, 138),
    Color::Rgb(37, 99, 235),
    Color::Rgb(96, 165, 250),
];

pub const TREND_LINE: Color = Color::Rgb(59, 130, 246);
pub const ACCENT: Color = Color::Cyan;
pub const MUTED: Color = Color::DarkGray;
