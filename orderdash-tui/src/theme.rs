//! Parrot/neon theme tokens.
//!
//! # Color Palette
//! - **Accent**: Electric cyan (primary highlights, focus)
//! - **Positive**: Neon green (bids, fills)
//! - **Negative**: Hot pink (asks, errors)
//! - **Warning**: Neon orange (alerts, partial fills)
//! - **Neutral**: Cool purple (secondary info)
//! - **Muted**: Steel blue (labels, placeholders)

use ratatui::style::{Color, Modifier, Style};

use orderdash_core::{OrderStatus, Side};

pub const BACKGROUND: Color = Color::Rgb(18, 18, 20);
pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT: Color = Color::White;
pub const TEXT_SECONDARY: Color = Color::Rgb(170, 170, 170);

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

/// Bids green, asks red, matching the depth charts.
pub fn side_color(side: Side) -> Color {
    match side {
        Side::Buy => POSITIVE,
        Side::Sell => NEGATIVE,
    }
}

pub fn status_color(status: &OrderStatus) -> Color {
    match status {
        OrderStatus::Open => ACCENT,
        OrderStatus::Partial => WARNING,
        OrderStatus::Filled => POSITIVE,
        OrderStatus::Cancelled => NEGATIVE,
        OrderStatus::Other(_) => NEUTRAL,
    }
}

/// Slice colors for statuses outside the known four.
const EXTRA_SLICE_COLORS: [Color; 4] = [
    NEUTRAL,
    Color::Rgb(255, 215, 0),
    Color::Rgb(135, 206, 250),
    TEXT_SECONDARY,
];

/// Pie slice color: fixed per known status, cycling for unknown ones.
pub fn slice_color(status: &OrderStatus, index: usize) -> Color {
    match status {
        OrderStatus::Other(_) => EXTRA_SLICE_COLORS[index % EXTRA_SLICE_COLORS.len()],
        known => status_color(known),
    }
}
