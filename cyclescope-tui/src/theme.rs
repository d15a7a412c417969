//! Neon-on-dark theme tokens.
//!
//! Score-dependent colors delegate to the core gradient so lines, table
//! cells and the legend all agree on the cyan→magenta mapping.

use ratatui::style::{Color, Modifier, Style};

use cyclescope_core::gradient::color_for;
use cyclescope_core::regions::RegionKind;

/// Electric cyan accent (focus, highlights).
pub const ACCENT: Color = Color::Rgb(0, 255, 255);
/// Neon green (oversold bands — accumulation zones).
pub const OVERSOLD: Color = Color::Rgb(0, 255, 128);
/// Hot pink (overbought bands — distribution zones).
pub const OVERBOUGHT: Color = Color::Rgb(255, 20, 147);
/// Neon orange (warnings).
pub const WARNING: Color = Color::Rgb(255, 140, 0);
/// Steel blue (muted/secondary text).
pub const MUTED: Color = Color::Rgb(100, 149, 237);
/// Light gray body text.
pub const TEXT: Color = Color::Rgb(200, 200, 200);

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn negative() -> Style {
    Style::default().fg(OVERBOUGHT)
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

/// Line/cell color for a z-score, via the core gradient.
pub fn score_color(score: f64) -> Color {
    let rgb = color_for(score);
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

pub fn region_color(kind: RegionKind) -> Color {
    match kind {
        RegionKind::Oversold => OVERSOLD,
        RegionKind::Overbought => OVERBOUGHT,
    }
}
