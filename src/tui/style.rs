//! Color constants and bar-scaling helpers for the TUI.

use ratatui::style::Color;

use crate::gap::health::HealthStatus;
use crate::gap::waterfall::WaterfallBar;

/// EYA/OA total bar color.
pub const TOTAL_COLOR: Color = Color::Cyan;
/// Positive contribution color.
pub const GAIN_COLOR: Color = Color::Green;
/// Negative contribution color.
pub const LOSS_COLOR: Color = Color::Red;
/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Border of the focused slider.
pub const FOCUS_COLOR: Color = Color::Yellow;
/// Slider fill color.
pub const SLIDER_COLOR: Color = Color::Blue;

/// Returns the color for a health tier; gray when undefined.
pub fn health_color(health: Option<HealthStatus>) -> Color {
    match health {
        Some(HealthStatus::WithinExpectations) => Color::Green,
        Some(HealthStatus::Investigate) => Color::Yellow,
        Some(HealthStatus::SignificantUnderperformance) => Color::Red,
        None => Color::DarkGray,
    }
}

/// Returns the fill color of a waterfall bar.
pub fn bar_color(bar: &WaterfallBar) -> Color {
    if bar.is_total {
        TOTAL_COLOR
    } else if bar.signed_value >= 0.0 {
        GAIN_COLOR
    } else {
        LOSS_COLOR
    }
}

/// Computes the visible value window for the waterfall with 10% padding.
///
/// The floor is raised above zero so small components stay visible next to
/// the two totals; total bars are drawn from the floor.
pub fn axis_bounds(bars: &[WaterfallBar]) -> [f64; 2] {
    let lows = bars
        .iter()
        .map(|b| if b.is_total { b.top() } else { b.base });
    let min = lows.fold(f64::INFINITY, f64::min);
    let max = bars.iter().map(WaterfallBar::top).fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    let range = (max - min).max(0.1);
    let pad = range * 0.1;
    [(min - pad).max(0.0), max + pad]
}

/// Maps a bar onto `width` character cells of the `bounds` window.
///
/// Returns `(offset, length)`; any bar with non-zero height gets at least
/// one cell.
pub fn bar_span(bar: &WaterfallBar, bounds: [f64; 2], width: u16) -> (u16, u16) {
    let [lo, hi] = bounds;
    let span = (hi - lo).max(f64::EPSILON);
    let w = f64::from(width);
    let to_cell = |v: f64| (((v - lo) / span) * w).round().clamp(0.0, w) as u16;

    let start = if bar.is_total { 0 } else { to_cell(bar.base) };
    let end = to_cell(bar.top());
    let mut len = end.saturating_sub(start);
    if len == 0 && bar.height > 0.0 && width > 0 {
        len = 1;
    }
    let start = start.min(width.saturating_sub(len));
    (start, len)
}
