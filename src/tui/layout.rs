//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};

use super::runtime::{App, Slider};
use super::style;
use crate::reporting::{
    format_fraction, format_gap_percent, format_gwh, format_percent, format_signed_gwh,
};

/// Width of the label column in the waterfall panel.
const LABEL_WIDTH: u16 = 22;
/// Width of the value column in the waterfall panel.
const VALUE_WIDTH: u16 = 14;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(8),    // waterfall
            Constraint::Length(3), // availability slider
            Constraint::Length(3), // electrical slider
            Constraint::Length(4), // status panel
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_waterfall(frame, app, chunks[1]);
    render_slider(frame, app, Slider::Availability, chunks[2]);
    render_slider(frame, app, Slider::Electrical, chunks[3]);
    render_status(frame, app, chunks[4]);
    render_footer(frame, app, chunks[5]);
}

/// Header bar: case name, gap, health tier.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let report = &app.report;
    let header = Line::from(vec![
        Span::styled(
            " EYA-GAP ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(&app.case_name, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(
            " │ gap {} ({}) │ ",
            format_signed_gwh(report.decomposition.gap),
            format_gap_percent(report.decomposition.gap_percent),
        )),
        Span::styled(
            report.health_label(),
            Style::default()
                .fg(style::health_color(report.health))
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// Floating horizontal bars, one row per waterfall step.
fn render_waterfall(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" AEP Waterfall (GWh/yr) ")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    let bar_width = inner.width.saturating_sub(LABEL_WIDTH + VALUE_WIDTH + 2);
    let bounds = style::axis_bounds(&app.report.bars);

    let mut lines: Vec<Line> = app
        .report
        .bars
        .iter()
        .map(|bar| {
            let (offset, len) = style::bar_span(bar, bounds, bar_width);
            let value = if bar.is_total {
                format_gwh(bar.signed_value)
            } else {
                format_signed_gwh(bar.signed_value)
            };
            Line::from(vec![
                Span::raw(format!("{:<w$}", bar.label, w = usize::from(LABEL_WIDTH))),
                Span::raw(format!("{value:>w$} ", w = usize::from(VALUE_WIDTH))),
                Span::raw(" ".repeat(usize::from(offset))),
                Span::styled(
                    "█".repeat(usize::from(len)),
                    Style::default().fg(style::bar_color(bar)),
                ),
            ])
        })
        .collect();
    lines.push(Line::from(Span::styled(
        format!(
            "{:>w$}axis {:.3} .. {:.3}",
            "",
            bounds[0],
            bounds[1],
            w = usize::from(LABEL_WIDTH + VALUE_WIDTH + 1)
        ),
        Style::default().fg(style::FOOTER_FG),
    )));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// One sensitivity slider as a centered gauge.
fn render_slider(frame: &mut Frame, app: &App, slider: Slider, area: Rect) {
    let d = &app.report.decomposition;
    let (title, oa_loss, adjusted) = match slider {
        Slider::Availability => (
            " Availability Δ ",
            app.oa.availability_losses,
            d.adjusted_availability_losses,
        ),
        Slider::Electrical => (
            " Electrical Δ ",
            app.oa.electrical_losses,
            d.adjusted_electrical_losses,
        ),
    };
    let delta = app.delta(slider);
    let max = app.max_delta();
    let ratio = ((delta + max) / (2.0 * max)).clamp(0.0, 1.0);

    let border = if app.selected == slider {
        Style::default().fg(style::FOCUS_COLOR)
    } else {
        Style::default()
    };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border),
        )
        .gauge_style(Style::default().fg(style::SLIDER_COLOR))
        .ratio(ratio)
        .label(format!(
            "{:+.2} pp   OA {} → {}",
            delta * 100.0,
            format_fraction(oa_loss),
            format_fraction(adjusted),
        ));
    frame.render_widget(gauge, area);
}

/// Status panel: ideal energies and the bridge check.
fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let d = &app.report.decomposition;
    let lines = vec![
        Line::from(format!(
            "  EYA ideal={}  OA ideal={}  EYA losses: avail={} elec={}",
            format_gwh(d.eya_ideal_energy),
            format_gwh(app.oa.turbine_ideal_energy),
            format_fraction(app.eya.availability_losses),
            format_fraction(app.eya.electrical_losses),
        )),
        Line::from(format!(
            "  unexplained={} ({} of EYA)  bridge error={:.1e}",
            format_signed_gwh(d.unexplained_residual),
            if d.eya_aep == 0.0 {
                crate::reporting::UNDEFINED.to_string()
            } else {
                format_percent(100.0 * d.unexplained_residual / d.eya_aep)
            },
            d.bridge_error(),
        )),
    ];

    let block = Block::default().title(" Status ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Footer with keybinding hints or the last export message.
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let text = app.message.clone().unwrap_or_else(|| {
        " q:Quit  ↑/↓:Slider  ←/→:Adjust (Shift ×10)  0:Reset  1/2/3:Preset  r:Case  e:Export"
            .to_string()
    });
    let footer = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    #[test]
    fn renders_all_bars_and_health() {
        let app = App::from_preset("reference");
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let buffer = terminal.backend().buffer().clone();
        let text: String = buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Turbine Ideal Energy"));
        assert!(text.contains("OA AEP"));
        assert!(text.contains("Significant Underperformance"));
    }
}
