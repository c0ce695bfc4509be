//! Panel 1 — Market Summary: headline metrics and the price trend chart.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use orderdash_core::aggregate::{format_volume, MarketSummary};
use orderdash_core::report::format_timestamp;
use orderdash_core::PriceAxis;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)])
        .split(area);

    render_metrics(f, chunks[0], app);
    render_price_chart(f, chunks[1], app);
}

fn metric(label: &str, value: String, style: Style) -> Vec<Span<'static>> {
    vec![
        Span::styled(format!("  {label}: "), theme::muted()),
        Span::styled(value, style),
    ]
}

pub fn metric_lines(summary: Option<&MarketSummary>, currency: &str) -> Vec<Line<'static>> {
    let Some(s) = summary else {
        return vec![
            Line::from(metric("Last Traded Price", "No trades yet.".into(), theme::muted())),
            Line::from(metric("Total Volume", "No volume recorded.".into(), theme::muted())),
        ];
    };

    let mut first = metric(
        "Last Traded Price",
        format!("{currency}{}", s.last_price),
        theme::accent_bold(),
    );
    first.extend(metric("Total Volume", format_volume(s.total_volume), theme::text()));
    first.extend(metric("Trades", s.trade_count.to_string(), theme::text()));

    let mut second = metric("High", format!("{currency}{}", s.high), theme::positive());
    second.extend(metric("Low", format!("{currency}{}", s.low), theme::negative()));
    if let Some(vwap) = s.vwap {
        second.extend(metric("VWAP", format!("{currency}{vwap:.2}"), theme::neutral()));
    }

    let third = metric(
        "Session",
        format!(
            "{} → {}",
            format_timestamp(s.first_timestamp),
            format_timestamp(s.last_timestamp)
        ),
        theme::muted(),
    );

    vec![Line::from(first), Line::from(second), Line::from(third)]
}

fn render_metrics(f: &mut Frame, area: Rect, app: &AppState) {
    let lines = metric_lines(app.view.summary.as_ref(), &app.display.currency);
    f.render_widget(Paragraph::new(lines), area);
}

fn render_price_chart(f: &mut Frame, area: Rect, app: &AppState) {
    let data = app.view.price_series(app.price_axis);
    if data.is_empty() {
        crate::ui::render_placeholder(f, area, "No trade data to display.");
        return;
    }

    let (x_min, x_max) = bounds(data.iter().map(|p| p.0));
    let (p_min, p_max) = bounds(data.iter().map(|p| p.1));
    let padding = ((p_max - p_min) * 0.05).max(1.0);
    let y_min = p_min - padding;
    let y_max = p_max + padding;
    // A single point still needs a non-empty x range.
    let x_max = if x_max > x_min { x_max } else { x_min + 1.0 };

    let x_labels = match app.price_axis {
        PriceAxis::Timestamp => vec![
            Span::styled(time_label(x_min), theme::muted()),
            Span::styled(time_label(x_max), theme::muted()),
        ],
        PriceAxis::Sequence => vec![
            Span::styled("1", theme::muted()),
            Span::styled(format!("{}", data.len()), theme::muted()),
        ],
    };

    let dataset = Dataset::default()
        .name("Price")
        .marker(symbols::Marker::Braille)
        .style(Style::default().fg(theme::ACCENT))
        .graph_type(GraphType::Line)
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .x_axis(
            Axis::default()
                .title(Span::styled(
                    format!("{} [x]", app.price_axis.label()),
                    theme::muted(),
                ))
                .style(theme::muted())
                .bounds([x_min, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Price", theme::muted()))
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format!("{y_min:.0}"), theme::muted()),
                    Span::styled(format!("{y_max:.0}"), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Clock time of an epoch-seconds axis value.
fn time_label(epoch: f64) -> String {
    let full = format_timestamp(epoch as i64);
    full.split(' ').nth(1).unwrap_or(&full).to_string()
}
