//! Panel 2 — Market Depth: bid and ask quantity per price level.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph};
use ratatui::Frame;

use orderdash_core::aggregate::{PriceLevel, TopOfBook};
use orderdash_core::Side;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    f.render_widget(
        Paragraph::new(top_of_book_line(&app.view.top_of_book, &app.display.currency)),
        rows[0],
    );

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    for (side, col) in [(Side::Buy, cols[0]), (Side::Sell, cols[1])] {
        render_side(f, col, app, side);
    }
}

pub fn top_of_book_line(tob: &TopOfBook, currency: &str) -> Line<'static> {
    let level = |l: Option<PriceLevel>| match l {
        Some(l) => format!("{currency}{} x {}", l.price, l.quantity),
        None => "-".to_string(),
    };
    let spread = match tob.spread() {
        Some(s) => format!("{currency}{s}"),
        None => "-".to_string(),
    };
    Line::from(vec![
        Span::styled(" Best Bid: ", theme::muted()),
        Span::styled(level(tob.best_bid), theme::positive()),
        Span::styled("  Best Ask: ", theme::muted()),
        Span::styled(level(tob.best_ask), theme::negative()),
        Span::styled("  Spread: ", theme::muted()),
        Span::styled(spread, theme::text()),
    ])
}

fn render_side(f: &mut Frame, area: Rect, app: &AppState, side: Side) {
    let levels = app.view.depth(side);
    let color = theme::side_color(side);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(format!(" {} Orders ({} levels) ", side.label(), levels.len()))
        .title_style(Style::default().fg(color));

    if levels.is_empty() {
        let inner = block.inner(area);
        f.render_widget(block, area);
        let message = match side {
            Side::Buy => "No active buy orders.",
            Side::Sell => "No active sell orders.",
        };
        crate::ui::render_placeholder(f, inner, message);
        return;
    }

    let shown = &levels[..levels.len().min(app.display.depth_levels)];
    let bars: Vec<Bar> = shown
        .iter()
        .map(|l| {
            Bar::default()
                .value(l.quantity)
                .label(Line::from(format!("{}", l.price)))
                .text_value(l.quantity.to_string())
                .style(Style::default().fg(color))
                .value_style(theme::text().bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));

    f.render_widget(chart, area);
}
