//! Top-level UI layout — ticker line, active panel, status bar.

pub mod depth_panel;
pub mod help_panel;
pub mod orders_panel;
pub mod overlays;
pub mod overview_panel;
pub mod status_bar;
pub mod status_panel;
pub mod trades_panel;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use orderdash_core::report::format_timestamp;

use crate::app::{AppState, Overlay, Panel};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    // Split: ticker line + main area + status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    let ticker_area = chunks[0];
    let main_area = chunks[1];
    let status_area = chunks[2];

    render_ticker(f, ticker_area, app);
    draw_panel(f, main_area, app);
    status_bar::render(f, status_area, app);

    match &app.overlay {
        Overlay::Welcome => overlays::render_welcome(f, main_area, app),
        Overlay::ErrorHistory => overlays::render_error_history(f, main_area, app),
        Overlay::None => {}
    }
}

/// `Live Ticker: ₹1,012 | Qty: 40 | Time: 2023-11-14 22:13:20`
pub fn ticker_line(app: &AppState) -> Line<'static> {
    match &app.view.ticker {
        Some(t) => Line::from(vec![
            Span::styled(" Live Ticker: ", theme::accent_bold()),
            Span::styled(
                format!("{}{}", app.display.currency, t.price),
                theme::text().add_modifier(ratatui::style::Modifier::BOLD),
            ),
            Span::styled(" | ", theme::muted()),
            Span::styled(format!("Qty: {}", t.quantity), theme::text()),
            Span::styled(" | ", theme::muted()),
            Span::styled(format!("Time: {}", format_timestamp(t.timestamp)), theme::text()),
        ]),
        None => Line::from(vec![
            Span::styled(" Live Ticker: ", theme::accent_bold()),
            Span::styled("No trades yet.", theme::muted()),
        ]),
    }
}

fn render_ticker(f: &mut Frame, area: Rect, app: &AppState) {
    f.render_widget(Paragraph::new(ticker_line(app)), area);
}

/// Draw a single panel with its border.
fn draw_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let panel = app.active_panel;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {} [{}] ", panel.label(), panel.index() + 1))
        .title_style(theme::panel_title(true))
        .style(Style::default().bg(theme::BACKGROUND));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match panel {
        Panel::Overview => overview_panel::render(f, inner, app),
        Panel::Depth => depth_panel::render(f, inner, app),
        Panel::Orders => orders_panel::render(f, inner, app),
        Panel::Status => status_panel::render(f, inner, app),
        Panel::Trades => trades_panel::render(f, inner, app),
        Panel::Help => help_panel::render(f, inner, app),
    }
}

/// Placeholder paragraph for a chart or table with nothing to show.
pub(crate) fn render_placeholder(f: &mut Frame, area: Rect, message: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), theme::muted())),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
