//! Panel 5 — Trade Log: traded quantity per price and the trade history.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use orderdash_core::aggregate::PriceLevel;
use orderdash_core::report::format_timestamp;

use crate::app::AppState;
use crate::theme;

const BAR_WIDTH: u16 = 5;
const BAR_GAP: u16 = 1;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    if app.view.trades.is_empty() {
        crate::ui::render_placeholder(f, area, "No trades yet.");
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_grouped(f, rows[0], app);
    render_history(f, rows[1], app);
}

/// At most `capacity` consecutive levels, centred on `center` when they do
/// not all fit.
pub fn visible_window(levels: &[PriceLevel], capacity: usize, center: i64) -> &[PriceLevel] {
    if levels.len() <= capacity {
        return levels;
    }
    let pivot = levels.partition_point(|l| l.price < center);
    let start = pivot
        .saturating_sub(capacity / 2)
        .min(levels.len() - capacity);
    &levels[start..start + capacity]
}

fn render_grouped(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(format!(
            " Traded Quantity by Price ({} levels) ",
            app.view.grouped_trades.len()
        ))
        .title_style(theme::accent());

    let inner_width = block.inner(area).width as usize;
    let capacity = (inner_width / (BAR_WIDTH + BAR_GAP) as usize).max(1);
    let center = app.view.ticker.map(|t| t.price).unwrap_or_default();
    let shown = visible_window(&app.view.grouped_trades, capacity, center);

    let bars: Vec<Bar> = shown
        .iter()
        .map(|l| {
            let style = if Some(l.price) == app.view.ticker.map(|t| t.price) {
                theme::accent()
            } else {
                theme::neutral()
            };
            Bar::default()
                .value(l.quantity)
                .label(Line::from(l.price.to_string()))
                .style(style)
                .value_style(theme::text().bg(style.fg.unwrap_or(theme::NEUTRAL)))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .bar_width(BAR_WIDTH)
        .bar_gap(BAR_GAP)
        .data(BarGroup::default().bars(&bars));

    f.render_widget(chart, area);
}

fn render_history(f: &mut Frame, area: Rect, app: &AppState) {
    let trades = &app.view.trades;
    let visible = &trades[..trades.len().min(app.display.max_rows)];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(format!(" Trade History ({} trades) [j/k] ", trades.len()))
        .title_style(theme::accent_bold());

    let header = Row::new(
        ["TradeID", "BuyOrderID", "SellOrderID", "Price", "Qty", "Time"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::accent_bold())),
    )
    .height(1);

    let scroll = app.trades_scroll;
    let currency = &app.display.currency;
    let rows = visible.iter().enumerate().skip(scroll).map(|(i, t)| {
        let style = if i == scroll {
            Style::default()
                .bg(theme::NEUTRAL)
                .fg(theme::TEXT)
                .add_modifier(Modifier::BOLD)
        } else {
            theme::text()
        };
        Row::new(vec![
            Cell::from(t.trade_id.to_string()),
            Cell::from(t.buy_order_id.to_string()).style(theme::positive()),
            Cell::from(t.sell_order_id.to_string()).style(theme::negative()),
            Cell::from(format!("{currency}{}", t.price)),
            Cell::from(t.quantity.to_string()),
            Cell::from(format_timestamp(t.timestamp)).style(theme::muted()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(8),
        Constraint::Length(11),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(6),
        Constraint::Min(19),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);

    f.render_widget(table, area);
}
