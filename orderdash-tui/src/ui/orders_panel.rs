//! Panel 3 — Active Orders: resting buy and sell orders, newest first.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use orderdash_core::report::format_timestamp;
use orderdash_core::{OrderRow, Side};

use crate::app::AppState;
use crate::theme;

const HEADERS: [&str; 6] = ["OrderID", "Price", "Qty", "Filled", "Remaining", "Time"];

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (side, col) in [(Side::Buy, cols[0]), (Side::Sell, cols[1])] {
        render_table(f, col, app, side);
    }
}

fn render_table(f: &mut Frame, area: Rect, app: &AppState, side: Side) {
    let focused = app.orders.focus == side;
    let orders = app.view.orders(side);
    let visible = &orders[..orders.len().min(app.display.max_rows)];
    let color = theme::side_color(side);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(color)
        } else {
            theme::muted()
        })
        .title(format!(
            " Active {} Orders ({}) {}",
            side.label(),
            orders.len(),
            if focused { "[h/l] " } else { "" }
        ))
        .title_style(if focused {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            theme::muted()
        });

    if visible.is_empty() {
        let inner = block.inner(area);
        f.render_widget(block, area);
        let message = match side {
            Side::Buy => "No active buy orders.",
            Side::Sell => "No active sell orders.",
        };
        crate::ui::render_placeholder(f, inner, message);
        return;
    }

    let header = Row::new(
        HEADERS
            .iter()
            .map(|h| Cell::from(*h).style(theme::accent_bold())),
    )
    .height(1);

    let scroll = app.orders.scroll(side);
    let rows = visible.iter().enumerate().skip(scroll).map(|(i, o)| {
        let style = if focused && i == scroll {
            Style::default()
                .bg(theme::NEUTRAL)
                .fg(theme::TEXT)
                .add_modifier(Modifier::BOLD)
        } else {
            theme::text()
        };
        order_row(o, color).style(style)
    });

    let widths = [
        Constraint::Length(8),
        Constraint::Length(7),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(9),
        Constraint::Min(19),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);

    f.render_widget(table, area);
}

fn order_row(o: &OrderRow, color: ratatui::style::Color) -> Row<'static> {
    Row::new(vec![
        Cell::from(o.order_id.to_string()),
        Cell::from(o.price.to_string()).style(Style::default().fg(color)),
        Cell::from(o.quantity.to_string()),
        Cell::from(o.filled_quantity.to_string()),
        Cell::from(o.remaining().to_string()),
        Cell::from(format_timestamp(o.timestamp)).style(theme::muted()),
    ])
}

#[cfg(test)]
mod tests {
    use crate::app::Panel;
    use crate::test_helpers::{sample_snapshot, test_app};
    use crate::ui::testing::{buffer_text, render};
    use orderdash_core::DataSet;

    #[test]
    fn empty_tables_show_placeholders() {
        let (mut app, _rx) = test_app();
        app.active_panel = Panel::Orders;
        let text = buffer_text(&render(&app, 140, 30));
        assert!(text.contains("No active buy orders."));
        assert!(text.contains("No active sell orders."));
    }

    #[test]
    fn newest_order_is_first_row() {
        let (mut app, _rx) = test_app();
        app.apply_snapshot(sample_snapshot(), DataSet::ALL.to_vec());
        app.active_panel = Panel::Orders;
        let newest = app.view.buy_orders[0].order_id.to_string();
        let oldest = app.view.buy_orders.last().unwrap().order_id.to_string();

        let text = buffer_text(&render(&app, 160, 40));
        let newest_at = text.find(&format!("│{newest} ")).unwrap();
        let oldest_at = text.find(&format!("│{oldest} ")).unwrap();
        assert!(newest_at < oldest_at);
    }
}
