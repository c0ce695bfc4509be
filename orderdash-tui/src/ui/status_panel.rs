//! Panel 4 — Order Status: pie of order lifecycle states with a legend.
//!
//! Ratatui has no pie widget, so the pie is a braille canvas filled with
//! sample points, each coloured by the wedge its angle falls in.

use std::f64::consts::TAU;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use orderdash_core::aggregate::StatusCount;

use crate::app::AppState;
use crate::theme;

/// Grid step used to fill the unit disc.
const FILL_STEP: f64 = 0.02;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let counts = &app.view.status_counts;
    if counts.is_empty() {
        crate::ui::render_placeholder(f, area, "No order status data available.");
        return;
    }

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_pie(f, cols[0], counts);
    render_legend(f, cols[1], counts, app.view.status_total());
}

/// Which wedge an angle falls in. Angles run clockwise from twelve o'clock
/// as a fraction of a full turn.
fn wedge_index(turn: f64, counts: &[StatusCount]) -> usize {
    let mut cumulative = 0.0;
    for (i, c) in counts.iter().enumerate() {
        cumulative += c.share;
        if turn < cumulative {
            return i;
        }
    }
    counts.len().saturating_sub(1)
}

/// Sample points of the unit disc, grouped by wedge.
pub fn wedge_points(counts: &[StatusCount]) -> Vec<Vec<(f64, f64)>> {
    let mut wedges = vec![Vec::new(); counts.len()];
    if counts.is_empty() {
        return wedges;
    }

    let steps = (2.0 / FILL_STEP) as i32;
    for yi in 0..=steps {
        let y = -1.0 + yi as f64 * FILL_STEP;
        for xi in 0..=steps {
            let x = -1.0 + xi as f64 * FILL_STEP;
            if x * x + y * y > 1.0 {
                continue;
            }
            // atan2(x, y) measures clockwise from the positive y axis.
            let turn = x.atan2(y).rem_euclid(TAU) / TAU;
            wedges[wedge_index(turn, counts)].push((x, y));
        }
    }
    wedges
}

fn render_pie(f: &mut Frame, area: Rect, counts: &[StatusCount]) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let wedges = wedge_points(counts);

    // Terminal cells are about twice as tall as wide; widen the bounds on the
    // longer axis so the disc stays round.
    let ratio = area.width as f64 / (area.height as f64 * 2.0);
    let (x_half, y_half) = if ratio >= 1.0 {
        (ratio, 1.0)
    } else {
        (1.0, 1.0 / ratio)
    };

    let canvas = Canvas::default()
        .marker(symbols::Marker::Braille)
        .x_bounds([-x_half * 1.05, x_half * 1.05])
        .y_bounds([-y_half * 1.05, y_half * 1.05])
        .paint(|ctx| {
            for (i, (points, count)) in wedges.iter().zip(counts).enumerate() {
                ctx.draw(&Points {
                    coords: points,
                    color: theme::slice_color(&count.status, i),
                });
            }
        });

    f.render_widget(canvas, area);
}

fn render_legend(f: &mut Frame, area: Rect, counts: &[StatusCount], total: usize) {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("Orders tracked: {total}"),
            theme::accent_bold(),
        )),
        Line::from(""),
    ];
    for (i, c) in counts.iter().enumerate() {
        let color = theme::slice_color(&c.status, i);
        lines.push(Line::from(vec![
            Span::styled("■ ", Style::default().fg(color)),
            Span::styled(format!("{:<10}", c.status.label()), Style::default().fg(color)),
            Span::styled(format!("{:>7}", c.count), theme::text()),
            Span::styled(format!("  {:>5.1}%", c.share * 100.0), theme::muted()),
        ]));
    }
    f.render_widget(Paragraph::new(lines), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Panel;
    use crate::test_helpers::{sample_snapshot, test_app};
    use crate::ui::testing::{buffer_text, render};
    use orderdash_core::{DataSet, OrderStatus};

    fn count(status: OrderStatus, share: f64) -> StatusCount {
        StatusCount {
            status,
            count: 0,
            share,
        }
    }

    #[test]
    fn wedges_split_the_disc_by_share() {
        let counts = vec![
            count(OrderStatus::Filled, 0.75),
            count(OrderStatus::Open, 0.25),
        ];
        let wedges = wedge_points(&counts);
        let total = (wedges[0].len() + wedges[1].len()) as f64;
        let first = wedges[0].len() as f64 / total;
        assert!((first - 0.75).abs() < 0.02, "first wedge share {first}");
    }

    #[test]
    fn first_wedge_starts_at_twelve_oclock() {
        let counts = vec![
            count(OrderStatus::Filled, 0.5),
            count(OrderStatus::Open, 0.5),
        ];
        let wedges = wedge_points(&counts);
        // Clockwise from the top, the first half is the right side.
        assert!(wedges[0].iter().all(|&(x, _)| x >= 0.0));
        assert!(wedges[1].iter().all(|&(x, _)| x <= 0.0));
    }

    #[test]
    fn empty_status_shows_placeholder() {
        let (mut app, _rx) = test_app();
        app.active_panel = Panel::Status;
        let text = buffer_text(&render(&app, 100, 30));
        assert!(text.contains("No order status data available."));
    }

    #[test]
    fn legend_lists_statuses() {
        let (mut app, _rx) = test_app();
        app.apply_snapshot(sample_snapshot(), DataSet::ALL.to_vec());
        app.active_panel = Panel::Status;
        let text = buffer_text(&render(&app, 120, 30));
        assert!(text.contains("FILLED"));
        assert!(text.contains("CANCELLED"));
        assert!(text.contains(&format!("Orders tracked: {}", app.view.status_total())));
    }
}
