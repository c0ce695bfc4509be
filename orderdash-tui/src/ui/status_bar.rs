//! Bottom status bar — poll state, last update, last status message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{format_interval, AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = Vec::new();

    spans.push(Span::styled(
        " 1:Summary 2:Depth 3:Orders 4:Status 5:Trades 6:Help",
        theme::muted(),
    ));
    spans.push(Span::raw(" | "));

    if app.poll.paused {
        spans.push(Span::styled("PAUSED", theme::warning()));
    } else {
        spans.push(Span::styled("LIVE", theme::positive()));
    }
    spans.push(Span::styled(
        format!(" {}", format_interval(app.poll.interval)),
        theme::muted(),
    ));

    match app.poll.last_update {
        Some(at) => spans.push(Span::styled(
            format!(" | updated {}", at.format("%H:%M:%S")),
            theme::muted(),
        )),
        None => spans.push(Span::styled(" | waiting for data", theme::muted())),
    }

    if !app.error_history.is_empty() {
        spans.push(Span::styled(
            format!(" | {} err (e)", app.error_history.len()),
            theme::negative(),
        ));
    }

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
