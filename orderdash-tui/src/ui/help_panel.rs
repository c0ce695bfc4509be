//! Panel 6 — Help: keyboard shortcuts.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global Navigation");
    key(&mut lines, "1-6", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "e", "Open error history overlay");
    key(&mut lines, "q", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Refresh");
    key(&mut lines, "r", "Reload the CSV files now");
    key(&mut lines, "p", "Pause / resume polling");
    key(&mut lines, "+ / -", "Poll slower / faster");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 1 — Market Summary");
    key(&mut lines, "x", "Toggle price chart x axis (time / trade #)");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 3 — Active Orders");
    key(&mut lines, "h / l", "Focus buy / sell table");
    key(&mut lines, "j / k", "Scroll focused table");
    key(&mut lines, "PgUp / PgDn", "Scroll by page");
    key(&mut lines, "g", "Back to newest order");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 5 — Trade Log");
    key(&mut lines, "j / k", "Scroll trade history");
    key(&mut lines, "g", "Back to newest trade");
    lines.push(Line::from(""));

    section(&mut lines, "Data Files");
    for (label, path) in &app.sources_display {
        key(&mut lines, label, path);
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn section(lines: &mut Vec<Line<'_>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key(lines: &mut Vec<Line<'_>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>20}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
