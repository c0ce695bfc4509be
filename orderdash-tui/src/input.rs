//! Keyboard input dispatch — overlays → global keys → panel-specific handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Overlay, Panel};

/// Page size for PageUp / PageDown in tables.
const PAGE: isize = 10;

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Welcome => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys (always available).
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
            return;
        }
        KeyCode::Char(c @ '1'..='6') => {
            let idx = c as usize - '1' as usize;
            if let Some(panel) = Panel::from_index(idx) {
                app.active_panel = panel;
            }
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        KeyCode::Char('r') => {
            app.request_refresh();
            return;
        }
        KeyCode::Char('p') => {
            app.toggle_pause();
            return;
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            app.step_interval(true);
            return;
        }
        KeyCode::Char('-') => {
            app.step_interval(false);
            return;
        }
        KeyCode::Char('e') => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
            return;
        }
        _ => {}
    }

    // 3. Panel-specific keys.
    match app.active_panel {
        Panel::Overview => handle_overview_key(app, key),
        Panel::Orders => handle_orders_key(app, key),
        Panel::Trades => handle_table_key(app, key),
        Panel::Depth | Panel::Status | Panel::Help => {} // display only
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_overview_key(app: &mut AppState, key: KeyEvent) {
    if key.code == KeyCode::Char('x') {
        app.toggle_price_axis();
    }
}

fn handle_orders_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('l') | KeyCode::Right => {
            app.toggle_orders_focus();
        }
        _ => handle_table_key(app, key),
    }
}

fn handle_table_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.scroll(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll(-1),
        KeyCode::PageDown => app.scroll(PAGE),
        KeyCode::PageUp => app.scroll(-PAGE),
        KeyCode::Char('g') | KeyCode::Home => app.scroll_to_top(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poller::PollerCommand;
    use crate::test_helpers::{sample_snapshot, test_app};
    use orderdash_core::{DataSet, PriceAxis, Side};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn number_keys_switch_panels() {
        let (mut app, _rx) = test_app();
        handle_key(&mut app, press(KeyCode::Char('4')));
        assert_eq!(app.active_panel, Panel::Status);
        handle_key(&mut app, press(KeyCode::Char('6')));
        assert_eq!(app.active_panel, Panel::Help);
    }

    #[test]
    fn tab_cycles() {
        let (mut app, _rx) = test_app();
        handle_key(&mut app, press(KeyCode::Tab));
        assert_eq!(app.active_panel, Panel::Depth);
        handle_key(&mut app, press(KeyCode::BackTab));
        handle_key(&mut app, press(KeyCode::BackTab));
        assert_eq!(app.active_panel, Panel::Help);
    }

    #[test]
    fn welcome_swallows_first_key() {
        let (mut app, _rx) = test_app();
        app.overlay = Overlay::Welcome;
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(app.running);
        assert_eq!(app.overlay, Overlay::None);
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn release_events_are_ignored() {
        let (mut app, _rx) = test_app();
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        handle_key(&mut app, key);
        assert!(app.running);
    }

    #[test]
    fn r_requests_refresh() {
        let (mut app, rx) = test_app();
        handle_key(&mut app, press(KeyCode::Char('r')));
        assert_eq!(rx.try_recv().unwrap(), PollerCommand::RefreshNow);
    }

    #[test]
    fn x_toggles_axis_on_overview_only() {
        let (mut app, _rx) = test_app();
        handle_key(&mut app, press(KeyCode::Char('x')));
        assert_eq!(app.price_axis, PriceAxis::Sequence);
        app.active_panel = Panel::Depth;
        handle_key(&mut app, press(KeyCode::Char('x')));
        assert_eq!(app.price_axis, PriceAxis::Sequence);
    }

    #[test]
    fn orders_focus_and_scroll() {
        let (mut app, _rx) = test_app();
        app.apply_snapshot(sample_snapshot(), DataSet::ALL.to_vec());
        app.active_panel = Panel::Orders;

        handle_key(&mut app, press(KeyCode::Char('j')));
        handle_key(&mut app, press(KeyCode::Char('j')));
        assert_eq!(app.orders.buy_scroll, 2);

        handle_key(&mut app, press(KeyCode::Char('l')));
        assert_eq!(app.orders.focus, Side::Sell);
        handle_key(&mut app, press(KeyCode::Down));
        assert_eq!(app.orders.sell_scroll, 1);
        assert_eq!(app.orders.buy_scroll, 2);

        handle_key(&mut app, press(KeyCode::Char('g')));
        assert_eq!(app.orders.sell_scroll, 0);
    }

    #[test]
    fn error_overlay_opens_and_closes() {
        let (mut app, _rx) = test_app();
        handle_key(&mut app, press(KeyCode::Char('e')));
        assert_eq!(app.overlay, Overlay::ErrorHistory);
        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.overlay, Overlay::None);
    }
}
